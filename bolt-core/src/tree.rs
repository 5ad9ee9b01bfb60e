use crate::types::NodeId;
use glam::Vec2;

/// One node of the discharge tree.
#[derive(Debug)]
pub struct GrowthNode {
    pub pos: Vec2,
    /// Steps away from the root; the root is 0.
    pub depth: u32,
    /// The ideal direction this lineage grows toward. Inherited by
    /// children unless a fork rotates it.
    pub branch_direction: Vec2,
    /// 1 + number of descendants created so far. Incremented eagerly
    /// on every ancestor whenever a node is appended, and used by
    /// renderers to scale stroke width.
    pub charge: u32,
    /// True once this node lies on a ground-connecting return path.
    /// Never unset.
    pub is_return: bool,
    /// Non-owning upward link; `None` for the root.
    pub parent: Option<NodeId>,
    /// Creation-ordered children.
    pub children: Vec<NodeId>,
}

/// Arena-backed discharge tree. The node at index 0 is the root; the
/// `children` lists own the structure and `parent` is lookup-only.
#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<GrowthNode>,
}

impl GrowthNode {
    fn new_root(pos: Vec2, branch_direction: Vec2) -> Self {
        Self {
            pos,
            depth: 0,
            branch_direction,
            charge: 1,
            is_return: false,
            parent: None,
            children: Vec::with_capacity(2),
        }
    }

    fn new_child(pos: Vec2, depth: u32, branch_direction: Vec2, parent: NodeId) -> Self {
        Self {
            pos,
            depth,
            branch_direction,
            charge: 1,
            is_return: false,
            parent: Some(parent),
            children: Vec::with_capacity(2),
        }
    }
}

impl Tree {
    pub fn new(root_pos: Vec2, root_direction: Vec2) -> Self {
        Self {
            nodes: vec![GrowthNode::new_root(root_pos, root_direction)],
        }
    }

    pub fn root(&self) -> &GrowthNode {
        &self.nodes[0]
    }

    /// Appends a child and bumps `charge` on every strict ancestor.
    ///
    /// The upward walk is iterative, so tree depth never translates
    /// into call-stack depth.
    pub fn add_child(&mut self, parent: NodeId, pos: Vec2, branch_direction: Vec2) -> NodeId {
        let id: NodeId = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes
            .push(GrowthNode::new_child(pos, depth, branch_direction, parent));
        self.nodes[parent].children.push(id);

        let mut cursor = parent;
        loop {
            self.nodes[cursor].charge += 1;
            match self.nodes[cursor].parent {
                Some(up) => cursor = up,
                None => break,
            }
        }
        id
    }

    /// Marks `id` and every ancestor as part of a return stroke.
    ///
    /// The flag marks "on the path from here up to the root that
    /// reaches the ground", so propagation has no gaps; nodes already
    /// marked stay marked.
    pub fn mark_return(&mut self, id: NodeId) {
        let mut cursor = Some(id);
        while let Some(n) = cursor {
            self.nodes[n].is_return = true;
            cursor = self.nodes[n].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts the nodes strictly below `id` by walking children lists.
    fn descendant_count(tree: &Tree, id: NodeId) -> u32 {
        let mut stack = tree.nodes[id].children.clone();
        let mut count = 0;
        while let Some(n) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&tree.nodes[n].children);
        }
        count
    }

    #[test]
    fn new_tree_has_a_single_root() {
        let tree = Tree::new(Vec2::new(50.0, 0.0), Vec2::Y);
        assert_eq!(tree.nodes.len(), 1);

        let root = tree.root();
        assert_eq!(root.depth, 0);
        assert_eq!(root.charge, 1);
        assert!(root.parent.is_none());
        assert!(root.children.is_empty());
        assert!(!root.is_return);
    }

    #[test]
    fn add_child_sets_depth_and_parent_edge() {
        let mut tree = Tree::new(Vec2::ZERO, Vec2::Y);
        let a = tree.add_child(0, Vec2::new(0.0, 10.0), Vec2::Y);
        let b = tree.add_child(a, Vec2::new(0.0, 20.0), Vec2::Y);

        assert_eq!(tree.nodes[a].depth, 1);
        assert_eq!(tree.nodes[b].depth, 2);
        assert_eq!(tree.nodes[b].parent, Some(a));
        assert_eq!(tree.nodes[a].children, vec![b]);
        assert_eq!(tree.nodes[0].children, vec![a]);
    }

    #[test]
    fn every_append_bumps_all_strict_ancestors() {
        let mut tree = Tree::new(Vec2::ZERO, Vec2::Y);
        let a = tree.add_child(0, Vec2::new(0.0, 1.0), Vec2::Y);
        let b = tree.add_child(a, Vec2::new(0.0, 2.0), Vec2::Y);
        // Fork off `a`: two children, creation order preserved.
        let c = tree.add_child(a, Vec2::new(1.0, 2.0), Vec2::X);
        let d = tree.add_child(c, Vec2::new(2.0, 2.0), Vec2::X);

        assert_eq!(tree.nodes[0].charge, 5);
        assert_eq!(tree.nodes[a].charge, 4);
        assert_eq!(tree.nodes[b].charge, 1);
        assert_eq!(tree.nodes[c].charge, 2);
        assert_eq!(tree.nodes[d].charge, 1);
        assert_eq!(tree.nodes[a].children, vec![b, c]);
    }

    #[test]
    fn charge_minus_one_equals_descendant_count() {
        let mut tree = Tree::new(Vec2::ZERO, Vec2::Y);
        let mut tip = 0;
        for i in 1..=6 {
            tip = tree.add_child(tip, Vec2::new(0.0, i as f32), Vec2::Y);
            if i % 2 == 0 {
                tree.add_child(tip, Vec2::new(1.0, i as f32), Vec2::X);
            }
        }

        for id in 0..tree.nodes.len() {
            assert_eq!(
                tree.nodes[id].charge - 1,
                descendant_count(&tree, id),
                "charge invariant broken at node {id}"
            );
        }
    }

    #[test]
    fn mark_return_propagates_to_the_root_only_along_ancestry() {
        let mut tree = Tree::new(Vec2::ZERO, Vec2::Y);
        let a = tree.add_child(0, Vec2::new(0.0, 1.0), Vec2::Y);
        let b = tree.add_child(a, Vec2::new(0.0, 2.0), Vec2::Y);
        let side = tree.add_child(a, Vec2::new(1.0, 2.0), Vec2::X);

        tree.mark_return(b);

        assert!(tree.nodes[b].is_return);
        assert!(tree.nodes[a].is_return);
        assert!(tree.nodes[0].is_return);
        assert!(!tree.nodes[side].is_return, "sibling must stay unmarked");
    }
}
