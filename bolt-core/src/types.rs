/// Identifier for a node in a [`crate::tree::Tree`].
///
/// An index into the tree's node arena. Parent links and children
/// lists store these instead of references, so upward traversal never
/// needs shared ownership. Only meaningful within the lifetime of the
/// `Tree` that produced it.
pub type NodeId = usize;
