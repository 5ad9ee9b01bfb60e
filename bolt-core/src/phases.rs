//! High-level growth phases for the lightning discharge tree.
//!
//! A full generation looks like:
//! 1. Resolve the origin and seed a Perlin bias-noise source from the
//!    caller's [`GrowthRng`] stream.
//! 2. Repeat [`growth_step`] — biased tip selection, one wobbly step,
//!    an optional fork — until a node nears the ground, the tip list
//!    empties, or the step bound trips.
//! 3. [`closure_phase`] — connect surviving groundward tips to the
//!    bottom boundary with straight return strokes.

use glam::Vec2;
use noise::{NoiseFn, Perlin};

use crate::{
    config::{Config, Origin},
    rng::GrowthRng,
    step::{self, StepParams},
    tree::Tree,
    types::NodeId,
};

/// Fraction of `height` at which the main growth loop stops.
pub const GROUND_FRACTION: f32 = 0.9;

/// Fraction of `height` a tip must have reached to grow a return stroke.
pub const RETURN_ELIGIBLE_FRACTION: f32 = 0.87;

/// World-to-noise coordinate scale for the per-node bias perturbation.
const BIAS_NOISE_SCALE: f32 = 0.1;

/// Result of one main-phase iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A node (and possibly a fork) was appended; growth continues.
    Advanced,
    /// A new node reached `GROUND_FRACTION * height`.
    ReachedGround,
    /// Every tip has left the horizontal bounds; nothing left to grow.
    NoTips,
}

/// Diagnostics for one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Main-phase iterations performed.
    pub steps: usize,
    /// The safety bound stopped the main loop. Not an error: the tree
    /// is still well-formed, just shorter than intended.
    pub hit_step_cap: bool,
    /// A node reached `GROUND_FRACTION * height` during the main phase.
    pub reached_ground: bool,
    /// Number of return strokes grown during closure.
    pub return_strokes: usize,
}

/// Picks the index (into `tips`) of the tip to extend next.
///
/// Tips are weighted by `|y|`, and the draw through the cumulative
/// weight is eased with `t^(1 / bias_exponent)` so that tips far from
/// the origin are preferred. This keeps the bolt advancing instead of
/// stalling near the top.
fn select_tip(tree: &Tree, tips: &[NodeId], bias_exponent: f32, rng: &mut GrowthRng) -> usize {
    if tips.len() == 1 {
        return 0;
    }

    let total: f32 = tips.iter().map(|&id| tree.nodes[id].pos.y.abs()).sum();
    if total <= 0.0 {
        // Every tip still sits on the origin line; fall back to a
        // uniform draw.
        let i = rng.range(0.0, tips.len() as f32) as usize;
        return i.min(tips.len() - 1);
    }

    let eased = rng.range(0.0, 1.0).powf(1.0 / bias_exponent);
    let target = eased * total;

    let mut acc = 0.0;
    for (i, &id) in tips.iter().enumerate() {
        acc += tree.nodes[id].pos.y.abs();
        if acc >= target {
            return i;
        }
    }
    tips.len() - 1
}

/// Runs one main-phase iteration: select a tip, step it, maybe fork.
///
/// The child node is always created, but a tip whose own x lies outside
/// `[0, width]` is dropped from the active list instead of being
/// replaced by the child, so an off-canvas lineage stops growing.
/// Charge propagation happens inside [`Tree::add_child`].
pub fn growth_step(
    tree: &mut Tree,
    tips: &mut Vec<NodeId>,
    cfg: &Config,
    width: f32,
    height: f32,
    rng: &mut GrowthRng,
    bias_noise: &Perlin,
) -> StepOutcome {
    if tips.is_empty() {
        return StepOutcome::NoTips;
    }

    let slot = select_tip(tree, tips, cfg.branch.bias_exponent, rng);
    let tip_id = tips[slot];

    let (tip_pos, tip_dir, current) = {
        let tip = &tree.nodes[tip_id];
        let current = tip.parent.map(|p| tip.pos - tree.nodes[p].pos);
        (tip.pos, tip.branch_direction, current)
    };

    // Spatially-coherent perturbation of the wobble bias, per node.
    let n = bias_noise.get([
        (tip_pos.x * BIAS_NOISE_SCALE) as f64,
        (tip_pos.y * BIAS_NOISE_SCALE) as f64,
    ]) as f32;
    let bias = (cfg.wobble.bias_to_perfect + n * cfg.wobble.bias_to_perfect_variance)
        .clamp(0.0, 1.0);
    let params = StepParams {
        segment_length: cfg.wobble.segment_length,
        bias_to_perfect: bias,
        random_factor: cfg.wobble.random_factor,
        round_factor: cfg.wobble.round_factor,
    };

    let child_pos = step::next_point(tip_dir, current, tip_pos, &params, rng);
    let child = tree.add_child(tip_id, child_pos, tip_dir);

    let tip_in_bounds = (0.0..=width).contains(&tip_pos.x);
    if tip_in_bounds {
        tips[slot] = child;
    } else {
        tips.remove(slot);
    }

    if child_pos.y >= GROUND_FRACTION * height {
        return StepOutcome::ReachedGround;
    }

    // Branch probability fades as the tip nears the ground. A zero
    // height pushes this through infinity; `chance` saturates instead
    // of panicking.
    let p = cfg.branch.factor + cfg.branch.factor_with_depth * (1.0 - tip_pos.y / height);
    if rng.chance(p) {
        let magnitude = rng.range(cfg.branch.angle.min, cfg.branch.angle.max);
        let angle = if rng.chance(0.5) { magnitude } else { -magnitude };
        let fork_dir = Vec2::from_angle(angle).rotate(tip_dir);

        let fork_pos = step::next_point(fork_dir, current, tip_pos, &params, rng);
        let fork = tree.add_child(tip_id, fork_pos, fork_dir);
        if tip_in_bounds {
            tips.push(fork);
        }
        if fork_pos.y >= GROUND_FRACTION * height {
            return StepOutcome::ReachedGround;
        }
    }

    StepOutcome::Advanced
}

/// Connects surviving groundward tips to the bottom boundary.
///
/// A tip qualifies when its y has reached
/// `RETURN_ELIGIBLE_FRACTION * height` and its `branch_direction` still
/// points down. The whole path from the tip to the root is marked
/// `is_return`, then straight segments (full bias, no momentum) are
/// appended until a node's y reaches `height`. Each stroke is bounded
/// by `cfg.max_steps` so a degenerate segment length cannot hang it.
///
/// Returns the number of strokes grown.
pub fn closure_phase(
    tree: &mut Tree,
    tips: &[NodeId],
    cfg: &Config,
    height: f32,
    rng: &mut GrowthRng,
) -> usize {
    let threshold = RETURN_ELIGIBLE_FRACTION * height;
    let params = StepParams {
        segment_length: cfg.wobble.segment_length,
        bias_to_perfect: 1.0,
        random_factor: cfg.wobble.random_factor,
        round_factor: cfg.wobble.round_factor,
    };

    let mut strokes = 0;
    for &tip in tips {
        let eligible = {
            let node = &tree.nodes[tip];
            node.pos.y >= threshold && node.branch_direction.y > 0.0
        };
        if !eligible {
            continue;
        }

        strokes += 1;
        tree.mark_return(tip);

        let mut cursor = tip;
        let mut steps = 0;
        while tree.nodes[cursor].pos.y < height && steps < cfg.max_steps {
            let dir = tree.nodes[cursor].branch_direction;
            let pos = tree.nodes[cursor].pos;
            let next = step::next_point(dir, None, pos, &params, rng);
            cursor = tree.add_child(cursor, next, dir);
            tree.nodes[cursor].is_return = true;
            steps += 1;
        }
    }
    strokes
}

/// Grows a complete bolt and returns its tree.
///
/// See [`generate_with_report`] for the diagnostics-carrying variant.
pub fn generate(cfg: &Config, width: f32, height: f32, rng: &mut GrowthRng) -> Tree {
    generate_with_report(cfg, width, height, rng).0
}

/// Grows a complete bolt, returning the tree and a [`Report`].
///
/// Purely synchronous and CPU-bound; one call produces one complete,
/// immutable-after-return tree. The only shared state is `rng`, which
/// is consumed sequentially.
///
/// ### Panics
/// Panics on a malformed `cfg` (see [`Config::validate`]) or a
/// non-positive `width`. `height` may be zero; growth then closes
/// immediately at the origin line.
pub fn generate_with_report(
    cfg: &Config,
    width: f32,
    height: f32,
    rng: &mut GrowthRng,
) -> (Tree, Report) {
    cfg.validate();
    assert!(width.is_finite() && width > 0.0, "width must be positive");
    assert!(
        height.is_finite() && height >= 0.0,
        "height must be finite and non-negative"
    );

    let origin = match cfg.origin {
        Origin::Fixed(p) => p,
        Origin::Random => Vec2::new(rng.range(width * 0.25, width * 0.75), 0.0),
    };

    // This noise source perturbs only the per-node bias, never the
    // path itself. Seeding it from the stream keeps generation
    // reproducible for a fixed seed.
    let bias_noise = Perlin::new(rng.noise_seed());

    let mut tree = Tree::new(origin, Vec2::Y);
    let mut tips: Vec<NodeId> = vec![0];

    let mut steps = 0;
    let mut reached_ground = false;
    let mut hit_step_cap = true;
    for _ in 0..cfg.max_steps {
        match growth_step(&mut tree, &mut tips, cfg, width, height, rng, &bias_noise) {
            StepOutcome::Advanced => steps += 1,
            StepOutcome::ReachedGround => {
                steps += 1;
                reached_ground = true;
                hit_step_cap = false;
                break;
            }
            StepOutcome::NoTips => {
                hit_step_cap = false;
                break;
            }
        }
    }

    let return_strokes = closure_phase(&mut tree, &tips, cfg, height, rng);

    (
        tree,
        Report {
            steps,
            hit_step_cap,
            reached_ground,
            return_strokes,
        },
    )
}
