//! Directional step generator.
//!
//! Produces the next point of a wobbly path segment: a blend of the
//! lineage's ideal direction and its current momentum, jittered by an
//! approximate-Gaussian turn, always exactly one segment long.

use glam::Vec2;

use crate::rng::GrowthRng;

/// Number of uniform draws summed per jitter axis.
pub const JITTER_DRAWS: u32 = 6;

/// Parameters for a single step.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    pub segment_length: f32,
    pub bias_to_perfect: f32,
    pub random_factor: f32,
    pub round_factor: Option<f32>,
}

/// Rescales `v` to the given length; the zero vector stays zero.
#[inline]
fn set_magnitude(v: Vec2, len: f32) -> Vec2 {
    v.normalize_or_zero() * len
}

/// Computes the next point of a path segment starting at `from`.
///
/// `perfect` is the direction growth should go; `current` is the
/// momentum of the lineage (absent only for the very first step).
///
/// When both are present the new direction is the average of `perfect`
/// scaled to magnitude `bias_to_perfect` and `current` scaled to
/// `1 - bias_to_perfect`. This is a magnitude-weighted compromise, not
/// an angular interpolation: the heavier-weighted vector keeps more of
/// its pull. Downstream tuning depends on this exact formula, so it is
/// not a slerp.
///
/// Jitter is added per axis (Irwin-Hall, scaled by `random_factor`)
/// and the result is renormalized, so randomness turns the step but
/// never changes its length. Every returned point is exactly
/// `segment_length` away from `from`, up to the optional rounding of
/// each coordinate to the nearest multiple of `round_factor`.
///
/// A `segment_length` of 0 is degenerate but accepted.
pub fn next_point(
    perfect: Vec2,
    current: Option<Vec2>,
    from: Vec2,
    params: &StepParams,
    rng: &mut GrowthRng,
) -> Vec2 {
    let mut dir = match current {
        Some(cur) => {
            let toward = set_magnitude(perfect, params.bias_to_perfect);
            let momentum = set_magnitude(cur, 1.0 - params.bias_to_perfect);
            (toward + momentum) * 0.5
        }
        None => perfect,
    };

    dir = set_magnitude(dir, params.segment_length);

    let jitter = Vec2::new(
        rng.irwin_hall(JITTER_DRAWS),
        rng.irwin_hall(JITTER_DRAWS),
    ) * params.random_factor;
    dir = set_magnitude(dir + jitter, params.segment_length);

    let mut next = from + dir;
    if let Some(r) = params.round_factor {
        next = Vec2::new((next.x / r).round() * r, (next.y / r).round() * r);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(segment_length: f32) -> StepParams {
        StepParams {
            segment_length,
            bias_to_perfect: 0.8,
            random_factor: 1.5,
            round_factor: None,
        }
    }

    #[test]
    fn step_length_is_exact_even_under_jitter() {
        let mut rng = GrowthRng::from_u64(1);
        let p = params(10.0);
        let from = Vec2::new(3.0, 4.0);

        for _ in 0..200 {
            let next = next_point(Vec2::Y, Some(Vec2::new(0.3, 1.0)), from, &p, &mut rng);
            let d = from.distance(next);
            assert!((d - 10.0).abs() < 1e-3, "step length {d} != 10");
        }
    }

    #[test]
    fn full_bias_ignores_momentum() {
        let mut rng = GrowthRng::from_u64(1);
        let p = StepParams {
            segment_length: 10.0,
            bias_to_perfect: 1.0,
            random_factor: 0.0,
            round_factor: None,
        };

        // Momentum points sideways, but with bias 1 it is scaled to zero.
        let next = next_point(Vec2::Y, Some(Vec2::X), Vec2::ZERO, &p, &mut rng);
        assert!(next.abs_diff_eq(Vec2::new(0.0, 10.0), 1e-5), "{next:?}");
    }

    #[test]
    fn first_step_follows_perfect_direction() {
        let mut rng = GrowthRng::from_u64(1);
        let p = StepParams {
            segment_length: 4.0,
            bias_to_perfect: 0.2,
            random_factor: 0.0,
            round_factor: None,
        };

        let perfect = Vec2::new(1.0, 1.0);
        let next = next_point(perfect, None, Vec2::ZERO, &p, &mut rng);
        let expected = perfect.normalize() * 4.0;
        assert!(next.abs_diff_eq(expected, 1e-5), "{next:?}");
    }

    #[test]
    fn blend_is_magnitude_weighted_not_angular() {
        let mut rng = GrowthRng::from_u64(1);
        let p = StepParams {
            segment_length: 1.0,
            bias_to_perfect: 0.8,
            random_factor: 0.0,
            round_factor: None,
        };

        // perfect scaled to 0.8 along +y, momentum scaled to 0.2 along +x,
        // averaged: (0.1, 0.4), then renormalized to length 1.
        let next = next_point(Vec2::Y, Some(Vec2::X), Vec2::ZERO, &p, &mut rng);
        let expected = Vec2::new(0.1, 0.4).normalize();
        assert!(next.abs_diff_eq(expected, 1e-5), "{next:?}");
    }

    #[test]
    fn coordinates_snap_to_round_factor_multiples() {
        let mut rng = GrowthRng::from_u64(9);
        let p = StepParams {
            segment_length: 7.3,
            bias_to_perfect: 0.5,
            random_factor: 2.0,
            round_factor: Some(0.25),
        };

        for _ in 0..50 {
            let next = next_point(Vec2::Y, Some(Vec2::ONE), Vec2::new(1.0, 2.0), &p, &mut rng);
            for c in [next.x, next.y] {
                let snapped = (c / 0.25).round() * 0.25;
                assert!((c - snapped).abs() < 1e-5, "{c} not on the 0.25 grid");
            }
        }
    }

    #[test]
    fn zero_segment_length_is_degenerate_but_total() {
        let mut rng = GrowthRng::from_u64(3);
        let p = params(0.0);
        let from = Vec2::new(5.0, 5.0);
        let next = next_point(Vec2::Y, Some(Vec2::Y), from, &p, &mut rng);
        assert!(next.abs_diff_eq(from, 1e-6));
    }
}
