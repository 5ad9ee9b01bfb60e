use glam::Vec2;

/// Inclusive range of fork rotation magnitudes, in radians.
#[derive(Clone, Copy, Debug)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

/// Branching behaviour of the main growth phase.
#[derive(Clone, Copy, Debug)]
pub struct BranchConfig {
    /// Base probability of a fork per growth step.
    pub factor: f32,
    /// Extra fork probability scaled by `1 - tip.y / height`, so
    /// branching fades out as the bolt nears the ground.
    pub factor_with_depth: f32,
    /// Rotation applied to a fork's growth direction; the side is
    /// picked at random.
    pub angle: AngleRange,
    /// Exponent of the polynomial ease used during tip selection.
    /// Larger values favour tips further from the origin.
    pub bias_exponent: f32,
}

/// Per-step wobble applied by the directional step generator.
#[derive(Clone, Copy, Debug)]
pub struct WobbleConfig {
    /// Length of every growth segment.
    pub segment_length: f32,
    /// How strongly each step is pulled toward the lineage's ideal
    /// direction, in `[0, 1]`. 1 ignores momentum entirely.
    pub bias_to_perfect: f32,
    /// Scale of the approximate-Gaussian jitter added to each step.
    pub random_factor: f32,
    /// Amplitude of the coherent-noise perturbation applied to
    /// `bias_to_perfect` per node.
    pub bias_to_perfect_variance: f32,
    /// Snap output coordinates to multiples of this value when set.
    pub round_factor: Option<f32>,
}

/// Where the root of the bolt is placed.
#[derive(Clone, Copy, Debug)]
pub enum Origin {
    /// Root x drawn uniformly from the middle half of `width`, y = 0.
    Random,
    /// Explicit starting point.
    Fixed(Vec2),
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub branch: BranchConfig,
    pub wobble: WobbleConfig,
    pub origin: Origin,
    /// Upper bound on main-loop iterations (and on each return
    /// stroke's length during closure). Hitting it is not an error;
    /// growth simply stops with whatever tree exists.
    pub max_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branch: BranchConfig {
                factor: 0.03,
                factor_with_depth: 0.08,
                angle: AngleRange { min: 0.2, max: 0.7 },
                bias_exponent: 4.0,
            },
            wobble: WobbleConfig {
                segment_length: 10.0,
                bias_to_perfect: 0.8,
                random_factor: 1.5,
                bias_to_perfect_variance: 0.2,
                round_factor: None,
            },
            origin: Origin::Random,
            max_steps: 10_000,
        }
    }
}

impl Config {
    /// Checks the configuration preconditions.
    ///
    /// A malformed config would otherwise produce a visually-wrong but
    /// "successful" tree, so validation never substitutes defaults.
    ///
    /// ### Panics
    /// Panics with a descriptive message on non-finite numbers,
    /// `bias_to_perfect` outside `[0, 1]`, a negative `random_factor`,
    /// an inverted angle range, a non-positive `bias_exponent`, or a
    /// zero `max_steps`.
    pub fn validate(&self) {
        let b = &self.branch;
        let w = &self.wobble;

        assert!(b.factor.is_finite(), "branch.factor must be finite");
        assert!(
            b.factor_with_depth.is_finite(),
            "branch.factor_with_depth must be finite"
        );
        assert!(
            b.angle.min.is_finite() && b.angle.max.is_finite(),
            "branch.angle must be finite"
        );
        assert!(
            b.angle.min <= b.angle.max,
            "branch.angle.min must not exceed branch.angle.max"
        );
        assert!(
            b.bias_exponent.is_finite() && b.bias_exponent > 0.0,
            "branch.bias_exponent must be positive"
        );

        assert!(
            w.segment_length.is_finite() && w.segment_length >= 0.0,
            "wobble.segment_length must be finite and non-negative"
        );
        assert!(
            (0.0..=1.0).contains(&w.bias_to_perfect),
            "wobble.bias_to_perfect must be in [0, 1]"
        );
        assert!(
            w.random_factor.is_finite() && w.random_factor >= 0.0,
            "wobble.random_factor must be finite and non-negative"
        );
        assert!(
            w.bias_to_perfect_variance.is_finite(),
            "wobble.bias_to_perfect_variance must be finite"
        );
        if let Some(r) = w.round_factor {
            assert!(
                r.is_finite() && r > 0.0,
                "wobble.round_factor must be finite and positive"
            );
        }

        if let Origin::Fixed(p) = self.origin {
            assert!(p.is_finite(), "origin must be finite");
        }

        assert!(self.max_steps > 0, "max_steps must be positive");
    }
}
