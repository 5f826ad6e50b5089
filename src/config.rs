use validator::{Validate, ValidationError};

fn validate_config(cfg: &Config) -> Result<(), ValidationError> {
    if cfg.dimension != 2 && cfg.dimension != 3 {
        return Err(ValidationError::new("dimension must be 2 or 3"));
    }
    if cfg.box_size.len() != cfg.dimension {
        return Err(ValidationError::new("box_size length must equal dimension"));
    }
    if cfg.box_size.iter().any(|&l| !l.is_finite() || l <= 0.0) {
        return Err(ValidationError::new("box sides must be positive and finite"));
    }
    if !(0.0..=1.0).contains(&cfg.prob_translate) {
        return Err(ValidationError::new("prob_translate must lie in [0, 1]"));
    }
    if !cfg.max_translation.is_finite() || cfg.max_translation <= 0.0 {
        return Err(ValidationError::new("max_translation must be positive"));
    }
    if !cfg.max_rotation.is_finite() || cfg.max_rotation < 0.0 {
        return Err(ValidationError::new("max_rotation must be non-negative"));
    }
    if !cfg.reference_radius.is_finite() || cfg.reference_radius <= 0.0 {
        return Err(ValidationError::new("reference_radius must be positive"));
    }
    if cfg.max_interactions == 0 {
        return Err(ValidationError::new("max_interactions must be at least 1"));
    }
    if !(cfg.overlap_energy > 0.0) {
        return Err(ValidationError::new("overlap_energy must be positive"));
    }
    Ok(())
}

/// Engine options. Lengths are in units of the particle diameter, angles
/// in radians, energies in units of kT.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_config"))]
pub struct Config {
    /// Spatial dimension, 2 or 3.
    pub dimension: usize,
    /// Periodic box sides, one entry per dimension.
    pub box_size: Vec<f64>,
    /// Maximum trial translation per Cartesian component.
    pub max_translation: f64,
    /// Maximum trial rotation angle.
    pub max_rotation: f64,
    /// Probability of proposing a translation (versus a rotation).
    pub prob_translate: f64,
    /// Reference particle radius for the Stokes drag scaling.
    pub reference_radius: f64,
    /// Neighbour capacity per particle; exceeding it is a contract error.
    pub max_interactions: usize,
    /// Pair or particle energies at or above this value signal a hard
    /// overlap and force rejection.
    pub overlap_energy: f64,
    /// Whether the potential has finite repulsive branches. When false,
    /// any positive post-move pair energy is treated as a core overlap.
    pub repulsive: bool,
    /// Seed for the engine-owned PRNG.
    pub seed: u64,
}

impl Config {
    /// Options with conventional defaults for the given box; matching
    /// step sizes of a dilute fluid of unit-diameter particles.
    pub fn new(dimension: usize, box_size: Vec<f64>) -> Self {
        Self {
            dimension,
            box_size,
            max_translation: 0.15,
            max_rotation: 0.2,
            prob_translate: 0.5,
            reference_radius: 0.5,
            max_interactions: 15,
            overlap_energy: 1e10,
            repulsive: false,
            seed: 42,
        }
    }
}
