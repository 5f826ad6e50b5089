/// State of one particle as seen by the engine.
///
/// Positions live in box coordinates, one component per dimension (the
/// third is zero in 2D). Orientations are unit vectors; for isotropic
/// species the orientation is a dummy that never influences energies.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    pub orientation: [f64; 3],
    /// Isotropic particles never seed cluster rotations.
    pub isotropic: bool,
}

impl Particle {
    /// An isotropic particle with a dummy unit orientation.
    pub fn new(position: [f64; 3]) -> Self {
        Self {
            position,
            orientation: [1.0, 0.0, 0.0],
            isotropic: true,
        }
    }

    /// An anisotropic particle. The orientation must be unit length.
    pub fn with_orientation(position: [f64; 3], orientation: [f64; 3]) -> Self {
        Self {
            position,
            orientation,
            isotropic: false,
        }
    }
}

/// Per-particle snapshot taken when a trial is applied. Rejection walks
/// the cluster and restores the `pre_*` half; acceptance simply discards
/// the snapshot.
#[derive(Clone, Copy, Default)]
pub(crate) struct TrialState {
    pub pre_position: [f64; 3],
    pub pre_orientation: [f64; 3],
    pub post_position: [f64; 3],
    pub post_orientation: [f64; 3],
}
