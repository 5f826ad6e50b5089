use thiserror::Error;

/// Errors that can escape the engine.
///
/// Everything else — hard-core overlaps, frustrated links, boundary
/// violations, NaN energies in release builds — is handled locally as a
/// move rejection and never surfaces.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Construction-time rejection: bad dimension, malformed particle
    /// data, out-of-range options.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The interactions callback listed more neighbours than
    /// `max_interactions` allows. The step is abandoned with the
    /// particle state left as it was before the trial.
    #[error("particle {particle} reported {count} interactions, exceeding the limit of {limit}")]
    Capacity {
        particle: usize,
        count: usize,
        limit: usize,
    },
}
