use rayon::prelude::*;

use crate::error::EngineError;
use crate::model::Model;
use crate::simulation::Vmmc;
use tracing::debug;

/// Advance a set of independent simulations by `n_steps` trials each,
/// one engine per rayon task.
///
/// Each engine stays strictly single-threaded internally; parallelism
/// exists only across engines, so this is safe for any `Send` model.
/// Returns the total number of accepted moves, or the first error
/// (remaining engines still complete their batches).
pub fn step_ensemble<M: Model + Send>(
    sims: &mut [Vmmc<M>],
    n_steps: u64,
) -> Result<u64, EngineError> {
    let results: Vec<Result<u64, EngineError>> = sims
        .par_iter_mut()
        .map(|sim| sim.step_n(n_steps))
        .collect();

    let mut accepted = 0;
    for result in results {
        accepted += result?;
    }
    debug!(
        engines = sims.len(),
        steps = n_steps,
        accepted,
        "ensemble batch complete"
    );
    Ok(accepted)
}
