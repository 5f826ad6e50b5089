/// The capability set through which the engine sees the interaction
/// potential and through which the caller mirrors engine state.
///
/// All energies are in units of kT. Every method that takes a position
/// and orientation must answer for that *hypothetical* state of the
/// named particle, with all other particles at their last committed
/// (post-move notified) states. Implementations must not mutate any
/// state the engine reads back during the same step.
///
/// Within one trial the engine invokes the hooks in a fixed, observable
/// order: `interactions` and `pair_energy` while the cluster grows, then
/// `post_move` once per member to apply the trial, then `pair_energy` /
/// `particle_energy` / `interactions` for the overlap and energy checks,
/// and finally — only if the move is rejected — `post_move` a second
/// time per member to revert. Cell-list maintenance is conventionally
/// attached to `post_move` and must therefore tolerate back-to-back
/// invocation.
pub trait Model {
    /// Total interaction energy felt by particle `i` at the supplied
    /// state. Used for the running-energy ledger and the post-move
    /// overlap test; values at or above the configured overlap energy
    /// force rejection.
    fn particle_energy(&self, i: usize, position: &[f64; 3], orientation: &[f64; 3]) -> f64;

    /// Pair interaction energy. Must be symmetric under exchange of the
    /// two argument triples to numerical tolerance.
    #[allow(clippy::too_many_arguments)]
    fn pair_energy(
        &self,
        i: usize,
        position_i: &[f64; 3],
        orientation_i: &[f64; 3],
        j: usize,
        position_j: &[f64; 3],
        orientation_j: &[f64; 3],
    ) -> f64;

    /// Push the indices of every particle interacting with `i` at the
    /// supplied state into `neighbours` (cleared by the engine before
    /// the call). A particle `j` belongs in the list exactly when
    /// `pair_energy(i, j) != 0` or the pair is hard-core overlapping.
    /// Listing `i` itself, duplicates, or more than `max_interactions`
    /// entries violates the contract; the last is detected and surfaced
    /// as [`EngineError::Capacity`](crate::EngineError::Capacity).
    fn interactions(
        &self,
        i: usize,
        position: &[f64; 3],
        orientation: &[f64; 3],
        neighbours: &mut Vec<usize>,
    );

    /// Particle `i` is now to be considered at the supplied state for
    /// every subsequent callback. Called once per cluster member to
    /// apply a trial and, on rejection, once more to revert it.
    fn post_move(&mut self, i: usize, position: &[f64; 3], orientation: &[f64; 3]);

    /// Non-pairwise energy contribution (external fields and the like).
    /// Enters the running-energy ledger only: the acceptance exponent
    /// carries just the pair terms of the super-detailed-balance rule,
    /// so this hook never biases whether a move is accepted.
    fn non_pairwise_energy(&self, i: usize, position: &[f64; 3], orientation: &[f64; 3]) -> f64 {
        let _ = (i, position, orientation);
        0.0
    }

    /// Custom boundary test; returning true rejects the trial move.
    /// Hook for confining walls in otherwise periodic setups.
    fn outside_boundary(&self, i: usize, position: &[f64; 3], orientation: &[f64; 3]) -> bool {
        let _ = (i, position, orientation);
        false
    }
}
