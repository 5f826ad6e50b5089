//! Stochastic cluster growth for one virtual move.
//!
//! Growth runs as a depth-first walk over an explicit work stack with a
//! visited flag per particle, so arbitrarily deep clusters never touch
//! the call stack. For every neighbour `b` of an in-cluster member `a`
//! three pair energies decide the link:
//!
//! * `E`  — the current pair energy,
//! * `E⁺` — with `a` under the forward trial transform, `b` unmoved,
//! * `E⁻` — with `a` under the inverse transform, `b` unmoved.
//!
//! The forward link forms with probability `max(0, 1 − exp(−(E⁺ − E)))`;
//! a formed link recruits `b` and the whole cluster moves rigidly. The
//! reverse probability `max(0, 1 − exp(−(E⁻ − E)))` measures whether the
//! inverse move would have formed the same link. Links whose reverse
//! probability falls short are frustrated: the trial survives with
//! probability `p_reverse / p_forward` accumulated multiplicatively, and
//! a frustrated link with zero reverse probability aborts the trial on
//! the spot.

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::error::EngineError;
use crate::geometry::{Direction, PeriodicBox, Transform};
use crate::model::Model;
use crate::pairs::PairLedger;
use crate::particle::Particle;

/// Outcome of one growth pass.
#[derive(Debug)]
pub(crate) enum Growth {
    /// Cluster complete; `weight` is the accumulated frustration factor
    /// `∏ p_reverse / p_forward` entering the acceptance probability.
    Grown { weight: f64, frustrated: usize },
    /// A frustrated link with zero reverse probability makes the move
    /// certain to fail; nothing has been applied.
    EarlyReject { frustrated: usize },
}

/// Growth buffers, sized once to the particle count and reused across
/// steps. `visited` doubles as the cluster-membership test during the
/// overlap phase; only entries touched by the trial are cleared after.
pub(crate) struct GrowthScratch {
    pub visited: Vec<bool>,
    pub stack: Vec<usize>,
    pub members: Vec<usize>,
    pub neighbours: Vec<usize>,
}

impl GrowthScratch {
    pub fn new(n_particles: usize, max_interactions: usize) -> Self {
        Self {
            visited: vec![false; n_particles],
            stack: Vec::with_capacity(n_particles),
            members: Vec::with_capacity(n_particles),
            neighbours: Vec::with_capacity(max_interactions),
        }
    }

    /// Reset for the next trial, touching only what the last one used.
    pub fn clear(&mut self) {
        for &m in &self.members {
            self.visited[m] = false;
        }
        self.members.clear();
        self.stack.clear();
        self.neighbours.clear();
    }
}

/// Probability that a link forms across a pair whose energy would change
/// by `delta` under the virtual move of one endpoint.
#[inline]
pub(crate) fn link_probability(delta: f64) -> f64 {
    debug_assert!(!delta.is_nan(), "NaN pair energy change in link test");
    if delta.is_nan() {
        // Best-effort in release: an unformed link cannot corrupt state.
        return 0.0;
    }
    (1.0 - (-delta).exp()).max(0.0)
}

/// Grow a trial cluster from `seed` under `transform`.
///
/// On success `scratch.members` holds the cluster in recruitment order
/// (seed first), `scratch.visited` flags membership, and `ledger` holds
/// one entry per formed link. The caller owns buffer cleanup through
/// [`GrowthScratch::clear`] on every exit path.
#[allow(clippy::too_many_arguments)]
pub(crate) fn grow<M: Model>(
    model: &M,
    particles: &[Particle],
    bx: &PeriodicBox,
    transform: &Transform,
    seed: usize,
    max_interactions: usize,
    scratch: &mut GrowthScratch,
    ledger: &mut PairLedger,
    rng: &mut Xoshiro256StarStar,
) -> Result<Growth, EngineError> {
    debug_assert!(scratch.members.is_empty() && scratch.stack.is_empty());

    scratch.visited[seed] = true;
    scratch.members.push(seed);
    scratch.stack.push(seed);

    let mut weight = 1.0_f64;
    let mut frustrated = 0_usize;

    while let Some(a) = scratch.stack.pop() {
        let pa = &particles[a];
        let fwd_pos = transform.apply_point(bx, &pa.position, Direction::Forward);
        let fwd_orient = transform.apply_orientation(&pa.orientation, Direction::Forward);
        let rev_pos = transform.apply_point(bx, &pa.position, Direction::Reverse);
        let rev_orient = transform.apply_orientation(&pa.orientation, Direction::Reverse);

        let mut neighbours = std::mem::take(&mut scratch.neighbours);
        neighbours.clear();
        model.interactions(a, &pa.position, &pa.orientation, &mut neighbours);
        if neighbours.len() > max_interactions {
            let count = neighbours.len();
            scratch.neighbours = neighbours;
            return Err(EngineError::Capacity {
                particle: a,
                count,
                limit: max_interactions,
            });
        }

        for &b in &neighbours {
            debug_assert!(b != a, "interactions listed the particle itself");
            if b == a || scratch.visited[b] || ledger.initiated(a, b) {
                continue;
            }

            let pb = &particles[b];
            let e_cur =
                model.pair_energy(a, &pa.position, &pa.orientation, b, &pb.position, &pb.orientation);
            debug_assert!(
                {
                    let mirror = model.pair_energy(
                        b,
                        &pb.position,
                        &pb.orientation,
                        a,
                        &pa.position,
                        &pa.orientation,
                    );
                    e_cur == mirror || (e_cur - mirror).abs() <= 1e-8 * e_cur.abs().max(1.0)
                },
                "pair_energy is asymmetric for pair ({a}, {b})"
            );

            let e_fwd =
                model.pair_energy(a, &fwd_pos, &fwd_orient, b, &pb.position, &pb.orientation);
            let p_fwd = link_probability(e_fwd - e_cur);
            if p_fwd <= 0.0 || rng.gen::<f64>() >= p_fwd {
                continue;
            }

            let e_rev =
                model.pair_energy(a, &rev_pos, &rev_orient, b, &pb.position, &pb.orientation);
            let p_rev = link_probability(e_rev - e_cur);
            if p_rev < p_fwd {
                frustrated += 1;
                if p_rev == 0.0 {
                    scratch.neighbours = neighbours;
                    return Ok(Growth::EarlyReject { frustrated });
                }
                weight *= p_rev / p_fwd;
            }

            ledger.push(a, b, e_cur);
            scratch.visited[b] = true;
            scratch.members.push(b);
            scratch.stack.push(b);
        }

        scratch.neighbours = neighbours;
    }

    Ok(Growth::Grown { weight, frustrated })
}
