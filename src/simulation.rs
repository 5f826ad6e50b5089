//! The engine facade: owns the particle state, drives one trial per
//! step, and keeps the running energy and move statistics.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tracing::debug;
use validator::Validate;

use crate::cluster::{self, Growth, GrowthScratch};
use crate::config::Config;
use crate::engine;
use crate::error::EngineError;
use crate::geometry::{self, Direction, PeriodicBox, Transform};
use crate::model::Model;
use crate::pairs::PairLedger;
use crate::particle::{Particle, TrialState};
use crate::stats::MoveStats;

/// Orientations must stay unit length to within this tolerance; inputs
/// are validated against it and every rotation renormalizes.
const ORIENTATION_TOL: f64 = 1e-10;

/// Virtual-move Monte Carlo engine.
///
/// One `step` proposes a rigid trial transform, grows a cluster of
/// recruited particles, applies the transform, and accepts or reverts
/// under super-detailed balance with Stokes-drag damping. The engine is
/// single-threaded and retains nothing across steps beyond the particle
/// state, the counters, and the RNG state.
pub struct Vmmc<M: Model> {
    model: M,
    particles: Vec<Particle>,
    bx: PeriodicBox,
    config: Config,
    /// Engine-owned PRNG. Public so callers can reseed or snapshot it
    /// for reproducible trajectories.
    pub rng: Xoshiro256StarStar,
    stats: MoveStats,
    energy: f64,
    scratch: GrowthScratch,
    ledger: PairLedger,
    trial: Vec<TrialState>,
    internal_pairs: Vec<(usize, usize, f64)>,
}

impl<M: Model> Vmmc<M> {
    /// Build an engine over the given particles.
    ///
    /// Fails when the options are out of range, a coordinate lies
    /// outside `[0, L_d)`, an orientation is not unit length, or a
    /// vector component beyond the box dimension is nonzero.
    pub fn new(model: M, particles: Vec<Particle>, config: Config) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        if particles.is_empty() {
            return Err(EngineError::Config("at least one particle is required".into()));
        }

        let bx = PeriodicBox::new(config.dimension, &config.box_size);
        for (i, p) in particles.iter().enumerate() {
            for d in 0..config.dimension {
                let l = bx.sides()[d];
                if !(p.position[d] >= 0.0 && p.position[d] < l) {
                    return Err(EngineError::Config(format!(
                        "particle {i}: coordinate {d} = {} is outside [0, {l})",
                        p.position[d]
                    )));
                }
            }
            for d in config.dimension..3 {
                if p.position[d] != 0.0 || p.orientation[d] != 0.0 {
                    return Err(EngineError::Config(format!(
                        "particle {i}: component {d} lies beyond the box dimension"
                    )));
                }
            }
            let norm = geometry::norm_sq(&p.orientation).sqrt();
            if (norm - 1.0).abs() > ORIENTATION_TOL {
                return Err(EngineError::Config(format!(
                    "particle {i}: orientation norm {norm} is not unit length"
                )));
            }
        }

        let n = particles.len();
        let mut sim = Self {
            model,
            particles,
            bx,
            rng: Xoshiro256StarStar::seed_from_u64(config.seed),
            stats: MoveStats::new(n),
            energy: 0.0,
            scratch: GrowthScratch::new(n, config.max_interactions),
            // A link always recruits, so a trial forms at most n - 1.
            ledger: PairLedger::with_capacity(n),
            trial: vec![TrialState::default(); n],
            internal_pairs: Vec::new(),
            config,
        };
        sim.energy = sim.compute_total_energy();
        debug!(
            n_particles = n,
            dimension = sim.config.dimension,
            energy = sim.energy,
            "virtual-move engine initialised"
        );
        Ok(sim)
    }

    /// Attempt one virtual move. Returns whether it was accepted.
    ///
    /// Only [`EngineError::Capacity`] escapes; every other failure mode
    /// is a rejection. On error the trial has been fully reverted.
    pub fn step(&mut self) -> Result<bool, EngineError> {
        self.stats.attempts += 1;
        let (seed, transform) = engine::sample_trial(&self.config, &self.particles, &mut self.rng);
        let result = self.attempt(seed, &transform);
        self.scratch.clear();
        self.ledger.clear();
        self.internal_pairs.clear();
        result
    }

    /// Attempt `n` virtual moves. Returns the number accepted.
    pub fn step_n(&mut self, n: u64) -> Result<u64, EngineError> {
        let mut accepted = 0;
        for _ in 0..n {
            if self.step()? {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Running total interaction energy, maintained incrementally from
    /// accepted moves.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Recompute the total energy from scratch through the callbacks.
    /// The running total tracks this to floating tolerance.
    pub fn compute_total_energy(&self) -> f64 {
        let mut energy = 0.0;
        for (i, p) in self.particles.iter().enumerate() {
            energy += 0.5 * self.model.particle_energy(i, &p.position, &p.orientation)
                + self.model.non_pairwise_energy(i, &p.position, &p.orientation);
        }
        energy
    }

    pub fn statistics(&self) -> &MoveStats {
        &self.stats
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn simulation_box(&self) -> &PeriodicBox {
        &self.bx
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    fn attempt(&mut self, seed: usize, transform: &Transform) -> Result<bool, EngineError> {
        let growth = cluster::grow(
            &self.model,
            &self.particles,
            &self.bx,
            transform,
            seed,
            self.config.max_interactions,
            &mut self.scratch,
            &mut self.ledger,
            &mut self.rng,
        )?;

        let (weight, frustrated) = match growth {
            Growth::EarlyReject { frustrated } => {
                self.stats.early_rejects += 1;
                self.stats.frustrated_links += frustrated as u64;
                return Ok(false);
            }
            Growth::Grown { weight, frustrated } => (weight, frustrated),
        };
        self.stats.frustrated_links += frustrated as u64;

        // Cluster energy in the committed state, taken before anything
        // moves. Together with the post-move counterpart this drives the
        // exact running-energy update.
        let mut pre_energy = 0.0;
        for &i in &self.scratch.members {
            let p = &self.particles[i];
            pre_energy += self.model.particle_energy(i, &p.position, &p.orientation)
                + self.model.non_pairwise_energy(i, &p.position, &p.orientation);
        }

        if transform.is_rotation() {
            self.collect_internal_pairs();
        }

        self.apply_trial(transform);

        match self.evaluate(transform.is_rotation()) {
            Err(err) => {
                self.revert();
                Err(err)
            }
            Ok(None) => {
                self.revert();
                Ok(false)
            }
            Ok(Some(outcome)) => {
                let n = self.scratch.members.len();
                let damping = engine::stokes_damping(
                    self.config.reference_radius,
                    n,
                    self.config.dimension,
                    transform.is_rotation(),
                );
                debug_assert!(!outcome.accept_delta.is_nan(), "NaN acceptance energy");
                let p = weight * damping * (-outcome.accept_delta).exp();
                let accepted = p >= 1.0 || self.rng.gen::<f64>() < p;
                if accepted {
                    // Internal pair changes appear twice in the summed
                    // particle energies; correct the double count.
                    self.energy += (outcome.post_energy - pre_energy) - outcome.internal_delta;
                    self.stats.record_accept(transform.is_rotation(), n);
                    Ok(true)
                } else {
                    self.revert();
                    Ok(false)
                }
            }
        }
    }

    /// Record the pre-move energy of every in-cluster pair that is not a
    /// link. Rotations need these: rigid rotation preserves internal
    /// geometry except where the minimum image wraps, so every internal
    /// pair must be overlap-checked after the move.
    fn collect_internal_pairs(&mut self) {
        let members = &self.scratch.members;
        for (idx, &i) in members.iter().enumerate() {
            for &j in &members[idx + 1..] {
                if self.ledger.contains_pair(i, j) {
                    continue;
                }
                let pi = &self.particles[i];
                let pj = &self.particles[j];
                let e_old = self.model.pair_energy(
                    i,
                    &pi.position,
                    &pi.orientation,
                    j,
                    &pj.position,
                    &pj.orientation,
                );
                self.internal_pairs.push((i, j, e_old));
            }
        }
    }

    /// Snapshot every member and write its post-move state back through
    /// the model, in recruitment order.
    fn apply_trial(&mut self, transform: &Transform) {
        for &i in &self.scratch.members {
            let p = &self.particles[i];
            let state = &mut self.trial[i];
            state.pre_position = p.position;
            state.pre_orientation = p.orientation;
            state.post_position = transform.apply_point(&self.bx, &p.position, Direction::Forward);
            let mut orientation = transform.apply_orientation(&p.orientation, Direction::Forward);
            geometry::normalize(&mut orientation);
            state.post_orientation = orientation;
        }
        for &i in &self.scratch.members {
            let state = self.trial[i];
            self.particles[i].position = state.post_position;
            self.particles[i].orientation = state.post_orientation;
            self.model
                .post_move(i, &state.post_position, &state.post_orientation);
        }
    }

    /// Restore every member from its snapshot, notifying the model a
    /// second time. This is why `post_move` must tolerate back-to-back
    /// invocation on the same particle.
    fn revert(&mut self) {
        for &i in &self.scratch.members {
            let state = self.trial[i];
            self.particles[i].position = state.pre_position;
            self.particles[i].orientation = state.pre_orientation;
            self.model
                .post_move(i, &state.pre_position, &state.pre_orientation);
        }
    }

    /// Overlap and energy checks at the post-move state. `Ok(None)`
    /// means rejection; `Ok(Some(..))` carries the acceptance exponent
    /// and the bookkeeping sums.
    fn evaluate(&mut self, is_rotation: bool) -> Result<Option<Outcome>, EngineError> {
        let threshold = self.config.overlap_energy;
        let repulsive = self.config.repulsive;
        let mut accept_delta = 0.0;
        let mut internal_delta = 0.0;

        if is_rotation {
            // Linked pairs moved rigidly; only wraparound changes them.
            for link in self.ledger.links_mut() {
                let pa = &self.particles[link.a];
                let pb = &self.particles[link.b];
                let e_new = self.model.pair_energy(
                    link.a,
                    &pa.position,
                    &pa.orientation,
                    link.b,
                    &pb.position,
                    &pb.orientation,
                );
                if !(e_new < threshold) || (!repulsive && e_new > 0.0) {
                    return Ok(None);
                }
                link.e_new = e_new;
                accept_delta += e_new - link.e_old;
                internal_delta += e_new - link.e_old;
            }
            // Non-linked in-cluster pairs: a rotation can wrap them onto
            // each other, so all of them are checked, and a contact that
            // wrapped into existence enters the acceptance sum.
            for &(i, j, e_old) in &self.internal_pairs {
                let pi = &self.particles[i];
                let pj = &self.particles[j];
                let e_new = self.model.pair_energy(
                    i,
                    &pi.position,
                    &pi.orientation,
                    j,
                    &pj.position,
                    &pj.orientation,
                );
                if !(e_new < threshold) || (!repulsive && e_new > 0.0) {
                    return Ok(None);
                }
                internal_delta += e_new - e_old;
                if e_old == 0.0 && e_new != 0.0 {
                    accept_delta += e_new;
                }
            }
        } else {
            // Internal pair energies are rigid-translation invariants.
            for link in self.ledger.links_mut() {
                link.e_new = link.e_old;
            }
        }

        let max_interactions = self.config.max_interactions;
        let mut post_energy = 0.0;
        let mut rejected = false;
        let mut capacity: Option<EngineError> = None;
        let mut neighbours = std::mem::take(&mut self.scratch.neighbours);

        'members: for &a in &self.scratch.members {
            let pa = &self.particles[a];
            if self
                .model
                .outside_boundary(a, &pa.position, &pa.orientation)
            {
                rejected = true;
                break 'members;
            }

            let pe = self.model.particle_energy(a, &pa.position, &pa.orientation);
            debug_assert!(!pe.is_nan(), "NaN particle energy");
            if !(pe < threshold) {
                rejected = true;
                break 'members;
            }
            post_energy +=
                pe + self.model.non_pairwise_energy(a, &pa.position, &pa.orientation);

            neighbours.clear();
            self.model
                .interactions(a, &pa.position, &pa.orientation, &mut neighbours);
            if neighbours.len() > max_interactions {
                capacity = Some(EngineError::Capacity {
                    particle: a,
                    count: neighbours.len(),
                    limit: max_interactions,
                });
                break 'members;
            }

            for &b in &neighbours {
                if b == a || self.scratch.visited[b] {
                    continue;
                }
                let pb = &self.particles[b];
                let e_new = self.model.pair_energy(
                    a,
                    &pa.position,
                    &pa.orientation,
                    b,
                    &pb.position,
                    &pb.orientation,
                );
                if !(e_new < threshold) || (!repulsive && e_new > 0.0) {
                    rejected = true;
                    break 'members;
                }
                // A pair that did not interact before the move is an
                // entering contact; its whole energy enters the
                // acceptance sum. Pairs that interacted all along are
                // already accounted for by the link statistics.
                let state = &self.trial[a];
                let e_old = self.model.pair_energy(
                    a,
                    &state.pre_position,
                    &state.pre_orientation,
                    b,
                    &pb.position,
                    &pb.orientation,
                );
                if e_old == 0.0 && e_new != 0.0 {
                    accept_delta += e_new;
                }
            }
        }

        self.scratch.neighbours = neighbours;
        if let Some(err) = capacity {
            return Err(err);
        }
        if rejected {
            return Ok(None);
        }
        Ok(Some(Outcome {
            accept_delta,
            post_energy,
            internal_delta,
        }))
    }
}

/// Energy sums produced by a completed overlap scan.
struct Outcome {
    /// Exponent of the Metropolis factor: entering contacts plus, for
    /// rotations, internal wraparound changes.
    accept_delta: f64,
    /// Post-move summed particle energies of the cluster.
    post_energy: f64,
    /// Internal pair-energy change, double-counted in the summed
    /// particle energies.
    internal_delta: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct IdealGas;

    impl Model for IdealGas {
        fn particle_energy(&self, _: usize, _: &[f64; 3], _: &[f64; 3]) -> f64 {
            0.0
        }
        fn pair_energy(
            &self,
            _: usize,
            _: &[f64; 3],
            _: &[f64; 3],
            _: usize,
            _: &[f64; 3],
            _: &[f64; 3],
        ) -> f64 {
            0.0
        }
        fn interactions(&self, _: usize, _: &[f64; 3], _: &[f64; 3], _: &mut Vec<usize>) {}
        fn post_move(&mut self, _: usize, _: &[f64; 3], _: &[f64; 3]) {}
    }

    fn grid(n_side: usize, spacing: f64) -> Vec<Particle> {
        let mut particles = Vec::new();
        for i in 0..n_side {
            for j in 0..n_side {
                particles.push(Particle::new([
                    0.5 + spacing * i as f64,
                    0.5 + spacing * j as f64,
                    0.0,
                ]));
            }
        }
        particles
    }

    #[test]
    fn ideal_gas_accepts_every_move() {
        let config = Config::new(2, vec![10.0, 10.0]);
        let mut sim = Vmmc::new(IdealGas, grid(4, 2.0), config).unwrap();
        let accepted = sim.step_n(500).unwrap();
        assert_eq!(accepted, 500);
        assert_eq!(sim.statistics().attempts, 500);
        assert_eq!(sim.statistics().cluster_translations()[1], 500);
        assert_eq!(sim.energy(), 0.0);
    }

    #[test]
    fn coordinates_stay_in_the_primary_image() {
        let config = Config::new(2, vec![10.0, 10.0]);
        let mut sim = Vmmc::new(IdealGas, grid(4, 2.0), config).unwrap();
        sim.step_n(2000).unwrap();
        for p in sim.particles() {
            for d in 0..2 {
                assert!(p.position[d] >= 0.0 && p.position[d] < 10.0);
            }
            assert_eq!(p.position[2], 0.0);
        }
    }

    #[test]
    fn construction_rejects_bad_input() {
        let config = Config::new(2, vec![10.0, 10.0]);

        // Empty system.
        assert!(Vmmc::new(IdealGas, vec![], config.clone()).is_err());

        // Out-of-box coordinate.
        let out = vec![Particle::new([10.0, 5.0, 0.0])];
        assert!(Vmmc::new(IdealGas, out, config.clone()).is_err());

        // Third component in a 2D box.
        let lifted = vec![Particle::new([5.0, 5.0, 1.0])];
        assert!(Vmmc::new(IdealGas, lifted, config.clone()).is_err());

        // Non-unit orientation.
        let skewed = vec![Particle::with_orientation([5.0, 5.0, 0.0], [2.0, 0.0, 0.0])];
        assert!(Vmmc::new(IdealGas, skewed, config.clone()).is_err());

        // Bad options.
        let mut bad = config;
        bad.prob_translate = -0.1;
        assert!(Vmmc::new(IdealGas, vec![Particle::new([5.0, 5.0, 0.0])], bad).is_err());
    }

    #[test]
    fn statistics_reset_keeps_the_engine_running() {
        let config = Config::new(2, vec![10.0, 10.0]);
        let mut sim = Vmmc::new(IdealGas, grid(2, 3.0), config).unwrap();
        sim.step_n(10).unwrap();
        sim.reset_statistics();
        assert_eq!(sim.statistics().attempts, 0);
        sim.step_n(5).unwrap();
        assert_eq!(sim.statistics().attempts, 5);
    }
}
