//! Virtual-move Monte Carlo (VMMC) for interacting particles in
//! periodic 2D/3D boxes.
//!
//! Instead of displacing one particle at a time, a trial move grows a
//! cluster of stochastically linked particles and translates or rotates
//! it as a rigid body. Link formation and the frustration-weighted
//! acceptance rule obey super-detailed balance, and a Stokes-drag
//! factor damps large clusters so collective motion stays physically
//! plausible. Strongly attractive systems equilibrate orders of
//! magnitude faster than under single-particle dynamics.
//!
//! # Structure
//!
//! | Piece | Where |
//! |-------|-------|
//! | Interaction callbacks | [`Model`] |
//! | Periodic geometry | [`PeriodicBox`] |
//! | Engine facade | [`Vmmc`] |
//! | Move counters | [`MoveStats`] |
//! | Independent-engine batches | [`step_ensemble`] |
//!
//! The potential is entirely the caller's: the engine sees it through
//! the four core [`Model`] hooks (plus two optional ones) and treats
//! neighbour indexing, trajectory output and persistence as external
//! concerns.
//!
//! # Quick start
//!
//! ```
//! use vmmc::{Config, Model, Particle, Vmmc};
//!
//! // Non-interacting particles: every move is accepted.
//! struct IdealGas;
//!
//! impl Model for IdealGas {
//!     fn particle_energy(&self, _: usize, _: &[f64; 3], _: &[f64; 3]) -> f64 {
//!         0.0
//!     }
//!     fn pair_energy(
//!         &self,
//!         _: usize, _: &[f64; 3], _: &[f64; 3],
//!         _: usize, _: &[f64; 3], _: &[f64; 3],
//!     ) -> f64 {
//!         0.0
//!     }
//!     fn interactions(&self, _: usize, _: &[f64; 3], _: &[f64; 3], _: &mut Vec<usize>) {}
//!     fn post_move(&mut self, _: usize, _: &[f64; 3], _: &[f64; 3]) {}
//! }
//!
//! let config = Config::new(2, vec![10.0, 10.0]);
//! let particles: Vec<Particle> = (0..16)
//!     .map(|i| Particle::new([0.5 + 2.0 * (i % 4) as f64, 0.5 + 2.0 * (i / 4) as f64, 0.0]))
//!     .collect();
//!
//! let mut sim = Vmmc::new(IdealGas, particles, config).unwrap();
//! let accepted = sim.step_n(100).unwrap();
//! assert_eq!(accepted, 100);
//! ```
//!
//! Energies are in units of kT (β = 1); lengths are in units of the
//! particle diameter.

pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parallel;
pub mod particle;
pub mod simulation;
pub mod stats;

mod cluster;
mod engine;
mod pairs;

pub use config::Config;
pub use error::EngineError;
pub use geometry::PeriodicBox;
pub use model::Model;
pub use parallel::step_ensemble;
pub use particle::Particle;
pub use simulation::Vmmc;
pub use stats::MoveStats;
