//! Square-well fluid under virtual moves: hard spheres with a short
//! attractive well, the classic setting where cluster moves beat
//! single-particle dynamics.

mod common;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use vmmc::{Config, Vmmc};

const DIMENSION: usize = 3;
const N_PARTICLES: usize = 1000;
const DENSITY: f64 = 0.05;
const WELL_DEPTH: f64 = 2.6;
const WELL_RANGE: f64 = 1.1;
const SWEEPS_PER_BLOCK: usize = 100;
const N_BLOCKS: usize = 50;

fn main() {
    // Box side from the target volume fraction of unit-diameter spheres.
    let base_length = if DIMENSION == 2 {
        (N_PARTICLES as f64 * std::f64::consts::PI / (4.0 * DENSITY)).powf(0.5)
    } else {
        (N_PARTICLES as f64 * std::f64::consts::PI / (6.0 * DENSITY)).powf(1.0 / 3.0)
    };
    let box_size = vec![base_length; DIMENSION];

    let mut config = Config::new(DIMENSION, box_size.clone());
    config.max_translation = 0.15;
    config.max_rotation = 0.2;
    config.prob_translate = 0.5;
    config.max_interactions = 15;

    let mut init_rng = Xoshiro256StarStar::seed_from_u64(2016);
    let bx = vmmc::PeriodicBox::new(DIMENSION, &box_size);
    let positions = common::random_positions(N_PARTICLES, &bx, &mut init_rng);
    let particles = common::isotropic_particles(&positions);
    let model = common::SquareWell::new(DIMENSION, &box_size, positions, WELL_DEPTH, WELL_RANGE);

    let mut sim = Vmmc::new(model, particles, config).expect("valid configuration");

    println!(
        "Square-well fluid  |  N: {}  |  D: {}  |  L: {:.3}  |  well: {} kT x {}",
        N_PARTICLES, DIMENSION, base_length, WELL_DEPTH, WELL_RANGE
    );
    println!("{}", "-".repeat(70));

    for block in 1..=N_BLOCKS {
        sim.step_n((SWEEPS_PER_BLOCK * N_PARTICLES) as u64)
            .expect("model honours the interaction capacity");

        println!(
            "sweeps = {:9.4e}  |  energy/N = {:8.5}  |  acceptance = {:.4}",
            (block * SWEEPS_PER_BLOCK) as f64,
            sim.energy() / N_PARTICLES as f64,
            sim.statistics().acceptance_rate()
        );
    }

    let stats = sim.statistics();
    let multi: u64 = stats.cluster_translations()[2..].iter().sum();
    println!("{}", "-".repeat(70));
    println!(
        "accepted: {} / {}  |  multi-particle translations: {}",
        stats.accepts, stats.attempts, multi
    );
}
