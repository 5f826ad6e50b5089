//! Trial-move sampling and the hydrodynamic acceptance scaling.

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::Config;
use crate::geometry::Transform;
use crate::particle::Particle;

/// Draw the move type, the seed particle, and the trial transform.
///
/// The move type is drawn first with probability `prob_translate`, then
/// the seed uniformly. A rotation landing on an isotropic seed falls
/// back to a translation: the whole cluster rotates only when the seed
/// is anisotropic, so an all-isotropic system never executes a rotation.
pub(crate) fn sample_trial(
    config: &Config,
    particles: &[Particle],
    rng: &mut Xoshiro256StarStar,
) -> (usize, Transform) {
    let rotate = rng.gen::<f64>() >= config.prob_translate;
    let seed = rng.gen_range(0..particles.len());

    if rotate && !particles[seed].isotropic {
        let angle = config.max_rotation * (2.0 * rng.gen::<f64>() - 1.0);
        let axis = if config.dimension == 2 {
            [0.0, 0.0, 1.0]
        } else {
            random_unit_axis(rng)
        };
        let transform = Transform::Rotation {
            pivot: particles[seed].position,
            axis,
            angle,
        };
        (seed, transform)
    } else {
        let mut delta = [0.0; 3];
        for component in delta.iter_mut().take(config.dimension) {
            *component = config.max_translation * (2.0 * rng.gen::<f64>() - 1.0);
        }
        (seed, Transform::Translation { delta })
    }
}

/// Uniform random unit vector (Marsaglia 1972).
fn random_unit_axis(rng: &mut Xoshiro256StarStar) -> [f64; 3] {
    loop {
        let u = 2.0 * rng.gen::<f64>() - 1.0;
        let v = 2.0 * rng.gen::<f64>() - 1.0;
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            let f = 2.0 * (1.0 - s).sqrt();
            return [u * f, v * f, 1.0 - 2.0 * s];
        }
    }
}

/// Stokes-drag acceptance scale for a cluster of `n` particles.
///
/// The cluster is approximated by a sphere of radius
/// `reference_radius * n^(1/D)`. Mobilities go as `1/R` (translation)
/// and `1/R³` (rotation); the returned factor is the cluster mobility
/// over the single-particle mobility, so a one-particle cluster scales
/// by exactly 1.
pub(crate) fn stokes_damping(
    reference_radius: f64,
    n: usize,
    dimension: usize,
    is_rotation: bool,
) -> f64 {
    let cluster_radius = reference_radius * (n as f64).powf(1.0 / dimension as f64);
    let ratio = reference_radius / cluster_radius;
    if is_rotation {
        ratio.powi(3)
    } else {
        ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    #[test]
    fn damping_is_unity_for_a_single_particle() {
        for dim in [2, 3] {
            assert_eq!(stokes_damping(0.5, 1, dim, false), 1.0);
            assert_eq!(stokes_damping(0.5, 1, dim, true), 1.0);
        }
    }

    #[test]
    fn damping_follows_the_stokes_exponents() {
        // Translation: n^(-1/D). Rotation: n^(-3/D).
        assert_relative_eq!(stokes_damping(0.5, 27, 3, false), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stokes_damping(0.5, 27, 3, true), 1.0 / 27.0, epsilon = 1e-12);
        assert_relative_eq!(stokes_damping(0.5, 4, 2, false), 0.5, epsilon = 1e-12);
        assert_relative_eq!(stokes_damping(0.5, 4, 2, true), 0.125, epsilon = 1e-12);
        // The reference radius cancels in the normalized ratio.
        assert_relative_eq!(
            stokes_damping(2.0, 8, 2, false),
            stokes_damping(0.5, 8, 2, false),
            epsilon = 1e-12
        );
    }

    #[test]
    fn translation_only_never_samples_a_rotation() {
        let mut cfg = Config::new(2, vec![10.0, 10.0]);
        cfg.prob_translate = 1.0;
        let particles = vec![
            Particle::with_orientation([1.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            Particle::with_orientation([3.0, 3.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        for _ in 0..200 {
            let (_, transform) = sample_trial(&cfg, &particles, &mut rng);
            assert!(!transform.is_rotation());
        }
    }

    #[test]
    fn isotropic_seed_downgrades_rotation_to_translation() {
        let mut cfg = Config::new(2, vec![10.0, 10.0]);
        cfg.prob_translate = 0.0;
        let particles = vec![Particle::new([5.0, 5.0, 0.0])];
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        for _ in 0..200 {
            let (_, transform) = sample_trial(&cfg, &particles, &mut rng);
            assert!(!transform.is_rotation());
        }
    }

    #[test]
    fn anisotropic_seed_rotates_about_itself() {
        let mut cfg = Config::new(3, vec![10.0, 10.0, 10.0]);
        cfg.prob_translate = 0.0;
        let particles = vec![Particle::with_orientation(
            [2.0, 3.0, 4.0],
            [0.0, 0.0, 1.0],
        )];
        let mut rng = Xoshiro256StarStar::seed_from_u64(4);
        let (seed, transform) = sample_trial(&cfg, &particles, &mut rng);
        assert_eq!(seed, 0);
        match transform {
            Transform::Rotation { pivot, axis, angle } => {
                assert_eq!(pivot, particles[0].position);
                assert_relative_eq!(crate::geometry::norm_sq(&axis), 1.0, epsilon = 1e-12);
                assert!(angle.abs() <= cfg.max_rotation);
            }
            Transform::Translation { .. } => panic!("expected a rotation"),
        }
    }
}
