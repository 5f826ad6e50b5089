//! Toy potentials shared across the integration tests. They trade the
//! cell lists of the demos for all-pairs scans, which keeps them exact
//! and small at the particle counts the tests use.
#![allow(dead_code)]

use vmmc::{Model, PeriodicBox};

#[inline]
pub fn norm_sq(v: &[f64; 3]) -> f64 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

/// Radial pair potential from a closure of the centre separation.
/// Neighbour lists follow the interaction contract exactly: a particle
/// is listed precisely when the pair energy is nonzero.
pub struct RadialModel<F: Fn(f64) -> f64> {
    pub bx: PeriodicBox,
    pub positions: Vec<[f64; 3]>,
    energy: F,
}

impl<F: Fn(f64) -> f64> RadialModel<F> {
    pub fn new(dimension: usize, box_size: &[f64], positions: Vec<[f64; 3]>, energy: F) -> Self {
        Self {
            bx: PeriodicBox::new(dimension, box_size),
            positions,
            energy,
        }
    }

    fn pair(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        let sep = self.bx.separation(a, b);
        (self.energy)(norm_sq(&sep).sqrt())
    }

    /// Smallest minimum-image centre distance over all pairs.
    pub fn min_pair_distance(&self) -> f64 {
        let mut min = f64::INFINITY;
        for i in 0..self.positions.len() {
            for j in i + 1..self.positions.len() {
                let sep = self.bx.separation(&self.positions[i], &self.positions[j]);
                min = min.min(norm_sq(&sep).sqrt());
            }
        }
        min
    }
}

impl<F: Fn(f64) -> f64> Model for RadialModel<F> {
    fn particle_energy(&self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) -> f64 {
        let mut energy = 0.0;
        for (j, p) in self.positions.iter().enumerate() {
            if j == i {
                continue;
            }
            let e = self.pair(position, p);
            if e.is_infinite() {
                return e;
            }
            energy += e;
        }
        energy
    }

    fn pair_energy(
        &self,
        _i: usize,
        position_i: &[f64; 3],
        _oi: &[f64; 3],
        _j: usize,
        position_j: &[f64; 3],
        _oj: &[f64; 3],
    ) -> f64 {
        self.pair(position_i, position_j)
    }

    fn interactions(
        &self,
        i: usize,
        position: &[f64; 3],
        _orientation: &[f64; 3],
        neighbours: &mut Vec<usize>,
    ) {
        for (j, p) in self.positions.iter().enumerate() {
            if j != i && self.pair(position, p) != 0.0 {
                neighbours.push(j);
            }
        }
    }

    fn post_move(&mut self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) {
        self.positions[i] = *position;
    }
}

/// Hard core below contact, a flat well of `depth` kT out to `range`.
pub fn square_well(depth: f64, range: f64) -> impl Fn(f64) -> f64 {
    let range_sq = range * range;
    move |r| {
        if r < 1.0 {
            f64::INFINITY
        } else if r * r < range_sq {
            -depth
        } else {
            0.0
        }
    }
}

/// Pure hard core: infinite below contact, nothing beyond.
pub fn hard_core() -> impl Fn(f64) -> f64 {
    |r| if r < 1.0 { f64::INFINITY } else { 0.0 }
}

/// Stiff V-shaped bond pinned at contact distance. Any displacement of
/// one endpoint raises the pair energy steeply in both trial
/// directions, so links form with probability 1 and a lattice of these
/// bonds moves as one rigid cluster. The small negative offset keeps
/// the energy nonzero at the minimum, as the neighbour-list contract
/// requires.
pub fn contact_bond(stiffness: f64, cutoff: f64) -> impl Fn(f64) -> f64 {
    move |r| {
        if r < cutoff {
            stiffness * (r - 1.0).abs() - 0.01
        } else {
            0.0
        }
    }
}

/// Truncated-and-shifted Lennard-Jones with unit diameter.
pub fn lennard_jones(epsilon: f64, cutoff: f64) -> impl Fn(f64) -> f64 {
    let cutoff_sq = cutoff * cutoff;
    let shift = cutoff.powi(-12) - cutoff.powi(-6);
    move |r| {
        let r_sq = r * r;
        if r_sq >= cutoff_sq {
            return 0.0;
        }
        let r6_inv = 1.0 / (r_sq * r_sq * r_sq);
        4.0 * epsilon * (r6_inv * r6_inv - r6_inv - shift)
    }
}

/// Non-interacting particles in a uniform external field between two
/// confining walls: `non_pairwise_energy` is `gradient * y` and
/// `outside_boundary` rejects anything leaving the slab. Exercises the
/// two optional hooks on their own, with no pair terms in the way.
pub struct FieldSlab {
    pub positions: Vec<[f64; 3]>,
    pub gradient: f64,
    pub wall_low: f64,
    pub wall_high: f64,
}

impl Model for FieldSlab {
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

    fn post_move(&mut self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) {
        self.positions[i] = *position;
    }

    fn non_pairwise_energy(&self, _i: usize, position: &[f64; 3], _o: &[f64; 3]) -> f64 {
        self.gradient * position[1]
    }

    fn outside_boundary(&self, _i: usize, position: &[f64; 3], _o: &[f64; 3]) -> bool {
        position[1] < self.wall_low || position[1] > self.wall_high
    }
}

/// Orientation-coupled well: hard core below contact and an alignment
/// energy `-strength * (o_i . o_j)` inside the interaction range. The
/// orientation dependence is what lets a rotation seed links, so this
/// is the model that exercises cluster rotations.
pub struct AlignedWell {
    pub bx: PeriodicBox,
    pub positions: Vec<[f64; 3]>,
    pub orientations: Vec<[f64; 3]>,
    strength: f64,
    range_sq: f64,
}

impl AlignedWell {
    pub fn new(
        dimension: usize,
        box_size: &[f64],
        positions: Vec<[f64; 3]>,
        orientations: Vec<[f64; 3]>,
        strength: f64,
        range: f64,
    ) -> Self {
        Self {
            bx: PeriodicBox::new(dimension, box_size),
            positions,
            orientations,
            strength,
            range_sq: range * range,
        }
    }

    fn pair(&self, pi: &[f64; 3], oi: &[f64; 3], pj: &[f64; 3], oj: &[f64; 3]) -> f64 {
        let sep = self.bx.separation(pi, pj);
        let r_sq = norm_sq(&sep);
        if r_sq < 1.0 {
            f64::INFINITY
        } else if r_sq < self.range_sq {
            -self.strength * (oi[0] * oj[0] + oi[1] * oj[1] + oi[2] * oj[2])
        } else {
            0.0
        }
    }

    pub fn min_pair_distance(&self) -> f64 {
        let mut min = f64::INFINITY;
        for i in 0..self.positions.len() {
            for j in i + 1..self.positions.len() {
                let sep = self.bx.separation(&self.positions[i], &self.positions[j]);
                min = min.min(norm_sq(&sep).sqrt());
            }
        }
        min
    }
}

impl Model for AlignedWell {
    fn particle_energy(&self, i: usize, position: &[f64; 3], orientation: &[f64; 3]) -> f64 {
        let mut energy = 0.0;
        for j in 0..self.positions.len() {
            if j == i {
                continue;
            }
            let e = self.pair(position, orientation, &self.positions[j], &self.orientations[j]);
            if e.is_infinite() {
                return e;
            }
            energy += e;
        }
        energy
    }

    fn pair_energy(
        &self,
        _i: usize,
        position_i: &[f64; 3],
        orientation_i: &[f64; 3],
        _j: usize,
        position_j: &[f64; 3],
        orientation_j: &[f64; 3],
    ) -> f64 {
        self.pair(position_i, orientation_i, position_j, orientation_j)
    }

    fn interactions(
        &self,
        i: usize,
        position: &[f64; 3],
        orientation: &[f64; 3],
        neighbours: &mut Vec<usize>,
    ) {
        for j in 0..self.positions.len() {
            if j != i
                && self.pair(position, orientation, &self.positions[j], &self.orientations[j])
                    != 0.0
            {
                neighbours.push(j);
            }
        }
    }

    fn post_move(&mut self, i: usize, position: &[f64; 3], orientation: &[f64; 3]) {
        self.positions[i] = *position;
        self.orientations[i] = *orientation;
    }
}
