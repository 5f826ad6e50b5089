//! Shared plumbing for the demonstration drivers: a periodic cell list,
//! random hard-sphere initialisation, and two concrete potentials. The
//! engine core never sees any of this — it reaches the potential only
//! through the `Model` trait, and neighbour indexing is the caller's
//! job, which is exactly what the cell list here is for.
#![allow(dead_code)]

use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;
use vmmc::{Model, Particle, PeriodicBox};

/// Periodic cell list with cells at least one interaction range wide,
/// so a particle's neighbours always lie in its own or an adjacent cell.
pub struct CellList {
    dimension: usize,
    cells_per_axis: [usize; 3],
    spacing: [f64; 3],
    /// Adjacent cells (self included) per cell.
    neighbours: Vec<Vec<usize>>,
    members: Vec<Vec<usize>>,
    cell_of: Vec<usize>,
}

impl CellList {
    pub fn new(dimension: usize, box_size: &[f64], range: f64, n_particles: usize) -> Self {
        let mut cells_per_axis = [1usize; 3];
        let mut spacing = [0.0; 3];
        for d in 0..dimension {
            let count = (box_size[d] / range).floor() as usize;
            assert!(
                count >= 3,
                "box side {d} is too small for a cell list with range {range}"
            );
            cells_per_axis[d] = count;
            spacing[d] = box_size[d] / count as f64;
        }

        let n_cells: usize = cells_per_axis[..dimension].iter().product();
        let mut neighbours = vec![Vec::new(); n_cells];
        let strides = Self::strides(dimension, &cells_per_axis);

        for (cell, list) in neighbours.iter_mut().enumerate() {
            let mut coords = [0usize; 3];
            for d in 0..dimension {
                coords[d] = (cell / strides[d]) % cells_per_axis[d];
            }
            let offsets: &[isize] = &[-1, 0, 1];
            let mut push = |shift: [isize; 3]| {
                let mut flat = 0;
                for d in 0..dimension {
                    let c = (coords[d] as isize + shift[d])
                        .rem_euclid(cells_per_axis[d] as isize) as usize;
                    flat += c * strides[d];
                }
                if !list.contains(&flat) {
                    list.push(flat);
                }
            };
            for &dx in offsets {
                for &dy in offsets {
                    if dimension == 2 {
                        push([dx, dy, 0]);
                    } else {
                        for &dz in offsets {
                            push([dx, dy, dz]);
                        }
                    }
                }
            }
        }

        Self {
            dimension,
            cells_per_axis,
            spacing,
            neighbours,
            members: vec![Vec::new(); n_cells],
            cell_of: vec![usize::MAX; n_particles],
        }
    }

    fn strides(dimension: usize, cells_per_axis: &[usize; 3]) -> [usize; 3] {
        let mut strides = [1usize; 3];
        for d in (0..dimension.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * cells_per_axis[d + 1];
        }
        strides
    }

    pub fn cell_index(&self, position: &[f64; 3]) -> usize {
        let strides = Self::strides(self.dimension, &self.cells_per_axis);
        let mut flat = 0;
        for d in 0..self.dimension {
            let c = ((position[d] / self.spacing[d]) as usize).min(self.cells_per_axis[d] - 1);
            flat += c * strides[d];
        }
        flat
    }

    pub fn insert(&mut self, particle: usize, position: &[f64; 3]) {
        let cell = self.cell_index(position);
        self.members[cell].push(particle);
        self.cell_of[particle] = cell;
    }

    /// Move a particle between cells if its position now maps elsewhere.
    pub fn update(&mut self, particle: usize, position: &[f64; 3]) {
        let new_cell = self.cell_index(position);
        let old_cell = self.cell_of[particle];
        if new_cell == old_cell {
            return;
        }
        let slot = self.members[old_cell]
            .iter()
            .position(|&p| p == particle)
            .expect("particle missing from its recorded cell");
        self.members[old_cell].swap_remove(slot);
        self.members[new_cell].push(particle);
        self.cell_of[particle] = new_cell;
    }

    /// Cells adjacent to the one containing `position`, self included.
    pub fn neighbourhood(&self, position: &[f64; 3]) -> &[usize] {
        &self.neighbours[self.cell_index(position)]
    }

    pub fn cell_members(&self, cell: usize) -> &[usize] {
        &self.members[cell]
    }
}

/// Draw non-overlapping random positions for `n` unit-diameter spheres.
pub fn random_positions(
    n: usize,
    bx: &PeriodicBox,
    rng: &mut Xoshiro256StarStar,
) -> Vec<[f64; 3]> {
    const MAX_TRIALS: usize = 100_000;
    let mut positions: Vec<[f64; 3]> = Vec::with_capacity(n);
    for _ in 0..n {
        let mut trials = 0;
        loop {
            trials += 1;
            assert!(trials < MAX_TRIALS, "random insertion failed to converge");
            let mut candidate = [0.0; 3];
            for d in 0..bx.dimension {
                candidate[d] = rng.gen::<f64>() * bx.sides()[d];
            }
            let overlaps = positions.iter().any(|p| {
                let sep = bx.separation(&candidate, p);
                sep[0] * sep[0] + sep[1] * sep[1] + sep[2] * sep[2] < 1.0
            });
            if !overlaps {
                positions.push(candidate);
                break;
            }
        }
    }
    positions
}

pub fn isotropic_particles(positions: &[[f64; 3]]) -> Vec<Particle> {
    positions.iter().map(|&p| Particle::new(p)).collect()
}

#[inline]
fn norm_sq(v: &[f64; 3]) -> f64 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

/// Hard-core square-well fluid: infinite below contact, `-depth` out to
/// `range` diameters, zero beyond.
pub struct SquareWell {
    bx: PeriodicBox,
    positions: Vec<[f64; 3]>,
    cells: CellList,
    depth: f64,
    range_sq: f64,
}

impl SquareWell {
    pub fn new(dimension: usize, box_size: &[f64], positions: Vec<[f64; 3]>, depth: f64, range: f64) -> Self {
        let mut cells = CellList::new(dimension, box_size, range, positions.len());
        for (i, p) in positions.iter().enumerate() {
            cells.insert(i, p);
        }
        Self {
            bx: PeriodicBox::new(dimension, box_size),
            positions,
            cells,
            depth,
            range_sq: range * range,
        }
    }
}

impl Model for SquareWell {
    fn particle_energy(&self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) -> f64 {
        let mut energy = 0.0;
        for &cell in self.cells.neighbourhood(position) {
            for &j in self.cells.cell_members(cell) {
                if j == i {
                    continue;
                }
                let sep = self.bx.separation(position, &self.positions[j]);
                let r_sq = norm_sq(&sep);
                if r_sq < 1.0 {
                    return f64::INFINITY;
                }
                if r_sq < self.range_sq {
                    energy -= self.depth;
                }
            }
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
        let sep = self.bx.separation(position_i, position_j);
        let r_sq = norm_sq(&sep);
        if r_sq < 1.0 {
            f64::INFINITY
        } else if r_sq < self.range_sq {
            -self.depth
        } else {
            0.0
        }
    }

    fn interactions(
        &self,
        i: usize,
        position: &[f64; 3],
        _orientation: &[f64; 3],
        neighbours: &mut Vec<usize>,
    ) {
        for &cell in self.cells.neighbourhood(position) {
            for &j in self.cells.cell_members(cell) {
                if j == i {
                    continue;
                }
                let sep = self.bx.separation(position, &self.positions[j]);
                if norm_sq(&sep) < self.range_sq {
                    neighbours.push(j);
                }
            }
        }
    }

    fn post_move(&mut self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) {
        self.positions[i] = *position;
        self.cells.update(i, position);
    }
}

/// Truncated-and-shifted Lennard-Jones fluid with a cutoff in diameter
/// units; the shift zeroes the potential at the cutoff.
pub struct LennardJones {
    bx: PeriodicBox,
    positions: Vec<[f64; 3]>,
    cells: CellList,
    epsilon: f64,
    cutoff_sq: f64,
    shift: f64,
}

impl LennardJones {
    pub fn new(
        dimension: usize,
        box_size: &[f64],
        positions: Vec<[f64; 3]>,
        epsilon: f64,
        cutoff: f64,
    ) -> Self {
        let mut cells = CellList::new(dimension, box_size, cutoff, positions.len());
        for (i, p) in positions.iter().enumerate() {
            cells.insert(i, p);
        }
        Self {
            bx: PeriodicBox::new(dimension, box_size),
            positions,
            cells,
            epsilon,
            cutoff_sq: cutoff * cutoff,
            shift: cutoff.powi(-12) - cutoff.powi(-6),
        }
    }

    fn pair(&self, r_sq: f64) -> f64 {
        if r_sq >= self.cutoff_sq {
            return 0.0;
        }
        let r2_inv = 1.0 / r_sq;
        let r6_inv = r2_inv * r2_inv * r2_inv;
        4.0 * self.epsilon * (r6_inv * r6_inv - r6_inv - self.shift)
    }
}

impl Model for LennardJones {
    fn particle_energy(&self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) -> f64 {
        let mut energy = 0.0;
        for &cell in self.cells.neighbourhood(position) {
            for &j in self.cells.cell_members(cell) {
                if j == i {
                    continue;
                }
                let sep = self.bx.separation(position, &self.positions[j]);
                energy += self.pair(norm_sq(&sep));
                // Large finite repulsions dominate everything else.
                if energy > 1e6 {
                    return f64::INFINITY;
                }
            }
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
        let sep = self.bx.separation(position_i, position_j);
        self.pair(norm_sq(&sep))
    }

    fn interactions(
        &self,
        i: usize,
        position: &[f64; 3],
        _orientation: &[f64; 3],
        neighbours: &mut Vec<usize>,
    ) {
        for &cell in self.cells.neighbourhood(position) {
            for &j in self.cells.cell_members(cell) {
                if j == i {
                    continue;
                }
                let sep = self.bx.separation(position, &self.positions[j]);
                if norm_sq(&sep) < self.cutoff_sq {
                    neighbours.push(j);
                }
            }
        }
    }

    fn post_move(&mut self, i: usize, position: &[f64; 3], _orientation: &[f64; 3]) {
        self.positions[i] = *position;
        self.cells.update(i, position);
    }
}
