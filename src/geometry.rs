//! Periodic-box geometry and rigid-body trial transforms.
//!
//! Positions are kept in box coordinates with every component in
//! `[0, L_d)`. All vectors are `[f64; 3]`; in two dimensions the third
//! component is zero and never touched by wrapping.

/// Orthorhombic periodic simulation box.
pub struct PeriodicBox {
    /// Spatial dimension, 2 or 3.
    pub dimension: usize,
    size: [f64; 3],
}

impl PeriodicBox {
    /// Create a box from its sides. `sides.len()` must equal `dimension`;
    /// the caller (the facade constructor) has validated this.
    pub fn new(dimension: usize, sides: &[f64]) -> Self {
        let mut size = [1.0; 3];
        size[..dimension].copy_from_slice(sides);
        Self { dimension, size }
    }

    /// Box sides, one entry per dimension.
    pub fn sides(&self) -> &[f64] {
        &self.size[..self.dimension]
    }

    /// Reduce a displacement to its minimum image, componentwise
    /// `d - L * round(d / L)`.
    #[inline]
    pub fn minimum_image(&self, sep: &mut [f64; 3]) {
        for d in 0..self.dimension {
            sep[d] -= self.size[d] * (sep[d] / self.size[d]).round();
        }
    }

    /// Minimum-image separation `a - b`.
    #[inline]
    pub fn separation(&self, a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
        let mut sep = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
        self.minimum_image(&mut sep);
        sep
    }

    /// Wrap a position into the primary image `[0, L_d)`.
    ///
    /// `rem_euclid` can round up to exactly `L` for tiny negative inputs,
    /// which would violate the half-open invariant.
    #[inline]
    pub fn wrap(&self, pos: &mut [f64; 3]) {
        for d in 0..self.dimension {
            let l = self.size[d];
            let mut x = pos[d].rem_euclid(l);
            if x >= l {
                x = 0.0;
            }
            pos[d] = x;
        }
    }
}

/// Direction in which a trial transform is applied. The reverse
/// direction realizes the inverse map and drives the reverse-link test.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// A rigid-body trial move: every cluster member experiences the same
/// translation, or the same rotation about the same pivot.
pub(crate) enum Transform {
    Translation {
        delta: [f64; 3],
    },
    /// Rotation by `angle` about `axis` through `pivot` (the seed's
    /// pre-move position). In 2D the axis is the out-of-plane unit vector.
    Rotation {
        pivot: [f64; 3],
        axis: [f64; 3],
        angle: f64,
    },
}

impl Transform {
    #[inline]
    pub(crate) fn is_rotation(&self) -> bool {
        matches!(self, Transform::Rotation { .. })
    }

    /// Transform a position, wrapping the result into the primary image.
    /// Rotations act on the minimum image of `p - pivot`, so a member
    /// recruited across the periodic boundary orbits the near image of
    /// the pivot.
    pub(crate) fn apply_point(&self, bx: &PeriodicBox, p: &[f64; 3], dir: Direction) -> [f64; 3] {
        let mut out = match *self {
            Transform::Translation { delta } => {
                let s = dir.sign();
                [p[0] + s * delta[0], p[1] + s * delta[1], p[2] + s * delta[2]]
            }
            Transform::Rotation { pivot, axis, angle } => {
                let arm = bx.separation(p, &pivot);
                let rotated = rotate_about(&arm, &axis, dir.sign() * angle);
                [
                    pivot[0] + rotated[0],
                    pivot[1] + rotated[1],
                    pivot[2] + rotated[2],
                ]
            }
        };
        bx.wrap(&mut out);
        out
    }

    /// Transform an orientation vector: rotations apply the bare
    /// rotation, translations leave it untouched. No wrapping.
    pub(crate) fn apply_orientation(&self, o: &[f64; 3], dir: Direction) -> [f64; 3] {
        match *self {
            Transform::Translation { .. } => *o,
            Transform::Rotation { axis, angle, .. } => rotate_about(o, &axis, dir.sign() * angle),
        }
    }
}

/// Rodrigues rotation of `v` by `angle` about the unit vector `axis`.
/// With the axis fixed out of plane this reduces to the usual 2D
/// rotation, so one formula serves both dimensions.
#[inline]
pub(crate) fn rotate_about(v: &[f64; 3], axis: &[f64; 3], angle: f64) -> [f64; 3] {
    let (sin, cos) = angle.sin_cos();
    let cross = cross(axis, v);
    let along = dot(axis, v) * (1.0 - cos);
    [
        v[0] * cos + cross[0] * sin + axis[0] * along,
        v[1] * cos + cross[1] * sin + axis[1] * along,
        v[2] * cos + cross[2] * sin + axis[2] * along,
    ]
}

#[inline]
pub(crate) fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn norm_sq(v: &[f64; 3]) -> f64 {
    dot(v, v)
}

/// Rescale to unit length. Applied to every orientation after a rotation
/// so accumulated round-off never drifts past the 1e-10 invariant.
#[inline]
pub(crate) fn normalize(v: &mut [f64; 3]) {
    let n = dot(v, v).sqrt();
    if n > 0.0 {
        v[0] /= n;
        v[1] /= n;
        v[2] /= n;
    }
}
