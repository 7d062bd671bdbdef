//! Triangular faces: normals, barycentric mapping and even surface sampling.

use rand::Rng;

use super::core::{Barycentric, Point3, Vec3};

/// Default jitter applied to topped-up samples, as a fraction of one lattice cell.
pub const DEFAULT_SAMPLE_JITTER: f64 = 0.05;

const LATTICE_OFFSET: f64 = 1.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle {
    #[must_use]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub fn centroid(&self) -> Point3 {
        Point3::centroid(&[self.a, self.b, self.c])
    }

    /// Unit normal `(b - a) × (c - a)`. `None` when the corners are collinear.
    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        (self.b - self.a).cross(self.c - self.a).normalized()
    }

    /// Unit normal pointing away from `interior`, e.g. the centroid of the solid
    /// the face belongs to.
    #[must_use]
    pub fn outward_normal(&self, interior: Point3) -> Option<Vec3> {
        let normal = self.normal()?;
        if normal.dot(self.centroid() - interior) < 0.0 {
            Some(-normal)
        } else {
            Some(normal)
        }
    }

    #[must_use]
    pub fn point_at(&self, weights: Barycentric) -> Point3 {
        Point3::new(
            weights.u * self.a.x + weights.v * self.b.x + weights.w * self.c.x,
            weights.u * self.a.y + weights.v * self.b.y + weights.w * self.c.y,
            weights.u * self.a.z + weights.v * self.b.z + weights.w * self.c.z,
        )
    }

    /// Barycentric weights of `p` projected onto the triangle's plane.
    #[must_use]
    pub fn barycentric_of(&self, p: Point3) -> Option<Barycentric> {
        let e0 = self.b - self.a;
        let e1 = self.c - self.a;
        let ep = p - self.a;

        let d00 = e0.dot(e0);
        let d01 = e0.dot(e1);
        let d11 = e1.dot(e1);
        let d20 = ep.dot(e0);
        let d21 = ep.dot(e1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() <= f64::EPSILON * d00 * d11 {
            return None;
        }
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        Some(Barycentric::new(1.0 - v - w, v, w))
    }

    /// Signed distance from `p` to the triangle's plane.
    #[must_use]
    pub fn plane_distance(&self, p: Point3) -> Option<f64> {
        self.normal().map(|n| n.dot(p - self.a))
    }
}

/// How [`sample_surface_points`] builds its candidate lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSampleOptions {
    /// Lattice subdivisions per edge. `None` picks the smallest lattice holding
    /// the requested count.
    pub resolution: Option<usize>,
    /// Top-up jitter as a fraction of one lattice cell.
    pub jitter: f64,
}

impl Default for SurfaceSampleOptions {
    fn default() -> Self {
        Self {
            resolution: None,
            jitter: DEFAULT_SAMPLE_JITTER,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSampleDiagnostics {
    pub resolution: usize,
    pub candidate_count: usize,
    /// Samples added by random perturbation because the lattice was too small.
    pub topped_up: usize,
}

/// Number of points in a lattice of the given resolution.
#[must_use]
pub const fn lattice_size(resolution: usize) -> usize {
    resolution * (resolution + 1) / 2
}

/// Smallest resolution whose lattice holds at least `count` points.
#[must_use]
pub fn lattice_resolution(count: usize) -> usize {
    // Start from the closed-form estimate and correct for float rounding.
    let mut resolution = ((((8 * count + 1) as f64).sqrt() - 1.0) / 2.0).floor() as usize;
    while lattice_size(resolution) < count {
        resolution += 1;
    }
    while resolution > 0 && lattice_size(resolution - 1) >= count {
        resolution -= 1;
    }
    resolution
}

/// Centroids of the upward sub-triangles of a regular subdivision, row by row.
///
/// Every weight is strictly positive, so no candidate sits on an edge shared
/// with a neighbouring face. Resolution 1 yields the face centroid.
#[must_use]
pub fn barycentric_lattice(resolution: usize) -> Vec<Barycentric> {
    let mut lattice = Vec::with_capacity(lattice_size(resolution));
    let step = 1.0 / resolution.max(1) as f64;
    for row in 0..resolution {
        for col in 0..resolution - row {
            let u = (col as f64 + LATTICE_OFFSET) * step;
            let v = (row as f64 + LATTICE_OFFSET) * step;
            lattice.push(Barycentric::from_uv(u, v));
        }
    }
    lattice
}

/// Pick `count` evenly spaced indices out of `len` candidates.
///
/// Requires `count <= len`.
#[must_use]
pub fn stride_indices(len: usize, count: usize) -> Vec<usize> {
    debug_assert!(count <= len);
    // `i * len` approaches `len²`, which overflows a 32-bit usize on wasm32.
    let (len, count) = (len as u128, count as u128);
    (0..count).map(|i| (i * len / count) as usize).collect()
}

/// Exactly `count` evenly spread points on `triangle`.
///
/// When the lattice is smaller than `count` (only possible with an explicit
/// resolution) the missing points are random perturbations of lattice points
/// drawn from `rng`; that path is not reproducible unless `rng` is seeded.
pub fn sample_surface_points<R: Rng>(
    triangle: &Triangle,
    count: usize,
    options: SurfaceSampleOptions,
    rng: &mut R,
) -> (Vec<Point3>, SurfaceSampleDiagnostics) {
    let (weights, diagnostics) = sample_surface_weights(count, options, rng);
    let points = weights.into_iter().map(|w| triangle.point_at(w)).collect();
    (points, diagnostics)
}

/// Barycentric form of [`sample_surface_points`].
pub fn sample_surface_weights<R: Rng>(
    count: usize,
    options: SurfaceSampleOptions,
    rng: &mut R,
) -> (Vec<Barycentric>, SurfaceSampleDiagnostics) {
    if count == 0 {
        return (Vec::new(), SurfaceSampleDiagnostics::default());
    }

    let resolution = options
        .resolution
        .unwrap_or_else(|| lattice_resolution(count))
        .max(1);
    let candidates = barycentric_lattice(resolution);
    let mut diagnostics = SurfaceSampleDiagnostics {
        resolution,
        candidate_count: candidates.len(),
        topped_up: 0,
    };

    if candidates.len() >= count {
        let picked = stride_indices(candidates.len(), count)
            .into_iter()
            .map(|index| candidates[index])
            .collect();
        return (picked, diagnostics);
    }

    let missing = count - candidates.len();
    log::warn!(
        "surface lattice of {} points is too small for {count}; jittering {missing} extra",
        candidates.len()
    );

    let cell = 1.0 / resolution as f64;
    let spread = options.jitter.abs() * cell;
    let mut picked = candidates.clone();
    picked.reserve(missing);
    for _ in 0..missing {
        let base = candidates[rng.random_range(0..candidates.len())];
        let du = (rng.random::<f64>() - 0.5) * spread;
        let dv = (rng.random::<f64>() - 0.5) * spread;
        picked.push(Barycentric::from_uv(base.u + du, base.v + dv).clamped());
    }
    diagnostics.topped_up = missing;

    (picked, diagnostics)
}
