//! Records spread over the four faces of a regular tetrahedron.
//!
//! Faces are filled in a fixed order: the base, then the side faces standing
//! on base edges 0-1, 1-2 and 2-0. Each face receives `N / 4` records and the
//! remainder goes to the first faces, so the per-face counts always add up
//! to `N`.
//!
//! Placement on a face is deterministic unless `face_resolution` forces a
//! lattice that is too small; the extra points are then jittered with the
//! context's random source.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geom::{
    DEFAULT_SAMPLE_JITTER, Euler3, Point3, SurfaceSampleOptions, Triangle, sample_surface_points,
};

use super::{Layout, LayoutContext, LayoutError, LayoutResult, LayoutTarget, ensure_positive};

pub const FACE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TetrahedronOptions {
    /// Distance from the base centroid to each base vertex.
    pub base_radius: f64,
    /// Top-up jitter as a fraction of one lattice cell.
    pub jitter: f64,
    /// Fixed lattice resolution per face. `None` sizes the lattice to fit.
    pub face_resolution: Option<usize>,
}

impl Default for TetrahedronOptions {
    fn default() -> Self {
        Self {
            base_radius: 1400.0,
            jitter: DEFAULT_SAMPLE_JITTER,
            face_resolution: None,
        }
    }
}

impl TetrahedronOptions {
    /// Height of the apex above the base for equal edge lengths.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.base_radius * 2.0_f64.sqrt()
    }

    #[must_use]
    pub fn base_vertices(&self) -> [Point3; 3] {
        let r = self.base_radius;
        let half_side = r * 3.0_f64.sqrt() / 2.0;
        [
            Point3::new(r, 0.0, 0.0),
            Point3::new(-r / 2.0, 0.0, half_side),
            Point3::new(-r / 2.0, 0.0, -half_side),
        ]
    }

    #[must_use]
    pub fn apex(&self) -> Point3 {
        Point3::new(0.0, self.height(), 0.0)
    }

    /// Centroid of the solid, used to orient face normals outward.
    #[must_use]
    pub fn centroid(&self) -> Point3 {
        let [b0, b1, b2] = self.base_vertices();
        Point3::centroid(&[b0, b1, b2, self.apex()])
    }

    /// Faces in fill order.
    #[must_use]
    pub fn faces(&self) -> [Triangle; FACE_COUNT] {
        let [b0, b1, b2] = self.base_vertices();
        let apex = self.apex();
        [
            Triangle::new(b0, b1, b2),
            Triangle::new(b0, b1, apex),
            Triangle::new(b1, b2, apex),
            Triangle::new(b2, b0, apex),
        ]
    }

    fn sample_options(&self) -> SurfaceSampleOptions {
        SurfaceSampleOptions {
            resolution: self.face_resolution,
            jitter: self.jitter,
        }
    }
}

impl Layout for TetrahedronOptions {
    fn generate(&self, count: usize, ctx: &mut LayoutContext) -> Vec<LayoutTarget> {
        tetrahedron_layout(count, self, ctx.rng())
    }

    fn validate(&self) -> LayoutResult<()> {
        ensure_positive("tetrahedron.baseRadius", self.base_radius)?;
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(LayoutError::config(
                "tetrahedron.jitter",
                format!("expected a non-negative finite number, got {}", self.jitter),
            ));
        }
        match self.face_resolution {
            Some(0) => Err(LayoutError::config("tetrahedron.faceResolution", "must be at least 1")),
            // A forced lattice may need topping up, which duplicates points without jitter.
            Some(_) if self.jitter == 0.0 => Err(LayoutError::config(
                "tetrahedron.jitter",
                "must be positive when faceResolution is set",
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TetrahedronDiagnostics {
    pub face_counts: [usize; FACE_COUNT],
    /// Points that came from the random top-up instead of the lattice.
    pub topped_up: usize,
}

/// Records per face, in fill order. Always sums to `count`.
#[must_use]
pub fn face_counts(count: usize) -> [usize; FACE_COUNT] {
    let per_face = count / FACE_COUNT;
    let remainder = count % FACE_COUNT;
    let mut counts = [0; FACE_COUNT];
    let mut assigned = 0;
    for (face, slot) in counts.iter_mut().enumerate().take(FACE_COUNT - 1) {
        *slot = per_face + usize::from(face < remainder);
        assigned += *slot;
    }
    counts[FACE_COUNT - 1] = count - assigned;
    counts
}

pub fn tetrahedron_layout<R: Rng>(
    count: usize,
    options: &TetrahedronOptions,
    rng: &mut R,
) -> Vec<LayoutTarget> {
    tetrahedron_layout_with_diagnostics(count, options, rng).0
}

pub fn tetrahedron_layout_with_diagnostics<R: Rng>(
    count: usize,
    options: &TetrahedronOptions,
    rng: &mut R,
) -> (Vec<LayoutTarget>, TetrahedronDiagnostics) {
    let counts = face_counts(count);
    let interior = options.centroid();
    let sampling = options.sample_options();

    let mut targets = Vec::with_capacity(count);
    let mut diagnostics = TetrahedronDiagnostics {
        face_counts: counts,
        topped_up: 0,
    };

    for (face, face_count) in options.faces().iter().zip(counts) {
        let rotation = face
            .outward_normal(interior)
            .map_or(Euler3::ZERO, Euler3::facing);
        let (points, sample) = sample_surface_points(face, face_count, sampling, &mut *rng);
        diagnostics.topped_up += sample.topped_up;
        targets.extend(points.into_iter().map(|p| LayoutTarget::new(p, rotation)));
    }

    log::debug!(
        "tetrahedron: {} targets for {count} records, faces {:?}, {} topped up",
        targets.len(),
        diagnostics.face_counts,
        diagnostics.topped_up
    );
    (targets, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn face_counts_sum_to_count() {
        for count in 0..=257 {
            let counts = face_counts(count);
            assert_eq!(counts.iter().sum::<usize>(), count);
            let max = counts.iter().max().copied().unwrap_or(0);
            let min = counts.iter().min().copied().unwrap_or(0);
            assert!(max - min <= 1, "{counts:?}");
        }
        assert_eq!(face_counts(37), [10, 9, 9, 9]);
        assert_eq!(face_counts(3), [1, 1, 1, 0]);
    }

    #[test]
    fn tetrahedron_is_regular() {
        let options = TetrahedronOptions::default();
        let [b0, b1, b2] = options.base_vertices();
        let apex = options.apex();
        let edge = b0.distance_to(b1);
        let tol = Tolerance::LOOSE.scaled(edge);
        for (p, q) in [(b1, b2), (b2, b0), (b0, apex), (b1, apex), (b2, apex)] {
            assert!(tol.approx_eq_f64(p.distance_to(q), edge));
        }
    }

    #[test]
    fn face_normals_point_outward() {
        let options = TetrahedronOptions::default();
        let interior = options.centroid();
        for face in options.faces() {
            let normal = face.outward_normal(interior).unwrap();
            assert!(normal.dot(face.centroid() - interior) > 0.0);
        }
        let base = options.faces()[0].outward_normal(interior).unwrap();
        assert!(base.y < -0.999);
    }

    #[test]
    fn targets_share_their_face_rotation() {
        let options = TetrahedronOptions::default();
        let mut rng = StdRng::seed_from_u64(5);
        let (targets, diag) = tetrahedron_layout_with_diagnostics(40, &options, &mut rng);
        assert_eq!(targets.len(), 40);
        assert_eq!(diag.topped_up, 0);

        let mut offset = 0;
        for (face, count) in options.faces().iter().zip(diag.face_counts) {
            let expected = Euler3::facing(face.outward_normal(options.centroid()).unwrap());
            for target in &targets[offset..offset + count] {
                assert_eq!(target.rotation, expected);
            }
            offset += count;
        }
        // Base records look straight down.
        assert!((targets[0].rotation.x + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_bad_options() {
        let negative_jitter = TetrahedronOptions {
            jitter: -0.1,
            ..TetrahedronOptions::default()
        };
        assert!(negative_jitter.validate().is_err());

        let zero_resolution = TetrahedronOptions {
            face_resolution: Some(0),
            ..TetrahedronOptions::default()
        };
        assert!(zero_resolution.validate().is_err());

        let zero_radius = TetrahedronOptions {
            base_radius: 0.0,
            ..TetrahedronOptions::default()
        };
        assert!(zero_radius.validate().is_err());
    }

    #[test]
    fn forced_resolution_requires_jitter() {
        let unjittered = TetrahedronOptions {
            jitter: 0.0,
            face_resolution: Some(2),
            ..TetrahedronOptions::default()
        };
        assert!(matches!(
            unjittered.validate(),
            Err(LayoutError::InvalidConfig { field: "tetrahedron.jitter", .. })
        ));

        // Without a forced lattice the top-up never runs, so zero jitter is harmless.
        let lattice_only = TetrahedronOptions {
            jitter: 0.0,
            ..TetrahedronOptions::default()
        };
        assert!(lattice_only.validate().is_ok());
    }
}
