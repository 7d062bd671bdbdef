//! Spherical shell using a golden-spiral style point distribution.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geom::{Euler3, Point3};

use super::{Layout, LayoutContext, LayoutResult, LayoutTarget, ensure_positive};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SphereOptions {
    pub radius: f64,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self { radius: 1000.0 }
    }
}

impl Layout for SphereOptions {
    fn generate(&self, count: usize, _ctx: &mut LayoutContext) -> Vec<LayoutTarget> {
        sphere_layout(count, self)
    }

    fn validate(&self) -> LayoutResult<()> {
        ensure_positive("sphere.radius", self.radius)
    }
}

/// `count` points spiralling from the south pole (index 0) upwards, each
/// turned to face away from the center.
#[must_use]
pub fn sphere_layout(count: usize, options: &SphereOptions) -> Vec<LayoutTarget> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as f64;
    let winding = (n * PI).sqrt();
    let r = options.radius;

    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f64 / n).clamp(-1.0, 1.0).acos();
            let theta = winding * phi;
            let position = Point3::new(
                r * theta.cos() * phi.sin(),
                r * phi.cos(),
                r * theta.sin() * phi.sin(),
            );
            LayoutTarget::new(position, Euler3::facing(position - Point3::ORIGIN))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;

    #[test]
    fn points_lie_on_the_shell() {
        let options = SphereOptions::default();
        let tol = Tolerance::LOOSE.scaled(options.radius);
        for count in [1, 2, 3, 37, 200] {
            for target in sphere_layout(count, &options) {
                let distance = target.position.distance_to(Point3::ORIGIN);
                assert!(tol.approx_eq_f64(distance, options.radius), "{distance}");
            }
        }
    }

    #[test]
    fn single_point_is_the_south_pole() {
        let targets = sphere_layout(1, &SphereOptions::default());
        assert_eq!(targets.len(), 1);
        let target = targets[0];
        assert!(target.is_finite());
        assert!((target.position.y + 1000.0).abs() < 1e-9);
        // Facing straight down.
        assert!((target.rotation.x + std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn rotation_faces_outward() {
        for target in sphere_layout(50, &SphereOptions::default()) {
            let outward = target.position - Point3::ORIGIN;
            assert_eq!(target.rotation, Euler3::facing(outward));
            assert_eq!(target.rotation.z, 0.0);
        }
    }

    #[test]
    fn heights_increase_along_the_sequence() {
        let targets = sphere_layout(64, &SphereOptions::default());
        for pair in targets.windows(2) {
            assert!(pair[0].position.y < pair[1].position.y);
        }
    }

    #[test]
    fn empty_count_yields_no_targets() {
        assert!(sphere_layout(0, &SphereOptions::default()).is_empty());
    }
}
