//! Double helix: two interleaved coils, stacked vertically by index.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::geom::{Euler3, Point3};

use super::{Layout, LayoutContext, LayoutResult, LayoutTarget, ensure_finite, ensure_positive};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelixOptions {
    pub radius: f64,
    /// Vertical distance between consecutive records.
    pub height_step: f64,
    /// Angle in radians between consecutive records, before the strand offset.
    pub angle_step: f64,
}

impl Default for HelixOptions {
    fn default() -> Self {
        Self {
            radius: 300.0,
            height_step: 50.0,
            angle_step: 0.2,
        }
    }
}

impl HelixOptions {
    /// Angle around the Y axis of record `index`. Odd records sit on the
    /// second strand, half a turn away.
    #[must_use]
    pub fn angle(&self, index: usize) -> f64 {
        let strand_offset = if index % 2 == 0 { 0.0 } else { PI };
        self.angle_step * index as f64 + strand_offset
    }
}

impl Layout for HelixOptions {
    fn generate(&self, count: usize, _ctx: &mut LayoutContext) -> Vec<LayoutTarget> {
        helix_layout(count, self)
    }

    fn validate(&self) -> LayoutResult<()> {
        ensure_positive("helix.radius", self.radius)?;
        ensure_positive("helix.heightStep", self.height_step)?;
        ensure_finite("helix.angleStep", self.angle_step)
    }
}

/// Record 0 is at the bottom; the stack is centered on `y = 0`.
#[must_use]
pub fn helix_layout(count: usize, options: &HelixOptions) -> Vec<LayoutTarget> {
    let half = count as f64 / 2.0;
    (0..count)
        .map(|i| {
            let angle = options.angle(i);
            let position = Point3::new(
                options.radius * angle.cos(),
                (i as f64 - half) * options.height_step,
                options.radius * angle.sin(),
            );
            LayoutTarget::new(position, Euler3::yaw(angle + FRAC_PI_2))
        })
        .collect()
}
