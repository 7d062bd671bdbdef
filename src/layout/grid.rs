//! Cubic lattice of `width × height × depth` cells.

use serde::{Deserialize, Serialize};

use crate::geom::Point3;

use super::{Layout, LayoutContext, LayoutResult, LayoutTarget, ensure_nonzero, ensure_positive};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub spacing: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: 5,
            height: 4,
            depth: 10,
            spacing: 200.0,
        }
    }
}

impl GridOptions {
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Lattice cell `(x, y, z)` of record `index`. Indices past the capacity
    /// wrap around and reuse cells.
    #[must_use]
    pub fn cell(&self, index: usize) -> (usize, usize, usize) {
        let width = self.width.max(1);
        let height = self.height.max(1);
        let depth = self.depth.max(1);
        (
            index % width,
            (index / width) % height,
            (index / (width * height)) % depth,
        )
    }
}

impl Layout for GridOptions {
    fn generate(&self, count: usize, _ctx: &mut LayoutContext) -> Vec<LayoutTarget> {
        grid_layout(count, self)
    }

    fn validate(&self) -> LayoutResult<()> {
        ensure_nonzero("grid.width", self.width)?;
        ensure_nonzero("grid.height", self.height)?;
        ensure_nonzero("grid.depth", self.depth)?;
        ensure_positive("grid.spacing", self.spacing)
    }
}

/// Records fill rows left to right, then layers top to bottom, then slices
/// front to back. The lattice is centered on the origin.
#[must_use]
pub fn grid_layout(count: usize, options: &GridOptions) -> Vec<LayoutTarget> {
    let center = |cells: usize| (cells.max(1) as f64 - 1.0) / 2.0;
    let (cx, cy, cz) = (
        center(options.width),
        center(options.height),
        center(options.depth),
    );
    let s = options.spacing;

    (0..count)
        .map(|i| {
            let (ix, iy, iz) = options.cell(i);
            LayoutTarget::unrotated(Point3::new(
                (ix as f64 - cx) * s,
                (cy - iy as f64) * s,
                (iz as f64 - cz) * s,
            ))
        })
        .collect()
}
