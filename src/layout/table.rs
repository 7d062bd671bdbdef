//! Planar table: the default layout, a single sheet of rows and columns.

use serde::{Deserialize, Serialize};

use crate::geom::Point3;

use super::{Layout, LayoutContext, LayoutResult, LayoutTarget, ensure_nonzero, ensure_positive};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    pub columns: usize,
    /// Fixed row count used for vertical centering. `None` derives it from
    /// the record count.
    pub rows: Option<usize>,
    pub spacing: f64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: None,
            spacing: 200.0,
        }
    }
}

impl Layout for TableOptions {
    fn generate(&self, count: usize, _ctx: &mut LayoutContext) -> Vec<LayoutTarget> {
        table_layout(count, self)
    }

    fn validate(&self) -> LayoutResult<()> {
        ensure_nonzero("table.columns", self.columns)?;
        if let Some(rows) = self.rows {
            ensure_nonzero("table.rows", rows)?;
        }
        ensure_positive("table.spacing", self.spacing)
    }
}

/// Row-major sheet in the `z = 0` plane, centered on the origin.
#[must_use]
pub fn table_layout(count: usize, options: &TableOptions) -> Vec<LayoutTarget> {
    let columns = options.columns.max(1);
    let rows = options.rows.unwrap_or_else(|| count.div_ceil(columns));
    let x_center = (columns as f64 - 1.0) / 2.0;
    let y_center = (rows as f64 - 1.0) / 2.0;

    (0..count)
        .map(|i| {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            LayoutTarget::unrotated(Point3::new(
                (col - x_center) * options.spacing,
                (y_center - row) * options.spacing,
                0.0,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Euler3;

    #[test]
    fn three_records_form_one_row() {
        let targets = table_layout(3, &TableOptions::default());
        assert_eq!(targets.len(), 3);
        for target in &targets {
            assert_eq!(target.position.z, 0.0);
            assert_eq!(target.position.y, 0.0);
            assert_eq!(target.rotation, Euler3::ZERO);
        }
        assert!(targets[0].position.x < targets[1].position.x);
        assert!(targets[1].position.x < targets[2].position.x);
    }

    #[test]
    fn twenty_first_record_wraps_to_second_row() {
        let options = TableOptions::default();
        let targets = table_layout(21, &options);

        // Two rows, centered: row 0 at +S/2, row 1 at -S/2.
        let first = targets[0].position;
        let wrapped = targets[20].position;
        assert_eq!(first.x, -9.5 * options.spacing);
        assert_eq!(first.y, 0.5 * options.spacing);
        assert_eq!(wrapped.x, first.x);
        assert_eq!(wrapped.y, -0.5 * options.spacing);
        assert_eq!(targets[0].rotation, Euler3::ZERO);
        assert_eq!(targets[20].rotation, Euler3::ZERO);
    }

    #[test]
    fn fixed_rows_override_vertical_centering() {
        let options = TableOptions {
            rows: Some(10),
            ..TableOptions::default()
        };
        let targets = table_layout(1, &options);
        assert_eq!(targets[0].position.y, 4.5 * options.spacing);
    }

    #[test]
    fn sheet_is_centered_horizontally() {
        let targets = table_layout(20, &TableOptions::default());
        let sum: f64 = targets.iter().map(|t| t.position.x).sum();
        assert!(sum.abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_degenerate_options() {
        let zero_columns = TableOptions {
            columns: 0,
            ..TableOptions::default()
        };
        assert!(zero_columns.validate().is_err());

        let bad_spacing = TableOptions {
            spacing: f64::NAN,
            ..TableOptions::default()
        };
        assert!(bad_spacing.validate().is_err());
        assert!(TableOptions::default().validate().is_ok());
    }
}
