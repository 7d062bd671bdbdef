//! Layout strategies and the dispatcher that selects between them.
//!
//! Every strategy maps a record count `N` to exactly `N` [`LayoutTarget`]s.
//! Index `i` of the output belongs to record `i`; use [`RecordOrdering`] to
//! hand targets out by rank instead.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::{Euler3, Point3};

pub mod grid;
pub mod helix;
pub mod ordering;
pub mod sphere;
pub mod table;
pub mod tetrahedron;

pub use grid::{GridOptions, grid_layout};
pub use helix::{HelixOptions, helix_layout};
pub use ordering::RecordOrdering;
pub use sphere::{SphereOptions, sphere_layout};
pub use table::{TableOptions, table_layout};
pub use tetrahedron::{
    TetrahedronDiagnostics, TetrahedronOptions, tetrahedron_layout,
    tetrahedron_layout_with_diagnostics,
};

/// Errors reported by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("record count must be non-negative, got {0}")]
    NegativeCount(i64),
    #[error("unknown layout `{0}`")]
    UnknownLayout(String),
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("invalid record ordering: {0}")]
    InvalidOrdering(String),
    #[error("ordering covers {actual} records but {expected} targets were generated")]
    OrderingLength { expected: usize, actual: usize },
}

impl LayoutError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Desired placement of one record after a layout change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTarget {
    pub position: Point3,
    pub rotation: Euler3,
}

impl LayoutTarget {
    #[must_use]
    pub const fn new(position: Point3, rotation: Euler3) -> Self {
        Self { position, rotation }
    }

    /// Target at `position` facing forward.
    #[must_use]
    pub const fn unrotated(position: Point3) -> Self {
        Self::new(position, Euler3::ZERO)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Per-call state handed to strategies. Only randomized paths use it.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    rng: StdRng,
}

impl LayoutContext {
    /// Context seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Context whose random draws are reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Common contract of all layout strategies.
pub trait Layout {
    /// Exactly `count` targets.
    fn generate(&self, count: usize, ctx: &mut LayoutContext) -> Vec<LayoutTarget>;

    fn validate(&self) -> LayoutResult<()>;
}

/// Available layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Table,
    Sphere,
    Helix,
    Grid,
    Tetrahedron,
}

/// Identifiers accepted for a layout kind. The first name is canonical.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub names: &'static [&'static str],
    pub kind: LayoutKind,
}

pub const REGISTRATIONS: &[Registration] = &[
    Registration {
        names: &["table"],
        kind: LayoutKind::Table,
    },
    Registration {
        names: &["sphere"],
        kind: LayoutKind::Sphere,
    },
    Registration {
        names: &["helix", "double-helix", "doublehelix", "double_helix"],
        kind: LayoutKind::Helix,
    },
    Registration {
        names: &["grid"],
        kind: LayoutKind::Grid,
    },
    Registration {
        names: &["tetrahedron", "tetra"],
        kind: LayoutKind::Tetrahedron,
    },
];

impl LayoutKind {
    pub const ALL: [Self; 5] = [
        Self::Table,
        Self::Sphere,
        Self::Helix,
        Self::Grid,
        Self::Tetrahedron,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Sphere => "sphere",
            Self::Helix => "helix",
            Self::Grid => "grid",
            Self::Tetrahedron => "tetrahedron",
        }
    }

    /// Whether two calls with the same count always agree bit for bit.
    #[must_use]
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Self::Tetrahedron)
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        REGISTRATIONS
            .iter()
            .find(|registration| registration.names.contains(&key.as_str()))
            .map(|registration| registration.kind)
            .ok_or_else(|| LayoutError::UnknownLayout(s.to_owned()))
    }
}

/// Options for every strategy. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub table: TableOptions,
    pub sphere: SphereOptions,
    pub helix: HelixOptions,
    pub grid: GridOptions,
    pub tetrahedron: TetrahedronOptions,
}

impl LayoutConfig {
    /// Strategy configured for `kind`.
    #[must_use]
    pub fn strategy(&self, kind: LayoutKind) -> &dyn Layout {
        match kind {
            LayoutKind::Table => &self.table,
            LayoutKind::Sphere => &self.sphere,
            LayoutKind::Helix => &self.helix,
            LayoutKind::Grid => &self.grid,
            LayoutKind::Tetrahedron => &self.tetrahedron,
        }
    }

    pub fn validate(&self) -> LayoutResult<()> {
        LayoutKind::ALL
            .iter()
            .try_for_each(|kind| self.strategy(*kind).validate())
    }
}

/// Reject negative counts coming from loosely typed callers.
pub fn validate_count(count: i64) -> LayoutResult<usize> {
    usize::try_from(count).map_err(|_| LayoutError::NegativeCount(count))
}

/// Run the strategy for `kind` with the options in `config`.
pub fn generate_layout(
    kind: LayoutKind,
    count: usize,
    config: &LayoutConfig,
    ctx: &mut LayoutContext,
) -> LayoutResult<Vec<LayoutTarget>> {
    let strategy = config.strategy(kind);
    strategy.validate()?;
    let targets = strategy.generate(count, ctx);
    debug_assert_eq!(targets.len(), count, "{kind} produced a wrong target count");
    log::debug!("{kind}: generated {} targets for {count} records", targets.len());
    Ok(targets)
}

/// Resolve a layout identifier and count, then generate its targets.
pub fn layout_targets(
    layout: &str,
    count: i64,
    config: &LayoutConfig,
    ctx: &mut LayoutContext,
) -> LayoutResult<Vec<LayoutTarget>> {
    let kind = layout.parse::<LayoutKind>()?;
    let count = validate_count(count)?;
    generate_layout(kind, count, config, ctx)
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::config(field, format!("expected a positive finite number, got {value}")))
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> LayoutResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::config(field, format!("expected a finite number, got {value}")))
    }
}

pub(crate) fn ensure_nonzero(field: &'static str, value: usize) -> LayoutResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(LayoutError::config(field, "must be at least 1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names_and_aliases() {
        for kind in LayoutKind::ALL {
            assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
        }
        assert_eq!("Double-Helix".parse::<LayoutKind>(), Ok(LayoutKind::Helix));
        assert_eq!(" TETRA ".parse::<LayoutKind>(), Ok(LayoutKind::Tetrahedron));
    }

    #[test]
    fn unknown_layout_fails_fast() {
        let err = "spiral".parse::<LayoutKind>().unwrap_err();
        assert_eq!(err, LayoutError::UnknownLayout("spiral".to_owned()));
        assert_eq!(err.to_string(), "unknown layout `spiral`");
    }

    #[test]
    fn negative_count_is_rejected() {
        assert_eq!(validate_count(-1), Err(LayoutError::NegativeCount(-1)));
        assert_eq!(validate_count(0), Ok(0));
        assert_eq!(validate_count(37), Ok(37));

        let mut ctx = LayoutContext::seeded(0);
        let err = layout_targets("sphere", -5, &LayoutConfig::default(), &mut ctx).unwrap_err();
        assert_eq!(err, LayoutError::NegativeCount(-5));
    }

    #[test]
    fn dispatch_matches_direct_strategy_calls() {
        let config = LayoutConfig::default();
        let mut ctx = LayoutContext::seeded(0);
        assert_eq!(
            generate_layout(LayoutKind::Table, 30, &config, &mut ctx).unwrap(),
            table_layout(30, &config.table)
        );
        assert_eq!(
            generate_layout(LayoutKind::Grid, 30, &config, &mut ctx).unwrap(),
            grid_layout(30, &config.grid)
        );
        assert_eq!(
            generate_layout(LayoutKind::Sphere, 30, &config, &mut ctx).unwrap(),
            sphere_layout(30, &config.sphere)
        );
        assert_eq!(
            generate_layout(LayoutKind::Helix, 30, &config, &mut ctx).unwrap(),
            helix_layout(30, &config.helix)
        );
    }

    #[test]
    fn invalid_options_are_reported_before_generating() {
        let mut config = LayoutConfig::default();
        config.grid.width = 0;
        assert!(config.validate().is_err());

        let mut ctx = LayoutContext::seeded(0);
        let err = generate_layout(LayoutKind::Grid, 4, &config, &mut ctx).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig { field: "grid.width", .. }));

        // Other layouts are unaffected.
        assert!(generate_layout(LayoutKind::Table, 4, &config, &mut ctx).is_ok());
    }

    #[test]
    fn only_tetrahedron_is_nondeterministic() {
        let nondeterministic: Vec<_> = LayoutKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_deterministic())
            .collect();
        assert_eq!(nondeterministic, vec![LayoutKind::Tetrahedron]);
    }

    #[test]
    fn partial_config_overrides_only_given_fields() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{
                "tetrahedron": { "faceResolution": 3 },
                "table": { "rows": 10 },
                "helix": { "heightStep": 7, "angleStep": 0.5 },
                "grid": { "width": 2 }
            }"#,
        )
        .unwrap();
        let defaults = LayoutConfig::default();

        assert_eq!(config.tetrahedron.face_resolution, Some(3));
        assert_eq!(config.tetrahedron.base_radius, defaults.tetrahedron.base_radius);
        assert_eq!(config.tetrahedron.jitter, defaults.tetrahedron.jitter);
        assert_eq!(config.table.rows, Some(10));
        assert_eq!(config.table.columns, defaults.table.columns);
        assert_eq!(config.table.spacing, defaults.table.spacing);
        assert_eq!(config.helix.height_step, 7.0);
        assert_eq!(config.helix.angle_step, 0.5);
        assert_eq!(config.helix.radius, defaults.helix.radius);
        assert_eq!(config.grid.width, 2);
        assert_eq!(config.grid.height, defaults.grid.height);
        assert_eq!(config.sphere, defaults.sphere);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_config_is_the_default() {
        let config: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());

        let round_trip: LayoutConfig =
            serde_json::from_value(serde_json::to_value(config).unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }
}
