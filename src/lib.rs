#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub mod geom;
pub mod layout;

use std::fmt;

use layout::{
    LayoutConfig, LayoutContext, LayoutKind, LayoutResult, LayoutTarget, RecordOrdering,
    generate_layout, validate_count,
};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

/// Number of floats per target in [`LayoutEngine::targets_flat`].
pub const FLAT_STRIDE: usize = 6;

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
struct TargetExport {
    position: [f64; 3],
    rotation: [f64; 3],
}

impl From<&LayoutTarget> for TargetExport {
    fn from(target: &LayoutTarget) -> Self {
        Self {
            position: target.position.to_array(),
            rotation: target.rotation.to_array(),
        }
    }
}

/// Public entry point for the presentation layer.
///
/// Targets are recomputed on every call; the engine only keeps its options
/// and the random source used by the tetrahedron layout.
#[wasm_bindgen]
pub struct LayoutEngine {
    config: LayoutConfig,
    context: LayoutContext,
}

#[wasm_bindgen]
impl LayoutEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LayoutEngine {
        LayoutEngine {
            config: LayoutConfig::default(),
            context: LayoutContext::new(),
        }
    }

    /// Engine whose randomized placements repeat for the same seed.
    #[wasm_bindgen]
    pub fn with_seed(seed: u64) -> LayoutEngine {
        LayoutEngine {
            config: LayoutConfig::default(),
            context: LayoutContext::seeded(seed),
        }
    }

    /// Override layout options. Omitted fields keep their defaults.
    #[wasm_bindgen]
    pub fn configure(&mut self, options: JsValue) -> Result<(), JsValue> {
        let config: LayoutConfig = serde_wasm_bindgen::from_value(options).map_err(to_js_error)?;
        self.set_config(config).map_err(to_js_error)
    }

    /// Canonical names of all layouts.
    #[wasm_bindgen]
    pub fn layout_kinds(&self) -> Result<JsValue, JsValue> {
        let names: Vec<&str> = LayoutKind::ALL.iter().map(|kind| kind.as_str()).collect();
        serde_wasm_bindgen::to_value(&names).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Targets as `[{ position: [x, y, z], rotation: [x, y, z] }, ...]`.
    #[wasm_bindgen]
    pub fn targets(&mut self, layout: &str, count: i32) -> Result<JsValue, JsValue> {
        let targets = self.compute(layout, i64::from(count)).map_err(to_js_error)?;
        let export: Vec<TargetExport> = targets.iter().map(TargetExport::from).collect();
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Targets packed as `x, y, z, rx, ry, rz` per record.
    #[wasm_bindgen]
    pub fn targets_flat(&mut self, layout: &str, count: i32) -> Result<Vec<f64>, JsValue> {
        let targets = self.compute(layout, i64::from(count)).map_err(to_js_error)?;
        Ok(flatten_targets(&targets))
    }

    /// Targets for records ranked by descending score: entry `i` belongs to
    /// record `i` and the best score gets the layout's first slot.
    #[wasm_bindgen]
    pub fn ranked_targets(&mut self, layout: &str, scores: Vec<f64>) -> Result<JsValue, JsValue> {
        let targets = self.compute_ranked(layout, &scores).map_err(to_js_error)?;
        let export: Vec<TargetExport> = targets.iter().map(TargetExport::from).collect();
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl LayoutEngine {
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the options after validating every strategy.
    pub fn set_config(&mut self, config: LayoutConfig) -> LayoutResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn compute(&mut self, layout: &str, count: i64) -> LayoutResult<Vec<LayoutTarget>> {
        let kind = layout.parse::<LayoutKind>()?;
        let count = validate_count(count)?;
        generate_layout(kind, count, &self.config, &mut self.context)
    }

    pub fn compute_ranked(
        &mut self,
        layout: &str,
        scores: &[f64],
    ) -> LayoutResult<Vec<LayoutTarget>> {
        let kind = layout.parse::<LayoutKind>()?;
        let targets = generate_layout(kind, scores.len(), &self.config, &mut self.context)?;
        RecordOrdering::by_descending_score(scores).apply(&targets)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack targets as [`FLAT_STRIDE`] floats each.
#[must_use]
pub fn flatten_targets(targets: &[LayoutTarget]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(targets.len() * FLAT_STRIDE);
    for target in targets {
        flat.extend_from_slice(&target.position.to_array());
        flat.extend_from_slice(&target.rotation.to_array());
    }
    flat
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
