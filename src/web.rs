//! Browser bindings
//!
//! A host page owns the frame loop and rendering. It calls `tick` once per
//! animation frame and draws the JSON snapshot it gets back. The best score
//! lives in localStorage.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::sim::Simulation;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Skyshield: logger already initialized".into());
    }
    log::info!("Skyshield wasm module loaded");
}

#[wasm_bindgen]
pub struct WebSimulation {
    inner: Simulation<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebSimulation {
    /// `tuning_json` overrides balance values; omitted fields keep defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: Option<String>) -> Result<WebSimulation, JsError> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json)?,
            None => Tuning::default(),
        };
        Ok(Self {
            inner: Simulation::new(seed, tuning, LocalStorageStore),
        })
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsError> {
        let snapshot = self.inner.tick(now_ms);
        Ok(serde_json::to_string(&snapshot)?)
    }

    pub fn fire(&mut self, x: f32, y: f32) {
        self.inner.fire(Vec2::new(x, y));
    }

    pub fn restart(&mut self) {
        self.inner.restart();
    }

    /// Call when the page is hidden
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn resume(&mut self) {
        self.inner.resume();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.inner.snapshot())?)
    }

    /// Events of the last tick as a JSON array, for sound and effects
    pub fn events(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(self.inner.events())?)
    }
}
