//! Browser host
//!
//! `WindshieldSim` is the JS-facing handle. The page drives it from its
//! `requestAnimationFrame` loop: call `tick(performance.now())` and draw the
//! returned snapshot JSON onto its own canvas.

use std::sync::Once;

use wasm_bindgen::prelude::*;

use crate::settings::{QualityPreset, Settings};
use crate::sim::{Action, Simulation};

static INIT: Once = Once::new();

/// Panic hook and console logger, installed once per page
fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already installed".into());
        }
    });
}

/// Current `performance.now()` (ms), falling back to `Date.now()`
#[wasm_bindgen]
pub fn now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

#[wasm_bindgen]
pub struct WindshieldSim {
    sim: Simulation,
}

#[wasm_bindgen]
impl WindshieldSim {
    /// Mount on a `width` x `height` surface (CSS px).
    ///
    /// `settings_json` overrides the stored settings when given and valid.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, settings_json: Option<String>) -> WindshieldSim {
        init_logging();

        let settings = match settings_json.as_deref().map(Settings::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Bad settings JSON, using stored settings: {}", e);
                Settings::load()
            }
            None => Settings::load(),
        };

        log::info!(
            "Windshield mounted at {}x{} (stress {:.2}, {} quality)",
            width,
            height,
            settings.stress,
            settings.quality.as_str()
        );

        WindshieldSim {
            sim: Simulation::new(width, height, settings),
        }
    }

    /// Advance to `now` (ms) and return the frame snapshot as JSON
    pub fn tick(&mut self, now: f64) -> String {
        self.sim.tick(now);
        self.snapshot()
    }

    /// Snapshot JSON without advancing
    pub fn snapshot(&self) -> String {
        match self.sim.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                "{}".to_string()
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.sim.resize(width, height);
    }

    #[wasm_bindgen(js_name = pointerImpactAt)]
    pub fn pointer_impact_at(&mut self, x: f32, y: f32) -> bool {
        self.sim.pointer_impact_at(x, y)
    }

    #[wasm_bindgen(js_name = throwRockAt)]
    pub fn throw_rock_at(&mut self, x: f32, y: f32) -> bool {
        self.sim.throw_rock_at(x, y)
    }

    #[wasm_bindgen(js_name = toggleRoadShock)]
    pub fn toggle_road_shock(&mut self) -> bool {
        self.sim.toggle_road_shock()
    }

    #[wasm_bindgen(js_name = toggleTempSwing)]
    pub fn toggle_temp_swing(&mut self) -> bool {
        self.sim.toggle_temp_swing()
    }

    #[wasm_bindgen(js_name = triggerDoorSlam)]
    pub fn trigger_door_slam(&mut self) {
        self.sim.trigger_door_slam();
    }

    pub fn repair(&mut self) {
        self.sim.repair();
    }

    pub fn ignite(&mut self) -> bool {
        self.sim.ignite()
    }

    #[wasm_bindgen(js_name = setRunning)]
    pub fn set_running(&mut self, running: bool) {
        self.sim.set_running(running);
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    /// Move the stress slider and persist it
    #[wasm_bindgen(js_name = setStress)]
    pub fn set_stress(&mut self, stress: f32) {
        self.sim.set_stress(stress);
        self.sim.settings().save();
    }

    /// Dispatch an action given as JSON, e.g. `{"type":"ignite"}`
    #[wasm_bindgen(js_name = applyJson)]
    pub fn apply_json(&mut self, json: &str) -> Result<(), JsValue> {
        let action: Action =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.sim.apply(action);
        Ok(())
    }

    /// Replace all settings from JSON and persist them
    #[wasm_bindgen(js_name = setSettingsJson)]
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.sim.set_settings(settings);
        Ok(())
    }

    /// Switch quality preset ("low", "medium", "high") and persist it
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, preset: &str) -> bool {
        let Some(preset) = QualityPreset::parse(preset) else {
            log::warn!("Unknown quality preset: {}", preset);
            return false;
        };
        self.sim.set_quality(preset);
        self.sim.settings().save();
        true
    }

    #[wasm_bindgen(js_name = settingsJson)]
    pub fn settings_json(&self) -> String {
        self.sim.settings().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    pub fn impacts(&self) -> u32 {
        self.sim.state().impact_count
    }

    #[wasm_bindgen(js_name = maxImpacts)]
    pub fn max_impacts(&self) -> u32 {
        crate::consts::MAX_IMPACTS
    }

    #[wasm_bindgen(js_name = isIgnited)]
    pub fn is_ignited(&self) -> bool {
        self.sim.state().ignited
    }
}
