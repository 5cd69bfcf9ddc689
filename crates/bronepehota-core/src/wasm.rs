//! WebAssembly bindings for the Bronepehota rules engine.
//!
//! This module exposes the engine to JavaScript through wasm-bindgen.
//! Structured values cross the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use rand::rngs::StdRng;
#[cfg(feature = "wasm")]
use rand::SeedableRng;

#[cfg(feature = "wasm")]
use crate::combat::{self, CombatParameters, Weapon};
#[cfg(feature = "wasm")]
use crate::registry;
#[cfg(feature = "wasm")]
use crate::rules::RulesEdition;
#[cfg(feature = "wasm")]
use crate::types::{Fortification, Target, VehicleTarget, WeaponSpecial};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn from_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}

#[cfg(feature = "wasm")]
fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(feature = "wasm")]
fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse dice notation, returns `{count, sides, bonus}` JSON
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = parseNotation)]
pub fn parse_notation(notation: &str) -> String {
    to_json(&crate::dice::parse(notation))
}

/// Identifier of the default edition
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = getDefaultEdition)]
pub fn get_default_edition() -> String {
    registry::default_edition().to_string()
}

#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = isValidEdition)]
pub fn is_valid_edition(id: &str) -> bool {
    registry::is_valid(id)
}

/// Metadata of every edition as a JSON array
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = listEditions)]
pub fn list_editions() -> String {
    let infos: Vec<_> = registry::list_all().iter().map(|e| e.info()).collect();
    to_json(&infos)
}

/// Check combat parameters for an action named "shot", "melee" or "grenade".
/// Throws with every violation listed.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = validateParameters)]
pub fn validate_parameters(
    action: &str,
    params_json: &str,
    grenades_available: bool,
) -> Result<(), JsValue> {
    let params: CombatParameters = from_json(params_json, "parameters")?;
    validate_action(action, &params, grenades_available).map_err(js_error)
}

#[cfg(feature = "wasm")]
fn validate_action(
    action: &str,
    params: &CombatParameters,
    grenades_available: bool,
) -> Result<(), crate::error::RulesError> {
    combat::validate_parameters(action.parse()?, params, grenades_available)
}

/// WASM-exposed rules wrapper bound to one edition
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmRules {
    edition: &'static dyn RulesEdition,
    rng: StdRng,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmRules {
    /// Select an edition by identifier ("tehnolog" or "fan")
    #[wasm_bindgen(constructor)]
    pub fn new(edition_id: &str) -> Result<WasmRules, JsValue> {
        Ok(WasmRules {
            edition: registry::lookup(edition_id).map_err(js_error)?,
            rng: StdRng::from_entropy(),
        })
    }

    /// Same as the constructor, with deterministic dice
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(edition_id: &str, seed: u64) -> Result<WasmRules, JsValue> {
        Ok(WasmRules {
            edition: registry::lookup(edition_id).map_err(js_error)?,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Get the edition's metadata as JSON
    #[wasm_bindgen(js_name = getEdition)]
    pub fn get_edition(&self) -> String {
        to_json(self.edition.info())
    }

    /// Evaluate notation, returns `{total, rolls}` JSON
    #[wasm_bindgen(js_name = roll)]
    pub fn roll(&mut self, notation: &str) -> String {
        to_json(&crate::dice::roll(notation, &mut self.rng))
    }

    #[wasm_bindgen(js_name = rollDie)]
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        crate::dice::roll_die(sides, &mut self.rng)
    }

    /// Range check, returns HitResult JSON
    #[wasm_bindgen(js_name = calculateHit)]
    pub fn calculate_hit(
        &mut self,
        range: &str,
        distance: i32,
        fortification: &str,
    ) -> Result<String, JsValue> {
        let fortification: Fortification = fortification.parse().map_err(js_error)?;
        let hit = self
            .edition
            .calculate_hit(range, distance, fortification, &mut self.rng);
        Ok(to_json(&hit))
    }

    /// Power roll against a Target JSON, with optional special JSON
    /// (a string or a `{type: ...}` object). Returns DamageResult JSON.
    #[wasm_bindgen(js_name = calculateDamage)]
    pub fn calculate_damage(
        &mut self,
        power: &str,
        target_json: &str,
        special_json: Option<String>,
    ) -> Result<String, JsValue> {
        let target: Target = from_json(target_json, "target")?;
        let special: Option<WeaponSpecial> = special_json
            .as_deref()
            .map(|json| from_json(json, "special"))
            .transpose()?;
        let damage =
            self.edition
                .calculate_damage(power, &target, special.as_ref(), &mut self.rng);
        Ok(to_json(&damage))
    }

    /// Opposed melee rolls, returns MeleeResult JSON
    #[wasm_bindgen(js_name = calculateMelee)]
    pub fn calculate_melee(&mut self, attacker_melee: i32, defender_melee: i32) -> String {
        to_json(
            &self
                .edition
                .calculate_melee(attacker_melee, defender_melee, &mut self.rng),
        )
    }

    /// Validate and resolve a shot, returns CombatResult JSON plus `summary`
    #[wasm_bindgen(js_name = resolveShot)]
    pub fn resolve_shot(
        &mut self,
        weapon_json: &str,
        params_json: &str,
        vehicle_json: Option<String>,
    ) -> Result<String, JsValue> {
        let weapon: Weapon = from_json(weapon_json, "weapon")?;
        let params: CombatParameters = from_json(params_json, "parameters")?;
        let vehicle: Option<VehicleTarget> = vehicle_json
            .as_deref()
            .map(|json| from_json(json, "vehicle"))
            .transpose()?;
        combat::validate_parameters(combat::CombatAction::Shot, &params, true)
            .map_err(js_error)?;

        let result = combat::resolve_shot(
            self.edition,
            &weapon,
            &params,
            vehicle.as_ref(),
            &mut self.rng,
        );
        Ok(with_summary(&result))
    }

    /// Validate and resolve a grenade throw
    #[wasm_bindgen(js_name = resolveGrenade)]
    pub fn resolve_grenade(
        &mut self,
        params_json: &str,
        grenades_available: bool,
    ) -> Result<String, JsValue> {
        let params: CombatParameters = from_json(params_json, "parameters")?;
        combat::validate_parameters(combat::CombatAction::Grenade, &params, grenades_available)
            .map_err(js_error)?;
        let result = combat::resolve_grenade(self.edition, &params, &mut self.rng);
        Ok(with_summary(&result))
    }

    /// Validate and resolve a melee exchange
    #[wasm_bindgen(js_name = resolveMelee)]
    pub fn resolve_melee(
        &mut self,
        attacker_melee: i32,
        params_json: &str,
    ) -> Result<String, JsValue> {
        let params: CombatParameters = from_json(params_json, "parameters")?;
        combat::validate_parameters(combat::CombatAction::Melee, &params, false)
            .map_err(js_error)?;
        let result = combat::resolve_melee(self.edition, attacker_melee, &params, &mut self.rng);
        Ok(with_summary(&result))
    }
}

#[cfg(feature = "wasm")]
fn with_summary(result: &combat::CombatResult) -> String {
    let mut json = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
    if let Some(obj) = json.as_object_mut() {
        obj.insert(
            "summary".to_string(),
            serde_json::Value::String(result.summary().to_string()),
        );
    }
    json.to_string()
}
