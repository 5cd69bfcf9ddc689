//! Bronepehota - rules engine for a dice-based tabletop skirmish game
//!
//! This crate resolves combat actions for Bronepehota armies:
//! - Dice notation parsing and rolling (`2D12+2`, `D6`, the melee sentinel)
//! - Two interchangeable rule editions with hit, damage and melee resolution
//! - A registry for selecting an edition by identifier
//! - Combat flow helpers: parameter validation, shot/grenade/melee, summaries
//!
//! # Architecture
//!
//! The engine is pure and synchronous. The only state it touches is the
//! [`DiceSource`] passed into every call, so results are reproducible with a
//! seeded RNG or [`LoadedDice`]. It can be compiled to:
//! - Native Rust for command-line tools and servers
//! - WebAssembly for the browser front end (feature `wasm`)
//!
//! # Modules
//!
//! - [`dice`]: Notation parser, evaluator and randomness seam
//! - [`types`]: Results, targets, fortification and vehicle zones
//! - [`effects`]: Special weapon rule parsing (fan edition)
//! - [`rules`]: The official and fan editions
//! - [`registry`]: Edition lookup and validation
//! - [`combat`]: Combat actions built on an edition

pub mod combat;
pub mod dice;
pub mod effects;
pub mod error;
pub mod registry;
pub mod rules;
pub mod types;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use combat::{
    resolve_grenade, resolve_melee, resolve_shot, validate_parameters, CombatAction,
    CombatParameters, CombatResult, ParameterError, Summary, Weapon,
};
pub use dice::{roll, roll_die, DiceNotation, DiceSource, DieType, LoadedDice, RollOutcome, MELEE_RANGE};
pub use error::RulesError;
pub use registry::{default_edition, is_valid, list_all};
pub use rules::{EditionId, EditionInfo, Fan, RulesEdition, Tehnolog};
pub use types::{
    DamagePerDie, DamageResult, DurabilityZone, EffectKind, Fortification, HitResult,
    MeleeResult, MeleeWinner, SpecialEffect, SpecialOutcome, Target, VehicleTarget,
    WeaponSpecial, ZoneColor,
};
