//! Rendering of command results for the terminal.

use std::fmt;

use serde_json::{json, Value};

use bronepehota_core::{CombatResult, EditionInfo, RollOutcome};

/// What a command produced
#[derive(Debug)]
pub enum Output {
    Editions(Vec<&'static EditionInfo>),
    Roll {
        notation: String,
        outcome: RollOutcome,
    },
    Combat(CombatResult),
}

impl Output {
    pub fn to_json(&self) -> Value {
        match self {
            Output::Editions(infos) => json!(infos),
            Output::Roll { notation, outcome } => json!({
                "notation": notation,
                "total": outcome.total,
                "rolls": outcome.rolls,
            }),
            Output::Combat(result) => {
                let mut value = json!(result);
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("summary".into(), Value::String(result.summary().to_string()));
                }
                value
            }
        }
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Editions(infos) => {
                for info in infos {
                    writeln!(f, "{:<10} {} ({})", info.id, info.name, info.source)?;
                    writeln!(f, "           {}", info.description)?;
                }
                Ok(())
            }
            Output::Roll { notation, outcome } => {
                writeln!(f, "{notation}: {} [{}]", outcome.total, join(&outcome.rolls))
            }
            Output::Combat(result) => {
                if let Some(hit) = &result.hit {
                    if hit.is_grenade {
                        writeln!(f, "scatter: {}", hit.roll)?;
                    } else {
                        writeln!(f, "hit roll: {} (total {})", hit.roll, hit.total)?;
                    }
                }
                if let Some(damage) = &result.damage {
                    if !damage.rolls.is_empty() {
                        writeln!(f, "power rolls: [{}]", join(&damage.rolls))?;
                    }
                    if let Some(special) = &damage.special {
                        writeln!(f, "special: {}", special.description)?;
                    }
                }
                if let Some(melee) = &result.melee {
                    writeln!(
                        f,
                        "melee: {} vs {}",
                        melee.attacker_total, melee.defender_total
                    )?;
                }
                writeln!(f, "{}", result.summary())
            }
        }
    }
}
