//! Subcommands and their arguments.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::debug;

use bronepehota_core::{
    combat, dice, registry, validate_parameters, CombatAction, CombatParameters, DiceSource,
    Fortification, RulesEdition, VehicleTarget, Weapon,
};

use crate::report::Output;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available rule editions
    Editions,

    /// Roll dice notation such as 2D12+2
    Roll(RollArgs),

    /// Fire a weapon at a target
    Shot(ShotArgs),

    /// Throw a grenade (1D20 power, always lands)
    Grenade(GrenadeArgs),

    /// Resolve a melee exchange
    Melee(MeleeArgs),
}

#[derive(Args, Debug)]
pub struct RollArgs {
    pub notation: String,
}

#[derive(Args, Debug)]
pub struct ShotArgs {
    /// Weapon name shown in logs
    #[arg(long, default_value = "weapon")]
    pub name: String,

    /// Range notation, or ББ for melee weapons
    #[arg(long)]
    pub range: String,

    /// Power notation
    #[arg(long)]
    pub power: String,

    /// Special rule text, e.g. "Взрыв 2ш - 1D20"
    #[arg(long)]
    pub special: Option<String>,

    /// Distance to the target in steps
    #[arg(long)]
    pub distance: i32,

    #[arg(long, default_value_t = 0)]
    pub armor: i32,

    /// none, light, bunker or heavy
    #[arg(long, default_value = "none")]
    pub cover: Fortification,

    /// Current durability; makes the target a vehicle
    #[arg(long, requires = "durability_max")]
    pub durability: Option<i32>,

    #[arg(long, requires = "durability")]
    pub durability_max: Option<i32>,
}

#[derive(Args, Debug)]
pub struct GrenadeArgs {
    #[arg(long)]
    pub distance: i32,

    #[arg(long, default_value_t = 0)]
    pub armor: i32,

    #[arg(long, default_value = "none")]
    pub cover: Fortification,

    /// The squad has already thrown its grenades
    #[arg(long)]
    pub spent: bool,
}

#[derive(Args, Debug)]
pub struct MeleeArgs {
    /// Attacker's melee stat
    #[arg(long)]
    pub attacker: i32,

    /// Defender's melee stat
    #[arg(long)]
    pub defender: i32,
}

impl Command {
    pub fn run(self, edition: &'static dyn RulesEdition, dice: &mut dyn DiceSource) -> Result<Output> {
        match self {
            Command::Editions => Ok(Output::Editions(
                registry::list_all().iter().map(|e| e.info()).collect(),
            )),
            Command::Roll(args) => {
                let outcome = dice::roll(&args.notation, dice);
                Ok(Output::Roll {
                    notation: args.notation,
                    outcome,
                })
            }
            Command::Shot(args) => args.run(edition, dice),
            Command::Grenade(args) => args.run(edition, dice),
            Command::Melee(args) => args.run(edition, dice),
        }
    }
}

impl ShotArgs {
    fn run(self, edition: &dyn RulesEdition, dice: &mut dyn DiceSource) -> Result<Output> {
        let params = CombatParameters {
            distance: self.distance,
            target_armor: self.armor,
            target_melee: 0,
            fortification: self.cover,
        };
        validate_parameters(CombatAction::Shot, &params, true)?;

        let vehicle = match (self.durability, self.durability_max) {
            (Some(current), Some(max)) => Some(VehicleTarget::new(current, max)),
            _ => None,
        };
        let mut weapon = Weapon::new(self.name, self.range, self.power);
        if let Some(special) = self.special {
            weapon = weapon.with_special(special.as_str());
        }
        debug!(?weapon, ?vehicle, "firing");

        Ok(Output::Combat(combat::resolve_shot(
            edition,
            &weapon,
            &params,
            vehicle.as_ref(),
            dice,
        )))
    }
}

impl GrenadeArgs {
    fn run(self, edition: &dyn RulesEdition, dice: &mut dyn DiceSource) -> Result<Output> {
        let params = CombatParameters {
            distance: self.distance,
            target_armor: self.armor,
            target_melee: 0,
            fortification: self.cover,
        };
        validate_parameters(CombatAction::Grenade, &params, !self.spent)?;
        Ok(Output::Combat(combat::resolve_grenade(edition, &params, dice)))
    }
}

impl MeleeArgs {
    fn run(self, edition: &dyn RulesEdition, dice: &mut dyn DiceSource) -> Result<Output> {
        let params = CombatParameters {
            distance: 1,
            target_armor: 0,
            target_melee: self.defender,
            fortification: Fortification::None,
        };
        validate_parameters(CombatAction::Melee, &params, false)?;
        Ok(Output::Combat(combat::resolve_melee(
            edition,
            self.attacker,
            &params,
            dice,
        )))
    }
}
