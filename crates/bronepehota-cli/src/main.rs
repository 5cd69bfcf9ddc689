//! Bronepehota combat assistant.
//!
//! Resolves shots, grenade throws and melee exchanges from the command line
//! with either rule edition.

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bronepehota_core::{registry, EditionId};

mod commands;
mod report;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "bronepehota", version, about = "Combat assistant for Bronepehota")]
struct Cli {
    /// Rule edition: tehnolog or fan
    #[arg(long, global = true, env = "BRONEPEHOTA_RULES")]
    rules: Option<EditionId>,

    /// Seed the dice for a reproducible result
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let edition = registry::get(cli.rules.unwrap_or_else(registry::default_edition));
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(edition = %edition.id(), seed = ?cli.seed, "rules selected");

    let output = cli.command.run(edition, &mut rng)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    } else {
        print!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bronepehota_core::Fortification;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bronepehota",
            "melee",
            "--attacker",
            "3",
            "--defender",
            "1",
            "--rules",
            "fan",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.rules, Some(EditionId::Fan));
        assert_eq!(cli.seed, Some(42));
        assert!(!cli.json);
    }

    #[test]
    fn test_unknown_edition_is_rejected() {
        let err = Cli::try_parse_from(["bronepehota", "--rules", "panov", "editions"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_shot_arguments() {
        let cli = Cli::try_parse_from([
            "bronepehota",
            "shot",
            "--range",
            "D6+1",
            "--power",
            "2D12",
            "--distance",
            "5",
            "--armor",
            "2",
            "--cover",
            "bunker",
        ])
        .unwrap();
        match cli.command {
            Command::Shot(shot) => {
                assert_eq!(shot.range, "D6+1");
                assert_eq!(shot.cover, Fortification::Bunker);
                assert_eq!(shot.durability, None);
            }
            other => panic!("expected shot, got {other:?}"),
        }
    }

    #[test]
    fn test_durability_needs_maximum() {
        let err = Cli::try_parse_from([
            "bronepehota",
            "shot",
            "--range",
            "D6",
            "--power",
            "D6",
            "--distance",
            "1",
            "--durability",
            "4",
        ]);
        assert!(err.is_err());
    }
}
