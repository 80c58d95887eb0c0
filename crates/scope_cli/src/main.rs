//! Operator CLI: run one-off emission calculations against a content
//! directory, or validate the content itself.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use scope_core::{
    calculate, ActivityData, ActivityType, FactorSource, FuelId, PurposeCategory, SteamPressure,
    UsageSubmission,
};
use scope_content::load_content;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "scope_cli", about = "GHG scope emissions CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the emissions for one usage submission and print the
    /// calculation as JSON.
    Calculate {
        /// stationary-combustion, mobile-combustion, electricity, steam.
        #[arg(long)]
        activity: String,
        #[arg(long)]
        fuel: String,
        #[arg(long)]
        usage: Decimal,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value_t = 1)]
        month: u32,
        /// energy-industry, manufacturing, commercial, domestic.
        /// Required for stationary combustion.
        #[arg(long)]
        purpose: Option<String>,
        /// high, medium, low. Unrecognized labels fall back to medium.
        #[arg(long)]
        steam_type: Option<String>,
        /// Treat the electricity usage as renewable supply.
        #[arg(long)]
        renewable: bool,
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
    /// Load and validate a content directory.
    Validate {
        #[arg(long, default_value = "./content")]
        content_dir: String,
    },
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn parse_purpose(label: &str) -> Result<PurposeCategory> {
    match label.to_ascii_uppercase().replace('-', "_").as_str() {
        "ENERGY_INDUSTRY" => Ok(PurposeCategory::EnergyIndustry),
        "MANUFACTURING" => Ok(PurposeCategory::Manufacturing),
        "COMMERCIAL" => Ok(PurposeCategory::Commercial),
        "DOMESTIC" => Ok(PurposeCategory::Domestic),
        other => bail!("unknown purpose category: {other}"),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_calculate(
    activity: &str,
    fuel: String,
    usage: Decimal,
    year: i32,
    month: u32,
    purpose: Option<&str>,
    steam_type: Option<&str>,
    renewable: bool,
    content_dir: &str,
) -> Result<()> {
    let content = load_content(content_dir).context("loading factor content")?;

    let activity_type: ActivityType = activity
        .parse()
        .map_err(|err: String| anyhow::anyhow!(err))?;
    let activity = match activity_type {
        ActivityType::StationaryCombustion => {
            let purpose = purpose.context("--purpose is required for stationary combustion")?;
            ActivityData::StationaryCombustion {
                purpose: parse_purpose(purpose)?,
                combustion_type: None,
            }
        }
        ActivityType::MobileCombustion => ActivityData::MobileCombustion {
            vehicle_type: None,
            distance: None,
        },
        ActivityType::Electricity => ActivityData::Electricity {
            renewable,
            renewable_type: None,
        },
        ActivityType::Steam => ActivityData::Steam {
            pressure: steam_type.and_then(SteamPressure::from_label),
        },
    };

    let submission = UsageSubmission {
        fuel_id: FuelId(fuel),
        usage,
        usage_unit: None,
        reporting_year: year,
        reporting_month: month,
        activity,
    };
    let calculation = calculate(&content.table, &content.constants, &submission)?;

    if calculation.factor_source == FactorSource::DefaultedFallback {
        eprintln!(
            "warning: no curated factor row for '{}' at {year}; default factors applied",
            submission.fuel_id
        );
    }
    if calculation.degraded {
        eprintln!("warning: calculation degraded to zero outputs");
    }

    println!("{}", serde_json::to_string_pretty(&calculation)?);
    Ok(())
}

fn run_validate(content_dir: &str) -> Result<()> {
    let content = load_content(content_dir).context("loading factor content")?;
    scope_content::validate_content(&content);
    println!(
        "content '{}' OK: {} factor rows",
        content.content_version,
        content.table.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Calculate {
            activity,
            fuel,
            usage,
            year,
            month,
            purpose,
            steam_type,
            renewable,
            content_dir,
        } => run_calculate(
            &activity,
            fuel,
            usage,
            year,
            month,
            purpose.as_deref(),
            steam_type.as_deref(),
            renewable,
            &content_dir,
        ),
        Commands::Validate { content_dir } => run_validate(&content_dir),
    }
}
