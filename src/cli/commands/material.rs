//! `fitq material` command - Sheet material estimation

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, open_workspace};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::material;

#[derive(clap::Subcommand, Debug)]
pub enum MaterialCommands {
    /// Estimate sheets and wastage for a quotation's cutlist
    Summary(SummaryArgs),
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Quotation ID (full or partial) - REQUIRED
    #[arg(long, short = 'Q')]
    pub quote: String,
}

pub fn run(cmd: MaterialCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MaterialCommands::Summary(args) => run_summary(args, global),
    }
}

fn run_summary(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let quote_id = ws
        .resolve(EntityPrefix::Quot, &args.quote)
        .map_err(|e| miette::miette!("{}", e))?;
    let panels = ws
        .load_cutlist(&quote_id)
        .map_err(|e| miette::miette!("{}", e))?;

    let summary = material::summarize(quote_id, &panels);

    // auto means the human summary here, not a YAML dump
    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).into_diagnostic()?
            );
        }
        OutputFormat::Yaml | OutputFormat::Id => {
            print!("{}", serde_yml::to_string(&summary).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} Material summary for {}",
                style("✓").green(),
                format_short_id(&summary.quote_id)
            );
            println!(
                "  Part area:  {:.0} mm² ({:.2} m²)",
                summary.total_part_area_mm2,
                summary.total_part_area_mm2 / 1_000_000.0
            );
            println!(
                "  Sheet size: {:.0} x {:.0} mm ({:.0} mm²)",
                material::SHEET_HEIGHT_MM,
                material::SHEET_WIDTH_MM,
                summary.sheet_area_mm2
            );
            println!("  Sheets:     {}", summary.sheet_count);
            println!("  Wastage:    {:.2}%", summary.wastage_percent);
        }
    }
    Ok(())
}
