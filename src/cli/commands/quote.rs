//! `fitq quote` command - Quotation management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_short_id, load_config, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::quotation;
use crate::entities::area::Area;
use crate::entities::product::Product;
use crate::entities::quote::Quotation;

#[derive(clap::Subcommand, Debug)]
pub enum QuoteCommands {
    /// Open the project's draft quotation, creating it if absent
    Draft(DraftArgs),

    /// List quotations for a project
    List(ListArgs),

    /// Show a quotation with its items grouped by area
    Show(ShowArgs),

    /// Reprice every item from the current catalog and refresh the total
    Recalc(RecalcArgs),

    /// Submit a draft quotation (freezes it against edits)
    Submit(SubmitArgs),
}

#[derive(clap::Args, Debug)]
pub struct DraftArgs {
    /// Project ID (full or partial) - REQUIRED
    #[arg(long, short = 'p')]
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project ID (full or partial) - REQUIRED
    #[arg(long, short = 'p')]
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Quotation ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct RecalcArgs {
    /// Quotation ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Quotation ID (full or partial)
    pub id: String,
}

pub fn run(cmd: QuoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        QuoteCommands::Draft(args) => run_draft(args, global),
        QuoteCommands::List(args) => run_list(args, global),
        QuoteCommands::Show(args) => run_show(args, global),
        QuoteCommands::Recalc(args) => run_recalc(args, global),
        QuoteCommands::Submit(args) => run_submit(args, global),
    }
}

fn run_draft(args: DraftArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let config = load_config(&ws);
    let project_id = ws
        .resolve(EntityPrefix::Prj, &args.project)
        .map_err(|e| miette::miette!("{}", e))?;

    let quote = quotation::load_or_create_draft(&ws, &project_id, &config.currency())
        .map_err(|e| miette::miette!("{}", e))?;

    // auto means the human confirmation line here, not a YAML dump
    match global.format {
        OutputFormat::Id => println!("{}", quote.id),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&quote).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&quote).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} Draft v{} for project {} ({})",
                style("✓").green(),
                quote.version_no,
                format_short_id(&quote.project),
                quote.id
            );
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let project_id = ws
        .resolve(EntityPrefix::Prj, &args.project)
        .map_err(|e| miette::miette!("{}", e))?;
    let quotes =
        quotation::list_by_project(&ws, &project_id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&quotes).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&quotes).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for quote in &quotes {
                println!("{}", quote.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:>4} {:<11} {:>14} {:<5}",
                style("ID").bold(),
                style("VER").bold(),
                style("STATUS").bold(),
                style("TOTAL").bold(),
                style("CCY").bold()
            );
            for quote in &quotes {
                println!(
                    "{:<17} {:>4} {:<11} {:>14.2} {:<5}",
                    format_short_id(&quote.id),
                    quote.version_no,
                    quote.status,
                    quote.total_price,
                    quote.currency
                );
            }
            if !global.quiet {
                eprintln!("{} quotation(s)", quotes.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Quot, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let quote: Quotation = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;
    let items = quotation::list_items(&ws, &quote.id).map_err(|e| miette::miette!("{}", e))?;

    // auto means the grouped human view here, not a YAML dump
    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&quote).into_diagnostic()?
            );
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&quote).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Id => {
            println!("{}", quote.id);
            return Ok(());
        }
        _ => {}
    }

    println!(
        "{} v{} [{}] project {}",
        style(format_short_id(&quote.id)).cyan().bold(),
        quote.version_no,
        style(quote.status).bold(),
        format_short_id(&quote.project)
    );

    for (area_id, group) in quotation::group_by_area(&items) {
        let area_name = ws
            .load::<Area>(&area_id)
            .map(|a| a.name)
            .unwrap_or_else(|_| format_short_id(&area_id));
        println!("\n{}", style(&area_name).bold());

        for item in group {
            let product_name = ws
                .load::<Product>(&item.product)
                .map(|p| p.name)
                .unwrap_or_else(|_| format_short_id(&item.product));
            println!(
                "  {} {:<25} x{:<3} {:>12.2}",
                format_short_id(&item.id),
                truncate_str(&product_name, 25),
                item.quantity,
                item.computed_price
            );
        }
    }

    println!(
        "\n{} {:.2} {}",
        style("Total:").bold(),
        quote.total_price,
        quote.currency
    );
    Ok(())
}

fn run_recalc(args: RecalcArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Quot, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let report = quotation::recalc(&ws, &id).map_err(|e| miette::miette!("{}", e))?;

    for (item_id, message) in &report.errors {
        eprintln!(
            "{} {}: {}",
            style("!").yellow(),
            format_short_id(item_id),
            message
        );
    }
    if !global.quiet {
        println!(
            "{} Recalculated {}: total {:.2}",
            style("✓").green(),
            format_short_id(&id),
            report.total_price
        );
    }
    Ok(())
}

fn run_submit(args: SubmitArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Quot, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let quote = quotation::submit(&ws, &id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Submitted quotation {} (v{}, total {:.2} {})",
            style("✓").green(),
            format_short_id(&quote.id),
            quote.version_no,
            quote.total_price,
            quote.currency
        );
    }
    Ok(())
}
