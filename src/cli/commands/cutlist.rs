//! `fitq cutlist` command - Cutlist generation and inspection

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_short_id, open_workspace};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::{cutlist, quotation};
use crate::entities::product::Product;
use crate::entities::quote::Quotation;
use crate::entities::template::ProductTemplate;

#[derive(clap::Subcommand, Debug)]
pub enum CutlistCommands {
    /// Expand a quotation's items into panels, replacing any previous
    /// cutlist
    Generate(GenerateArgs),

    /// List the stored cutlist for a quotation
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Quotation ID (full or partial) - REQUIRED
    #[arg(long, short = 'Q')]
    pub quote: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Quotation ID (full or partial) - REQUIRED
    #[arg(long, short = 'Q')]
    pub quote: String,
}

pub fn run(cmd: CutlistCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CutlistCommands::Generate(args) => run_generate(args, global),
        CutlistCommands::List(args) => run_list(args, global),
    }
}

fn run_generate(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let quote_id = ws
        .resolve(EntityPrefix::Quot, &args.quote)
        .map_err(|e| miette::miette!("{}", e))?;
    let quote: Quotation = ws.load(&quote_id).map_err(|e| miette::miette!("{}", e))?;

    let items = quotation::list_items(&ws, &quote.id).map_err(|e| miette::miette!("{}", e))?;
    let products: Vec<Product> = ws
        .load_all(EntityPrefix::Prod)
        .map_err(|e| miette::miette!("{}", e))?;
    let templates: Vec<ProductTemplate> = ws
        .load_all(EntityPrefix::Tmpl)
        .map_err(|e| miette::miette!("{}", e))?;

    let panels = cutlist::generate(&quote, &items, &products, &templates)
        .map_err(|e| miette::miette!("{}", e))?;

    ws.save_cutlist(&quote.id, &panels)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Generated {} panel entries for {}",
            style("✓").green(),
            panels.len(),
            format_short_id(&quote.id)
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let quote_id = ws
        .resolve(EntityPrefix::Quot, &args.quote)
        .map_err(|e| miette::miette!("{}", e))?;
    let panels = ws
        .load_cutlist(&quote_id)
        .map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&panels).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&panels).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for panel in &panels {
                println!("{}", panel.id);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["PART", "W (mm)", "H (mm)", "T (mm)", "QTY", "MATERIAL", "EDGE"]);
            for panel in &panels {
                builder.push_record([
                    panel.part_name.clone(),
                    panel.cut_width.map_or("-".to_string(), |v| format!("{:.0}", v)),
                    panel.cut_height.map_or("-".to_string(), |v| format!("{:.0}", v)),
                    panel.thickness.map_or("-".to_string(), |v| format!("{:.0}", v)),
                    panel.quantity.to_string(),
                    panel.material_type.clone().unwrap_or_else(|| "-".to_string()),
                    panel
                        .edge_banding
                        .map_or("-".to_string(), |e| e.to_string()),
                ]);
            }
            println!("{}", builder.build().with(Style::sharp()));
            if !global.quiet {
                eprintln!("{} panel entr(ies)", panels.len());
            }
        }
    }
    Ok(())
}
