//! `fitq item` command - Quote item management

use std::collections::BTreeMap;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    confirm, format_short_id, open_workspace, parse_param, truncate_str,
};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::quotation::{self, ItemSpec};
use crate::entities::product::Product;
use crate::entities::quote::{QuoteItem, Quotation};

#[derive(clap::Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a draft quotation
    Add(AddArgs),

    /// List items in a quotation
    List(ListArgs),

    /// Show an item's details
    Show(ShowArgs),

    /// Update an item in a draft quotation
    Update(UpdateArgs),

    /// Delete an item from a draft quotation
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Quotation ID (full or partial) - REQUIRED
    #[arg(long, short = 'Q')]
    pub quote: String,

    /// Area ID (full or partial) - REQUIRED
    #[arg(long, short = 'a')]
    pub area: String,

    /// Product ID (full or partial) - REQUIRED
    #[arg(long, short = 'P')]
    pub product: String,

    /// Number of units
    #[arg(long, short = 'n', default_value = "1")]
    pub qty: u32,

    /// Height in mm
    #[arg(long, short = 'H')]
    pub height: Option<f64>,

    /// Width in mm
    #[arg(long, short = 'W')]
    pub width: Option<f64>,

    /// Depth in mm
    #[arg(long, short = 'D')]
    pub depth: Option<f64>,

    /// Template parameter override as KEY=VALUE (repeatable)
    #[arg(long = "param", short = 'p')]
    pub params: Vec<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Quotation ID (full or partial) - REQUIRED
    #[arg(long, short = 'Q')]
    pub quote: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Item ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Item ID (full or partial)
    pub id: String,

    /// New quantity
    #[arg(long, short = 'n')]
    pub qty: Option<u32>,

    /// New height in mm
    #[arg(long, short = 'H')]
    pub height: Option<f64>,

    /// New width in mm
    #[arg(long, short = 'W')]
    pub width: Option<f64>,

    /// New depth in mm
    #[arg(long, short = 'D')]
    pub depth: Option<f64>,

    /// Replacement template parameters as KEY=VALUE (repeatable;
    /// replaces the whole set when given)
    #[arg(long = "param", short = 'p')]
    pub params: Vec<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Item ID (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ItemCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ItemCommands::Add(args) => run_add(args, global),
        ItemCommands::List(args) => run_list(args, global),
        ItemCommands::Show(args) => run_show(args, global),
        ItemCommands::Update(args) => run_update(args, global),
        ItemCommands::Delete(args) => run_delete(args, global),
    }
}

fn collect_params(inputs: &[String]) -> Result<Option<BTreeMap<String, f64>>> {
    if inputs.is_empty() {
        return Ok(None);
    }
    let mut params = BTreeMap::new();
    for input in inputs {
        let (key, value) = parse_param(input)?;
        params.insert(key, value);
    }
    Ok(Some(params))
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let quote_id = ws
        .resolve(EntityPrefix::Quot, &args.quote)
        .map_err(|e| miette::miette!("{}", e))?;
    let area_id = ws
        .resolve(EntityPrefix::Area, &args.area)
        .map_err(|e| miette::miette!("{}", e))?;
    let product_id = ws
        .resolve(EntityPrefix::Prod, &args.product)
        .map_err(|e| miette::miette!("{}", e))?;

    let quote: Quotation = ws.load(&quote_id).map_err(|e| miette::miette!("{}", e))?;
    let product: Product = ws
        .load(&product_id)
        .map_err(|e| miette::miette!("{}", e))?;

    let spec = ItemSpec {
        quantity: Some(args.qty),
        height: args.height,
        width: args.width,
        depth: args.depth,
        notes: args.notes,
        template_params: collect_params(&args.params)?,
    };

    let item = quotation::add_item(&ws, &quote, &area_id, &product, spec)
        .map_err(|e| miette::miette!("{}", e))?;

    // auto means the human confirmation line here, not a YAML dump
    match global.format {
        OutputFormat::Id => println!("{}", item.id),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&item).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} Added {} x{} at {:.2} ({})",
                style("✓").green(),
                style(&product.name).cyan(),
                item.quantity,
                item.computed_price,
                item.id
            );
        }
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let quote_id = ws
        .resolve(EntityPrefix::Quot, &args.quote)
        .map_err(|e| miette::miette!("{}", e))?;
    let items = quotation::list_items(&ws, &quote_id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&items).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&items).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<25} {:<17} {:>4} {:>12}",
                style("ID").bold(),
                style("PRODUCT").bold(),
                style("AREA").bold(),
                style("QTY").bold(),
                style("PRICE").bold()
            );
            for item in &items {
                let product_name = ws
                    .load::<Product>(&item.product)
                    .map(|p| p.name)
                    .unwrap_or_else(|_| format_short_id(&item.product));
                println!(
                    "{:<17} {:<25} {:<17} {:>4} {:>12.2}",
                    format_short_id(&item.id),
                    truncate_str(&product_name, 25),
                    format_short_id(&item.area),
                    item.quantity,
                    item.computed_price
                );
            }
            if !global.quiet {
                eprintln!("{} item(s)", items.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Item, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let item: QuoteItem = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", item.id),
        _ => print!("{}", serde_yml::to_string(&item).into_diagnostic()?),
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Item, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let item: QuoteItem = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;
    let quote: Quotation = ws
        .load(&item.quotation)
        .map_err(|e| miette::miette!("{}", e))?;

    let spec = ItemSpec {
        quantity: args.qty,
        height: args.height,
        width: args.width,
        depth: args.depth,
        notes: args.notes,
        template_params: collect_params(&args.params)?,
    };

    let updated = quotation::update_item(&ws, &quote, &id, spec)
        .map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Updated item {} (price {:.2})",
            style("✓").green(),
            format_short_id(&updated.id),
            updated.computed_price
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Item, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let item: QuoteItem = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;
    let quote: Quotation = ws
        .load(&item.quotation)
        .map_err(|e| miette::miette!("{}", e))?;

    if !confirm("Delete this quote item?", args.yes)? {
        return Ok(());
    }

    quotation::delete_item(&ws, &quote, &id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted item {}", style("✓").green(), id);
    }
    Ok(())
}
