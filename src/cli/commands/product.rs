//! `fitq product` command - Product catalog management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{confirm, format_short_id, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::entities::product::{PricingModel, Product};

#[derive(clap::Subcommand, Debug)]
pub enum ProductCommands {
    /// Add a product to the catalog
    New(NewArgs),

    /// List products
    List(ListArgs),

    /// Show a product's details
    Show(ShowArgs),

    /// Update a product's fields
    Update(UpdateArgs),

    /// Delete a product
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    pub name: String,

    /// Pricing model (PER_UNIT, AREA, VOLUME, RUNNING_FT)
    #[arg(long, short = 'm')]
    pub model: PricingModelArg,

    /// Rate in workspace currency, per pricing-model unit
    #[arg(long, short = 'r')]
    pub rate: f64,

    /// Catalog category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Cutlist template ID or code (full or partial)
    #[arg(long, short = 't')]
    pub template: Option<String>,
}

/// clap-friendly wrapper around the pricing models
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PricingModelArg {
    PerUnit,
    Area,
    Volume,
    RunningFt,
}

impl From<PricingModelArg> for PricingModel {
    fn from(arg: PricingModelArg) -> Self {
        match arg {
            PricingModelArg::PerUnit => PricingModel::PerUnit,
            PricingModelArg::Area => PricingModel::Area,
            PricingModelArg::Volume => PricingModel::Volume,
            PricingModelArg::RunningFt => PricingModel::RunningFt,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name (substring match)
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Product ID (full or partial)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New pricing model
    #[arg(long, short = 'm')]
    pub model: Option<PricingModelArg>,

    /// New unit rate
    #[arg(long, short = 'r')]
    pub rate: Option<f64>,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New cutlist template ID (full or partial)
    #[arg(long, short = 't')]
    pub template: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product ID (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ProductCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProductCommands::New(args) => run_new(args, global),
        ProductCommands::List(args) => run_list(args, global),
        ProductCommands::Show(args) => run_show(args, global),
        ProductCommands::Update(args) => run_update(args, global),
        ProductCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;

    let mut product = Product::new(args.name, args.model.into(), args.rate);
    product.category = args.category;
    product.description = args.description;
    if let Some(template) = &args.template {
        let template_id = ws
            .resolve(EntityPrefix::Tmpl, template)
            .map_err(|e| miette::miette!("{}", e))?;
        product.template = Some(template_id);
    }
    product.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&product).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Created product {} ({})",
            style("✓").green(),
            style(&product.name).cyan(),
            product.id
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut products: Vec<Product> = ws
        .load_all(EntityPrefix::Prod)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(category) = &args.category {
        let needle = category.to_lowercase();
        products.retain(|p| {
            p.category
                .as_deref()
                .map(|c| c.to_lowercase() == needle)
                .unwrap_or(false)
        });
    }
    if let Some(search) = &args.search {
        let needle = search.to_lowercase();
        products.retain(|p| p.name.to_lowercase().contains(&needle));
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&products).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&products).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for product in &products {
                println!("{}", product.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<25} {:<12} {:<11} {:>10} {:<9}",
                style("ID").bold(),
                style("NAME").bold(),
                style("CATEGORY").bold(),
                style("MODEL").bold(),
                style("RATE").bold(),
                style("TEMPLATE").bold()
            );
            for product in &products {
                println!(
                    "{:<17} {:<25} {:<12} {:<11} {:>10.2} {:<9}",
                    format_short_id(&product.id),
                    truncate_str(&product.name, 25),
                    truncate_str(product.category.as_deref().unwrap_or("-"), 12),
                    product.pricing_model,
                    product.unit_rate,
                    if product.template.is_some() { "yes" } else { "-" }
                );
            }
            if !global.quiet {
                eprintln!("{} product(s)", products.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prod, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let product: Product = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&product).into_diagnostic()?
            );
        }
        OutputFormat::Id => println!("{}", product.id),
        _ => print!("{}", serde_yml::to_string(&product).into_diagnostic()?),
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prod, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let mut product: Product = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if let Some(name) = args.name {
        product.name = name;
    }
    if let Some(model) = args.model {
        product.pricing_model = model.into();
    }
    if let Some(rate) = args.rate {
        product.unit_rate = rate;
    }
    if args.category.is_some() {
        product.category = args.category;
    }
    if args.description.is_some() {
        product.description = args.description;
    }
    if let Some(template) = &args.template {
        let template_id = ws
            .resolve(EntityPrefix::Tmpl, template)
            .map_err(|e| miette::miette!("{}", e))?;
        product.template = Some(template_id);
    }
    product.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&product).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Updated product {}", style("✓").green(), product.id);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prod, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let product: Product = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if !confirm(&format!("Delete product '{}'?", product.name), args.yes)? {
        return Ok(());
    }

    ws.delete(&id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted product {}", style("✓").green(), id);
    }
    Ok(())
}
