//! `fitq template` command - Cutlist template management
//!
//! Templates are rich YAML documents; create and edit them with a text
//! editor. The CLI lists, shows, inspects parameters and deletes them;
//! `show` renders the rules as tables for a quick read.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{confirm, format_short_id, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::entities::template::ProductTemplate;

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// List templates
    List(ListArgs),

    /// Show a template's parameters and rules
    Show(ShowArgs),

    /// List a template's parameters
    Params(ParamsArgs),

    /// List the effective template parameters for a product
    ProductParams(ProductParamsArgs),

    /// Delete a template
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Template ID or code (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ParamsArgs {
    /// Template ID or code (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ProductParamsArgs {
    /// Product ID (full or partial)
    pub product: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Template ID or code (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: TemplateCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TemplateCommands::List(args) => run_list(args, global),
        TemplateCommands::Show(args) => run_show(args, global),
        TemplateCommands::Params(args) => run_params(args, global),
        TemplateCommands::ProductParams(args) => run_product_params(args, global),
        TemplateCommands::Delete(args) => run_delete(args, global),
    }
}

/// Resolve by id fragment first, then by exact code
fn resolve_template(
    ws: &crate::core::workspace::Workspace,
    needle: &str,
) -> Result<ProductTemplate> {
    if let Ok(id) = ws.resolve(EntityPrefix::Tmpl, needle) {
        return ws.load(&id).map_err(|e| miette::miette!("{}", e));
    }
    let templates: Vec<ProductTemplate> = ws
        .load_all(EntityPrefix::Tmpl)
        .map_err(|e| miette::miette!("{}", e))?;
    templates
        .into_iter()
        .find(|t| t.code.eq_ignore_ascii_case(needle))
        .ok_or_else(|| miette::miette!("No template found matching '{}'", needle))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut templates: Vec<ProductTemplate> = ws
        .load_all(EntityPrefix::Tmpl)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(category) = &args.category {
        let needle = category.to_lowercase();
        templates.retain(|t| {
            t.category
                .as_deref()
                .map(|c| c.to_lowercase() == needle)
                .unwrap_or(false)
        });
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&templates).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&templates).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for template in &templates {
                println!("{}", template.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<20} {:<22} {:>6} {:>6} {:>6}",
                style("ID").bold(),
                style("CODE").bold(),
                style("NAME").bold(),
                style("PARAMS").bold(),
                style("VARS").bold(),
                style("PARTS").bold()
            );
            for template in &templates {
                println!(
                    "{:<17} {:<20} {:<22} {:>6} {:>6} {:>6}",
                    format_short_id(&template.id),
                    truncate_str(&template.code, 20),
                    truncate_str(&template.name, 22),
                    template.params.len(),
                    template.derived_vars.len(),
                    template.part_rules.len()
                );
            }
            if !global.quiet {
                eprintln!("{} template(s)", templates.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let template = resolve_template(&ws, &args.id)?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&template).into_diagnostic()?
            );
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&template).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Id => {
            println!("{}", template.id);
            return Ok(());
        }
        _ => {}
    }

    println!(
        "{} {} ({})",
        style(&template.code).cyan().bold(),
        template.name,
        template.id
    );
    if let Some(description) = &template.description {
        println!("{}", description);
    }
    println!(
        "T={}mm BACK_T={}mm PLINTH={}mm",
        template.base_thickness, template.back_panel_thickness, template.plinth_height
    );

    if !template.params.is_empty() {
        println!("\n{}", style("Parameters").bold());
        let mut builder = Builder::default();
        builder.push_record(["NAME", "DEFAULT", "MIN", "MAX", "LABEL"]);
        for p in &template.params {
            builder.push_record([
                p.name.clone(),
                format!("{}", p.default_value),
                p.min_value.map_or("-".to_string(), |v| v.to_string()),
                p.max_value.map_or("-".to_string(), |v| v.to_string()),
                p.display_label.clone().unwrap_or_default(),
            ]);
        }
        println!("{}", builder.build().with(Style::sharp()));
    }

    if !template.derived_vars.is_empty() {
        println!("\n{}", style("Derived variables").bold());
        let mut builder = Builder::default();
        builder.push_record(["NAME", "EXPRESSION"]);
        for v in &template.derived_vars {
            builder.push_record([v.name.clone(), v.expression.clone()]);
        }
        println!("{}", builder.build().with(Style::sharp()));
    }

    if !template.validation_rules.is_empty() {
        println!("\n{}", style("Validation rules").bold());
        for rule in &template.validation_rules {
            println!("  {}  ({})", rule.condition, rule.error_message);
        }
    }

    if !template.part_rules.is_empty() {
        println!("\n{}", style("Part rules").bold());
        let mut builder = Builder::default();
        builder.push_record(["PART", "W", "H", "T", "QTY", "MATERIAL"]);
        for r in &template.part_rules {
            builder.push_record([
                r.part_name.clone(),
                r.width_expr.clone(),
                r.height_expr.clone(),
                r.thickness_expr.clone().unwrap_or_else(|| "T".to_string()),
                r.qty_expr.clone(),
                r.material_type.clone().unwrap_or_default(),
            ]);
        }
        println!("{}", builder.build().with(Style::sharp()));
    }

    Ok(())
}

fn run_params(args: ParamsArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let template = resolve_template(&ws, &args.id)?;
    print_params(&template, global)
}

/// The effective parameters for a product are those of its linked
/// template; a product without a template has none.
fn run_product_params(args: ProductParamsArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product_id = ws
        .resolve(EntityPrefix::Prod, &args.product)
        .map_err(|e| miette::miette!("{}", e))?;
    let product: crate::entities::product::Product =
        ws.load(&product_id).map_err(|e| miette::miette!("{}", e))?;

    let template_id = product.template.as_ref().ok_or_else(|| {
        miette::miette!("Product '{}' has no template, so no parameters", product.name)
    })?;
    let template: ProductTemplate = ws
        .load(template_id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet && effective_format(global.format, true) == OutputFormat::Tsv {
        eprintln!("{} via template {}", product.name, template.code);
    }
    print_params(&template, global)
}

fn print_params(template: &ProductTemplate, global: &GlobalOpts) -> Result<()> {
    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&template.params).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yml::to_string(&template.params).into_diagnostic()?
            );
        }
        OutputFormat::Id => {
            for p in &template.params {
                println!("{}", p.name);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["NAME", "DEFAULT", "MIN", "MAX", "REQUIRED", "HELP"]);
            for p in &template.params {
                builder.push_record([
                    p.name.clone(),
                    format!("{}", p.default_value),
                    p.min_value.map_or("-".to_string(), |v| v.to_string()),
                    p.max_value.map_or("-".to_string(), |v| v.to_string()),
                    if p.required { "yes" } else { "no" }.to_string(),
                    p.help_text.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", builder.build().with(Style::sharp()));
            if !global.quiet {
                eprintln!("{} parameter(s)", template.params.len());
            }
        }
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let template = resolve_template(&ws, &args.id)?;

    if !confirm(&format!("Delete template '{}'?", template.code), args.yes)? {
        return Ok(());
    }

    ws.delete(&template.id)
        .map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted template {}", style("✓").green(), template.id);
    }
    Ok(())
}
