//! `fitq init` command - Initialize a new fitq workspace

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::entity::Entity;
use crate::core::workspace::{Workspace, WorkspaceError};
use crate::entities::catalog;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Seed the catalog with built-in templates and sample products
    #[arg(long)]
    pub seed: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    match Workspace::init(&path) {
        Ok(ws) => {
            println!(
                "{} Initialized fitq workspace at {}",
                style("✓").green(),
                style(ws.root().display()).cyan()
            );

            if args.seed {
                seed_catalog(&ws)?;
            }

            println!();
            println!("Next steps:");
            println!(
                "  {} Register your first client",
                style("fitq client new").yellow()
            );
            println!(
                "  {} Browse the product catalog",
                style("fitq product list").yellow()
            );
            println!(
                "  {} Start a guided quoting session",
                style("fitq wizard status").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} fitq workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn seed_catalog(ws: &Workspace) -> Result<()> {
    let (templates, products) = catalog::seed_catalog();

    for template in &templates {
        ws.save(template).map_err(|e| miette::miette!("{}", e))?;
    }
    for product in &products {
        ws.save(product).map_err(|e| miette::miette!("{}", e))?;
    }

    println!(
        "{} Seeded catalog: {} templates, {} products",
        style("✓").green(),
        templates.len(),
        products.len()
    );
    for template in &templates {
        println!("    {} {}", style(&template.code).cyan(), template.name());
    }
    Ok(())
}
