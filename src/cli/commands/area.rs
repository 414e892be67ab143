//! `fitq area` command - Area management (rooms and zones)

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{confirm, format_short_id, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::entities::area::Area;

#[derive(clap::Subcommand, Debug)]
pub enum AreaCommands {
    /// Add an area to a project
    New(NewArgs),

    /// List areas
    List(ListArgs),

    /// Show an area's details
    Show(ShowArgs),

    /// Update an area's fields
    Update(UpdateArgs),

    /// Delete an area
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Area name (e.g. "Master Bedroom")
    pub name: String,

    /// Owning project ID (full or partial) - REQUIRED
    #[arg(long, short = 'p')]
    pub project: String,

    /// Area type (kitchen, bedroom, living, ...)
    #[arg(long, short = 't', default_value = "room")]
    pub area_type: String,

    /// Room length in mm
    #[arg(long)]
    pub length: Option<f64>,

    /// Room width in mm
    #[arg(long)]
    pub width: Option<f64>,

    /// Room height in mm
    #[arg(long)]
    pub height: Option<f64>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by project ID (full or partial)
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Area ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Area ID (full or partial)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New area type
    #[arg(long, short = 't')]
    pub area_type: Option<String>,

    /// New length in mm
    #[arg(long)]
    pub length: Option<f64>,

    /// New width in mm
    #[arg(long)]
    pub width: Option<f64>,

    /// New height in mm
    #[arg(long)]
    pub height: Option<f64>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Area ID (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: AreaCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AreaCommands::New(args) => run_new(args, global),
        AreaCommands::List(args) => run_list(args, global),
        AreaCommands::Show(args) => run_show(args, global),
        AreaCommands::Update(args) => run_update(args, global),
        AreaCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let project_id = ws
        .resolve(EntityPrefix::Prj, &args.project)
        .map_err(|e| miette::miette!("{}", e))?;

    let mut area = Area::new(args.name, args.area_type, project_id);
    area.length = args.length;
    area.width = args.width;
    area.height = args.height;
    area.notes = args.notes;
    area.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&area).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Created area {} ({})",
            style("✓").green(),
            style(&area.name).cyan(),
            area.id
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut areas: Vec<Area> = ws
        .load_all(EntityPrefix::Area)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(project) = &args.project {
        let project_id = ws
            .resolve(EntityPrefix::Prj, project)
            .map_err(|e| miette::miette!("{}", e))?;
        areas.retain(|a| a.project == project_id);
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&areas).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&areas).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for area in &areas {
                println!("{}", area.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<20} {:<10} {:<17}",
                style("ID").bold(),
                style("NAME").bold(),
                style("TYPE").bold(),
                style("PROJECT").bold()
            );
            for area in &areas {
                println!(
                    "{:<17} {:<20} {:<10} {:<17}",
                    format_short_id(&area.id),
                    truncate_str(&area.name, 20),
                    truncate_str(&area.area_type, 10),
                    format_short_id(&area.project)
                );
            }
            if !global.quiet {
                eprintln!("{} area(s)", areas.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Area, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let area: Area = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&area).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", area.id),
        _ => print!("{}", serde_yml::to_string(&area).into_diagnostic()?),
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Area, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let mut area: Area = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if let Some(name) = args.name {
        area.name = name;
    }
    if let Some(area_type) = args.area_type {
        area.area_type = area_type;
    }
    if args.length.is_some() {
        area.length = args.length;
    }
    if args.width.is_some() {
        area.width = args.width;
    }
    if args.height.is_some() {
        area.height = args.height;
    }
    if args.notes.is_some() {
        area.notes = args.notes;
    }
    area.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&area).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Updated area {}", style("✓").green(), area.id);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Area, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let area: Area = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if !confirm(&format!("Delete area '{}'?", area.name), args.yes)? {
        return Ok(());
    }

    ws.delete(&id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted area {}", style("✓").green(), id);
    }
    Ok(())
}
