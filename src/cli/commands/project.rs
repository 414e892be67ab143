//! `fitq project` command - Project management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{confirm, format_short_id, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::entities::project::Project;

#[derive(clap::Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project under a client
    New(NewArgs),

    /// List projects
    List(ListArgs),

    /// Show a project's details
    Show(ShowArgs),

    /// Update a project's fields
    Update(UpdateArgs),

    /// Delete a project
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Owning client ID (full or partial) - REQUIRED
    #[arg(long, short = 'c')]
    pub client: String,

    /// Site address
    #[arg(long)]
    pub site_address: Option<String>,

    /// Property type (apartment, villa, office, ...)
    #[arg(long)]
    pub property_type: Option<String>,

    /// Scope of work
    #[arg(long)]
    pub scope: Option<String>,

    /// Expected timeline
    #[arg(long)]
    pub timeline: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by client ID (full or partial)
    #[arg(long, short = 'c')]
    pub client: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Project ID (full or partial)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New site address
    #[arg(long)]
    pub site_address: Option<String>,

    /// New property type
    #[arg(long)]
    pub property_type: Option<String>,

    /// New scope of work
    #[arg(long)]
    pub scope: Option<String>,

    /// New timeline
    #[arg(long)]
    pub timeline: Option<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Project ID (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::New(args) => run_new(args, global),
        ProjectCommands::List(args) => run_list(args, global),
        ProjectCommands::Show(args) => run_show(args, global),
        ProjectCommands::Update(args) => run_update(args, global),
        ProjectCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let client_id = ws
        .resolve(EntityPrefix::Clt, &args.client)
        .map_err(|e| miette::miette!("{}", e))?;

    let mut project = Project::new(args.name, client_id);
    project.site_address = args.site_address;
    project.property_type = args.property_type;
    project.scope = args.scope;
    project.timeline = args.timeline;
    project.notes = args.notes;
    project.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&project).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!(
            "{} Created project {} ({})",
            style("✓").green(),
            style(&project.name).cyan(),
            project.id
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut projects: Vec<Project> = ws
        .load_all(EntityPrefix::Prj)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(client) = &args.client {
        let client_id = ws
            .resolve(EntityPrefix::Clt, client)
            .map_err(|e| miette::miette!("{}", e))?;
        projects.retain(|p| p.client == client_id);
    }
    if let Some(limit) = args.limit {
        projects.truncate(limit);
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&projects).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&projects).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for project in &projects {
                println!("{}", project.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<25} {:<17} {:<12}",
                style("ID").bold(),
                style("NAME").bold(),
                style("CLIENT").bold(),
                style("TYPE").bold()
            );
            for project in &projects {
                println!(
                    "{:<17} {:<25} {:<17} {:<12}",
                    format_short_id(&project.id),
                    truncate_str(&project.name, 25),
                    format_short_id(&project.client),
                    truncate_str(project.property_type.as_deref().unwrap_or("-"), 12)
                );
            }
            if !global.quiet {
                eprintln!("{} project(s)", projects.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prj, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let project: Project = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&project).into_diagnostic()?
            );
        }
        OutputFormat::Id => println!("{}", project.id),
        _ => print!("{}", serde_yml::to_string(&project).into_diagnostic()?),
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prj, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let mut project: Project = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    // The owning client is immutable; everything else can change
    if let Some(name) = args.name {
        project.name = name;
    }
    if args.site_address.is_some() {
        project.site_address = args.site_address;
    }
    if args.property_type.is_some() {
        project.property_type = args.property_type;
    }
    if args.scope.is_some() {
        project.scope = args.scope;
    }
    if args.timeline.is_some() {
        project.timeline = args.timeline;
    }
    if args.notes.is_some() {
        project.notes = args.notes;
    }
    project.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&project).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Updated project {}", style("✓").green(), project.id);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Prj, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let project: Project = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if !confirm(&format!("Delete project '{}'?", project.name), args.yes)? {
        return Ok(());
    }

    ws.delete(&id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted project {}", style("✓").green(), id);
    }
    Ok(())
}
