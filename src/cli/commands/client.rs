//! `fitq client` command - Client management

use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{confirm, format_short_id, open_workspace, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::entities::client::Client;

#[derive(clap::Subcommand, Debug)]
pub enum ClientCommands {
    /// Register a new client
    New(NewArgs),

    /// List clients
    List(ListArgs),

    /// Show a client's details
    Show(ShowArgs),

    /// Update a client's contact fields
    Update(UpdateArgs),

    /// Delete a client
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Client name
    pub name: Option<String>,

    /// Contact phone number
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// Contact email
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Postal address
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name (substring match)
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Client ID (full or partial)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Client ID (full or partial)
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New phone number
    #[arg(long, short = 'p')]
    pub phone: Option<String>,

    /// New email
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// New address
    #[arg(long, short = 'a')]
    pub address: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Client ID (full or partial)
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ClientCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ClientCommands::New(args) => run_new(args, global),
        ClientCommands::List(args) => run_list(args, global),
        ClientCommands::Show(args) => run_show(args, global),
        ClientCommands::Update(args) => run_update(args, global),
        ClientCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;

    let (name, phone) = if args.interactive {
        let name: String = Input::new()
            .with_prompt("Client name")
            .interact_text()
            .into_diagnostic()?;
        let phone: String = Input::new()
            .with_prompt("Phone number")
            .interact_text()
            .into_diagnostic()?;
        (name, phone)
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("Client name is required (or use --interactive)"))?;
        let phone = args
            .phone
            .ok_or_else(|| miette::miette!("--phone is required (or use --interactive)"))?;
        (name, phone)
    };

    let mut client = Client::new(name, phone);
    client.email = args.email;
    client.address = args.address;
    client.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&client).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Created client {} ({})",
            style("✓").green(),
            style(&client.name).cyan(),
            client.id
        );
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut clients: Vec<Client> = ws
        .load_all(EntityPrefix::Clt)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(search) = &args.search {
        let needle = search.to_lowercase();
        clients.retain(|c| c.name.to_lowercase().contains(&needle));
    }
    if let Some(limit) = args.limit {
        clients.truncate(limit);
    }

    match effective_format(global.format, true) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&clients).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&clients).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for client in &clients {
                println!("{}", client.id);
            }
        }
        _ => {
            println!(
                "{:<17} {:<25} {:<14} {:<25}",
                style("ID").bold(),
                style("NAME").bold(),
                style("PHONE").bold(),
                style("EMAIL").bold()
            );
            for client in &clients {
                println!(
                    "{:<17} {:<25} {:<14} {:<25}",
                    format_short_id(&client.id),
                    truncate_str(&client.name, 25),
                    truncate_str(&client.phone, 14),
                    truncate_str(client.email.as_deref().unwrap_or("-"), 25)
                );
            }
            if !global.quiet {
                eprintln!("{} client(s)", clients.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Clt, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let client: Client = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global.format, false) {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&client).into_diagnostic()?
            );
        }
        OutputFormat::Id => println!("{}", client.id),
        _ => print!("{}", serde_yml::to_string(&client).into_diagnostic()?),
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Clt, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let mut client: Client = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if let Some(name) = args.name {
        client.name = name;
    }
    if let Some(phone) = args.phone {
        client.phone = phone;
    }
    if args.email.is_some() {
        client.email = args.email;
    }
    if args.address.is_some() {
        client.address = args.address;
    }
    client.validate().map_err(|e| miette::miette!("{}", e))?;

    ws.save(&client).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Updated client {}", style("✓").green(), client.id);
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let id = ws
        .resolve(EntityPrefix::Clt, &args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let client: Client = ws.load(&id).map_err(|e| miette::miette!("{}", e))?;

    if !confirm(&format!("Delete client '{}'?", client.name), args.yes)? {
        return Ok(());
    }

    ws.delete(&id).map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        println!("{} Deleted client {}", style("✓").green(), id);
    }
    Ok(())
}
