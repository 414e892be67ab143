//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    area::AreaCommands,
    client::ClientCommands,
    completions::CompletionsArgs,
    cutlist::CutlistCommands,
    init::InitArgs,
    item::ItemCommands,
    material::MaterialCommands,
    product::ProductCommands,
    project::ProjectCommands,
    quote::QuoteCommands,
    template::TemplateCommands,
    wizard::WizardCommands,
};

#[derive(Parser)]
#[command(name = "fitq")]
#[command(author, version, about = "Fitout Quote Toolkit")]
#[command(
    long_about = "A Unix-style toolkit for managing interior fit-out clients, quotations and cutlists as plain text files under git version control."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .fitq/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new fitq workspace
    Init(InitArgs),

    /// Client management
    #[command(subcommand)]
    Client(ClientCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Area management (rooms and zones within a project)
    #[command(subcommand)]
    Area(AreaCommands),

    /// Product catalog management
    #[command(subcommand)]
    Product(ProductCommands),

    /// Cutlist template management
    #[command(subcommand)]
    Template(TemplateCommands),

    /// Quotation management (drafts, totals, submission)
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Quote item management (lines within a draft)
    #[command(subcommand)]
    Item(ItemCommands),

    /// Cutlist generation and inspection
    #[command(subcommand)]
    Cutlist(CutlistCommands),

    /// Sheet material estimation
    #[command(subcommand)]
    Material(MaterialCommands),

    /// Guided quoting session (persists step and selections)
    #[command(subcommand)]
    Wizard(WizardCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// Just IDs, one per line
    Id,
}
