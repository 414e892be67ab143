use clap::Parser;
use fitq::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => fitq::cli::commands::init::run(args),
        Commands::Client(cmd) => fitq::cli::commands::client::run(cmd, &cli.global),
        Commands::Project(cmd) => fitq::cli::commands::project::run(cmd, &cli.global),
        Commands::Area(cmd) => fitq::cli::commands::area::run(cmd, &cli.global),
        Commands::Product(cmd) => fitq::cli::commands::product::run(cmd, &cli.global),
        Commands::Template(cmd) => fitq::cli::commands::template::run(cmd, &cli.global),
        Commands::Quote(cmd) => fitq::cli::commands::quote::run(cmd, &cli.global),
        Commands::Item(cmd) => fitq::cli::commands::item::run(cmd, &cli.global),
        Commands::Cutlist(cmd) => fitq::cli::commands::cutlist::run(cmd, &cli.global),
        Commands::Material(cmd) => fitq::cli::commands::material::run(cmd, &cli.global),
        Commands::Wizard(cmd) => fitq::cli::commands::wizard::run(cmd),
        Commands::Completions(args) => fitq::cli::commands::completions::run(args),
    }
}
