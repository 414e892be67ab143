//! `fitq wizard` command - Guided quoting session
//!
//! Keeps a per-workspace session (current step, selected client,
//! project and quotation, display theme) under .fitq/session.json so a
//! quoting conversation can be resumed across invocations. Steps are
//! ordered but freely selectable.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::format_short_id;
use crate::core::identity::EntityPrefix;
use crate::core::session::{FileSessionStore, SessionHandle, Theme, WizardStep};
use crate::core::store::EntityStore;
use crate::core::workspace::{Workspace, WorkspaceError};
use crate::engine::material;
use crate::entities::area::Area;
use crate::entities::client::Client;
use crate::entities::product::Product;
use crate::entities::project::Project;
use crate::entities::quote::{QuoteItem, Quotation};
use crate::entities::template::ProductTemplate;

#[derive(clap::Subcommand, Debug)]
pub enum WizardCommands {
    /// Show the current session state
    Status,

    /// Jump to a workflow step
    Step(StepArgs),

    /// Select the working client
    SelectClient(SelectArgs),

    /// Select the working project
    SelectProject(SelectArgs),

    /// Select the working quotation
    SelectQuote(SelectArgs),

    /// Set the display theme
    Theme(ThemeArgs),

    /// Clear step and selections (theme is kept)
    Reset,
}

#[derive(clap::Args, Debug)]
pub struct StepArgs {
    /// Step name (client, project, areas, dimensions, quotation,
    /// cutlist, material)
    pub step: String,
}

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Entity ID (full or partial); omit to clear the selection
    pub id: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ThemeArgs {
    /// Theme name (light or dark)
    pub theme: String,
}

pub fn run(cmd: WizardCommands) -> Result<()> {
    let ws = Workspace::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = FileSessionStore::in_dir(&ws.fitq_dir());
    let mut handle = SessionHandle::open(store);

    match cmd {
        WizardCommands::Status => run_status(&ws, &handle),
        WizardCommands::Step(args) => {
            let step: WizardStep = args.step.parse().map_err(|e| miette::miette!("{}", e))?;
            handle.set_step(step).into_diagnostic()?;
            println!("{} Step set to {}", style("✓").green(), step);
            Ok(())
        }
        WizardCommands::SelectClient(args) => {
            let id = resolve_optional(&ws, EntityPrefix::Clt, args.id.as_deref())?;
            handle.select_client(id.clone()).into_diagnostic()?;
            report_selection("client", id.as_ref());
            Ok(())
        }
        WizardCommands::SelectProject(args) => {
            let id = resolve_optional(&ws, EntityPrefix::Prj, args.id.as_deref())?;
            handle.select_project(id.clone()).into_diagnostic()?;
            report_selection("project", id.as_ref());
            Ok(())
        }
        WizardCommands::SelectQuote(args) => {
            let id = resolve_optional(&ws, EntityPrefix::Quot, args.id.as_deref())?;
            handle.select_quote(id.clone()).into_diagnostic()?;
            report_selection("quotation", id.as_ref());
            Ok(())
        }
        WizardCommands::Theme(args) => {
            let theme: Theme = args.theme.parse().map_err(|e| miette::miette!("{}", e))?;
            handle.set_theme(theme).into_diagnostic()?;
            println!("{} Theme set to {}", style("✓").green(), theme);
            Ok(())
        }
        WizardCommands::Reset => {
            handle.reset_all().into_diagnostic()?;
            println!("{} Session reset", style("✓").green());
            Ok(())
        }
    }
}

fn resolve_optional(
    ws: &Workspace,
    prefix: EntityPrefix,
    needle: Option<&str>,
) -> Result<Option<crate::core::identity::EntityId>> {
    match needle {
        Some(n) => ws
            .resolve(prefix, n)
            .map(Some)
            .map_err(|e| miette::miette!("{}", e)),
        None => Ok(None),
    }
}

fn report_selection(what: &str, id: Option<&crate::core::identity::EntityId>) {
    match id {
        Some(id) => println!(
            "{} Selected {} {}",
            style("✓").green(),
            what,
            format_short_id(id)
        ),
        None => println!("{} Cleared {} selection", style("✓").green(), what),
    }
}

fn run_status(ws: &Workspace, handle: &SessionHandle<FileSessionStore>) -> Result<()> {
    let session = handle.session();

    // Hydrate the full snapshot so selections display with their names
    // and the overview shows real counts. A failed load leaves the
    // snapshot at last-known-good (here: empty) and records the message.
    let mut store = EntityStore::new();
    let loaded = store.exchange(|| -> Result<_, WorkspaceError> {
        Ok((
            ws.load_all::<Client>(EntityPrefix::Clt)?,
            ws.load_all::<Project>(EntityPrefix::Prj)?,
            ws.load_all::<Area>(EntityPrefix::Area)?,
            ws.load_all::<Product>(EntityPrefix::Prod)?,
            ws.load_all::<ProductTemplate>(EntityPrefix::Tmpl)?,
            ws.load_all::<Quotation>(EntityPrefix::Quot)?,
            ws.load_all::<QuoteItem>(EntityPrefix::Item)?,
        ))
    });
    if let Ok((clients, projects, areas, products, templates, quotes, items)) = loaded {
        store.clients.upsert_many(clients);
        store.projects.upsert_many(projects);
        store.areas.upsert_many(areas);
        store.products.upsert_many(products);
        store.templates.upsert_many(templates);
        store.quotes.upsert_many(quotes);
        store.quote_items.upsert_many(items);
    }

    // The selected quotation's cutlist is a document, not an entity
    // directory; swap it wholesale
    if store.last_error().is_none() {
        if let Some(quote_id) = session.selected_quote_id.clone() {
            if let Ok(panels) = store.exchange(|| ws.load_cutlist(&quote_id)) {
                store.material = Some(material::summarize(quote_id, &panels));
                store.cutlist.replace_all(panels);
            }
        }
    }

    println!("{}", style("Wizard session").bold());
    println!("  Theme: {}", session.theme);
    println!();

    for step in WizardStep::all() {
        let marker = if *step == session.step {
            style("▶").cyan().to_string()
        } else {
            " ".to_string()
        };
        println!("  {} {}", marker, step);
    }

    println!();
    println!(
        "  Client:    {}",
        selection_label(session.selected_client_id.as_ref(), |id| {
            store.clients.get(id).map(|c| c.name.clone())
        })
    );
    println!(
        "  Project:   {}",
        selection_label(session.selected_project_id.as_ref(), |id| {
            store.projects.get(id).map(|p| p.name.clone())
        })
    );
    println!(
        "  Quotation: {}",
        selection_label(session.selected_quote_id.as_ref(), |id| {
            store.quotes.get(id).map(|q| format!("v{} {}", q.version_no, q.status))
        })
    );

    println!();
    println!(
        "  Workspace: {} client(s), {} project(s), {} area(s)",
        store.clients.len(),
        store.projects.len(),
        store.areas.len()
    );
    println!(
        "  Catalog:   {} product(s), {} template(s)",
        store.products.len(),
        store.templates.len()
    );
    println!(
        "  Quoting:   {} quotation(s), {} item(s)",
        store.quotes.len(),
        store.quote_items.len()
    );
    if let Some(summary) = &store.material {
        println!(
            "  Material:  {} panel entr(ies), {} sheet(s)",
            store.cutlist.len(),
            summary.sheet_count
        );
    }

    if let Some(message) = store.last_error() {
        eprintln!("{} {}", style("!").yellow(), message);
    }
    Ok(())
}

fn selection_label(
    id: Option<&crate::core::identity::EntityId>,
    describe: impl Fn(&crate::core::identity::EntityId) -> Option<String>,
) -> String {
    match id {
        Some(id) => match describe(id) {
            Some(name) => format!("{} ({})", name, format_short_id(id)),
            None => format_short_id(id),
        },
        None => "-".to_string(),
    }
}
