//! Wizard session state
//!
//! Tracks which step of the linear workflow is active and which client,
//! project and quotation are currently selected. The whole state is written
//! to a durable slot on every mutation and rehydrated at startup; malformed
//! data falls back to a fresh default with the theme taken from the
//! terminal's color scheme. No transition here can fail - this is a pure
//! state container.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::identity::EntityId;

/// Steps of the linear fit-out workflow, ordered but freely selectable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum WizardStep {
    #[default]
    Client,
    Project,
    Areas,
    Dimensions,
    Quotation,
    Cutlist,
    Material,
}

impl WizardStep {
    /// All steps in workflow order
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Client,
            WizardStep::Project,
            WizardStep::Areas,
            WizardStep::Dimensions,
            WizardStep::Quotation,
            WizardStep::Cutlist,
            WizardStep::Material,
        ]
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Client => write!(f, "client"),
            WizardStep::Project => write!(f, "project"),
            WizardStep::Areas => write!(f, "areas"),
            WizardStep::Dimensions => write!(f, "dimensions"),
            WizardStep::Quotation => write!(f, "quotation"),
            WizardStep::Cutlist => write!(f, "cutlist"),
            WizardStep::Material => write!(f, "material"),
        }
    }
}

impl FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(WizardStep::Client),
            "project" => Ok(WizardStep::Project),
            "areas" => Ok(WizardStep::Areas),
            "dimensions" => Ok(WizardStep::Dimensions),
            "quotation" => Ok(WizardStep::Quotation),
            "cutlist" => Ok(WizardStep::Cutlist),
            "material" => Ok(WizardStep::Material),
            _ => Err(format!(
                "Invalid step: {}. Use client, project, areas, dimensions, quotation, cutlist, or material",
                s
            )),
        }
    }
}

/// Display theme, kept across resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}. Use light or dark", s)),
        }
    }
}

/// Detect the preferred theme from the terminal environment.
///
/// COLORFGBG is set by several terminal emulators as "fg;bg"; a background
/// index of 0-6 or 8 is a dark palette.
pub fn detect_theme() -> Theme {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.rsplit(';').next() {
            if let Ok(n) = bg.parse::<u8>() {
                if n <= 6 || n == 8 {
                    return Theme::Dark;
                }
            }
        }
    }
    Theme::Light
}

/// The serializable wizard session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub step: WizardStep,
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_client_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_project_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_quote_id: Option<EntityId>,
}

impl Session {
    /// A fresh session with the theme derived from the environment
    pub fn fresh() -> Self {
        Self {
            step: WizardStep::Client,
            theme: detect_theme(),
            selected_client_id: None,
            selected_project_id: None,
            selected_quote_id: None,
        }
    }

    pub fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn select_client(&mut self, id: Option<EntityId>) {
        self.selected_client_id = id;
    }

    pub fn select_project(&mut self, id: Option<EntityId>) {
        self.selected_project_id = id;
    }

    pub fn select_quote(&mut self, id: Option<EntityId>) {
        self.selected_quote_id = id;
    }

    /// Return to the first step and clear all selections; theme is kept
    pub fn reset_all(&mut self) {
        let theme = self.theme;
        *self = Session::fresh();
        self.theme = theme;
    }
}

/// Persistence port for the session state
pub trait SessionStore {
    /// Load the persisted session; None when absent or malformed
    fn load(&self) -> Option<Session>;

    /// Persist the full session state
    fn save(&self, session: &Session) -> io::Result<()>;
}

/// File-backed session slot (JSON under the workspace marker directory)
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conventional slot inside a workspace marker directory
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("session.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn save(&self, session: &Session) -> io::Result<()> {
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)
    }
}

/// A session bound to its persistence slot; every transition is saved
pub struct SessionHandle<S: SessionStore> {
    session: Session,
    store: S,
}

impl<S: SessionStore> SessionHandle<S> {
    /// Rehydrate from the store, or start fresh when absent/malformed
    pub fn open(store: S) -> Self {
        let session = store.load().unwrap_or_else(Session::fresh);
        Self { session, store }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_step(&mut self, step: WizardStep) -> io::Result<()> {
        self.session.set_step(step);
        self.store.save(&self.session)
    }

    pub fn set_theme(&mut self, theme: Theme) -> io::Result<()> {
        self.session.set_theme(theme);
        self.store.save(&self.session)
    }

    pub fn select_client(&mut self, id: Option<EntityId>) -> io::Result<()> {
        self.session.select_client(id);
        self.store.save(&self.session)
    }

    pub fn select_project(&mut self, id: Option<EntityId>) -> io::Result<()> {
        self.session.select_project(id);
        self.store.save(&self.session)
    }

    pub fn select_quote(&mut self, id: Option<EntityId>) -> io::Result<()> {
        self.session.select_quote(id);
        self.store.save(&self.session)
    }

    pub fn reset_all(&mut self) -> io::Result<()> {
        self.session.reset_all();
        self.store.save(&self.session)
    }
}
