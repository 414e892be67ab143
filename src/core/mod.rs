//! Core module - identity, snapshot store, session and persistence

pub mod config;
pub mod entity;
pub mod identity;
pub mod session;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use entity::Entity;
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use session::{
    detect_theme, FileSessionStore, Session, SessionHandle, SessionStore, Theme, WizardStep,
};
pub use store::{Collection, EntityStore};
pub use workspace::{Workspace, WorkspaceError};
