//! Workspace discovery and entity persistence
//!
//! A workspace is a directory tree marked by `.fitq/`, with one YAML file per
//! entity. It is the system of record: every mutating command round-trips
//! through here, and a failed round trip leaves the in-memory snapshot at its
//! last-known-good value.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::cutlist::CutlistItem;

const FILE_SUFFIX: &str = ".fitq.yaml";

/// Represents a fitq workspace
#[derive(Debug)]
pub struct Workspace {
    /// Root directory (parent of .fitq/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        loop {
            if current.join(".fitq").is_dir() {
                return Ok(Self { root: current });
            }
            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new workspace structure at the given path
    pub fn init(path: &Path) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let fitq_dir = root.join(".fitq");
        if fitq_dir.exists() {
            return Err(WorkspaceError::AlreadyExists(root.clone()));
        }

        std::fs::create_dir_all(&fitq_dir).map_err(|e| WorkspaceError::Io(e.to_string()))?;

        let config_path = fitq_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| WorkspaceError::Io(e.to_string()))?;

        for dir in Self::ENTITY_DIRS {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| WorkspaceError::Io(e.to_string()))?;
        }

        Ok(Self { root })
    }

    const ENTITY_DIRS: &'static [&'static str] = &[
        "clients",
        "projects",
        "areas",
        "catalog/products",
        "catalog/templates",
        "quotes",
        "quotes/items",
        "cutlists",
    ];

    fn default_config() -> &'static str {
        r#"# fitq workspace configuration

# Currency for new quotations (default: INR)
# currency: INR
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .fitq configuration directory
    pub fn fitq_dir(&self) -> PathBuf {
        self.root.join(".fitq")
    }

    /// Get the directory for a given entity prefix
    pub fn entity_directory(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Clt => "clients",
            EntityPrefix::Prj => "projects",
            EntityPrefix::Area => "areas",
            EntityPrefix::Prod => "catalog/products",
            EntityPrefix::Tmpl => "catalog/templates",
            EntityPrefix::Quot => "quotes",
            EntityPrefix::Item => "quotes/items",
            EntityPrefix::Cut => "cutlists",
        }
    }

    /// Path of the file holding the given entity
    pub fn entity_path(&self, id: &EntityId) -> PathBuf {
        self.root
            .join(Self::entity_directory(id.prefix()))
            .join(format!("{}{}", id, FILE_SUFFIX))
    }

    /// Persist one entity, overwriting any previous version
    pub fn save<T: Entity>(&self, entity: &T) -> Result<(), WorkspaceError> {
        let path = self.entity_path(entity.id());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        }
        let yaml = serde_yml::to_string(entity)
            .map_err(|e| WorkspaceError::Yaml(path.display().to_string(), e.to_string()))?;
        std::fs::write(&path, yaml).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load one entity by id
    pub fn load<T: Entity + 'static>(&self, id: &EntityId) -> Result<T, WorkspaceError> {
        let path = self.entity_path(id);
        if !path.exists() {
            return Err(WorkspaceError::EntityNotFound(id.to_string()));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        serde_yml::from_str(&content)
            .map_err(|e| WorkspaceError::Yaml(path.display().to_string(), e.to_string()))
    }

    /// Delete one entity by id; missing files are an error
    pub fn delete(&self, id: &EntityId) -> Result<(), WorkspaceError> {
        let path = self.entity_path(id);
        if !path.exists() {
            return Err(WorkspaceError::EntityNotFound(id.to_string()));
        }
        std::fs::remove_file(&path).map_err(|e| WorkspaceError::Io(e.to_string()))
    }

    /// Load all entities of one type, newest file first
    pub fn load_all<T: Entity + 'static>(
        &self,
        prefix: EntityPrefix,
    ) -> Result<Vec<T>, WorkspaceError> {
        let dir = self.root.join(Self::entity_directory(prefix));
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(FILE_SUFFIX))
            .map(|e| e.path().to_path_buf())
            .collect();
        // ULID file stems sort by creation time; newest first matches the
        // store's created-at-front ordering.
        paths.sort();
        paths.reverse();

        let mut out = Vec::with_capacity(paths.len());
        for path in paths {
            let content =
                std::fs::read_to_string(&path).map_err(|e| WorkspaceError::Io(e.to_string()))?;
            let entity = serde_yml::from_str(&content)
                .map_err(|e| WorkspaceError::Yaml(path.display().to_string(), e.to_string()))?;
            out.push(entity);
        }
        Ok(out)
    }

    /// Resolve a possibly partial id string to a full entity id of the given
    /// type by matching file stems. Errors when nothing or more than one
    /// entity matches.
    pub fn resolve(&self, prefix: EntityPrefix, needle: &str) -> Result<EntityId, WorkspaceError> {
        // A full id parses directly
        if let Ok(id) = EntityId::parse(needle) {
            if id.prefix() == prefix {
                return Ok(id);
            }
        }

        let dir = self.root.join(Self::entity_directory(prefix));
        let needle_upper = needle.to_uppercase();
        let mut matches: Vec<EntityId> = Vec::new();

        if dir.is_dir() {
            for entry in walkdir::WalkDir::new(&dir)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let name = entry.file_name().to_string_lossy().to_string();
                if let Some(stem) = name.strip_suffix(FILE_SUFFIX) {
                    if stem.contains(&needle_upper) {
                        if let Ok(id) = EntityId::parse(stem) {
                            matches.push(id);
                        }
                    }
                }
            }
        }

        match matches.len() {
            0 => Err(WorkspaceError::EntityNotFound(needle.to_string())),
            1 => Ok(matches.remove(0)),
            n => Err(WorkspaceError::Ambiguous {
                needle: needle.to_string(),
                count: n,
            }),
        }
    }

    /// Path of the cutlist document for a quotation
    pub fn cutlist_path(&self, quote_id: &EntityId) -> PathBuf {
        self.root
            .join("cutlists")
            .join(format!("{}{}", quote_id, FILE_SUFFIX))
    }

    /// Replace the whole cutlist document for a quotation
    pub fn save_cutlist(
        &self,
        quote_id: &EntityId,
        items: &[CutlistItem],
    ) -> Result<(), WorkspaceError> {
        let path = self.cutlist_path(quote_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        }
        let yaml = serde_yml::to_string(&items)
            .map_err(|e| WorkspaceError::Yaml(path.display().to_string(), e.to_string()))?;
        std::fs::write(&path, yaml).map_err(|e| WorkspaceError::Io(e.to_string()))
    }

    /// Load the cutlist for a quotation; absent means empty
    pub fn load_cutlist(&self, quote_id: &EntityId) -> Result<Vec<CutlistItem>, WorkspaceError> {
        let path = self.cutlist_path(quote_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| WorkspaceError::Io(e.to_string()))?;
        serde_yml::from_str(&content)
            .map_err(|e| WorkspaceError::Yaml(path.display().to_string(), e.to_string()))
    }
}

/// Errors that can occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a fitq workspace (searched from {searched_from:?}). Run 'fitq init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("fitq workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("no entity found matching '{0}'")]
    EntityNotFound(String),

    #[error("'{needle}' matches {count} entities; give more of the id")]
    Ambiguous { needle: String, count: usize },

    #[error("IO error: {0}")]
    Io(String),

    #[error("YAML error in {0}: {1}")]
    Yaml(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::Client;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        assert!(ws.fitq_dir().exists());
        assert!(ws.fitq_dir().join("config.yaml").exists());
        assert!(ws.root().join("clients").is_dir());
        assert!(ws.root().join("catalog/templates").is_dir());
        assert!(ws.root().join("quotes/items").is_dir());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();
        let err = Workspace::init(tmp.path()).unwrap_err();
        assert!(matches!(err, WorkspaceError::AlreadyExists(_)));
    }

    #[test]
    fn test_discover_finds_root_from_subdir() {
        let tmp = tempdir().unwrap();
        Workspace::init(tmp.path()).unwrap();
        let subdir = tmp.path().join("quotes/items");

        let ws = Workspace::discover_from(&subdir).unwrap();
        assert_eq!(
            ws.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_save_load_delete_roundtrip() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        let client = Client::new("Asha Rao", "9876543210");
        let id = client.id.clone();
        ws.save(&client).unwrap();

        let loaded: Client = ws.load(&id).unwrap();
        assert_eq!(loaded.name, "Asha Rao");

        ws.delete(&id).unwrap();
        assert!(matches!(
            ws.load::<Client>(&id).unwrap_err(),
            WorkspaceError::EntityNotFound(_)
        ));
    }

    #[test]
    fn test_cutlist_document_roundtrip() {
        use crate::entities::cutlist::CutlistItem;

        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        let quote_id = EntityId::new(EntityPrefix::Quot);
        let panel = CutlistItem::new(
            quote_id.clone(),
            EntityId::new(EntityPrefix::Item),
            "Side Panel",
            2,
        );
        ws.save_cutlist(&quote_id, &[panel.clone()]).unwrap();

        let loaded = ws.load_cutlist(&quote_id).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].part_name, "Side Panel");

        // A second save replaces the whole document
        ws.save_cutlist(&quote_id, &[]).unwrap();
        assert!(ws.load_cutlist(&quote_id).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_partial_id() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path()).unwrap();

        let client = Client::new("Asha", "98765");
        ws.save(&client).unwrap();

        let full = client.id.to_string();
        let tail = &full[full.len() - 8..];
        let resolved = ws.resolve(EntityPrefix::Clt, tail).unwrap();
        assert_eq!(resolved, client.id);

        assert!(matches!(
            ws.resolve(EntityPrefix::Clt, "NOPE").unwrap_err(),
            WorkspaceError::EntityNotFound(_)
        ));
    }
}
