//! Recipe directory discovery and spec loading.
//!
//! A recipe directory holds YAML specs grouped by class:
//!
//! ```text
//! <recipe>/views/tickets/open.yaml   -> view   "tickets.open"
//! <recipe>/forms/ticket.yaml         -> form   "ticket"
//! <recipe>/sources/main.yaml         -> source "main"
//! ```
//!
//! Specs are only parsed when looked up.

mod spec;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::de::DeserializeOwned;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, warn};

pub use spec::{ColumnSpec, FormSpec, Permission, SourceSpec, ViewSpec};

/// Directory searched relative to the working directory.
pub const LOCAL_RECIPE_DIR: &str = "deft-config";

/// System-wide recipe directory.
pub const SYSTEM_RECIPE_DIR: &str = "/etc/deft/config";

/// Maximum Levenshtein distance to consider a label as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A specialized Result type for recipe operations.
pub type RecipeResult<T> = Result<T, RecipeError>;

/// Errors that can occur while discovering or reading recipes.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// None of the candidate directories exists.
    #[error("cannot find configuration directory (searched: {})", display_paths(.searched))]
    NoRecipeDir {
        /// Directories that were tried, in order.
        searched: Vec<PathBuf>,
    },

    /// I/O error while walking the directory or reading a spec.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A spec file is not valid YAML for its class.
    #[error("invalid spec '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// Two files map to the same label.
    #[error("duplicate {class} '{label}' in '{path}'")]
    DuplicateLabel {
        class: RecipeClass,
        label: String,
        path: PathBuf,
    },

    /// No spec with the given label.
    #[error("{class} '{label}' cannot be found{}", suggestion_suffix(.suggestion))]
    NotFound {
        class: RecipeClass,
        label: String,
        /// Closest existing label, if any is close enough.
        suggestion: Option<String>,
    },

    /// A view lacks the query a command needs.
    #[error("view '{label}' has no '{query}' query")]
    MissingQuery { label: String, query: &'static str },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

/// The kinds of spec a recipe directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecipeClass {
    View,
    Form,
    Source,
}

impl RecipeClass {
    /// Maps a top-level directory name to its class.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "views" => Some(RecipeClass::View),
            "forms" => Some(RecipeClass::Form),
            "sources" => Some(RecipeClass::Source),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecipeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeClass::View => f.write_str("view"),
            RecipeClass::Form => f.write_str("form"),
            RecipeClass::Source => f.write_str("source"),
        }
    }
}

/// One row of `list-views`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSummary {
    pub label: String,
    pub title: String,
    pub path: PathBuf,
    pub description: String,
}

/// Index of the specs found in a recipe directory, keyed by label.
#[derive(Debug, Clone, Default)]
pub struct RecipeMap {
    root: PathBuf,
    entries: BTreeMap<RecipeClass, BTreeMap<String, PathBuf>>,
}

impl RecipeMap {
    /// Returns the candidate directories in search order.
    pub fn candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_path_buf());
        }
        candidates.push(PathBuf::from(LOCAL_RECIPE_DIR));
        if let Some(dirs) = BaseDirs::new() {
            candidates.push(dirs.home_dir().join(".deft").join("config"));
        }
        candidates.push(PathBuf::from(SYSTEM_RECIPE_DIR));
        candidates
    }

    /// Finds the first existing recipe directory and indexes it.
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::NoRecipeDir` if no candidate exists, or any
    /// error from [`RecipeMap::load`].
    pub fn discover(explicit: Option<&Path>) -> RecipeResult<Self> {
        let candidates = Self::candidates(explicit);
        match candidates.iter().find(|p| p.is_dir()) {
            Some(root) => {
                debug!(root = %root.display(), "using recipe directory");
                Self::load(root)
            }
            None => Err(RecipeError::NoRecipeDir {
                searched: candidates,
            }),
        }
    }

    /// Indexes every `*.yaml` file under `root`.
    pub fn load(root: &Path) -> RecipeResult<Self> {
        let mut files = Vec::new();
        collect_yaml_files(root, &mut files)?;
        files.sort();

        let mut map = RecipeMap {
            root: root.to_path_buf(),
            entries: BTreeMap::new(),
        };

        for path in files {
            let Some((class, label)) = classify(root, &path) else {
                warn!(path = %path.display(), "ignoring unsupported config");
                continue;
            };
            let class_entries = map.entries.entry(class).or_default();
            if class_entries.contains_key(&label) {
                return Err(RecipeError::DuplicateLabel { class, label, path });
            }
            debug!(%class, %label, path = %path.display(), "registered spec");
            class_entries.insert(label, path);
        }

        Ok(map)
    }

    /// The directory this map was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Labels of the given class, sorted.
    pub fn labels(&self, class: RecipeClass) -> Vec<&str> {
        self.entries
            .get(&class)
            .map(|e| e.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Path of the spec with the given class and label.
    pub fn path(&self, class: RecipeClass, label: &str) -> RecipeResult<&Path> {
        self.entries
            .get(&class)
            .and_then(|e| e.get(label))
            .map(PathBuf::as_path)
            .ok_or_else(|| RecipeError::NotFound {
                class,
                label: label.to_string(),
                suggestion: find_similar(label, self.labels(class)),
            })
    }

    /// Loads a view spec.
    pub fn view(&self, label: &str) -> RecipeResult<ViewSpec> {
        read_spec(self.path(RecipeClass::View, label)?)
    }

    /// Loads a form spec.
    pub fn form(&self, label: &str) -> RecipeResult<FormSpec> {
        read_spec(self.path(RecipeClass::Form, label)?)
    }

    /// Loads a data source spec.
    pub fn source(&self, name: &str) -> RecipeResult<SourceSpec> {
        read_spec(self.path(RecipeClass::Source, name)?)
    }

    /// Summaries of every view, sorted by label.
    pub fn list_views(&self) -> RecipeResult<Vec<ViewSummary>> {
        self.labels(RecipeClass::View)
            .into_iter()
            .map(|label| {
                let path = self.path(RecipeClass::View, label)?;
                let view: ViewSpec = read_spec(path)?;
                Ok(ViewSummary {
                    label: label.to_string(),
                    title: view.title.unwrap_or_default(),
                    path: path.to_path_buf(),
                    description: view.description.unwrap_or_default(),
                })
            })
            .collect()
    }
}

fn collect_yaml_files(dir: &Path, files: &mut Vec<PathBuf>) -> RecipeResult<()> {
    let read_err = |source| RecipeError::Read {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_dir() {
            collect_yaml_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "yaml") {
            files.push(path);
        }
    }
    Ok(())
}

/// Splits `<root>/<class>/<a>/<b>.yaml` into its class and the label `a.b`.
fn classify(root: &Path, path: &Path) -> Option<(RecipeClass, String)> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let mut parts = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    let class = RecipeClass::from_dir_name(&parts.next()?)?;
    let label = parts.collect::<Vec<_>>().join(".");
    if label.is_empty() {
        return None;
    }
    Some((class, label))
}

fn read_spec<T: DeserializeOwned>(path: &Path) -> RecipeResult<T> {
    let content = fs::read_to_string(path).map_err(|source| RecipeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml_ng::from_str(&content).map_err(|source| RecipeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds the best matching label using Levenshtein distance.
fn find_similar<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .into_iter()
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_recipe() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "views/tickets/open.yaml",
            "title: Open\ndescription: Open tickets\nsource: main\nlist: SELECT 1\n",
        );
        write(dir.path(), "views/users.yaml", "source: main\nlist: SELECT 2\n");
        write(
            dir.path(),
            "forms/ticket.yaml",
            "source: main\ninsert: INSERT INTO t VALUES (:a)\n",
        );
        write(
            dir.path(),
            "sources/main.yaml",
            "dialect: sqlite\ndbname: ':memory:'\n",
        );
        write(dir.path(), "scripts/ignored.yaml", "x: 1\n");
        write(dir.path(), "views/notes.txt", "not yaml");
        dir
    }

    #[test]
    fn test_load_labels() {
        let dir = sample_recipe();
        let map = RecipeMap::load(dir.path()).unwrap();
        assert_eq!(map.labels(RecipeClass::View), vec!["tickets.open", "users"]);
        assert_eq!(map.labels(RecipeClass::Form), vec!["ticket"]);
        assert_eq!(map.labels(RecipeClass::Source), vec!["main"]);
    }

    #[test]
    fn test_load_specs() {
        let dir = sample_recipe();
        let map = RecipeMap::load(dir.path()).unwrap();

        let view = map.view("tickets.open").unwrap();
        assert_eq!(view.list, "SELECT 1");

        let form = map.form("ticket").unwrap();
        assert_eq!(form.insert.as_deref(), Some("INSERT INTO t VALUES (:a)"));

        let source = map.source("main").unwrap();
        assert_eq!(source.dbname, ":memory:");
    }

    #[test]
    fn test_not_found_with_suggestion() {
        let dir = sample_recipe();
        let map = RecipeMap::load(dir.path()).unwrap();
        let err = map.view("user").unwrap_err();
        assert!(matches!(
            &err,
            RecipeError::NotFound { suggestion: Some(s), .. } if s == "users"
        ));
        assert_eq!(
            err.to_string(),
            "view 'user' cannot be found. Did you mean 'users'?"
        );
    }

    #[test]
    fn test_not_found_without_suggestion() {
        let dir = sample_recipe();
        let map = RecipeMap::load(dir.path()).unwrap();
        let err = map.form("completely-different").unwrap_err();
        assert_eq!(err.to_string(), "form 'completely-different' cannot be found");
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "views/bad.yaml", "source: [unclosed\n");
        let map = RecipeMap::load(dir.path()).unwrap();
        let err = map.view("bad").unwrap_err();
        assert!(matches!(err, RecipeError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_list_views() {
        let dir = sample_recipe();
        let map = RecipeMap::load(dir.path()).unwrap();
        let views = map.list_views().unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].label, "tickets.open");
        assert_eq!(views[0].title, "Open");
        assert_eq!(views[0].description, "Open tickets");
        assert_eq!(views[1].label, "users");
        assert_eq!(views[1].title, "");
    }

    #[test]
    fn test_discover_prefers_explicit_directory() {
        let dir = sample_recipe();
        let map = RecipeMap::discover(Some(dir.path())).unwrap();
        assert_eq!(map.root(), dir.path());
    }

    #[test]
    fn test_candidates_order() {
        let candidates = RecipeMap::candidates(Some(Path::new("/tmp/mine")));
        assert_eq!(candidates[0], PathBuf::from("/tmp/mine"));
        assert_eq!(candidates[1], PathBuf::from(LOCAL_RECIPE_DIR));
        assert_eq!(candidates.last().unwrap(), &PathBuf::from(SYSTEM_RECIPE_DIR));
    }

    #[test]
    fn test_classify() {
        let root = Path::new("/r");
        assert_eq!(
            classify(root, Path::new("/r/views/a/b/c.yaml")),
            Some((RecipeClass::View, "a.b.c".to_string()))
        );
        assert_eq!(classify(root, Path::new("/r/top.yaml")), None);
        assert_eq!(classify(root, Path::new("/r/other/x.yaml")), None);
    }
}
