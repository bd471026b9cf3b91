//! Project registry.
//!
//! The front-end learns about projects through two generated files:
//! `index.html` loads each project's data scripts and lists it in the dataset
//! selector, and `scripts/controller.js` maps a selection to the project's
//! `populate_*` functions. Both are rendered from templates
//! (`index.html.tmpl`, `scripts/controller.js.tmpl`) using the project list in
//! `data/projects.json`, so registering or removing a project never edits a
//! hand-maintained file in place.
//!
//! A placeholder line in a template is replaced by one line per registered
//! project, each carrying the placeholder line's indentation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::serializer::{project_dir, BINS_FILE, DATA_DIR, DOC_FILE, SIMILARITY_FILE};

pub const MANIFEST_FILE: &str = "projects.json";
pub const INDEX_TEMPLATE: &str = "index.html.tmpl";
pub const INDEX_FILE: &str = "index.html";
pub const CONTROLLER_TEMPLATE: &str = "scripts/controller.js.tmpl";
pub const CONTROLLER_FILE: &str = "scripts/controller.js";

pub const SCRIPTS_PLACEHOLDER: &str = "{{topicflow:scripts}}";
pub const SELECTORS_PLACEHOLDER: &str = "{{topicflow:selectors}}";
pub const ID_TO_NAME_PLACEHOLDER: &str = "{{topicflow:id_to_name}}";
pub const DISPATCH_PLACEHOLDER: &str = "{{topicflow:dispatch}}";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    projects: Vec<String>,
}

/// A registered project and its data files, relative to the front-end root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub doc_js: PathBuf,
    pub bins_js: PathBuf,
    pub similarity_js: PathBuf,
}

impl ProjectEntry {
    fn new(name: &str) -> Self {
        let dir = project_dir(Path::new(""), name);
        Self {
            name: name.to_string(),
            doc_js: dir.join(DOC_FILE),
            bins_js: dir.join(BINS_FILE),
            similarity_js: dir.join(SIMILARITY_FILE),
        }
    }
}

/// Rendered front-end files, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrontend {
    pub index_html: String,
    pub controller_js: String,
}

/// Projects known to one front-end directory.
#[derive(Debug, Clone)]
pub struct Registry {
    frontend_dir: PathBuf,
    projects: Vec<String>,
}

impl Registry {
    /// Open the registry of `frontend_dir`. A missing manifest means no projects.
    pub fn open(frontend_dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let frontend_dir = frontend_dir.into();
        let path = manifest_path(&frontend_dir);
        let manifest = if path.is_file() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice::<Manifest>(&bytes)
                .map_err(|source| RegistryError::Manifest { path, source })?
        } else {
            Manifest::default()
        };
        debug!(count = manifest.projects.len(), "Opened project registry");
        Ok(Self {
            frontend_dir,
            projects: manifest.projects,
        })
    }

    pub fn frontend_dir(&self) -> &Path {
        &self.frontend_dir
    }

    /// Check that `name` can be embedded in JavaScript identifiers.
    pub fn validate_name(name: &str) -> Result<(), RegistryError> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(RegistryError::InvalidName(name.to_string()))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.iter().any(|p| p == name)
    }

    /// Add a project. Takes effect on disk after [`Registry::save`].
    pub fn register(&mut self, name: &str) -> Result<(), RegistryError> {
        Self::validate_name(name)?;
        if self.contains(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        self.projects.push(name.to_string());
        Ok(())
    }

    /// Remove a project. Takes effect on disk after [`Registry::save`].
    pub fn unregister(&mut self, name: &str) -> Result<(), RegistryError> {
        let before = self.projects.len();
        self.projects.retain(|p| p != name);
        if self.projects.len() == before {
            return Err(RegistryError::NotRegistered(name.to_string()));
        }
        Ok(())
    }

    /// Registered projects in registration order.
    pub fn projects(&self) -> Vec<ProjectEntry> {
        self.projects.iter().map(|p| ProjectEntry::new(p)).collect()
    }

    /// Write the manifest.
    pub fn save(&self) -> Result<(), RegistryError> {
        let path = manifest_path(&self.frontend_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let manifest = Manifest {
            projects: self.projects.clone(),
        };
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|source| RegistryError::Manifest {
                path: path.clone(),
                source,
            })?;
        fs::write(&path, json)?;
        Ok(())
    }

    /// Render `index.html` and `controller.js` from their templates.
    pub fn render_files(&self) -> Result<RenderedFrontend, RegistryError> {
        let index = self.read_template(INDEX_TEMPLATE)?;
        let controller = self.read_template(CONTROLLER_TEMPLATE)?;

        let index_html = fill(
            &self.frontend_dir.join(INDEX_TEMPLATE),
            &index,
            &[
                (SCRIPTS_PLACEHOLDER, self.fragments(script_tags)),
                (SELECTORS_PLACEHOLDER, self.fragments(selector_item)),
            ],
        )?;
        let controller_js = fill(
            &self.frontend_dir.join(CONTROLLER_TEMPLATE),
            &controller,
            &[
                (ID_TO_NAME_PLACEHOLDER, self.fragments(id_to_name_entry)),
                (DISPATCH_PLACEHOLDER, self.fragments(dispatch_block)),
            ],
        )?;
        Ok(RenderedFrontend {
            index_html,
            controller_js,
        })
    }

    /// Render both front-end files and write them. Nothing is written when
    /// either template is missing or incomplete.
    pub fn render(&self) -> Result<(), RegistryError> {
        let rendered = self.render_files()?;
        fs::write(self.frontend_dir.join(INDEX_FILE), rendered.index_html)?;
        fs::write(self.frontend_dir.join(CONTROLLER_FILE), rendered.controller_js)?;
        info!(
            projects = self.projects.len(),
            dir = %self.frontend_dir.display(),
            "Rendered front-end files"
        );
        Ok(())
    }

    fn read_template(&self, relative: &str) -> Result<String, RegistryError> {
        let path = self.frontend_dir.join(relative);
        if !path.is_file() {
            return Err(RegistryError::MissingTemplate(path));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn fragments(&self, render: fn(&str) -> Vec<String>) -> Vec<String> {
        self.projects.iter().flat_map(|p| render(p)).collect()
    }
}

fn manifest_path(frontend_dir: &Path) -> PathBuf {
    frontend_dir.join(DATA_DIR).join(MANIFEST_FILE)
}

fn script_tags(project: &str) -> Vec<String> {
    [DOC_FILE, BINS_FILE, SIMILARITY_FILE]
        .iter()
        .map(|file| format!(r#"<script src="{DATA_DIR}/{project}/{file}"></script>"#))
        .collect()
}

fn selector_item(project: &str) -> Vec<String> {
    vec![format!(r##"<li id="{project}"><a href="#">{project}</a></li>"##)]
}

fn id_to_name_entry(project: &str) -> Vec<String> {
    vec![format!(r#""{project}":"{project}","#)]
}

fn dispatch_block(project: &str) -> Vec<String> {
    vec![
        format!(r#"if (selected_data==="{project}") {{"#),
        format!("\tpopulate_tweets_{project}();"),
        format!("\tpopulate_bins_{project}();"),
        format!("\tpopulate_similarity_{project}();"),
        "}".to_string(),
    ]
}

/// Replace each placeholder line of `template` with its fragment lines.
fn fill(
    path: &Path,
    template: &str,
    replacements: &[(&'static str, Vec<String>)],
) -> Result<String, RegistryError> {
    for (placeholder, _) in replacements {
        if !template.contains(*placeholder) {
            return Err(RegistryError::MissingPlaceholder {
                template: path.to_path_buf(),
                placeholder: *placeholder,
            });
        }
    }

    let mut out: Vec<String> = Vec::new();
    for line in template.split('\n') {
        let found = replacements
            .iter()
            .find(|(placeholder, _)| line.contains(*placeholder));
        match found {
            Some((_, fragments)) => {
                let indent = &line[..line.len() - line.trim_start().len()];
                out.extend(fragments.iter().map(|f| format!("{indent}{f}")));
            }
            None => out.push(line.to_string()),
        }
    }
    Ok(out.join("\n"))
}
