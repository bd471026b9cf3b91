//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

use topicflow_corpus::CorpusError;
use topicflow_topics::TopicsError;

/// Errors raised while building or writing a project's data files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Input corpus could not be loaded
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// Topic-model outputs could not be read or joined
    #[error(transparent)]
    Topics(#[from] TopicsError),

    /// Project name or front-end problem
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the project registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Project names become part of JavaScript identifiers
    #[error("Invalid project name '{0}': use ASCII letters, digits and '_', not starting with a digit")]
    InvalidName(String),

    #[error("Project '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Project '{0}' is not registered")]
    NotRegistered(String),

    /// A front-end template file is absent
    #[error("Template not found: {0}")]
    MissingTemplate(PathBuf),

    /// A template lacks one of its insertion points
    #[error("Template {template} has no '{placeholder}' placeholder")]
    MissingPlaceholder {
        template: PathBuf,
        placeholder: &'static str,
    },

    /// The project manifest is not valid JSON
    #[error("Invalid project manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
