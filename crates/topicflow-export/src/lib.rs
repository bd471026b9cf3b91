//! # topicflow-export
//!
//! Produces what the TopicFlow front-end loads: the three per-project data
//! files and the project registration in `index.html` and `controller.js`.
//!
//! ## Components
//! - [`Pipeline`]: inputs -> validated corpus, bins and graph -> data files
//! - [`ProjectArtifacts`]: `Doc.js`, `Bins.js` and `TopicSimilarity.js`
//! - [`Registry`]: registered projects and template rendering
//!
//! ## Usage
//!
//! ```rust,ignore
//! use topicflow_export::{Pipeline, Registry};
//!
//! let mut registry = Registry::open(settings.expanded_frontend_dir())?;
//! registry.register("FullDisclosure")?;
//! let report = Pipeline::new(settings).run("FullDisclosure", docs, lda)?;
//! registry.save()?;
//! registry.render()?;
//! ```

pub mod error;
pub mod pipeline;
pub mod registry;
pub mod serializer;

pub use error::{ExportError, RegistryError};
pub use pipeline::{Pipeline, PipelineReport, ProjectInputs};
pub use registry::{ProjectEntry, Registry, RenderedFrontend};
pub use serializer::{extract_payload, project_dir, ProjectArtifacts};
