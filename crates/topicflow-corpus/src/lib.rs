//! # topicflow-corpus
//!
//! Loads the per-month email metadata and text bodies of a corpus year and
//! reconciles them into one dense document id space.
//!
//! ## Components
//! - [`InputLayout`]: where every input lives and how files are named
//! - [`MetadataLoader`]: metadata rows + text bodies -> [`LoadedCorpus`]
//! - [`IdReconciler`]: per-period keys -> contiguous global ids
//!
//! A document that cannot be loaded is skipped and counted in the
//! [`SkipReport`]; only structural problems (missing tables or columns)
//! surface as [`CorpusError`].

pub mod error;
pub mod layout;
pub mod loader;
pub mod metadata;
pub mod normalize;
pub mod reconciler;

pub use error::CorpusError;
pub use layout::{detect_year, document_key, text_filename, InputLayout, MatrixLabel};
pub use loader::{Candidate, LoadOutcome, LoadedCorpus, MetadataLoader, SkipReason, SkipReport};
pub use metadata::{read_metadata, MetadataRow};
pub use reconciler::{IdReconciler, IdSpace};
