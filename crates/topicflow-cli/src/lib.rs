//! TopicFlow builder library exports.
//!
//! This crate provides the `topicflow` binary.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (new, delete, list, render)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    create_project, delete_project, init_logging, list_projects, load_settings, print_report,
    render_frontend, show_projects,
};
