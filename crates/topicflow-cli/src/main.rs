//! TopicFlow project builder
//!
//! # Usage
//!
//! ```bash
//! topicflow new <NAME> --docs DIR --lda DIR [--frontend DIR]
//! topicflow delete <NAME> [--frontend DIR]
//! topicflow list [--frontend DIR]
//! topicflow render [--frontend DIR]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/topicflow/config.toml)
//! 3. Environment variables (TOPICFLOW_*)
//! 4. CLI flags

use std::path::Path;

use anyhow::Result;
use clap::Parser;

use topicflow_cli::{
    create_project, delete_project, init_logging, load_settings, print_report, render_frontend,
    show_projects, Cli, Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(
        cli.config.as_deref(),
        cli.log_level.as_deref(),
        cli.command.frontend(),
    )?;
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::New { name, docs, lda, .. } => {
            let report = create_project(&settings, &name, Path::new(&docs), Path::new(&lda))?;
            print_report(&report);
        }
        Commands::Delete { name, .. } => {
            delete_project(&settings, &name)?;
            println!("Project '{name}' deleted");
        }
        Commands::List { .. } => {
            show_projects(&settings)?;
        }
        Commands::Render { .. } => {
            render_frontend(&settings)?;
            println!("Front-end files rendered in {}", settings.frontend_dir);
        }
    }

    Ok(())
}
