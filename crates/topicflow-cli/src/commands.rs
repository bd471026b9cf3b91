//! Command implementations for the TopicFlow builder.
//!
//! Handles:
//! - new: build a project's data files, register it, re-render the front-end
//! - delete: unregister a project and remove its data files
//! - list: show registered projects
//! - render: re-render the front-end files from their templates

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use topicflow_export::{project_dir, Pipeline, PipelineReport, ProjectEntry, Registry};
use topicflow_types::Settings;

/// Load configuration (defaults -> file -> env) and apply CLI overrides.
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    frontend_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(frontend) = frontend_override {
        settings.frontend_dir = frontend.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Build a new project and register it.
///
/// The name and the front-end templates are checked before any input is
/// read, so a rejected project leaves the front-end untouched.
pub fn create_project(settings: &Settings, name: &str, docs: &Path, lda: &Path) -> Result<PipelineReport> {
    let frontend = settings.expanded_frontend_dir();
    let mut registry = Registry::open(&frontend).context("Failed to open project registry")?;
    registry
        .register(name)
        .with_context(|| format!("Cannot create project '{name}'"))?;
    registry
        .render_files()
        .context("Front-end templates are not usable")?;

    info!(project = name, docs = %docs.display(), lda = %lda.display(), "Creating project");
    let report = Pipeline::new(settings.clone())
        .run(name, docs, lda)
        .with_context(|| format!("Failed to build project '{name}'"))?;

    registry.save().context("Failed to save project registry")?;
    registry.render().context("Failed to render front-end files")?;
    Ok(report)
}

/// Unregister a project and remove its data directory.
pub fn delete_project(settings: &Settings, name: &str) -> Result<()> {
    let frontend = settings.expanded_frontend_dir();
    let mut registry = Registry::open(&frontend).context("Failed to open project registry")?;
    registry
        .unregister(name)
        .with_context(|| format!("Cannot delete project '{name}'"))?;
    registry
        .render_files()
        .context("Front-end templates are not usable")?;

    let dir = project_dir(&frontend, name);
    if dir.is_dir() {
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
        info!(dir = %dir.display(), "Removed project data");
    } else {
        warn!(dir = %dir.display(), "Project data directory not found");
    }

    registry.save().context("Failed to save project registry")?;
    registry.render().context("Failed to render front-end files")?;
    Ok(())
}

/// Registered projects of the configured front-end.
pub fn list_projects(settings: &Settings) -> Result<Vec<ProjectEntry>> {
    let registry = Registry::open(settings.expanded_frontend_dir())
        .context("Failed to open project registry")?;
    Ok(registry.projects())
}

/// Re-render the front-end files.
pub fn render_frontend(settings: &Settings) -> Result<()> {
    let registry = Registry::open(settings.expanded_frontend_dir())
        .context("Failed to open project registry")?;
    registry.render().context("Failed to render front-end files")?;
    Ok(())
}

/// Print the project list.
pub fn show_projects(settings: &Settings) -> Result<()> {
    let projects = list_projects(settings)?;
    if projects.is_empty() {
        println!("No projects registered in {}", settings.frontend_dir);
        return Ok(());
    }
    println!("Projects ({}):", projects.len());
    for project in projects {
        println!("  {}  {}", project.name, project.doc_js.display());
    }
    Ok(())
}

/// Print a pipeline report.
pub fn print_report(report: &PipelineReport) {
    println!("Project '{}' created for {}", report.project, report.year);
    println!("  Documents: {} ({})", report.documents, report.skips);
    for (bin, joined) in report.joined.iter().enumerate() {
        println!("  Bin {bin:>2}: {joined} documents with topics");
    }
    println!("  Similarity links: {}", report.links);
    println!("  Output: {}", report.output_dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(frontend: &Path) -> Settings {
        Settings {
            frontend_dir: frontend.to_string_lossy().into_owned(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_list_empty_frontend() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_projects(&settings(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_delete_unknown_project_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = delete_project(&settings(dir.path()), "Nope").unwrap_err();
        assert!(err.to_string().contains("Cannot delete project 'Nope'"));
    }

    #[test]
    fn test_create_with_invalid_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_project(
            &settings(dir.path()),
            "no spaces allowed",
            Path::new("docs"),
            Path::new("lda"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cannot create project"));
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn test_create_without_templates_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_project(
            &settings(dir.path()),
            "Demo",
            Path::new("docs"),
            Path::new("lda"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("templates"));
        assert!(!dir.path().join("data").exists());
    }
}
