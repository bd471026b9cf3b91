//! CLI argument parsing for the TopicFlow builder.
//!
//! Flags override every other configuration source.

use clap::{Parser, Subcommand};

/// TopicFlow project builder
///
/// Turns a year of email metadata and topic-model outputs into the data files
/// of a TopicFlow timeline project.
#[derive(Parser, Debug)]
#[command(name = "topicflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/topicflow/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Project commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a new project and register it with the front-end
    New {
        /// Project name (letters, digits and '_')
        name: String,

        /// Directory with the metadata tables and text files
        #[arg(long)]
        docs: String,

        /// Directory with the topic-model outputs
        #[arg(long)]
        lda: String,

        /// Override the front-end directory
        #[arg(short, long)]
        frontend: Option<String>,
    },

    /// Remove a project and its data files
    Delete {
        /// Project name
        name: String,

        /// Override the front-end directory
        #[arg(short, long)]
        frontend: Option<String>,
    },

    /// List registered projects
    List {
        /// Override the front-end directory
        #[arg(short, long)]
        frontend: Option<String>,
    },

    /// Re-render index.html and controller.js from their templates
    Render {
        /// Override the front-end directory
        #[arg(short, long)]
        frontend: Option<String>,
    },
}

impl Commands {
    /// Front-end directory override of any command.
    pub fn frontend(&self) -> Option<&str> {
        match self {
            Commands::New { frontend, .. }
            | Commands::Delete { frontend, .. }
            | Commands::List { frontend }
            | Commands::Render { frontend } => frontend.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_new() {
        let cli = Cli::parse_from([
            "topicflow", "new", "Trending", "--docs", "/data/docs", "--lda", "/data/lda",
        ]);
        match cli.command {
            Commands::New {
                name,
                docs,
                lda,
                frontend,
            } => {
                assert_eq!(name, "Trending");
                assert_eq!(docs, "/data/docs");
                assert_eq!(lda, "/data/lda");
                assert!(frontend.is_none());
            }
            _ => panic!("Expected New command"),
        }
    }

    #[test]
    fn test_cli_new_requires_inputs() {
        assert!(Cli::try_parse_from(["topicflow", "new", "Trending", "--docs", "/d"]).is_err());
    }

    #[test]
    fn test_cli_delete_with_frontend() {
        let cli = Cli::parse_from(["topicflow", "delete", "Old", "-f", "/srv/topicflow"]);
        assert_eq!(cli.command.frontend(), Some("/srv/topicflow"));
        assert!(matches!(cli.command, Commands::Delete { ref name, .. } if name == "Old"));
    }

    #[test]
    fn test_cli_list() {
        let cli = Cli::parse_from(["topicflow", "list"]);
        assert!(matches!(cli.command, Commands::List { frontend: None }));
    }

    #[test]
    fn test_cli_render() {
        let cli = Cli::parse_from(["topicflow", "render", "--frontend", "web"]);
        assert_eq!(cli.command.frontend(), Some("web"));
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["topicflow", "--config", "/path/to/config.toml", "list"]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["topicflow", "list", "--log-level", "debug"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }
}
