//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for kbackup using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// kbackup - Knowledge-base export and backup tool
#[derive(Parser, Debug)]
#[command(name = "kbackup")]
#[command(version, about, long_about = None)]
#[command(author = "Kbackup Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "kbackup.toml", env = "KBACKUP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "KBACKUP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the batch backup: export, download, and ship every configured project
    Backup(commands::backup::BackupArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_backup() {
        let cli = Cli::parse_from(["kbackup", "backup"]);
        assert_eq!(cli.config, "kbackup.toml");
        assert!(matches!(cli.command, Commands::Backup(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["kbackup", "--config", "custom.toml", "backup"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["kbackup", "--log-level", "debug", "backup"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["kbackup", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["kbackup", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test]
    fn test_cli_parse_backup_with_project_override() {
        let cli = Cli::parse_from(["kbackup", "backup", "--project-id", "101,202"]);
        let Commands::Backup(args) = cli.command else {
            panic!("expected backup command");
        };
        assert_eq!(args.project_id.as_deref(), Some("101,202"));
    }
}
