//! Config command - inspect and create the settings file.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use subinfo_store::{Settings, default_config_dir};
use tracing::info;

use super::check::load_settings;
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await?,
        ConfigAction::Path => show_paths(cli)?,
        ConfigAction::Init { force } => init_config(cli, *force).await?,
    }
    Ok(ExitCode::Success)
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Settings::default_path)
}

fn describe(settings: &Settings) -> String {
    let mapping = match (&settings.mapping_file, &settings.mapping_url) {
        (Some(path), _) => format!("file {}", path.display()),
        (None, Some(url)) if !url.trim().is_empty() => url.clone(),
        _ => "disabled".to_string(),
    };
    [
        "SubInfo Configuration".to_string(),
        "─".repeat(40),
        format!("Max concurrent:   {}", settings.max_concurrent),
        format!("Request timeout:  {}s", settings.request_timeout_secs),
        format!("Node timeout:     {}s", settings.node_timeout_secs),
        format!("Mapping timeout:  {}s", settings.mapping_timeout_secs),
        format!("User agent:       {}", settings.user_agent),
        format!("Name mapping:     {mapping}"),
        format!("Inline limit:     {} chars", settings.inline_limit),
        format!("Output dir:       {}", settings.output_dir.display()),
    ]
    .join("\n")
}

async fn show_config(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?;

    match cli.format {
        OutputFormat::Text => println!("{}", describe(&settings)),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = settings_path(cli);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "configDir": config_dir.display().to_string(),
                "settingsFile": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn write_defaults(path: &Path, force: bool) -> Result<()> {
    if !force && tokio::fs::try_exists(path).await? {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Settings::default().save_to(path).await?;
    Ok(())
}

async fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = settings_path(cli);
    write_defaults(&path, force).await?;

    info!(path = %path.display(), "Settings initialized");
    if !cli.quiet {
        println!("Wrote default settings to {}", path.display());
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("settings.json");

        write_defaults(&path, false).await.unwrap();
        assert_eq!(Settings::load_from(&path).await.unwrap(), Settings::default());

        tokio::fs::write(&path, r#"{ "max_concurrent": 9 }"#).await.unwrap();
        let err = write_defaults(&path, false).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(Settings::load_from(&path).await.unwrap().max_concurrent, 9);

        write_defaults(&path, true).await.unwrap();
        assert_eq!(Settings::load_from(&path).await.unwrap().max_concurrent, 5);
    }

    #[test]
    fn test_describe_mapping_source() {
        let text = describe(&Settings::default());
        assert!(text.contains("Max concurrent:   5"));
        assert!(text.contains("Inline limit:     4000 chars"));

        let disabled = Settings {
            mapping_url: None,
            ..Settings::default()
        };
        assert!(describe(&disabled).contains("Name mapping:     disabled"));

        let file = Settings {
            mapping_file: Some(PathBuf::from("/etc/names.txt")),
            ..Settings::default()
        };
        assert!(describe(&file).contains("file /etc/names.txt"));
    }
}
