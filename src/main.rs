//! webui-preview: serve the settings web UI with a mock native bridge

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::net::IpAddr;
use std::path::PathBuf;
use webui_preview::{PreviewConfig, PreviewServer};

/// Serve the embedded web UI in a desktop browser with a mock native bridge
#[derive(Parser)]
#[command(name = "webui-preview")]
#[command(about = "Local preview server for the settings web UI", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "WEBUI_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, short, env = "WEBUI_PORT", default_value = "8080")]
    port: u16,

    /// Directory holding index.html and the css/, js/, images/ folders
    #[arg(long, env = "WEBUI_WEB_DIR", default_value = "web")]
    web_dir: PathBuf,

    /// Override document with a `modelFieldsMap` section
    #[arg(long, env = "WEBUI_CONFIG_FILE", default_value = "config.json")]
    config_file: PathBuf,

    /// Friend document offered to list-selection fields
    #[arg(long, env = "WEBUI_FRIEND_FILE", default_value = "friend.json")]
    friend_file: PathBuf,

    /// Merge the override document into module metadata served by the bridge
    #[arg(long, env = "WEBUI_APPLY_OVERRIDES")]
    apply_overrides: bool,

    /// Value returned by HOOK.getBuildInfo()
    #[arg(long, env = "WEBUI_BUILD_INFO")]
    build_info: Option<String>,

    /// Open the preview in the default browser
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PreviewConfig {
        host: cli.host,
        port: cli.port,
        web_dir: cli.web_dir,
        config_file: cli.config_file,
        friend_file: cli.friend_file,
        apply_overrides: cli.apply_overrides,
        ..PreviewConfig::default()
    };
    if let Some(build_info) = cli.build_info {
        config.build_info = build_info;
    }

    let preview_url = config.index_url();

    println!("\n{}", "Starting Web UI Preview".bright_cyan().bold());
    println!("{}", "─────────────────────────────────".bright_cyan());
    println!(
        "  {} Web Dir:     {}",
        "→".blue(),
        config.web_dir.display().to_string().bright_yellow()
    );
    println!(
        "  {} Overrides:   {}{}",
        "→".blue(),
        config.config_file.display().to_string().bright_magenta(),
        if config.apply_overrides { "" } else { " (not applied)" }
    );
    println!(
        "  {} Friends:     {}",
        "→".blue(),
        config.friend_file.display().to_string().bright_magenta()
    );
    println!("  {} Preview URL: {}", "→".blue(), preview_url.bright_green());
    println!("  {} Press Ctrl+C to stop", "→".blue());
    println!();

    if cli.open {
        tokio::spawn(async move {
            // Give the listener a moment to bind
            tokio::time::sleep(std::time::Duration::from_millis(800)).await;
            if let Err(e) = open::that(&preview_url) {
                eprintln!("Failed to open browser: {}", e);
            }
        });
    }

    PreviewServer::start(config).await
}
