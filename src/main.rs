//! package-model-mcp: MCP server generating 3D models of leadless IC packages
//!
//! Exposes QFN and WSON geometry generation, part naming and FreeCAD script
//! export to AI assistants over stdio.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use package_model_mcp::config::{self, Config};
use package_model_mcp::mcp::{McpServer, PackageTools};

/// MCP server generating 3D models of leadless IC packages.
///
/// Builds QFN and WSON packages from their dimensions and exports them as
/// FreeCAD console scripts.
#[derive(Parser, Debug)]
#[command(name = "package-model-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (default: ~/.package-model-mcp/config.json)
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// More logging: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Level from the flags, or `configured` when none is given.
    const fn log_level(&self, configured: Level) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => configured,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_license_notice() {
    // GPLv3 Section 5d
    eprintln!(
        "package-model-mcp {}  Copyright (C) 2026  The Embedded Society",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
    eprintln!();
}

/// Builds the server from settings and serves stdio until shutdown.
fn serve(cfg: Config) -> io::Result<()> {
    let Config {
        allowed_paths,
        package,
        export,
        ..
    } = cfg;

    let allowed_paths = if allowed_paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        allowed_paths
    };
    info!(
        allowed_paths = ?allowed_paths,
        default_kind = %package.default_kind,
        "Server configured"
    );

    let tools = PackageTools::new(allowed_paths)
        .with_export_colors(export.colors())
        .with_default_kind(package.default_kind);
    let mut server = McpServer::new(tools);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    info!("Waiting for client");
    runtime.block_on(server.run())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("See config/example-config.json for the expected format");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(args.log_level(cfg.logging.level.0));
    print_license_notice();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting package-model-mcp");

    match serve(cfg) {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
