//! Doula CLI and REST API entry point.
//!
//! Binary name: `doula`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use doula_infra::config::resolve_data_dir;
use state::{AppState, open_database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; the server logs at info by default.
    let serving = matches!(cli.command, Commands::Serve { .. });
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if serving => "info",
        0 => "warn",
        1 => "info,doula=debug",
        _ => "trace",
    };
    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    doula_observe::tracing_setup::init_tracing(filter, otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    doula_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "doula", &mut std::io::stdout());
        }

        Commands::History {
            session,
            limit,
            offset,
        } => {
            let pool = open_database(&resolve_data_dir()).await?;
            cli::history::show(&pool, &session, limit, offset, cli.json).await?;
        }

        Commands::Bp { patient_id } => {
            let pool = open_database(&resolve_data_dir()).await?;
            cli::bp::show(&pool, &patient_id, cli.json).await?;
        }

        Commands::Chat {
            session,
            message,
            user,
        } => {
            let state = AppState::init().await?;
            cli::chat::send(&state, &session, &user, &message, cli.json).await?;
        }

        Commands::Serve { port, host, .. } => {
            let state = AppState::init().await?;
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;

            if !cli.quiet {
                println!(
                    "  {} Doula API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let pool = state.db_pool.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            pool.writer.close().await;
            pool.reader.close().await;
            tracing::info!("Server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
