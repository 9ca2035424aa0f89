//! Reflecto CLI and REST API entry point.
//!
//! Binary name: `reflecto`
//!
//! Parses CLI arguments, initializes state, then dispatches to the
//! appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use reflecto_core::conversation::ConversationStore;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,reflecto=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "reflecto", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Reflecto API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Ask { text, session } => {
            // Resume from the session file when present; a missing or
            // corrupt file starts a fresh conversation.
            let mut store = match &session {
                Some(path) => match tokio::fs::read(path).await {
                    Ok(bytes) => match ConversationStore::restore(&bytes) {
                        Ok(store) => store,
                        Err(err) => {
                            warn!(path = %path.display(), %err, "Corrupt conversation file, starting fresh");
                            ConversationStore::new(&state.config.preamble)
                        }
                    },
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                        ConversationStore::new(&state.config.preamble)
                    }
                    Err(err) => return Err(err.into()),
                },
                None => ConversationStore::new(&state.config.preamble),
            };

            let reply = state.orchestrator.respond(&mut store, &text).await;

            if let Some(path) = &session {
                let bytes = store.serialize()?;
                tokio::fs::write(path, bytes).await?;
            }

            println!("{reply}");
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
