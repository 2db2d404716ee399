//! Default mode: HTTPS server plus the interactive input session.

use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;
use stencil_core::AppConfig;
use stencil_core::session::{InputSession, SessionSummary};
use stencil_infrastructure::{ResultsDirectory, StencilPaths, TlsCredentials};
use stencil_server::{HttpsServer, ServerState};
use tokio::sync::oneshot;

use crate::readline::ReadlinePrompter;

pub async fn run(config: AppConfig) -> Result<()> {
    let paths = StencilPaths::new(&config.root);
    tracing::info!("Installation root: {:?}", paths.root());

    // ===== Startup (every failure here is fatal) =====
    let tls_config = TlsCredentials::new(paths.cert_file(), paths.key_file())
        .load()
        .context("Failed to load TLS credentials")?;

    let results = ResultsDirectory::open_or_create(paths.results_dir())
        .context("Failed to prepare results directory")?;

    let state = ServerState::new(results.clone(), config.base_url());
    let server = HttpsServer::bind(config.listen_addr(), tls_config, state)
        .await
        .context("Failed to start HTTPS server")?;
    let local_addr = server.local_addr().context("Failed to read listener address")?;
    tracing::info!("HTTPS server listening on {}", local_addr);

    let server_task = tokio::spawn(server.serve());

    println!("{}", "=== Stencil ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Serving generated files at {}/", config.base_url()).bright_black()
    );
    println!();

    // ===== Input session =====
    // The line editor blocks, so it gets its own OS thread. A plain thread
    // (not spawn_blocking) lets the process exit on Ctrl-C while a read is
    // still pending.
    let (done_tx, done_rx) = oneshot::channel();
    let base_url = config.base_url();
    thread::Builder::new()
        .name("stencil-session".to_string())
        .spawn(move || {
            let outcome = ReadlinePrompter::new()
                .and_then(|prompter| InputSession::new(prompter, results, base_url).run());
            let _ = done_tx.send(outcome);
        })
        .context("Failed to start input session")?;

    let outcome = tokio::select! {
        received = done_rx => match received {
            Ok(outcome) => outcome.map(Some).context("Input session failed"),
            Err(_) => Err(anyhow::anyhow!("Input session stopped unexpectedly")),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
            Ok(None)
        }
    };

    server_task.abort();

    if let Some(SessionSummary { rendered, published }) = outcome? {
        tracing::info!(rendered, published, "Session finished");
    }
    Ok(())
}
