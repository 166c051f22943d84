use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use triage::capture::ScriptedCapture;
use triage::export;
use triage::oracle::client::{GenerativeClient, OracleConfig};
use triage::pipeline::event::Event;
use triage::pipeline::state::DashboardState;
use triage::pipeline::TriageDesk;
use triage::stores::Snapshot;

fn snapshot_path() -> PathBuf {
    std::env::var("TRIAGE_SNAPSHOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("triage-snapshot.json"))
}

/// Runs one simulated call through the full pipeline: capture, end-call
/// triage, queue insertion, dispatch. Works offline: with no API key the
/// oracle fails and the local keyword rule classifies.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = OracleConfig::from_env();
    let oracle = Arc::new(GenerativeClient::new(config));

    let path = snapshot_path();
    let restored = Snapshot::load(&path);
    tracing::info!(
        priority = restored.priority.len(),
        calls = restored.calls.len(),
        "snapshot restored"
    );

    let mut desk = TriageDesk::with_state(oracle, DashboardState::restore(restored, 10));
    let tx = desk.sender();
    let cancel = CancellationToken::new();

    desk.handle(Event::SetListening(true)).await;
    let capture = ScriptedCapture::caller_lines(
        &[
            "there is a fire at 10 Main Street",
            "second floor, I can see smoke",
        ],
        Duration::from_millis(50),
    );
    let capture_task = capture.spawn(tx, cancel.clone());

    // Ingest the scripted fragments, ask for mid-call questions, end the call.
    desk.drain_for(Duration::from_millis(500)).await;
    desk.handle(Event::RequestFurtherQuestions).await;
    desk.handle(Event::EndCall).await;

    // Give the best-effort guidance tasks a moment to land.
    desk.drain_for(Duration::from_secs(2)).await;

    if let Some(banner) = &desk.state.banner {
        println!("{banner}");
    }

    if let Some(entry) = desk.state.priority.front().cloned() {
        println!("queued: {} [{}] wait {}", entry.id, entry.level, entry.wait);
        if let Some(board) = desk.state.guidance(&entry.id) {
            for question in &board.comforting {
                println!("  suggested: {question}");
            }
            for detail in &board.details {
                println!("  detail: {detail}");
            }
        }
        desk.handle(Event::Dispatch {
            id: entry.id.clone(),
        })
        .await;
        let progress = desk
            .state
            .dispatch
            .progress(&entry.id, entry.wait, Utc::now());
        println!("dispatched: {} progress {progress:.0}%", entry.id);
    }

    println!("\n{}", export::priority_csv(&desk.state.priority.to_vec()));

    desk.state.snapshot().save(&path)?;
    tracing::info!(path = %path.display(), "snapshot saved");

    cancel.cancel();
    let _ = capture_task.await;
    Ok(())
}
