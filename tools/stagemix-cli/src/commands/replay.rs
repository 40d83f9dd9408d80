//! Replay a recorded event stream through a session handler.

use std::path::PathBuf;
use std::sync::Arc;

use stagemix_common::config::RecordingDefaults;
use stagemix_session::{parse_events, MemorySink, SessionConfig, SessionEventHandler};

pub fn run(
    defaults: &RecordingDefaults,
    events_path: PathBuf,
    config_path: Option<PathBuf>,
    shutdown: bool,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => SessionConfig::from_path(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load session config: {e}"))?,
        None => SessionConfig::from_defaults(defaults),
    };

    let content = std::fs::read_to_string(&events_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", events_path.display()))?;
    let events = parse_events(&content)?;
    tracing::info!(
        events = events.len(),
        mode = %config.layout_mode,
        "Replaying session"
    );

    let sink = Arc::new(MemorySink::new());
    let handler = SessionEventHandler::new(config, sink.clone());
    handler.start();
    for event in &events {
        event.dispatch(&handler);
    }
    if shutdown {
        handler.shutdown();
    }

    for command in sink.commands() {
        println!("{}", serde_json::to_string(&command)?);
    }

    let active: Vec<_> = handler.active_participant_ids().into_iter().collect();
    eprintln!(
        "{} event(s), {} recorder command(s), active: [{}]",
        events.len(),
        sink.commands().len(),
        active.join(", ")
    );
    Ok(())
}
