use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mixer_core::InMemoryMixer;
use mixer_host::MixerHost;
use mixer_host::ipc;
use serde_json::json;

const GAME: &str = r"C:\Games\Arena\arena.exe";
const CHAT: &str = r"C:\Users\me\AppData\Local\Chat\chat.exe";
const MUSIC: &str = r"C:\Program Files\Music\music.exe";

#[derive(Parser)]
#[command(name = "mixerd", about = "Per-application mixer controller (demo host)")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the poll interval from the settings file
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Number of poll cycles to run before exiting
    #[arg(long, default_value_t = 6)]
    cycles: u32,
}

/// A stand-in mixer with a few applications and the system session.
fn demo_mixer() -> Arc<InMemoryMixer> {
    Arc::new(
        InMemoryMixer::new()
            .with_system_session(false)
            .with_session(4120, GAME, "Arena", false)
            .with_session(5210, CHAT, "Chat", false)
            .with_session(6333, MUSIC, "Music", false)
            .with_master(0.65, false)
            .with_active_window(GAME),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Respects RUST_LOG, defaults to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let settings_path = cli.config.or_else(mixer_settings::Settings::default_path);
    let mut settings = settings_path
        .as_deref()
        .map(mixer_settings::load_or_default)
        .unwrap_or_default();
    if let Some(interval) = cli.poll_interval_ms {
        settings.poll_interval_ms = interval;
    }
    let interval = Duration::from_millis(settings.poll_interval_ms.max(1));

    let mixer = demo_mixer();
    let host = MixerHost::start(mixer.clone(), mixer.clone(), settings, settings_path)?;
    let mut events = host.subscribe();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(event = event.name(), "{json}"),
                Err(e) => tracing::warn!("failed to encode event: {e}"),
            }
        }
    });

    ipc::dispatch(host.state(), "init", &json!(null)).map_err(anyhow::Error::msg)?;

    // A short scripted session: solo the game, lock chat, send music to the
    // background, then switch focus around.
    let script: Vec<(&str, serde_json::Value)> = vec![
        ("session-solo", json!(4120)),
        ("session-solo", json!(4120)),
        ("session-lock", json!(5210)),
        ("session-background-mute", json!(6333)),
        ("volume-modified", json!([4120, 80])),
    ];

    for cycle in 0..cli.cycles {
        if let Some((event_type, data)) = script.get(cycle as usize) {
            if let Err(e) = ipc::dispatch(host.state(), event_type, data) {
                tracing::warn!(event_type, "command failed: {e}");
            }
        }
        if cycle == 3 {
            mixer.set_active_window(MUSIC);
        }
        tokio::time::sleep(interval).await;
    }

    host.stop().await;
    printer.abort();
    Ok(())
}
