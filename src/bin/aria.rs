//! Console front end for the assistant.
//!
//! Stdin lines stand in for the microphone + speech-recognition engine and
//! responses are spoken to stdout, so the whole dispatch/scheduling core
//! runs end-to-end without audio hardware. Tracing goes to stderr.

use aria::apps::ProcessKiller;
use aria::capture::ChannelCapture;
use aria::config::AssistantConfig;
use aria::llm::ChatClient;
use aria::search::BrowserSearch;
use aria::session::Session;
use aria::speech::ConsoleSpeech;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aria=info")),
        )
        .init();

    let mut config = load_config()?;
    if config.llm.api_key.is_empty()
        && let Ok(key) = std::env::var(&config.llm.api_key_env)
        && !key.trim().is_empty()
    {
        config.llm.api_key = key;
    }

    if std::env::args().any(|arg| arg == "--notes") {
        println!("{}", aria::notes::read_notes(&config.notes.path));
        return Ok(());
    }

    let (line_tx, line_rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        while let Some(Ok(line)) = lines.next() {
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    let capture = ChannelCapture::new(
        line_rx,
        Duration::from_secs(config.capture.listen_timeout_secs),
    );
    let model = ChatClient::new(&config.llm)?;
    let search = BrowserSearch::new(config.search.query_url.clone());

    let session = Session::new(
        config,
        Box::new(capture),
        Box::new(ConsoleSpeech),
        Box::new(model),
        Box::new(search),
        Box::new(ProcessKiller),
    );

    let cancel = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            cancel.cancel();
        }
    });

    session.run().await?;
    Ok(())
}

fn load_config() -> anyhow::Result<AssistantConfig> {
    let path = AssistantConfig::default_config_path();
    if path.exists() {
        let config = AssistantConfig::from_file(&path)
            .map_err(|e| anyhow::anyhow!("cannot load {}: {e}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        Ok(AssistantConfig::default())
    }
}
