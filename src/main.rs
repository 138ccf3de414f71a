use anyhow::{bail, Context, Result};
use call_insight::explore::MockQueryService;
use call_insight::integration::{
    ChannelActionSink, MemoryClipboard, RecordUpdate, TracingNotifier, ViewerConfig,
};
use call_insight::ui::{Collaborators, InsightViewModel};
use call_insight::InsightError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: call-insight <analysis.json> [--config <viewer.toml>]";

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "call_insight=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let mut document: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let Some(path) = args.next() else {
                    bail!("--config needs a path\n{USAGE}");
                };
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ if document.is_none() => document = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {arg}\n{USAGE}"),
        }
    }
    let Some(document) = document else {
        bail!(USAGE);
    };

    let config = match config_path {
        Some(path) => ViewerConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let raw = std::fs::read_to_string(&document)
        .with_context(|| format!("reading {}", document.display()))?;
    let subject_id = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "subject".to_string());

    info!("Rendering call insight for {}", subject_id);

    let (actions, _action_rx) = ChannelActionSink::new();
    let collaborators = Collaborators {
        query_service: Arc::new(MockQueryService::new()),
        notifier: Arc::new(TracingNotifier),
        clipboard: Arc::new(MemoryClipboard::new()),
        actions: Arc::new(actions),
    };
    let mut view = InsightViewModel::new(subject_id.as_str(), collaborators).with_config(config);

    if let Err(e) = view.apply_record(RecordUpdate::new(subject_id.as_str(), raw)) {
        let e = InsightError::from(e);
        warn!("{} Showing empty analysis: {}", e.user_message(), e);
    }

    let summary = serde_json::json!({
        "subjectId": view.subject_id(),
        "methodology": view.methodology_rows(),
        "objections": view.objection_rows(),
        "showActionButtons": view.show_action_buttons(),
        "effectivenessBarWidth": view.effectiveness_bar_width(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
