use crate::event::HttpRequestEvent;
use anyhow::Context;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Normalize one event and print the canonical request as JSON.
pub fn normalize(event: Option<&Path>, compact: bool) -> anyhow::Result<()> {
    let request = load_event(event)?;

    info!(
        method = request.method(),
        path = request.path(),
        variant = ?request.variant(),
        "normalized http event"
    );

    println!("{}", render(&request.view(), compact)?);
    Ok(())
}

/// Print only the detected payload variant.
pub fn detect(event: Option<&Path>) -> anyhow::Result<()> {
    let request = load_event(event)?;
    println!("{}", render(&request.variant(), false)?);
    Ok(())
}

pub fn load_event(event: Option<&Path>) -> anyhow::Result<HttpRequestEvent> {
    let raw = read_event(event)?;
    HttpRequestEvent::from_slice(&raw).context("event is not a supported HTTP event")
}

/// Reads the event document from a file, or stdin when no path is given.
pub fn read_event(event: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match event {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read event file {}", path.display())),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read event from stdin")?;
            Ok(buf)
        }
    }
}

pub fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(out)
}
