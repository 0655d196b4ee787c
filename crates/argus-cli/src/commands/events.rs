//! Events command implementation

use anyhow::{bail, Context, Result};
use argus::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

pub struct EventsArgs {
    pub tail: bool,
    pub page_size: u32,
    pub force: bool,
    pub kinds: Vec<String>,
    pub long: bool,
    pub objects: Vec<String>,
}

/// One output line, matching the service's event record shape.
#[derive(Serialize)]
struct Record {
    #[serde(skip_serializing_if = "String::is_empty")]
    object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    r#type: Option<String>,
    created: chrono::DateTime<chrono::Utc>,
    category: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<i64>,
}

impl Record {
    fn write_line(&self) {
        let when = self.created.format("%a %b %e %T %Y");
        let mut extras = String::new();
        if let Some(key) = self.key {
            extras.push_str(&format!(" [{key}]"));
        }
        if let Some(kind) = &self.r#type {
            extras.push_str(&format!(" [{kind}]"));
        }
        println!("[{}] [{}]{} {}", when, self.category, extras, self.message);
    }
}

fn parse_object(s: &str) -> Result<ObjectRef> {
    match s.split_once(':') {
        Some((kind, id)) if !kind.is_empty() && !id.is_empty() => Ok(ObjectRef::new(kind, id)),
        _ => bail!("invalid object reference {s:?}, expected KIND:ID"),
    }
}

/// Category resolution mirroring the manager: extended events carry their
/// own severity, classic events consult the classification map.
fn category_of(event: &Event, categories: &HashMap<String, String>) -> String {
    match &event.kind {
        EventKind::Extended { severity, .. } => match severity.as_deref() {
            None | Some("") => "info".to_string(),
            Some(s) => s.to_string(),
        },
        EventKind::Classic { type_name } => {
            categories.get(type_name).cloned().unwrap_or_default()
        }
    }
}

pub async fn execute(seed_path: PathBuf, json: bool, args: EventsArgs) -> Result<()> {
    let (seed, sim) = super::load_sim(&seed_path)?;

    let objects: Vec<ObjectRef> = if args.objects.is_empty() {
        seed.objects.iter().map(|o| o.object.clone()).collect()
    } else {
        args.objects
            .iter()
            .map(|s| parse_object(s))
            .collect::<Result<_>>()?
    };
    if objects.is_empty() {
        bail!("seed file names no objects and none were given");
    }
    let multiple = objects.len() > 1;

    let source = std::sync::Arc::new(sim);
    let manager = EventManager::new(source.clone())
        .with_config(ProcessorConfig::default().with_page_size(args.page_size));

    // Fetched once up front; the classification map is static.
    let categories = source
        .event_categories()
        .await
        .context("Failed to fetch event categories")?;

    let cancel = CancellationToken::new();
    if args.tail {
        eprintln!("Tailing event streams... (Press Ctrl+C to stop)");
        let canceller = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                canceller.cancel();
            }
        });
    }

    let opts = EventsOptions {
        page_size: args.page_size,
        tail: args.tail,
        force: args.force,
        kinds: args.kinds.clone(),
        cancel: Some(cancel),
        ..Default::default()
    };

    manager
        .events_with(&objects, opts, |obj, events| {
            if multiple && !json {
                println!("\n==> {obj} <==");
            }
            for event in events {
                let record = Record {
                    object: if multiple { obj.to_string() } else { String::new() },
                    r#type: args.long.then(|| event.type_name().to_string()),
                    created: event.created,
                    category: category_of(&event, &categories),
                    message: event.message.trim().to_string(),
                    key: args.long.then_some(event.key),
                };
                if json {
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    record.write_line();
                }
            }
            Ok(())
        })
        .await?;

    Ok(())
}
