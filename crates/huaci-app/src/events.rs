use std::sync::Arc;

use huaci_config::Settings;
use huaci_types::{LookupRequest, LookupResult};
use kanal::{AsyncReceiver, AsyncSender};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::profile::save_profile;
use crate::state::AppState;

/// A decoded message from the extension
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Lookup {
        id: Option<u64>,
        request: LookupRequest,
    },
    /// Full settings mapping after an options page change
    Settings { id: Option<u64>, settings: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outbound {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(flatten)]
    pub body: Reply,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Lookup(LookupResult),
    Host(HostReply),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostReply {
    Settings {
        #[serde(rename = "translationConfigured")]
        translation_configured: bool,
    },
    Error {
        message: String,
    },
}

impl Outbound {
    pub fn lookup(id: Option<u64>, result: LookupResult) -> Self {
        Self {
            id,
            body: Reply::Lookup(result),
        }
    }

    pub fn error(id: Option<u64>, message: impl Into<String>) -> Self {
        Self {
            id,
            body: Reply::Host(HostReply::Error {
                message: message.into(),
            }),
        }
    }
}

/// Parse `{id?, action, msg}` or `{id?, action: "settings", settings}`
pub fn parse_inbound(frame: &[u8]) -> Result<Inbound, serde_json::Error> {
    let mut value: Value = serde_json::from_slice(frame)?;
    let id = match &mut value {
        Value::Object(map) => map.remove("id").and_then(|id| id.as_u64()),
        _ => None,
    };

    if value.get("action").and_then(Value::as_str) == Some("settings") {
        let settings = value.get_mut("settings").map(Value::take).unwrap_or(Value::Null);
        return Ok(Inbound::Settings { id, settings });
    }

    let request = serde_json::from_value(value)?;
    Ok(Inbound::Lookup { id, request })
}

/// Dispatch inbound messages until shutdown
pub async fn event_loop(
    state: Arc<AppState>,
    inbound_rx: AsyncReceiver<Inbound>,
    outbound_tx: AsyncSender<Outbound>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("event loop started");
    loop {
        let message = tokio::select! {
            message = inbound_rx.recv() => message?,
            _ = cancel.cancelled() => break,
        };

        handle_events(state.clone(), message, &outbound_tx).await?;
    }

    tracing::info!("event loop stopped");
    Ok(())
}

pub async fn handle_events(
    state: Arc<AppState>,
    message: Inbound,
    outbound_tx: &AsyncSender<Outbound>,
) -> anyhow::Result<()> {
    match message {
        Inbound::Lookup { id, request } => {
            tracing::debug!("lookup {:?} via {}", id, request.provider_name());

            // lookups run concurrently; the writer serializes replies
            let tx = outbound_tx.clone();
            tokio::spawn(async move {
                let result = state.lookup.handle(request).await;
                if let Err(e) = tx.send(Outbound::lookup(id, result)).await {
                    tracing::error!("failed to queue reply: {e}");
                }
            });
        }
        Inbound::Settings { id, settings } => {
            let reply = match apply_settings(&state, settings) {
                Ok(settings) => Outbound {
                    id,
                    body: Reply::Host(HostReply::Settings {
                        translation_configured: settings.translation_configured(),
                    }),
                },
                Err(e) => {
                    tracing::warn!("settings update rejected: {e}");
                    Outbound::error(id, e.to_string())
                }
            };
            outbound_tx.send(reply).await?;
        }
    }

    Ok(())
}

fn apply_settings(state: &AppState, value: Value) -> anyhow::Result<Arc<Settings>> {
    let settings = state.settings.replace(Settings::from_value(value)?)?;

    if let Some(path) = &state.config.profile_path {
        if let Err(e) = save_profile(path, &settings) {
            tracing::error!("failed to persist settings to {}: {e}", path.display());
        }
    }

    Ok(settings)
}
