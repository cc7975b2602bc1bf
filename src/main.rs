//! streamdeck-counter plugin entry point.
//!
//! A minimal plugin built on the SDK: each placed key shows a number that
//! goes up by one on every press and survives restarts through the key's
//! settings.

use std::collections::HashMap;

use serde_json::{Value, json};

use streamdeck_sdk::config::LogConfig;
use streamdeck_sdk::domain::events::{DidReceiveSettings, KeyDown, WillAppear, WillDisappear};
use streamdeck_sdk::domain::{SetTitlePayload, Target};
use streamdeck_sdk::handler::{Action, ActionContext, HandlerResult, NoopPlugin};
use streamdeck_sdk::logging::init_logging;
use streamdeck_sdk::ws::Session;

/// Action kind from the plugin manifest.
const COUNTER_UUID: &str = "com.example.counter.increment";

/// Per-key press counter.
#[derive(Debug, Default)]
struct CounterAction {
    counts: HashMap<String, u64>,
}

impl CounterAction {
    fn count_from(settings: &Value) -> u64 {
        settings.get("count").and_then(Value::as_u64).unwrap_or(0)
    }

    fn show(cx: &ActionContext, count: u64) -> HandlerResult {
        cx.set_title(&SetTitlePayload {
            title: Some(count.to_string()),
            target: Target::Both,
            state: None,
        })?;
        Ok(())
    }
}

impl Action for CounterAction {
    fn uuid(&self) -> &str {
        COUNTER_UUID
    }

    fn on_will_appear(&mut self, cx: &ActionContext, event: &WillAppear) -> HandlerResult {
        let count = Self::count_from(&event.payload.settings);
        self.counts.insert(cx.context().to_string(), count);
        Self::show(cx, count)
    }

    fn on_will_disappear(&mut self, cx: &ActionContext, _event: &WillDisappear) -> HandlerResult {
        self.counts.remove(cx.context());
        Ok(())
    }

    fn on_did_receive_settings(
        &mut self,
        cx: &ActionContext,
        event: &DidReceiveSettings,
    ) -> HandlerResult {
        let count = Self::count_from(&event.payload.settings);
        self.counts.insert(cx.context().to_string(), count);
        Self::show(cx, count)
    }

    fn on_key_down(&mut self, cx: &ActionContext, _event: &KeyDown) -> HandlerResult {
        let count = self.counts.entry(cx.context().to_string()).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        tracing::debug!(context = cx.context(), count, "counter incremented");
        cx.set_settings(json!({ "count": count }))?;
        Self::show(cx, count)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; the guard flushes the log file on exit
    let _guard = init_logging(&LogConfig::from_env())?;

    // Parse launch arguments and wire actions
    let session = Session::from_env(NoopPlugin, vec![Box::new(CounterAction::default())])?;
    tracing::info!(
        plugin_uuid = %session.state().plugin_uuid,
        url = %session.state().websocket_url(),
        "starting streamdeck-counter"
    );

    // Serve until the host closes the connection
    session.run().await?;
    tracing::info!("host closed the connection");

    Ok(())
}
