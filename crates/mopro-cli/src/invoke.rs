//! # Subcommand Handlers
//!
//! Each handler forwards to [`BridgeModule`] and turns the answer into JSON
//! for stdout. Argument decoding, preconditions and error mapping all
//! happen in the bridge; nothing here knows about proofs.

use std::io::Read;

use anyhow::Context;
use serde_json::{json, Value};

use mopro_bridge::{BridgeModule, ChangeEvent};
use mopro_core::Rejection;

/// What a `call` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Resolved(Value),
    Rejected(Rejection),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Resolved(_) => 0,
            Self::Rejected(_) => 1,
        }
    }
}

/// Parse the positional argument array.
///
/// `None` means no arguments. `"-"` reads the array from stdin.
pub fn parse_args(raw: Option<&str>) -> anyhow::Result<Vec<Value>> {
    let text = match raw {
        None => return Ok(Vec::new()),
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read arguments from stdin")?;
            buf
        }
        Some(text) => text.to_string(),
    };
    let value: Value =
        serde_json::from_str(&text).context("arguments are not valid JSON")?;
    match value {
        Value::Array(args) => Ok(args),
        other => anyhow::bail!("arguments must be a JSON array, got {other}"),
    }
}

/// Invoke a module function by name.
pub async fn run_call(module: &BridgeModule, name: &str, args: Vec<Value>) -> Outcome {
    match module.call(name, args).await {
        Ok(value) => Outcome::Resolved(value),
        Err(err) => {
            tracing::debug!(code = err.code(), "call rejected");
            Outcome::Rejected(Rejection::from(err))
        }
    }
}

/// Module name, callable functions and emitted events.
pub fn listing(module: &BridgeModule) -> Value {
    json!({
        "module": module.name(),
        "functions": module.function_names(),
        "events": module.event_names(),
    })
}

pub fn constants(module: &BridgeModule) -> Value {
    Value::Object(module.constants())
}

/// Subscribe to `onChange`, set `value`, and return the event received.
pub async fn run_watch(module: &BridgeModule, value: String) -> anyhow::Result<ChangeEvent> {
    let mut events = module.subscribe();
    module.set_value_async(value).await;
    events
        .recv()
        .await
        .context("onChange channel closed before an event arrived")
}
