//! # Host Module
//!
//! Everything a host binding exposes under one module name: the proof
//! command table plus three ancillary members that never touch a prover.
//!
//! - `hello()`: a fixed greeting.
//! - `PI`: a numeric constant.
//! - `setValueAsync(value)`: broadcasts an `onChange` event to subscribers.
//!   Fire-and-forget; with nobody listening the value is dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use mopro_core::BridgeError;

use crate::command::{self, Command};
use crate::dispatcher::Dispatcher;

/// Name bindings register the module under.
pub const MODULE_NAME: &str = "MoproBridge";

pub const GREETING: &str = "Hello world! 👋";

pub const PI: f64 = std::f64::consts::PI;

/// The only event the module emits.
pub const ON_CHANGE: &str = "onChange";

const HELLO: &str = "hello";
const SET_VALUE_ASYNC: &str = "setValueAsync";

/// Buffered `onChange` events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 64;

/// Payload of an `onChange` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub value: String,
}

/// The module a host binding registers.
#[derive(Debug, Clone)]
pub struct BridgeModule {
    dispatcher: Dispatcher,
    events: broadcast::Sender<ChangeEvent>,
}

impl BridgeModule {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { dispatcher, events }
    }

    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn hello(&self) -> &'static str {
        GREETING
    }

    pub fn constants(&self) -> Map<String, Value> {
        let mut constants = Map::new();
        constants.insert("PI".to_string(), Value::from(PI));
        constants
    }

    /// Event names the module can emit.
    pub fn event_names(&self) -> &'static [&'static str] {
        &[ON_CHANGE]
    }

    /// Every name [`BridgeModule::call`] accepts.
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names = vec![HELLO, SET_VALUE_ASYNC];
        names.extend(Command::ALL.iter().map(|c| c.name()));
        names
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    pub async fn set_value_async(&self, value: impl Into<String>) {
        let event = ChangeEvent {
            value: value.into(),
        };
        if self.events.send(event).is_err() {
            tracing::trace!(event = ON_CHANGE, "no subscribers; event dropped");
        }
    }

    /// Invoke a module function by name with positional JSON arguments.
    pub async fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        match name {
            HELLO => {
                command::decode_args::<Vec<Value>>(HELLO, 0, args)?;
                Ok(Value::from(self.hello()))
            }
            SET_VALUE_ASYNC => {
                let (value,): (String,) = command::decode_args(SET_VALUE_ASYNC, 1, args)?;
                self.set_value_async(value).await;
                Ok(Value::Null)
            }
            other => {
                let command = other.parse::<Command>()?;
                command::dispatch(&self.dispatcher, command, args).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mopro_engine::Engines;
    use serde_json::json;

    fn module() -> BridgeModule {
        BridgeModule::new(Dispatcher::new(Engines::mock()))
    }

    #[tokio::test]
    async fn hello_returns_greeting() {
        let value = module().call("hello", vec![]).await.unwrap();
        assert_eq!(value, json!("Hello world! 👋"));
    }

    #[tokio::test]
    async fn hello_takes_no_arguments() {
        let err = module().call("hello", vec![json!(1)]).await.unwrap_err();
        assert_eq!(err.code(), "InvalidArguments");
    }

    #[test]
    fn constants_expose_pi() {
        let constants = module().constants();
        assert_eq!(constants["PI"].as_f64(), Some(std::f64::consts::PI));
    }

    #[tokio::test]
    async fn set_value_broadcasts_on_change() {
        let module = module();
        let mut rx = module.subscribe();
        module
            .call("setValueAsync", vec![json!("zk")])
            .await
            .unwrap();
        assert_eq!(rx.recv().await.unwrap(), ChangeEvent { value: "zk".into() });
    }

    #[tokio::test]
    async fn set_value_without_subscribers_is_a_no_op() {
        module().set_value_async("nobody listening").await;
    }

    #[tokio::test]
    async fn unknown_function_is_rejected() {
        let err = module().call("generateStarkProof", vec![]).await.unwrap_err();
        assert_eq!(err.code(), "UnknownCommand");
    }

    #[test]
    fn function_names_cover_the_table() {
        let names = module().function_names();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"getNoirVerificationKey"));
        assert_eq!(module().event_names(), &["onChange"]);
    }
}
