use std::sync::mpsc::{channel, Receiver, Sender};
use std::marker::PhantomData;

use serde::{Serialize, Deserialize};
use serde_json::Value;

use crate::hardware::{Flashlight, ToggleError};

pub const CHANNEL_NAME: &str = "samples.flutter.dev/flashlight";
pub const TOGGLE_METHOD: &str = "toggleFlashlight";
pub const ERROR_CODE: &str = "FLASHLIGHT_ERROR";

/// Command sent by the application shell.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        MethodCall{method: method.into(), arguments: Value::Null}
    }
}

/// Reply to a `MethodCall`. `NotImplemented` is neither a success nor an
/// error: the method name is unknown to this side of the channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success{result: Value},
    Error{code: String, message: String, details: Option<String>},
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: impl Into<Value>) -> Self {
        MethodResponse::Success{result: result.into()}
    }

    pub fn error(message: impl Into<String>, details: Option<String>) -> Self {
        MethodResponse::Error{code: ERROR_CODE.to_string(), message: message.into(), details}
    }
}

impl From<ToggleError> for MethodResponse {
    fn from(error: ToggleError) -> Self {
        match error {
            ToggleError::Unavailable => MethodResponse::error("No flash available on this device", None),
            ToggleError::DriverFailure(detail) => MethodResponse::error(
                format!("Failed to toggle flashlight: {detail}"),
                Some(detail),
            ),
        }
    }
}

/// Answers flashlight method calls.
#[derive(Clone)]
pub struct FlashlightHandler {
    flashlight: Flashlight,
}

impl FlashlightHandler {
    pub fn new(flashlight: Flashlight) -> Self {
        FlashlightHandler{flashlight}
    }

    pub fn flashlight(&self) -> &Flashlight {&self.flashlight}

    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        match call.method.as_str() {
            TOGGLE_METHOD => match self.flashlight.toggle() {
                Ok(on) => {
                    log::info!("Flashlight turned {}", if on {"on"} else {"off"});
                    MethodResponse::success(true)
                }
                Err(e) => e.into(),
            },
            method => {
                log::debug!("Method {method} not implemented");
                MethodResponse::NotImplemented
            }
        }
    }
}

///Typed endpoint of a duplex channel. Messages travel as JSON strings so
///either end can also be fed raw payloads from outside the process.
pub struct Channel<S, R>(Sender<String>, Receiver<String>, PhantomData<fn() -> S>, PhantomData<fn() -> R>);
impl<
    S: Serialize + for<'a> Deserialize <'a>,
    R: Serialize + for<'a> Deserialize <'a>,
> Channel<S, R> {
    pub fn new() -> (Self, Channel<R, S>) {
        let (a, b) = channel();
        let (c, d) = channel();
        (Channel(a, d, PhantomData::<fn() -> S>, PhantomData::<fn() -> R>), Channel(c, b, PhantomData::<fn() -> R>, PhantomData::<fn() -> S>))
    }

    /// Returns false once the other end is gone.
    pub fn send(&mut self, payload: &S) -> bool {
        match serde_json::to_string(payload) {
            Ok(payload) => self.send_raw(payload),
            Err(e) => {
                log::error!("Failed to encode channel payload: {e}");
                false
            }
        }
    }

    pub fn send_raw(&mut self, payload: String) -> bool {
        self.0.send(payload).is_ok()
    }

    /// Next pending message without blocking. Malformed payloads are
    /// dropped.
    pub fn receive(&mut self) -> Option<R> {
        while let Ok(payload) = self.1.try_recv() {
            if let Some(r) = Self::decode(&payload) {
                return Some(r);
            }
        }
        None
    }

    /// Blocks for the next message, `None` once the other end is gone.
    pub fn recv(&mut self) -> Option<R> {
        while let Ok(payload) = self.1.recv() {
            if let Some(r) = Self::decode(&payload) {
                return Some(r);
            }
        }
        None
    }

    fn decode(payload: &str) -> Option<R> {
        serde_json::from_str(payload)
            .map_err(|e| log::warn!("Dropping malformed channel payload {payload:?}: {e}"))
            .ok()
    }
}
