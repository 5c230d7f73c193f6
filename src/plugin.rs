use crate::channel::{Channel, FlashlightHandler, MethodCall, MethodResponse, TOGGLE_METHOD};
use crate::hardware::Flashlight;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifetime {
    ///Hosting surface went to the background, the torch stays as it is
    Paused,
    ///Hosting surface is being destroyed, delivered once at the end
    Close,
}

pub trait EventHandler {
    fn event(&mut self, event: Lifetime);
}

/// Flashlight side of the method channel: answers calls and turns the torch
/// off when the hosting surface closes.
pub struct FlashlightPlugin {
    name: String,
    handler: FlashlightHandler,
    closed: bool,
}

impl FlashlightPlugin {
    pub fn new(flashlight: Flashlight, name: impl Into<String>) -> Self {
        FlashlightPlugin{name: name.into(), handler: FlashlightHandler::new(flashlight), closed: false}
    }

    pub fn name(&self) -> &str {&self.name}

    pub fn is_closed(&self) -> bool {self.closed}

    pub fn call(&mut self, call: &MethodCall) -> MethodResponse {
        if self.closed && call.method == TOGGLE_METHOD {
            log::warn!("{} received {} after close", self.name, call.method);
            return MethodResponse::error("Flashlight plugin is closed", None);
        }
        self.handler.handle(call)
    }

    /// Answers every call already waiting on `channel` and returns how many
    /// were handled. Stops early once the shell end is gone.
    pub fn serve(&mut self, channel: &mut Channel<MethodResponse, MethodCall>) -> usize {
        let mut handled = 0;
        while let Some(call) = channel.receive() {
            let response = self.call(&call);
            handled += 1;
            if !channel.send(&response) {
                break;
            }
        }
        handled
    }

    /// Serves calls until the shell drops its end, then closes.
    pub fn run(&mut self, channel: &mut Channel<MethodResponse, MethodCall>) {
        while let Some(call) = channel.recv() {
            let response = self.call(&call);
            if !channel.send(&response) {
                break;
            }
        }
        self.event(Lifetime::Close);
    }
}

impl EventHandler for FlashlightPlugin {
    fn event(&mut self, event: Lifetime) {
        match event {
            Lifetime::Close if !self.closed => {
                log::debug!("{} closing", self.name);
                self.handler.flashlight().shutdown();
                self.closed = true;
            }
            Lifetime::Close => {}
            Lifetime::Paused => log::trace!("{} {event:?}", self.name),
        }
    }
}
