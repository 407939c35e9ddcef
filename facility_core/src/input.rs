use crossbeam_channel::{unbounded, Receiver, Sender};

/// Discrete actions the input adapter can deliver. The core never sees raw
/// key codes, analog values or timing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    ToggleAutopilot,
    Interact,
    Pause,
    Quit,
}

/// One discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
}

impl InputEvent {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}

/// Producer half of the input handoff, handed to the input adapter.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue an event for the next tick. Dropped silently if the consumer
    /// side is gone (session shut down).
    pub fn send(&self, event: InputEvent) {
        let _ = self.tx.send(event);
    }
}

/// Single-producer/single-consumer handoff between an input adapter
/// (possibly on its own thread) and the tick loop. The tick drains a
/// snapshot of pending events before running systems; no simulation state
/// ever crosses this boundary.
#[derive(Debug)]
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Drain everything queued so far, in arrival order, without blocking.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}
