use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

pub mod signal;
pub mod window;

/// The synchronized record. Always replaced as a whole, never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub values: Vec<f32>,
}

impl State {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("the state publisher has been dropped")]
pub struct ChannelClosed;

pub fn state_channel(initial: State) -> (StatePublisher, StateSubscriber) {
    let (sender, receiver) = watch::channel(Arc::new(initial));
    (
        StatePublisher { sender },
        StateSubscriber { receiver },
    )
}

#[derive(Debug)]
pub struct StatePublisher {
    sender: watch::Sender<Arc<State>>,
}

impl StatePublisher {
    /// Replaces the published record. Never waits for subscribers.
    pub fn publish(&self, state: State) {
        self.sender.send_replace(Arc::new(state));
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> StateSubscriber {
        StateSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateSubscriber {
    receiver: watch::Receiver<Arc<State>>,
}

impl StateSubscriber {
    /// Returns the newest record if it was published since the last observation.
    ///
    /// Records published in between two calls are never seen; only the last one is.
    pub fn take_changed(&mut self) -> Option<Arc<State>> {
        match self.receiver.has_changed() {
            Ok(true) => Some(Arc::clone(&self.receiver.borrow_and_update())),
            // A closed channel still holds its final record, but nothing new can arrive.
            Ok(false) | Err(_) => None,
        }
    }

    pub async fn changed(&mut self) -> Result<Arc<State>, ChannelClosed> {
        self.receiver.changed().await.map_err(|_| ChannelClosed)?;
        Ok(Arc::clone(&self.receiver.borrow_and_update()))
    }

    pub fn latest(&self) -> Arc<State> {
        Arc::clone(&self.receiver.borrow())
    }
}
