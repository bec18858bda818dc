use std::time::Duration;

use log::{debug, info, trace};
use tokio::{
    sync::watch,
    time::{self, MissedTickBehavior},
};

use crate::config::ProducerConfig;

use super::{window::SlidingWindow, State, StatePublisher};

/// `offset + amplitude * sin(phase)`, advancing the phase by `phase_step` per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SineSignal {
    pub offset: f32,
    pub amplitude: f32,
    pub phase_step: f32,
    phase: f32,
}

impl SineSignal {
    pub fn new(offset: f32, amplitude: f32, phase_step: f32) -> Self {
        Self {
            offset,
            amplitude,
            phase_step,
            phase: 0.0,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample = self.offset + self.amplitude * self.phase.sin();
        self.phase += self.phase_step;
        sample
    }
}

/// Owns the stop flag shared by every running producer.
#[derive(Debug)]
pub struct Shutdown {
    sender: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown is triggered or the [`Shutdown`] owner is dropped.
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow_and_update() {
            if self.receiver.changed().await.is_err() {
                return;
            }
        }
    }
}

pub struct Producer {
    signal: SineSignal,
    window: SlidingWindow,
    publisher: StatePublisher,
    interval: Duration,
}

impl Producer {
    pub fn new(config: &ProducerConfig, publisher: StatePublisher) -> Self {
        Self {
            signal: SineSignal::new(config.offset, config.amplitude, config.phase_step),
            window: SlidingWindow::new(config.capacity),
            publisher,
            interval: config.interval(),
        }
    }

    /// Samples the signal once and publishes the whole window as a new record.
    pub fn tick(&mut self) -> Vec<f32> {
        let sample = self.signal.next_sample();
        self.window.push(sample);

        let values = self.window.values();
        self.publisher.publish(State::new(values.clone()));
        if let Some(newest) = self.window.get(0) {
            trace!("published {} values, newest {newest:.2}", self.window.len());
        }
        values
    }

    #[cfg(test)]
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        info!(
            "producer started: every {:?}, window of {}",
            self.interval,
            self.window.capacity()
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks: u64 = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {
                    self.tick();
                    ticks += 1;
                }
            }
        }

        if self.window.is_empty() {
            debug!("producer stopped before its first sample");
        } else {
            debug!("producer published {ticks} records");
        }
        info!("producer stopped");
    }
}
