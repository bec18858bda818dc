use std::sync::Arc;

use log::{debug, warn};

use crate::{
    config::Config,
    data::{State, StateSubscriber},
};

use super::{
    scene::{Circle, Scene, ShapeId},
    Reconciled, RenderError, Renderer, RendererSettings,
};

/// A scene kept in step with a state channel.
pub struct CanvasView {
    scene: Scene,
    renderer: Renderer<ShapeId>,
    subscriber: StateSubscriber,
    seed: ShapeId,
    last_len: usize,
}

impl CanvasView {
    pub fn new(config: &Config, subscriber: StateSubscriber) -> Self {
        let (scene, seed) = Scene::from_config(config);
        Self {
            scene,
            renderer: Renderer::new(RendererSettings::from(config)),
            subscriber,
            seed,
            last_len: 0,
        }
    }

    /// Applies the newest record if one arrived since the last call.
    pub fn sync(&mut self) -> bool {
        let Some(state) = self.subscriber.take_changed() else {
            return false;
        };
        self.apply_logged(&state)
    }

    /// Waits for the next record and applies it. `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<bool> {
        let state = self.subscriber.changed().await.ok()?;
        Some(self.apply_logged(&state))
    }

    fn apply_logged(&mut self, state: &State) -> bool {
        match self.apply(state) {
            Ok(report) => {
                if report.created > 0 || report.hidden > 0 {
                    debug!(
                        "shape cache now holds {}: {} created, {} moved, {} hidden",
                        self.renderer.cache().len(),
                        report.created,
                        report.updated,
                        report.hidden
                    );
                }
                true
            }
            Err(err) => {
                warn!("skipping frame: {err}");
                false
            }
        }
    }

    pub fn apply(&mut self, state: &State) -> Result<Reconciled, RenderError> {
        let report = self.renderer.reconcile(&state.values, &mut self.scene)?;
        self.last_len = state.values.len();
        Ok(report)
    }

    /// The record currently held by the channel, whether or not it was applied.
    pub fn latest(&self) -> Arc<State> {
        self.subscriber.latest()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn seed(&self) -> Option<&Circle> {
        self.scene.shape(self.seed)
    }

    /// Circles driven by the renderer, index-aligned with the last values.
    pub fn shape(&self, index: usize) -> Option<&Circle> {
        let id = *self.renderer.cache().get(index)?;
        self.scene.shape(id)
    }

    pub fn cache_len(&self) -> usize {
        self.renderer.cache().len()
    }

    pub fn values_len(&self) -> usize {
        self.last_len
    }
}
