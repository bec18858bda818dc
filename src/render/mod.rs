use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, Rgb};

pub mod scene;
pub mod view;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Draw commands offered by a display surface.
pub trait Surface {
    type Handle: Copy;

    fn create_circle(&mut self, center: Point, radius: f32, fill: Rgb) -> Self::Handle;
    fn set_position(&mut self, handle: Self::Handle, center: Point);
    fn set_visible(&mut self, handle: Self::Handle, visible: bool);
    /// Commits every pending change as one redraw.
    fn render_all(&mut self);
}

/// What happens to cached shapes whose index is past the end of a shorter `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShrinkPolicy {
    /// Leave them where they were, still visible.
    #[default]
    Retain,
    /// Hide them until their index is used again.
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuePolicy {
    #[default]
    PassThrough,
    /// Clamp into `[0, height]`. NaN goes to 0.
    Clamp,
    /// Refuse the whole update if any value is NaN or infinite.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RenderError {
    #[error("value {value} at index {index} is not finite")]
    NonFinite { index: usize, value: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciled {
    pub created: usize,
    pub updated: usize,
    pub hidden: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub radius: f32,
    pub fill: Rgb,
    pub horizontal_extent: f32,
    pub height: f32,
    pub shrink: ShrinkPolicy,
    pub values: ValuePolicy,
}

impl From<&Config> for RendererSettings {
    fn from(config: &Config) -> Self {
        Self {
            radius: config.shapes.radius,
            fill: config.shapes.fill,
            horizontal_extent: config.canvas.width,
            height: config.canvas.height,
            shrink: config.renderer.shrink,
            values: config.renderer.values,
        }
    }
}

/// Keeps one shape per value index on a [`Surface`].
///
/// The cache is index-aligned with the latest `values` and never shrinks.
pub struct Renderer<H> {
    settings: RendererSettings,
    cache: Vec<H>,
    // Number of leading cached shapes currently shown; only tracked under `ShrinkPolicy::Hide`.
    shown: usize,
}

impl<H: Copy> Renderer<H> {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            cache: Vec::new(),
            shown: 0,
        }
    }

    pub fn cache(&self) -> &[H] {
        &self.cache
    }

    pub fn x_for(&self, index: usize) -> f32 {
        self.settings.horizontal_extent - index as f32 * (self.settings.radius * 3.0)
    }

    fn y_for(&self, value: f32) -> f32 {
        match self.settings.values {
            ValuePolicy::PassThrough | ValuePolicy::Reject => value,
            ValuePolicy::Clamp if value.is_nan() => 0.0,
            ValuePolicy::Clamp => value.clamp(0.0, self.settings.height),
        }
    }

    pub fn reconcile<S>(&mut self, values: &[f32], surface: &mut S) -> Result<Reconciled, RenderError>
    where
        S: Surface<Handle = H>,
    {
        if self.settings.values == ValuePolicy::Reject {
            if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(RenderError::NonFinite { index, value });
            }
        }

        let mut report = Reconciled::default();

        for (i, &value) in values.iter().enumerate() {
            let center = Point::new(self.x_for(i), self.y_for(value));
            match self.cache.get(i).copied() {
                Some(handle) => {
                    surface.set_position(handle, center);
                    if self.settings.shrink == ShrinkPolicy::Hide && i >= self.shown {
                        surface.set_visible(handle, true);
                    }
                    report.updated += 1;
                }
                None => {
                    let handle =
                        surface.create_circle(center, self.settings.radius, self.settings.fill);
                    self.cache.push(handle);
                    report.created += 1;
                }
            }
        }

        if self.settings.shrink == ShrinkPolicy::Hide {
            for &handle in self.cache.iter().take(self.shown).skip(values.len()) {
                surface.set_visible(handle, false);
                report.hidden += 1;
            }
            self.shown = values.len();
        }

        surface.render_all();
        trace!("reconciled {} values: {report:?}", values.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(usize, Point),
        Move(usize, Point),
        Visible(usize, bool),
        Render,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        shapes: usize,
    }

    impl Surface for Recorder {
        type Handle = usize;

        fn create_circle(&mut self, center: Point, _radius: f32, _fill: Rgb) -> usize {
            let id = self.shapes;
            self.shapes += 1;
            self.calls.push(Call::Create(id, center));
            id
        }

        fn set_position(&mut self, handle: usize, center: Point) {
            self.calls.push(Call::Move(handle, center));
        }

        fn set_visible(&mut self, handle: usize, visible: bool) {
            self.calls.push(Call::Visible(handle, visible));
        }

        fn render_all(&mut self) {
            self.calls.push(Call::Render);
        }
    }

    fn settings(shrink: ShrinkPolicy, values: ValuePolicy) -> RendererSettings {
        RendererSettings {
            radius: 20.0,
            fill: Rgb(0, 0, 255),
            horizontal_extent: 1000.0,
            height: 500.0,
            shrink,
            values,
        }
    }

    fn renderer() -> Renderer<usize> {
        Renderer::new(settings(ShrinkPolicy::Retain, ValuePolicy::PassThrough))
    }

    #[test]
    fn empty_values_still_redraw_once() {
        let mut renderer = renderer();
        let mut surface = Recorder::default();
        let report = renderer.reconcile(&[], &mut surface).unwrap();
        assert_eq!(surface.calls, vec![Call::Render]);
        assert_eq!(report, Reconciled::default());
        assert!(renderer.cache().is_empty());
    }

    #[test]
    fn creates_shapes_then_reuses_them() {
        let mut renderer = renderer();
        let mut surface = Recorder::default();

        renderer.reconcile(&[100.0], &mut surface).unwrap();
        assert_eq!(
            surface.calls,
            vec![Call::Create(0, Point::new(1000.0, 100.0)), Call::Render]
        );

        surface.calls.clear();
        let report = renderer.reconcile(&[120.0, 80.0], &mut surface).unwrap();
        assert_eq!(
            surface.calls,
            vec![
                Call::Move(0, Point::new(1000.0, 120.0)),
                Call::Create(1, Point::new(940.0, 80.0)),
                Call::Render,
            ]
        );
        assert_eq!(report.created, 1);
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn horizontal_position_walks_left_past_the_edge() {
        let renderer = renderer();
        assert_eq!(renderer.x_for(0), 1000.0);
        assert_eq!(renderer.x_for(8), 520.0);
        assert_eq!(renderer.x_for(20), -200.0);
    }

    #[test]
    fn cache_grows_to_the_longest_values_seen() {
        let mut renderer = renderer();
        let mut surface = Recorder::default();
        for len in [3usize, 1, 5, 2, 0, 4] {
            let before = renderer.cache().len();
            let values = vec![10.0; len];
            renderer.reconcile(&values, &mut surface).unwrap();
            assert_eq!(renderer.cache().len(), before.max(len));
        }
        assert_eq!(surface.shapes, 5);
    }

    #[test]
    fn retain_leaves_trailing_shapes_untouched() {
        let mut renderer = renderer();
        let mut surface = Recorder::default();
        renderer.reconcile(&[100.0, 200.0], &mut surface).unwrap();
        surface.calls.clear();

        renderer.reconcile(&[50.0], &mut surface).unwrap();
        assert_eq!(
            surface.calls,
            vec![Call::Move(0, Point::new(1000.0, 50.0)), Call::Render]
        );
        assert_eq!(renderer.cache().len(), 2);
    }

    #[test]
    fn hide_policy_hides_and_restores_trailing_shapes() {
        let mut renderer = Renderer::new(settings(ShrinkPolicy::Hide, ValuePolicy::PassThrough));
        let mut surface = Recorder::default();
        renderer.reconcile(&[1.0, 2.0, 3.0], &mut surface).unwrap();
        surface.calls.clear();

        let report = renderer.reconcile(&[4.0], &mut surface).unwrap();
        assert_eq!(report.hidden, 2);
        assert_eq!(
            surface.calls,
            vec![
                Call::Move(0, Point::new(1000.0, 4.0)),
                Call::Visible(1, false),
                Call::Visible(2, false),
                Call::Render,
            ]
        );

        surface.calls.clear();
        renderer.reconcile(&[5.0, 6.0], &mut surface).unwrap();
        assert_eq!(
            surface.calls,
            vec![
                Call::Move(0, Point::new(1000.0, 5.0)),
                Call::Move(1, Point::new(940.0, 6.0)),
                Call::Visible(1, true),
                Call::Render,
            ]
        );
        assert_eq!(renderer.cache().len(), 3);
    }

    #[test]
    fn pass_through_keeps_non_finite_values() {
        let mut renderer = renderer();
        let mut surface = Recorder::default();
        renderer
            .reconcile(&[f32::INFINITY, -7000.0], &mut surface)
            .unwrap();
        assert_eq!(surface.calls[0], Call::Create(0, Point::new(1000.0, f32::INFINITY)));
        assert_eq!(surface.calls[1], Call::Create(1, Point::new(940.0, -7000.0)));
    }

    #[test]
    fn clamp_keeps_shapes_on_the_canvas() {
        let mut renderer = Renderer::new(settings(ShrinkPolicy::Retain, ValuePolicy::Clamp));
        let mut surface = Recorder::default();
        renderer
            .reconcile(&[-5.0, 900.0, f32::NAN, 250.0], &mut surface)
            .unwrap();
        let ys: Vec<f32> = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Create(_, point) => Some(point.y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![0.0, 500.0, 0.0, 250.0]);
    }

    #[test]
    fn reject_fails_before_touching_anything() {
        let mut renderer = Renderer::new(settings(ShrinkPolicy::Retain, ValuePolicy::Reject));
        let mut surface = Recorder::default();
        renderer.reconcile(&[1.0], &mut surface).unwrap();
        surface.calls.clear();

        let err = renderer
            .reconcile(&[2.0, 3.0, f32::NEG_INFINITY], &mut surface)
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::NonFinite {
                index: 2,
                value: f32::NEG_INFINITY
            }
        );
        assert!(surface.calls.is_empty());
        assert_eq!(renderer.cache().len(), 1);
    }
}
