use crate::config::{Config, Rgb};

use super::{Point, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub fill: Rgb,
    pub visible: bool,
}

/// Retained-mode display surface.
///
/// Edits go to a pending list; frontends only ever paint the snapshot taken by
/// the last [`Surface::render_all`].
#[derive(Debug, Clone)]
pub struct Scene {
    width: f32,
    height: f32,
    background: Rgb,
    pending: Vec<Circle>,
    displayed: Vec<Circle>,
    redraws: u64,
}

impl Scene {
    pub fn new(width: f32, height: f32, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            pending: Vec::new(),
            displayed: Vec::new(),
            redraws: 0,
        }
    }

    /// Canvas with the seed circle in the top right corner, already rendered once.
    pub fn from_config(config: &Config) -> (Self, ShapeId) {
        let mut scene = Self::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.background,
        );
        let radius = config.shapes.radius;
        let seed = scene.create_circle(
            Point::new(config.canvas.width - radius, radius),
            radius,
            config.shapes.seed_fill,
        );
        scene.render_all();
        (scene, seed)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Circle> {
        self.pending.get(id.0)
    }

    #[cfg(test)]
    pub fn shape_count(&self) -> usize {
        self.pending.len()
    }

    /// Visible circles as of the last redraw, in creation order.
    pub fn displayed(&self) -> &[Circle] {
        &self.displayed
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }
}

impl Surface for Scene {
    type Handle = ShapeId;

    fn create_circle(&mut self, center: Point, radius: f32, fill: Rgb) -> ShapeId {
        self.pending.push(Circle {
            center,
            radius,
            fill,
            visible: true,
        });
        ShapeId(self.pending.len() - 1)
    }

    fn set_position(&mut self, handle: ShapeId, center: Point) {
        if let Some(circle) = self.pending.get_mut(handle.0) {
            circle.center = center;
        }
    }

    fn set_visible(&mut self, handle: ShapeId, visible: bool) {
        if let Some(circle) = self.pending.get_mut(handle.0) {
            circle.visible = visible;
        }
    }

    fn render_all(&mut self) {
        self.displayed.clear();
        self.displayed
            .extend(self.pending.iter().filter(|circle| circle.visible).copied());
        self.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_scene_shows_one_circle() {
        let config = Config::default();
        let (scene, seed) = Scene::from_config(&config);
        assert_eq!(scene.redraw_count(), 1);
        assert_eq!(scene.displayed().len(), 1);
        let circle = scene.shape(seed).unwrap();
        assert_eq!(circle.fill, config.shapes.seed_fill);
        assert_eq!(circle.center, Point::new(980.0, 20.0));
        assert_eq!((scene.width(), scene.height()), (1000.0, 500.0));
    }

    #[test]
    fn edits_stay_pending_until_render_all() {
        let mut scene = Scene::new(100.0, 100.0, Rgb(0, 0, 0));
        let id = scene.create_circle(Point::new(1.0, 2.0), 3.0, Rgb(1, 2, 3));
        assert!(scene.displayed().is_empty());

        scene.render_all();
        scene.set_position(id, Point::new(5.0, 6.0));
        assert_eq!(scene.displayed()[0].center, Point::new(1.0, 2.0));

        scene.render_all();
        assert_eq!(scene.displayed()[0].center, Point::new(5.0, 6.0));
        assert_eq!(scene.redraw_count(), 2);
    }

    #[test]
    fn hidden_circles_are_not_displayed() {
        let mut scene = Scene::new(100.0, 100.0, Rgb(0, 0, 0));
        let a = scene.create_circle(Point::new(1.0, 1.0), 1.0, Rgb(1, 1, 1));
        scene.create_circle(Point::new(2.0, 2.0), 1.0, Rgb(2, 2, 2));
        scene.set_visible(a, false);
        scene.render_all();

        assert_eq!(scene.shape_count(), 2);
        assert_eq!(scene.displayed().len(), 1);
        assert_eq!(scene.displayed()[0].fill, Rgb(2, 2, 2));
    }
}
