use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    symbols,
    widgets::{
        block::Title,
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

use crate::{config::Rgb, render::scene::Scene};

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Displayed circles in ratatui canvas coordinates, where y grows upwards.
pub fn scene_circles(scene: &Scene) -> Vec<Circle> {
    scene
        .displayed()
        .iter()
        .map(|circle| Circle {
            x: circle.center.x as f64,
            y: (scene.height() - circle.center.y) as f64,
            radius: circle.radius as f64,
            color: to_color(circle.fill),
        })
        .collect()
}

pub fn render_canvas(f: &mut Frame, area: Rect, scene: &Scene, values_len: usize) {
    let circles = scene_circles(scene);

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(
                    Title::default()
                        .content("sinecanvas".cyan().bold())
                        .alignment(Alignment::Center),
                )
                .title(
                    Title::default()
                        .content(format!(
                            " {values_len} values | {} redraws | q to quit ",
                            scene.redraw_count()
                        ))
                        .alignment(Alignment::Right),
                )
                .borders(Borders::ALL)
                .border_style(Style::default().gray()),
        )
        .marker(symbols::Marker::Braille)
        .background_color(to_color(scene.background()))
        .x_bounds([0.0, scene.width() as f64])
        .y_bounds([0.0, scene.height() as f64])
        .paint(|ctx| {
            for circle in circles.iter() {
                ctx.draw(circle);
            }
        });

    f.render_widget(canvas, area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        render::{Point, Surface},
    };

    #[test]
    fn circles_are_flipped_into_canvas_space() {
        let config = Config::default();
        let (mut scene, _) = Scene::from_config(&config);
        scene.create_circle(Point::new(1000.0, 100.0), 20.0, Rgb(1, 2, 3));
        scene.render_all();

        let circles = scene_circles(&scene);
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[1].x, 1000.0);
        assert_eq!(circles[1].y, 400.0);
        assert_eq!(circles[1].radius, 20.0);
        assert_eq!(circles[1].color, Color::Rgb(1, 2, 3));
    }
}
