use eframe::{
    egui::{Sense, TextStyle, Ui},
    emath::Align2,
    epaint::{Color32, Pos2, Rect, Vec2},
};

use crate::{config::Rgb, render::scene::Scene};

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Largest rect with the canvas aspect ratio centered in `available`, and the
/// scale from canvas units to screen points.
pub fn fit_canvas(available: Rect, width: f32, height: f32) -> (Rect, f32) {
    let scale = (available.width() / width).min(available.height() / height);
    let size = Vec2::new(width * scale, height * scale);
    (Rect::from_center_size(available.center(), size), scale)
}

pub fn render_scene(ui: &mut Ui, scene: &Scene, caption: &str) {
    let available_space = ui.available_size();
    let (area, _) = ui.allocate_exact_size(available_space, Sense::hover());

    let edge_padding = 10.5;
    let (rect, scale) = fit_canvas(area.shrink(edge_padding), scene.width(), scene.height());

    let style = ui.style();
    let line_col = style.visuals.widgets.active.bg_fill;
    let font = style.text_styles[&TextStyle::Small].clone();

    let painter = ui.painter().with_clip_rect(rect);
    painter.rect_filled(rect, 0.0, to_color32(scene.background()));

    for circle in scene.displayed() {
        let center = Pos2::new(
            rect.left() + circle.center.x * scale,
            rect.top() + circle.center.y * scale,
        );
        // Non-finite positions come through untouched when the value policy allows them.
        if center.x.is_finite() && center.y.is_finite() {
            painter.circle_filled(center, circle.radius * scale, to_color32(circle.fill));
        }
    }

    ui.painter().rect_stroke(rect, 0.0, (1.0, line_col));
    ui.painter().text(
        Pos2::new(rect.left(), rect.bottom() + 2.0),
        Align2::LEFT_TOP,
        caption,
        font,
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_area_is_limited_by_height() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(3000.0, 500.0));
        let (rect, scale) = fit_canvas(available, 1000.0, 500.0);
        assert_eq!(scale, 1.0);
        assert_eq!(rect.width(), 1000.0);
        assert_eq!(rect.center(), available.center());
    }

    #[test]
    fn narrow_area_is_limited_by_width() {
        let available = Rect::from_min_size(Pos2::ZERO, Vec2::new(500.0, 500.0));
        let (rect, scale) = fit_canvas(available, 1000.0, 500.0);
        assert_eq!(scale, 0.5);
        assert_eq!(rect.height(), 250.0);
    }

    #[test]
    fn colours_convert_channel_for_channel() {
        assert_eq!(to_color32(Rgb(1, 2, 3)), Color32::from_rgb(1, 2, 3));
    }
}
