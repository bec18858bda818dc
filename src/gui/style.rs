use eframe::{
    egui::{Style, TextStyle::*, Visuals},
    epaint::{Color32, FontFamily, FontId, Vec2},
};

fn color_lerp(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let inv_t = 1.0 - t;
    Color32::from_rgb(
        (a.r() as f32 * inv_t + b.r() as f32 * t) as u8,
        (a.g() as f32 * inv_t + b.g() as f32 * t) as u8,
        (a.b() as f32 * inv_t + b.b() as f32 * t) as u8,
    )
}

pub fn make_style(accent: Color32) -> Style {
    let lighten_color = Color32::from_rgb(204, 204, 215);
    let lighten_by = |color: Color32, amount: f32| color_lerp(color, lighten_color, amount);

    let bg = Color32::from_rgb(18, 18, 23);
    let bg_dark = Color32::from_rgb(10, 10, 16);

    let mut visuals = Visuals::dark();
    visuals.widgets.inactive.bg_fill = accent;
    visuals.widgets.hovered.bg_fill = lighten_by(accent, 0.15);
    visuals.widgets.active.bg_fill = lighten_by(accent, 0.3);
    visuals.faint_bg_color = lighten_by(bg, 0.1);
    visuals.extreme_bg_color = bg_dark;
    visuals.panel_fill = bg;

    let mut style = Style {
        visuals,
        text_styles: [
            (Heading, FontId::new(30.0, FontFamily::Proportional)),
            (Body, FontId::new(14.0, FontFamily::Proportional)),
            (Monospace, FontId::new(14.0, FontFamily::Monospace)),
            (Button, FontId::new(14.0, FontFamily::Proportional)),
            (Small, FontId::new(10.0, FontFamily::Proportional)),
        ]
        .into(),
        ..Default::default()
    };
    style.spacing.button_padding = Vec2::new(8.0, 4.0);
    style
}
