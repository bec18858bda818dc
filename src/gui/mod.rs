use std::time::Duration;

use eframe::egui;
use log::info;

use crate::{config::Config, render::view::CanvasView};

use self::{
    canvas::{render_scene, to_color32},
    style::make_style,
};

mod canvas;
mod style;

pub fn run_gui_app(config: &Config, view: CanvasView) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas.width + 40.0, config.canvas.height + 60.0])
            .with_min_inner_size([320.0, 200.0]),
        ..Default::default()
    };

    let app = CanvasApp {
        view,
        accent: to_color32(config.shapes.fill),
        repaint_after: config.producer.interval(),
        updated_style: false,
    };

    info!("opening window");
    eframe::run_native("sinecanvas", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

pub struct CanvasApp {
    view: CanvasView,
    accent: egui::Color32,
    repaint_after: Duration,
    updated_style: bool,
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.updated_style {
            ctx.set_style(make_style(self.accent));
            self.updated_style = true;
        }

        self.view.sync();

        egui::CentralPanel::default().show(ctx, |ui| {
            let scene = self.view.scene();
            let caption = format!(
                "{} values, {} shapes cached, {} redraws",
                self.view.values_len(),
                self.view.cache_len(),
                scene.redraw_count()
            );
            render_scene(ui, scene, &caption);
        });

        // Notifications arrive through the channel; the timer only wakes us to check it.
        ctx.request_repaint_after(self.repaint_after);
    }
}
