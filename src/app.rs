use eframe::egui::{self, Color32, ColorImage, TextureHandle, TextureOptions};
use egui_plot::{Line, MarkerShape, Plot, PlotImage, PlotPoint, PlotPoints, Points};

use crate::interference::{inferno_color, INTENSITY_MAX};
use crate::session::Session;

const METRES_TO_MM: f64 = 1e3;
const HISTORY_BLUE: Color32 = Color32::from_rgb(31, 90, 220);

pub struct InterferometerApp {
    session: Session,
    texture: Option<TextureHandle>,
    texture_stale: bool,
}

impl InterferometerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: Session) -> Self {
        log::info!("interferometer window ready");
        Self {
            session,
            texture: None,
            texture_stale: true,
        }
    }

    fn increase(&mut self) {
        self.session.increase_path_difference();
        self.texture_stale = true;
    }

    fn decrease(&mut self) {
        self.session.decrease_path_difference();
        self.texture_stale = true;
    }

    fn update_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_stale && self.texture.is_some() {
            return;
        }

        let field = self.session.field();
        let image = ColorImage::from_rgba_unmultiplied(field.dimensions(), &field.to_rgba8());

        if let Some(texture) = &mut self.texture {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture("interference", image, TextureOptions::LINEAR));
        }
        self.texture_stale = false;
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space((ui.available_width() * 0.5 - 80.0).max(0.0));
            if ui.add_sized([70.0, 28.0], egui::Button::new("- d")).clicked() {
                self.decrease();
            }
            ui.add_space(20.0);
            if ui.add_sized([70.0, 28.0], egui::Button::new("+ d")).clicked() {
                self.increase();
            }
            ui.separator();
            ui.label(format!("d = {:.3} mm", self.session.path_difference() * METRES_TO_MM));
        });
    }

    fn draw_visibility_plot(&self, ui: &mut egui::Ui) {
        ui.heading("Visibility vs Path Difference");

        let history = self.session.history();
        let x_max = history.max_path_difference_mm() + 10.0;

        Plot::new("visibility")
            .x_axis_label("Path Difference (mm)")
            .y_axis_label("Visibility")
            .include_x(0.0)
            .include_x(x_max)
            .include_y(0.0)
            .include_y(1.1)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if history.is_empty() {
                    return;
                }
                let line: PlotPoints = history.points().collect();
                let markers: PlotPoints = history.points().collect();
                plot_ui.line(Line::new(line).color(HISTORY_BLUE).width(1.5));
                plot_ui.points(
                    Points::new(markers)
                        .shape(MarkerShape::Circle)
                        .radius(3.5)
                        .filled(true)
                        .color(HISTORY_BLUE),
                );
            });
    }

    fn draw_intensity(&self, ui: &mut egui::Ui) {
        ui.heading("Michelson Interferometer");
        ui.label(self.session.readout().label());
        ui.separator();

        let Some(texture) = &self.texture else {
            return;
        };

        let (lo, hi) = self.session.grid().bounds();
        let (lo_mm, hi_mm) = (lo * METRES_TO_MM, hi * METRES_TO_MM);
        let span = (hi_mm - lo_mm) as f32;
        let center = PlotPoint::new(0.5 * (lo_mm + hi_mm), 0.5 * (lo_mm + hi_mm));

        let side = ui.available_height().min(ui.available_width() - 90.0).max(120.0);
        ui.horizontal(|ui| {
            Plot::new("intensity")
                .x_axis_label("x (mm)")
                .y_axis_label("y (mm)")
                .data_aspect(1.0)
                .width(side)
                .height(side)
                .include_x(lo_mm)
                .include_x(hi_mm)
                .include_y(lo_mm)
                .include_y(hi_mm)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.image(PlotImage::new(texture.id(), center, [span, span]));
                });

            draw_colorbar(ui, side);
        });
    }
}

/// Vertical "Intensity" scale matching the colour map of the image.
fn draw_colorbar(ui: &mut egui::Ui, height: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(70.0, height), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let bar = egui::Rect::from_min_size(rect.min + egui::vec2(4.0, 8.0), egui::vec2(16.0, height - 16.0));

    const SEGMENTS: usize = 64;
    let seg_height = bar.height() / SEGMENTS as f32;
    for seg in 0..SEGMENTS {
        let t = 1.0 - (seg as f32 + 0.5) / SEGMENTS as f32;
        let [r, g, b] = inferno_color(t);
        let top = bar.top() + seg as f32 * seg_height;
        painter.rect_filled(
            egui::Rect::from_min_max(
                egui::pos2(bar.left(), top),
                egui::pos2(bar.right(), top + seg_height + 0.5),
            ),
            0.0,
            Color32::from_rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8),
        );
    }

    let text_color = ui.visuals().text_color();
    for tick in 0..=INTENSITY_MAX as usize {
        let frac = tick as f32 / INTENSITY_MAX as f32;
        let y = bar.bottom() - frac * bar.height();
        painter.text(
            egui::pos2(bar.right() + 4.0, y),
            egui::Align2::LEFT_CENTER,
            format!("{tick}"),
            egui::FontId::proportional(11.0),
            text_color,
        );
    }
    painter.text(
        egui::pos2(rect.right() - 4.0, bar.center().y),
        egui::Align2::RIGHT_CENTER,
        "Intensity",
        egui::FontId::proportional(11.0),
        text_color,
    );
}

impl eframe::App for InterferometerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_texture(ctx);

        egui::TopBottomPanel::bottom("controls")
            .min_height(48.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.draw_controls(ui);
            });

        egui::SidePanel::left("visibility")
            .resizable(true)
            .default_width(ctx.screen_rect().width() / 2.2)
            .show(ctx, |ui| {
                self.draw_visibility_plot(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_intensity(ui);
        });

        // A click recomputes the field mid-frame; upload it on the next pass.
        if self.texture_stale {
            ctx.request_repaint();
        }
    }
}
