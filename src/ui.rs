use egui::Context;

use crate::config::{parse_hex_color, GameConfig};
use crate::controller::FrameReport;
use crate::view::hud;

/// Values the "Parameters" window edits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugParams {
    /// sRGB, each component in `0.0..=1.0`
    pub clear_color: [f32; 3],
}

impl DebugParams {
    pub fn from_config(cfg: &GameConfig) -> Self {
        let clear_color = parse_hex_color(&cfg.clear_color).unwrap_or_else(|| {
            tracing::warn!("invalid clear colour {:?}, using black", cfg.clear_color);
            [0.0; 3]
        });
        Self { clear_color }
    }
}

/// Build the complete UI and return egui output.
/// `show_hud` draws score and power when the host page cannot.
pub fn build_ui(
    egui_ctx: &Context,
    raw_input: egui::RawInput,
    params: &mut DebugParams,
    report: &FrameReport,
    show_hud: bool,
) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_parameters_window(ctx, params, report);
        if show_hud {
            draw_hud(ctx, report);
        }
    })
}

/// Fresh `RawInput` for a canvas of the given CSS size
pub fn raw_input(width: f32, height: f32, now_ms: f64, events: Vec<egui::Event>) -> egui::RawInput {
    egui::RawInput {
        time: Some(now_ms / 1000.0),
        screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, height))),
        events,
        ..Default::default()
    }
}

fn draw_parameters_window(ctx: &Context, params: &mut DebugParams, report: &FrameReport) {
    egui::Window::new("Parameters")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("clearColor").small());
                ui.color_edit_button_rgb(&mut params.clear_color);
            });
            ui.separator();
            ui.label(
                egui::RichText::new(format!("FPS: {:.0}", if report.dt > 0.0 { 1.0 / report.dt } else { 0.0 }))
                    .small(),
            );
            ui.label(egui::RichText::new(format!("Balls: {}", report.ball_count)).small());
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("Space - hold to charge, release to throw").small());
            ui.label(egui::RichText::new("A / D - Orbit the hoop").small());
            ui.label(egui::RichText::new("Click - Mouse look").small());
        });
}

fn draw_hud(ctx: &Context, report: &FrameReport) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("Score: {}", hud::score_text(report.score)))
                    .size(20.0)
                    .color(egui::Color32::WHITE),
            );
        });

    egui::Area::new(egui::Id::new("power_bar"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -16.0])
        .show(ctx, |ui| {
            let size = egui::vec2(200.0, 14.0);
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            let painter = ui.painter();
            painter.rect_filled(rect, 2.0, egui::Color32::from_gray(40));
            let mut fill = rect;
            fill.set_width(rect.width() * report.power_fill.clamp(0.0, 1.0));
            painter.rect_filled(fill, 2.0, egui::Color32::from_rgb(0xCF, 0x53, 0x00));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> FrameReport {
        FrameReport { dt: 1.0 / 60.0, newly_scored: 0, score: 3, power_fill: 0.1, ball_count: 2 }
    }

    #[test]
    fn params_start_from_config_colour() {
        let mut cfg = GameConfig::default();
        assert_eq!(DebugParams::from_config(&cfg).clear_color, [0.0; 3]);
        cfg.clear_color = "#fff".into();
        assert_eq!(DebugParams::from_config(&cfg).clear_color, [1.0; 3]);
        cfg.clear_color = "not a colour".into();
        assert_eq!(DebugParams::from_config(&cfg).clear_color, [0.0; 3]);
    }

    #[test]
    fn ui_builds_headless() {
        let ctx = Context::default();
        let mut params = DebugParams { clear_color: [0.2, 0.3, 0.4] };
        for show_hud in [false, true] {
            let out = build_ui(&ctx, raw_input(800.0, 600.0, 0.0, Vec::new()), &mut params, &report(), show_hud);
            let _ = ctx.tessellate(out.shapes, out.pixels_per_point);
        }
        assert_eq!(params.clear_color, [0.2, 0.3, 0.4]);
    }
}
