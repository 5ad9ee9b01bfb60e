//! Interactive lightning bolt viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the growth configuration
//! and the last generated tree, and implements [`eframe::App`] to
//! render the bolt and expose every growth parameter through an egui
//! UI. Generation is on demand only: the engine is synchronous and
//! potentially expensive, so the viewer regenerates when the seed or a
//! parameter changes, never per frame.

use bolt_core::{Config, GrowthRng, Report, Tree, phases};
use eframe::App;
use glam::Vec2;
use rand::Rng;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The engine inputs: [`Config`], a text seed, and the region size.
/// - The last generated [`Tree`] and its [`Report`].
/// - UI state (pan/zoom camera) and eframe/egui callbacks.
pub struct Viewer {
    cfg: Config,
    seed: String,
    region_width: f32,
    region_height: f32,

    tree: Tree,
    report: Report,

    zoom: f32,
    pan: egui::Vec2,
}

impl Viewer {
    /// Creates a new viewer with a default config and an initial bolt.
    pub fn new() -> Self {
        let cfg = Config::default();
        let seed = String::from("thunderhead");
        let region_width = 400.0;
        let region_height = 600.0;

        let mut rng = GrowthRng::from_seed_str(&seed);
        let (tree, report) =
            phases::generate_with_report(&cfg, region_width, region_height, &mut rng);

        Self {
            cfg,
            seed,
            region_width,
            region_height,
            tree,
            report,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
        }
    }

    /// Regrows the bolt from the current seed and parameters.
    ///
    /// The seed string builds a fresh RNG stream, so the same seed and
    /// config always reproduce the same bolt.
    fn regenerate(&mut self) {
        let mut rng = GrowthRng::from_seed_str(&self.seed);
        let (tree, report) =
            phases::generate_with_report(&self.cfg, self.region_width, self.region_height, &mut rng);
        self.tree = tree;
        self.report = report;
    }

    /// Replaces the seed with a random one and regenerates.
    fn randomize_seed(&mut self) {
        let n: u64 = rand::rng().random();
        self.seed = format!("bolt-{n:016x}");
        self.regenerate();
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The growth region is centered in `rect`, scaled by `zoom` and
    /// offset by `pan`. World +y (toward the ground) maps to screen
    /// down, so no axis flip is needed.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + (p.x - self.region_width * 0.5) * self.zoom + self.pan.x,
            center.y + (p.y - self.region_height * 0.5) * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// Inverse of [`Viewer::world_to_screen`] up to floating point
    /// rounding.
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom + self.region_width * 0.5;
        let y = (p.y - center.y - self.pan.y) / self.zoom + self.region_height * 0.5;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    ///
    /// Returns `true` when the value changed.
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label(label);
            changed = ui
                .add(egui::DragValue::new(value).range(range).speed(speed))
                .changed();
        });
        changed
    }

    /// Builds the top panel UI (seed, regenerate, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Seed:");
                let seed_edit = ui.add(egui::TextEdit::singleline(&mut self.seed).desired_width(160.0));
                if seed_edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.regenerate();
                }

                if ui.button("⚡ Regenerate").clicked() {
                    self.regenerate();
                }

                if ui.button("🎲 Random seed").clicked() {
                    self.randomize_seed();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (node count, steps, closure info).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.report.hit_step_cap {
                    ui.colored_label(egui::Color32::YELLOW, "step cap hit");
                    ui.separator();
                }
                ui.label(format!("return strokes = {}", self.report.return_strokes));
                ui.label(format!("steps = {}", self.report.steps));
                ui.separator();
                ui.label(format!("nodes = {}", self.tree.nodes.len()));
                ui.label(format!("root charge = {}", self.tree.root().charge));
            });
        });
    }

    /// Builds the right-hand configuration panel for growth parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Growth");

                let mut changed = false;

                ui.separator();
                ui.label("Region");
                changed |=
                    Self::labeled_drag_f32(ui, "width:", &mut self.region_width, 50.0..=2000.0, 5.0);
                changed |= Self::labeled_drag_f32(
                    ui,
                    "height:",
                    &mut self.region_height,
                    50.0..=2000.0,
                    5.0,
                );

                ui.separator();
                ui.label("Branching");
                changed |= Self::labeled_drag_f32(
                    ui,
                    "factor:",
                    &mut self.cfg.branch.factor,
                    0.0..=1.0,
                    0.005,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "factor_with_depth:",
                    &mut self.cfg.branch.factor_with_depth,
                    0.0..=1.0,
                    0.005,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "angle.min:",
                    &mut self.cfg.branch.angle.min,
                    0.0..=std::f32::consts::FRAC_PI_2,
                    0.01,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "angle.max:",
                    &mut self.cfg.branch.angle.max,
                    0.0..=std::f32::consts::FRAC_PI_2,
                    0.01,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "bias_exponent:",
                    &mut self.cfg.branch.bias_exponent,
                    0.1..=16.0,
                    0.1,
                );

                ui.separator();
                ui.label("Wobble");
                changed |= Self::labeled_drag_f32(
                    ui,
                    "segment_length:",
                    &mut self.cfg.wobble.segment_length,
                    1.0..=50.0,
                    0.5,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "bias_to_perfect:",
                    &mut self.cfg.wobble.bias_to_perfect,
                    0.0..=1.0,
                    0.01,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "random_factor:",
                    &mut self.cfg.wobble.random_factor,
                    0.0..=10.0,
                    0.05,
                );
                changed |= Self::labeled_drag_f32(
                    ui,
                    "bias variance:",
                    &mut self.cfg.wobble.bias_to_perfect_variance,
                    0.0..=1.0,
                    0.01,
                );

                // Keep the angle range ordered while dragging.
                if self.cfg.branch.angle.max < self.cfg.branch.angle.min {
                    self.cfg.branch.angle.max = self.cfg.branch.angle.min;
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    changed = true;
                }

                if changed {
                    self.regenerate();
                }
            });
    }

    /// Stroke width for the segment ending at a node, scaled by the
    /// node's charge relative to the root's.
    fn stroke_width(&self, charge: u32) -> f32 {
        let root_charge = self.tree.root().charge.max(1) as f32;
        let t = charge as f32 / root_charge;
        (0.5 + 4.0 * t) * self.zoom.clamp(0.2, 3.0)
    }

    /// Builds the central panel where the bolt is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.pan += delta;
            }

            // Zoom around the mouse cursor.
            if ui.ctx().input(|i| i.raw_scroll_delta.y != 0.0) {
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 {
                    let pointer_screen = response.hover_pos().unwrap_or(rect.center());

                    let world_before = self.screen_to_world(pointer_screen, rect);

                    let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                    let new_zoom = (self.zoom * factor).clamp(0.1, 10.0);
                    self.zoom = new_zoom;

                    let screen_after = self.world_to_screen(world_before, rect);

                    let delta = pointer_screen - screen_after;
                    self.pan += delta;
                }
            }

            // Growth region outline and ground line.
            let top_left = self.world_to_screen(Vec2::ZERO, rect);
            let bottom_right =
                self.world_to_screen(Vec2::new(self.region_width, self.region_height), rect);
            painter.rect_stroke(
                egui::Rect::from_two_pos(top_left, bottom_right),
                egui::CornerRadius::ZERO,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Middle,
            );
            painter.line_segment(
                [
                    self.world_to_screen(Vec2::new(0.0, self.region_height), rect),
                    self.world_to_screen(
                        Vec2::new(self.region_width, self.region_height),
                        rect,
                    ),
                ],
                egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 70, 40)),
            );

            // Draw every parent -> child segment. Stroke width follows
            // the child's charge; return strokes are drawn brighter.
            for node in self.tree.nodes.iter() {
                for &child_id in &node.children {
                    let child = &self.tree.nodes[child_id];
                    let a = self.world_to_screen(node.pos, rect);
                    let b = self.world_to_screen(child.pos, rect);

                    let color = if child.is_return {
                        egui::Color32::WHITE
                    } else {
                        egui::Color32::from_rgb(140, 170, 255)
                    };
                    let width = self.stroke_width(child.charge);

                    painter.line_segment([a, b], egui::Stroke::new(width, color));
                }
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
