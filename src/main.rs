//! wavify demo - layered animated waves in an egui window
//!
//! The waves live in an in-memory SVG document. Every repaint the app
//! delivers due frame callbacks and resize notifications to the waves, then
//! paints each wave's path into the central panel.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use eframe::egui;

mod render;
mod settings;

use render::{parse_color, WaveView};
use settings::AppSettings;
use wavify::host::{FrameQueue, NodeId, SvgDocument};
use wavify::wave::{Position, RedrawMode, Size, WaveOptions, WaveOptionsPatch, WaveWidget};

type SharedDocument = Rc<RefCell<SvgDocument>>;
type SharedFrames = Rc<RefCell<FrameQueue>>;
type Wave = WaveWidget<SharedDocument, SharedFrames>;

/// Size of the wave container before the first layout
const INITIAL_SIZE: Size = Size {
    width: 860.0,
    height: 560.0,
};

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting wavify demo");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_title("wavify"),
        ..Default::default()
    };

    eframe::run_native(
        "wavify",
        options,
        Box::new(|cc| Ok(Box::new(WaveApp::new(cc)))),
    )
}

/// Main application state
pub struct WaveApp {
    document: SharedDocument,
    frames: SharedFrames,
    container: NodeId,
    container_size: Size,
    started: Instant,

    pub layers: Vec<Wave>,
    pub selected_layer: usize,
    pub view: WaveView,
    pub show_settings: bool,

    /// Editable copy of the selected layer's options
    editing: WaveOptions,
    status: String,
}

impl WaveApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();

        let mut document = SvgDocument::new(INITIAL_SIZE);
        let root = document.root();
        // The container is created by the app, so this only fails on a bug
        let container = match document.insert(root, "section", Some("waves")) {
            Ok(node) => node,
            Err(e) => {
                log::error!("Failed to create wave container: {}", e);
                root
            }
        };

        let mut app = Self {
            document: Rc::new(RefCell::new(document)),
            frames: Rc::new(RefCell::new(FrameQueue::new())),
            container,
            container_size: INITIAL_SIZE,
            started: Instant::now(),
            layers: Vec::new(),
            selected_layer: 0,
            view: WaveView::default(),
            show_settings: true,
            editing: WaveOptions::default(),
            status: String::new(),
        };

        for options in &settings.layers {
            app.add_layer(options);
        }
        settings.apply(&mut app);
        app.sync_editing();
        app
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn add_layer(&mut self, options: &WaveOptions) {
        let patch = WaveOptionsPatch::from(options);
        match WaveWidget::new(
            self.document.clone(),
            self.frames.clone(),
            "#waves",
            &patch,
        ) {
            Ok(wave) => {
                self.layers.push(wave);
                self.selected_layer = self.layers.len() - 1;
                self.status = format!("{} layers", self.layers.len());
            }
            Err(e) => {
                log::error!("Failed to create wave: {}", e);
                self.status = format!("Error: {}", e);
            }
        }
    }

    /// Dropping a wave disposes it, which removes its svg from the document
    fn remove_selected_layer(&mut self) {
        if self.selected_layer < self.layers.len() {
            self.layers.remove(self.selected_layer);
            self.selected_layer = self.selected_layer.min(self.layers.len().saturating_sub(1));
            self.status = format!("{} layers", self.layers.len());
        }
        self.sync_editing();
    }

    fn sync_editing(&mut self) {
        if let Some(wave) = self.layers.get(self.selected_layer) {
            self.editing = wave.options().clone();
        }
    }

    fn any_running(&self) -> bool {
        self.layers.iter().any(|w| w.is_running())
    }

    fn toggle_all(&mut self) {
        let running = self.any_running();
        for wave in &mut self.layers {
            if running {
                wave.pause();
            } else {
                wave.play();
            }
        }
    }

    /// Keep the container the size of the panel it is painted into
    fn resize_container(&mut self, rect: egui::Rect) {
        let size = Size::new(f64::from(rect.width()), f64::from(rect.height()));
        if size == self.container_size {
            return;
        }
        self.container_size = size;
        if let Err(e) = self.document.borrow_mut().set_size(self.container, size) {
            log::warn!("Failed to resize wave container: {}", e);
        }
    }

    /// Deliver queued resize notifications to the waves
    fn pump_resizes(&mut self) {
        let resized = self.document.borrow_mut().take_resized();
        for listener in resized {
            for wave in &mut self.layers {
                wave.handle_resize(listener);
            }
        }
    }

    /// Deliver every due frame callback to the waves
    fn pump_frames(&mut self) {
        let now = self.now_ms();
        let due = self.frames.borrow_mut().take_due();
        for handle in due {
            for wave in &mut self.layers {
                wave.on_frame(handle, now);
            }
        }
    }

    fn export_selected(&mut self) {
        let Some(wave) = self.layers.get(self.selected_layer) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name("wave.svg")
            .save_file()
        else {
            return;
        };

        let result = self.document.borrow().write_snapshot(wave.svg_node(), &path);
        self.status = match result {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("Export failed: {}", e);
                format!("Error: {}", e)
            }
        };
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Layers");
        ui.separator();

        let previous = self.selected_layer;
        egui::ComboBox::from_label("Layer")
            .selected_text(format!("Layer {}", self.selected_layer + 1))
            .show_ui(ui, |ui| {
                for i in 0..self.layers.len() {
                    ui.selectable_value(&mut self.selected_layer, i, format!("Layer {}", i + 1));
                }
            });
        if self.selected_layer != previous {
            self.sync_editing();
        }

        ui.horizontal(|ui| {
            if ui.button("➕ Add").clicked() {
                let options = self.editing.clone();
                self.add_layer(&options);
                self.sync_editing();
            }
            if ui.button("➖ Remove").clicked() {
                self.remove_selected_layer();
            }
        });

        if self.layers.is_empty() {
            return;
        }

        ui.separator();
        ui.heading("Wave");

        let edited = &mut self.editing;
        let mut changed = false;
        changed |= ui.add(egui::Slider::new(&mut edited.height, 0.0..=400.0).text("Height")).changed();
        changed |= ui.add(egui::Slider::new(&mut edited.amplitude, 0.0..=200.0).text("Amplitude")).changed();
        changed |= ui.add(egui::Slider::new(&mut edited.speed, 0.01..=2.0).text("Speed")).changed();
        changed |= ui.add(egui::Slider::new(&mut edited.bones, 1..=16).text("Bones")).changed();

        egui::ComboBox::from_label("Position")
            .selected_text(edited.position.name())
            .show_ui(ui, |ui| {
                for position in Position::all() {
                    if ui.selectable_value(&mut edited.position, *position, position.name()).clicked() {
                        changed = true;
                    }
                }
            });

        ui.horizontal(|ui| {
            ui.label("Color");
            changed |= ui.text_edit_singleline(&mut edited.color).changed();
        });
        if parse_color(&edited.color).is_none() {
            ui.colored_label(egui::Color32::YELLOW, "Unrecognized color");
        }

        let mut eased = matches!(edited.redraw, RedrawMode::Eased { .. });
        if ui.checkbox(&mut eased, "Eased redraw").changed() {
            edited.redraw = if eased { RedrawMode::eased() } else { RedrawMode::Snap };
            changed = true;
        }
        if let RedrawMode::Eased { duration_ms } = &mut edited.redraw {
            changed |= ui.add(egui::Slider::new(duration_ms, 16.0..=2000.0).text("Ease (ms)")).changed();
        }

        if changed {
            let patch = WaveOptionsPatch::from(&self.editing);
            if let Some(wave) = self.layers.get_mut(self.selected_layer) {
                wave.set_options(&patch);
            }
        }

        ui.separator();
        ui.heading("Display");
        ui.checkbox(&mut self.view.show_points, "Show sample points");
        ui.add(egui::Slider::new(&mut self.view.curve_samples, 2..=64).text("Curve samples"));

        ui.separator();
        if ui.button("💾 Export layer as SVG").clicked() {
            self.export_selected();
        }
        if ui.button("Save settings").clicked() {
            AppSettings::from_app(self).save();
            self.status = "Settings saved".to_string();
        }
    }

    fn paint_waves(&self, painter: &egui::Painter, rect: egui::Rect) {
        let document = self.document.borrow();
        let fallback = egui::Color32::from_white_alpha(50);

        for wave in &self.layers {
            let node = wave.path_node();
            let Some(path) = document.path(node) else {
                continue;
            };
            let color = document
                .attribute(node, "fill")
                .and_then(parse_color)
                .unwrap_or(fallback);
            self.view.paint(painter, rect, path, wave.drawn_position(), color);
        }
    }
}

impl eframe::App for WaveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_frames();
        if self.any_running() {
            ctx.request_repaint();
        }

        // Top panel
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("wavify");
                ui.separator();

                let button_text = if self.any_running() { "⏸ Pause" } else { "▶ Play" };
                if ui.button(button_text).clicked() {
                    self.toggle_all();
                }

                ui.separator();
                ui.toggle_value(&mut self.show_settings, "⚙ Settings");
                ui.separator();
                ui.label(&self.status);
            });
        });

        // Settings panel
        if self.show_settings {
            egui::SidePanel::left("settings_panel")
                .min_width(240.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.settings_panel(ui));
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_rgb(18, 24, 48)))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                self.resize_container(rect);
                self.pump_resizes();
                self.paint_waves(&painter, rect);
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        AppSettings::from_app(self).save();
        log::info!("Settings saved");
    }
}
