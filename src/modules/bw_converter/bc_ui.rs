use eframe::egui;
use crate::style::{self, ColorPalette, ThemeMode};
use super::bc_main::{
    BatchEvent, BwConverter, Notice,
    IMAGE_EXTENSIONS, STATUS_DIR_CLEARED, STATUS_DIR_PICKED, STATUS_FILES_CLEARED,
    STATUS_FILES_PICKED, STATUS_STARTING, display_name,
};
use super::bc_tools::{output_path_for, spawn_batch};

impl BwConverter {
    pub fn pick_images(&mut self) {
        if self.is_busy() { return; }
        let files = rfd::FileDialog::new()
            .set_title("Select images to convert to black and white")
            .add_filter("Image Files", IMAGE_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_files();

        if self.selection.set_files(files) {
            log::info!("{} image(s) selected", self.selection.files.len());
            self.status = STATUS_FILES_PICKED.to_string();
        } else {
            self.status = STATUS_FILES_CLEARED.to_string();
        }
    }

    pub fn pick_output_dir(&mut self) {
        if self.is_busy() { return; }
        let dir = rfd::FileDialog::new()
            .set_title("Select the folder to save black and white images to")
            .pick_folder();

        if self.selection.set_output_dir(dir) {
            self.status = STATUS_DIR_PICKED.to_string();
        } else {
            self.status = STATUS_DIR_CLEARED.to_string();
        }
    }

    pub fn start_batch(&mut self, ctx: &egui::Context) {
        if self.is_busy() { return; }
        let repaint_ctx = ctx.clone();
        match spawn_batch(self.selection.clone(), move || repaint_ctx.request_repaint()) {
            Ok(task) => {
                self.task = Some(task);
                self.progress = 0;
                self.batch_started = true;
                self.last_report = None;
                self.status = STATUS_STARTING.to_string();
            }
            Err(e) => {
                log::warn!("Batch not started: {}", e);
                self.notice = Some(Notice::MissingInput(e));
            }
        }
    }

    fn poll_task(&mut self) {
        let Some(task) = &self.task else { return };
        let update = task.poll();

        let mut finished = false;
        for event in update.events {
            if let Some(text) = event.status_text() {
                self.status = text;
            }
            match event {
                BatchEvent::Processing { .. } => {}
                BatchEvent::Progress(p) => self.progress = p,
                BatchEvent::Finished(report) => {
                    self.notice = Some(Notice::Summary(report.clone()));
                    self.last_report = Some(report);
                    finished = true;
                }
            }
        }

        if finished {
            self.task = None;
        } else if update.disconnected {
            log::error!("Conversion worker exited without a report");
            self.task = None;
            self.status = "Conversion stopped unexpectedly.".to_string();
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.poll_task();
        let theme = ThemeMode::from_visuals(ui.visuals());

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                self.render_header(ui, theme);

                ui.add_space(8.0);
                self.render_file_selection(ui, theme);

                ui.add_space(12.0);
                self.render_output_directory(ui, theme);

                ui.add_space(16.0);
                ui.vertical_centered(|ui| {
                    if style::primary_button(ui, "3. Start Conversion", !self.is_busy(), theme).clicked() {
                        self.start_batch(ctx);
                    }
                });

                if self.batch_started {
                    ui.add_space(16.0);
                    self.render_progress(ui, theme);
                }

                ui.add_space(12.0);
                self.render_status(ui, theme);
                ui.add_space(16.0);
            });
    }

    fn render_header(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        let (title_color, subtitle_color) = match theme {
            ThemeMode::Dark => (ColorPalette::ZINC_100, ColorPalette::ZINC_400),
            ThemeMode::Light => (ColorPalette::ZINC_900, ColorPalette::ZINC_600),
        };

        ui.vertical(|ui| {
            ui.add_space(12.0);
            ui.label(egui::RichText::new("Grayscale Batch Converter").size(24.0).color(title_color));
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("Convert a batch of images to black and white in one go")
                    .size(13.0)
                    .color(subtitle_color)
            );
            ui.add_space(12.0);
        });
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let colors = style::panel_colors(theme);
        let busy = self.is_busy();

        style::card_frame(theme).show(ui, |ui| {
            ui.horizontal(|ui| {
                if style::secondary_button(ui, "1. Select Images", !busy, theme).clicked() {
                    self.pick_images();
                }
                let count_text = match self.selection.files.len() {
                    0 => "No images selected.".to_string(),
                    n => format!("{} images selected.", n),
                };
                ui.label(egui::RichText::new(count_text).size(13.0).color(colors.text));
            });

            if self.selection.files.is_empty() {
                return;
            }

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(4.0);

            let out_dir = self.selection.output_dir.clone().unwrap_or_default();
            egui::ScrollArea::vertical()
                .id_salt("selected_files")
                .max_height(180.0)
                .show(ui, |ui| {
                    for (idx, path) in self.selection.files.iter().enumerate() {
                        let output_name = display_name(&output_path_for(path, &out_dir));
                        egui::Frame::new()
                            .fill(colors.inset)
                            .stroke(egui::Stroke::new(1.0, colors.border))
                            .corner_radius(6.0)
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        egui::RichText::new(format!("{}.", idx + 1))
                                            .size(11.0)
                                            .color(colors.muted)
                                    );
                                    ui.label(egui::RichText::new(display_name(path)).size(13.0).color(colors.text));
                                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                        ui.label(
                                            egui::RichText::new(format!("→ {}", output_name))
                                                .size(11.0)
                                                .color(colors.muted)
                                        );
                                    });
                                });
                            });
                        ui.add_space(4.0);
                    }
                });
        });
    }

    fn render_output_directory(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let colors = style::panel_colors(theme);
        let busy = self.is_busy();

        style::card_frame(theme).show(ui, |ui| {
            ui.horizontal(|ui| {
                if style::secondary_button(ui, "2. Select Output Folder", !busy, theme).clicked() {
                    self.pick_output_dir();
                }
                let dir_text = match &self.selection.output_dir {
                    Some(dir) => format!("Save to: {}", dir.display()),
                    None => "No output folder selected.".to_string(),
                };
                ui.add(
                    egui::Label::new(egui::RichText::new(dir_text).size(13.0).color(colors.text)).wrap()
                );
            });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        let colors = style::panel_colors(theme);

        style::card_frame(theme).show(ui, |ui| {
            ui.label(egui::RichText::new("Conversion Progress").size(14.0).color(colors.text));
            ui.add_space(8.0);

            let progress_bg = match theme {
                ThemeMode::Dark => ColorPalette::ZINC_700,
                ThemeMode::Light => ColorPalette::GRAY_200,
            };
            let progress_fill = match &self.last_report {
                None => ColorPalette::BLUE_500,
                Some(report) if report.is_clean() => ColorPalette::GREEN_500,
                Some(_) => ColorPalette::RED_500,
            };

            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), 24.0),
                egui::Sense::hover(),
            );
            ui.painter().rect_filled(rect, 4.0, progress_bg);

            let fraction = self.progress as f32 / 100.0;
            let fill_rect = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * fraction, rect.height()),
            );
            ui.painter().rect_filled(fill_rect, 4.0, progress_fill);

            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("{}%", self.progress),
                egui::FontId::proportional(12.0),
                egui::Color32::WHITE,
            );
        });
    }

    fn render_status(&self, ui: &mut egui::Ui, theme: ThemeMode) {
        let colors = style::panel_colors(theme);

        egui::Frame::new()
            .fill(colors.inset)
            .stroke(egui::Stroke::new(1.0, colors.border))
            .corner_radius(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.add(
                    egui::Label::new(egui::RichText::new(&self.status).size(12.0).color(colors.text)).wrap()
                );
            });
    }
}
