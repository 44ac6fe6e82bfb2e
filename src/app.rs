use eframe::egui;
use crate::style::{self, ColorPalette, ThemeMode};
use crate::modules::bw_converter::{BwConverter, Notice};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum ThemePreference { System, Light, Dark }

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct AppSettings { theme_preference: ThemePreference }

impl Default for AppSettings {
    fn default() -> Self {
        Self { theme_preference: ThemePreference::System }
    }
}

impl AppSettings {
    fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn save(&self) {
        if let Err(e) = self.save_to(&Self::get_config_path()) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("bw_converter");
        path.push("app_settings.json");
        path
    }
}

pub struct GrayscaleApp {
    converter: BwConverter,
    theme_mode: ThemeMode,
    theme_preference: ThemePreference,
    show_settings: bool,
    notice: Option<Notice>,
}

impl GrayscaleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();
        let initial_theme = match settings.theme_preference {
            ThemePreference::System => ThemeMode::from_egui(cc.egui_ctx.theme()),
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
        };
        style::apply_theme(&cc.egui_ctx, initial_theme);

        Self {
            converter: BwConverter::new(),
            theme_mode: initial_theme,
            theme_preference: settings.theme_preference,
            show_settings: false,
            notice: None,
        }
    }

    fn set_theme_preference(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        self.theme_preference = preference;
        self.theme_mode = match preference {
            ThemePreference::System => ThemeMode::from_egui(ctx.theme()),
            ThemePreference::Light => ThemeMode::Light,
            ThemePreference::Dark => ThemeMode::Dark,
        };
        style::apply_theme(ctx, self.theme_mode);
        AppSettings { theme_preference: preference }.save();
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        let busy = self.converter.is_busy();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Select Images...")).clicked() {
                        ui.close();
                        self.converter.pick_images();
                    }
                    if ui.add_enabled(!busy, egui::Button::new("Select Output Folder...")).clicked() {
                        ui.close();
                        self.converter.pick_output_dir();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Settings...").clicked() {
                        self.show_settings = true;
                        ui.close();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn render_overlay(ctx: &egui::Context, id: &str, color: egui::Color32) {
        egui::Area::new(egui::Id::new(id))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                ui.painter().rect_filled(ctx.content_rect(), 0.0, color);
            });
    }

    fn render_notice_dialog(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else { return };

        let (bg_color, border_color, text_color, muted_color, overlay_color) = match self.theme_mode {
            ThemeMode::Dark => (
                ColorPalette::ZINC_800,
                ColorPalette::ZINC_700,
                ColorPalette::ZINC_100,
                ColorPalette::ZINC_400,
                egui::Color32::from_rgba_premultiplied(0, 0, 0, 200),
            ),
            ThemeMode::Light => (
                egui::Color32::WHITE,
                ColorPalette::GRAY_300,
                ColorPalette::GRAY_900,
                ColorPalette::GRAY_600,
                egui::Color32::from_rgba_premultiplied(0, 0, 0, 150),
            ),
        };

        Self::render_overlay(ctx, "notice_overlay", overlay_color);

        let title = match notice {
            Notice::MissingInput(_) => "Missing Information",
            Notice::Summary(report) if report.is_clean() => "Conversion Complete",
            Notice::Summary(_) => "Conversion Finished With Errors",
        };

        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Tooltip)
            .min_width(360.0)
            .frame(egui::Frame::new()
                .fill(bg_color)
                .stroke(egui::Stroke::new(1.0, border_color))
                .corner_radius(8.0)
                .inner_margin(24.0))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    match notice {
                        Notice::MissingInput(err) => {
                            ui.label(egui::RichText::new("Cannot start yet").size(16.0).color(ColorPalette::AMBER_500));
                            ui.add_space(8.0);
                            ui.label(egui::RichText::new(err.to_string()).size(13.0).color(text_color));
                        }
                        Notice::Summary(report) => {
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} of {} images converted successfully.",
                                    report.success_count, report.total
                                ))
                                .size(16.0)
                                .color(text_color)
                            );

                            if report.error_count > 0 {
                                ui.add_space(8.0);
                                ui.label(
                                    egui::RichText::new(format!("{} errors occurred:", report.error_count))
                                        .size(13.0)
                                        .color(ColorPalette::RED_500)
                                );
                                ui.add_space(4.0);
                                for line in report.error_lines() {
                                    ui.label(egui::RichText::new(line).size(12.0).monospace().color(text_color));
                                }
                            }

                            ui.add_space(8.0);
                            ui.label(
                                egui::RichText::new(format!("Finished at {}", report.finished_at.format("%H:%M:%S")))
                                    .size(11.0)
                                    .color(muted_color)
                            );
                        }
                    }

                    ui.add_space(20.0);
                    if style::primary_button(ui, "OK", true, self.theme_mode).clicked() {
                        dismissed = true;
                    }
                    ui.add_space(8.0);
                });
            });

        if dismissed {
            self.notice = None;
        }
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings { return; }
        Self::render_overlay(ctx, "settings_overlay", egui::Color32::from_rgba_premultiplied(0, 0, 0, 160));

        let (bg, border, muted, text) = match self.theme_mode {
            ThemeMode::Dark => (egui::Color32::from_rgb(22, 22, 27), ColorPalette::ZINC_700, ColorPalette::ZINC_500, ColorPalette::SLATE_200),
            ThemeMode::Light => (egui::Color32::WHITE, ColorPalette::GRAY_200, ColorPalette::GRAY_400, ColorPalette::GRAY_700),
        };

        let mut picked = None;
        let mut open = self.show_settings;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .min_width(360.0)
            .frame(egui::Frame::new().fill(bg).stroke(egui::Stroke::new(1.0, border)).corner_radius(10.0).inner_margin(28.0))
            .open(&mut open)
            .order(egui::Order::Tooltip)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("APPEARANCE").size(11.0).color(muted));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Theme").size(14.0).color(text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        for (pref, label) in [
                            (ThemePreference::Dark, "Dark"),
                            (ThemePreference::Light, "Light"),
                            (ThemePreference::System, "System"),
                        ] {
                            if ui.selectable_label(self.theme_preference == pref, label).clicked() {
                                picked = Some(pref);
                            }
                        }
                    });
                });
            });

        self.show_settings = open;
        if let Some(pref) = picked {
            self.set_theme_preference(ctx, pref);
        }
    }
}

impl eframe::App for GrayscaleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.theme_preference, ThemePreference::System) {
            let system_theme = ThemeMode::from_egui(ctx.theme());
            if self.theme_mode != system_theme {
                self.theme_mode = system_theme;
                style::apply_theme(ctx, self.theme_mode);
            }
        }

        self.top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.converter.ui(ui, ctx);
        });

        if self.notice.is_none() {
            if let Some(notice) = self.converter.take_notice() {
                self.notice = Some(notice);
                ctx.request_repaint();
            }
        }

        self.render_notice_dialog(ctx);
        self.render_settings_modal(ctx);
    }
}
