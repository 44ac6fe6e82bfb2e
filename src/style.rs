use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        if visuals.dark_mode { ThemeMode::Dark } else { ThemeMode::Light }
    }

    pub fn from_egui(theme: egui::Theme) -> Self {
        match theme {
            egui::Theme::Dark => ThemeMode::Dark,
            egui::Theme::Light => ThemeMode::Light,
        }
    }
}

pub struct ColorPalette;

impl ColorPalette {
    pub const BLUE_500: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
    pub const BLUE_600: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

    pub const SLATE_100: egui::Color32 = egui::Color32::from_rgb(241, 245, 249);
    pub const SLATE_200: egui::Color32 = egui::Color32::from_rgb(226, 232, 240);
    pub const SLATE_300: egui::Color32 = egui::Color32::from_rgb(203, 213, 225);

    pub const GRAY_50: egui::Color32 = egui::Color32::from_rgb(249, 250, 251);
    pub const GRAY_100: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);
    pub const GRAY_200: egui::Color32 = egui::Color32::from_rgb(229, 231, 235);
    pub const GRAY_300: egui::Color32 = egui::Color32::from_rgb(209, 213, 219);
    pub const GRAY_400: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
    pub const GRAY_500: egui::Color32 = egui::Color32::from_rgb(107, 114, 128);
    pub const GRAY_600: egui::Color32 = egui::Color32::from_rgb(75, 85, 99);
    pub const GRAY_700: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);
    pub const GRAY_800: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
    pub const GRAY_900: egui::Color32 = egui::Color32::from_rgb(17, 24, 39);

    pub const ZINC_100: egui::Color32 = egui::Color32::from_rgb(244, 244, 245);
    pub const ZINC_200: egui::Color32 = egui::Color32::from_rgb(228, 228, 231);
    pub const ZINC_400: egui::Color32 = egui::Color32::from_rgb(161, 161, 170);
    pub const ZINC_500: egui::Color32 = egui::Color32::from_rgb(113, 113, 122);
    pub const ZINC_600: egui::Color32 = egui::Color32::from_rgb(82, 82, 91);
    pub const ZINC_700: egui::Color32 = egui::Color32::from_rgb(63, 63, 70);
    pub const ZINC_800: egui::Color32 = egui::Color32::from_rgb(39, 39, 42);
    pub const ZINC_900: egui::Color32 = egui::Color32::from_rgb(24, 24, 27);

    pub const GREEN_500: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);
    pub const RED_500: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
    pub const AMBER_500: egui::Color32 = egui::Color32::from_rgb(245, 158, 11);
}

/// Colors shared by every card on the converter page.
#[derive(Debug, Clone, Copy)]
pub struct PanelColors {
    pub bg: egui::Color32,
    pub border: egui::Color32,
    pub text: egui::Color32,
    pub muted: egui::Color32,
    pub inset: egui::Color32,
}

pub fn panel_colors(theme: ThemeMode) -> PanelColors {
    match theme {
        ThemeMode::Dark => PanelColors {
            bg: ColorPalette::ZINC_800,
            border: ColorPalette::ZINC_700,
            text: ColorPalette::ZINC_200,
            muted: ColorPalette::ZINC_400,
            inset: ColorPalette::ZINC_900,
        },
        ThemeMode::Light => PanelColors {
            bg: ColorPalette::GRAY_50,
            border: ColorPalette::GRAY_300,
            text: ColorPalette::GRAY_800,
            muted: ColorPalette::ZINC_600,
            inset: egui::Color32::WHITE,
        },
    }
}

pub fn card_frame(theme: ThemeMode) -> egui::Frame {
    let colors = panel_colors(theme);
    egui::Frame::new()
        .fill(colors.bg)
        .stroke(egui::Stroke::new(1.0, colors.border))
        .corner_radius(8.0)
        .inner_margin(16.0)
}

pub fn apply_theme(ctx: &egui::Context, theme: ThemeMode) {
    let mut style = (*ctx.style()).clone();

    style.visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(10);

    apply_visuals(&mut style, &theme_visuals(theme));

    ctx.set_style(style);
}

/// The visuals the converter page actually draws with: panels, modal windows,
/// scroll bars, labels, separators, menu and selectable buttons.
struct ThemeVisuals {
    dark: bool,
    panel: egui::Color32,
    scroll_bg: egui::Color32,
    border: egui::Color32,
    label: egui::Color32,
    idle: (egui::Color32, egui::Color32),
    hover: (egui::Color32, egui::Color32),
    pressed: (egui::Color32, egui::Color32),
    selection: egui::Color32,
}

fn theme_visuals(theme: ThemeMode) -> ThemeVisuals {
    match theme {
        ThemeMode::Dark => ThemeVisuals {
            dark: true,
            panel: ColorPalette::ZINC_900,
            scroll_bg: egui::Color32::from_rgb(12, 12, 15),
            border: ColorPalette::ZINC_700,
            label: ColorPalette::SLATE_300,
            idle: (ColorPalette::ZINC_800, ColorPalette::SLATE_200),
            hover: (egui::Color32::from_rgb(40, 40, 48), ColorPalette::SLATE_100),
            pressed: (egui::Color32::from_rgb(50, 50, 60), egui::Color32::WHITE),
            selection: egui::Color32::from_rgba_premultiplied(60, 120, 240, 100),
        },
        ThemeMode::Light => ThemeVisuals {
            dark: false,
            panel: ColorPalette::GRAY_50,
            scroll_bg: egui::Color32::WHITE,
            border: ColorPalette::GRAY_300,
            label: ColorPalette::GRAY_700,
            idle: (ColorPalette::GRAY_100, ColorPalette::GRAY_800),
            hover: (ColorPalette::GRAY_200, ColorPalette::GRAY_900),
            pressed: (ColorPalette::GRAY_300, egui::Color32::BLACK),
            selection: egui::Color32::from_rgba_premultiplied(60, 120, 240, 80),
        },
    }
}

fn apply_visuals(style: &mut egui::Style, v: &ThemeVisuals) {
    let visuals = &mut style.visuals;
    visuals.dark_mode = v.dark;
    visuals.panel_fill = v.panel;
    visuals.window_fill = v.panel;
    visuals.extreme_bg_color = v.scroll_bg;
    visuals.selection.bg_fill = v.selection;

    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, v.border);
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, v.label);

    for (widget, (fill, text)) in [
        (&mut visuals.widgets.inactive, v.idle),
        (&mut visuals.widgets.hovered, v.hover),
        (&mut visuals.widgets.active, v.pressed),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.fg_stroke = egui::Stroke::new(1.0, text);
    }
}

pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool, theme: ThemeMode) -> egui::Response {
    let (bg_color, hover_color, text_color) = match (enabled, theme) {
        (true, _) => (ColorPalette::BLUE_600, ColorPalette::BLUE_500, egui::Color32::WHITE),
        (false, ThemeMode::Dark) => (ColorPalette::ZINC_700, ColorPalette::ZINC_700, ColorPalette::ZINC_500),
        (false, ThemeMode::Light) => (ColorPalette::GRAY_300, ColorPalette::GRAY_300, ColorPalette::GRAY_500),
    };

    ui.scope(|ui| {
        let style = ui.style_mut();
        style.visuals.widgets.inactive.bg_fill = bg_color;
        style.visuals.widgets.inactive.weak_bg_fill = bg_color;
        style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, text_color);
        style.visuals.widgets.inactive.bg_stroke = egui::Stroke::NONE;

        style.visuals.widgets.hovered.bg_fill = hover_color;
        style.visuals.widgets.hovered.weak_bg_fill = hover_color;
        style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, text_color);
        style.visuals.widgets.hovered.bg_stroke = egui::Stroke::NONE;

        style.visuals.widgets.active.bg_fill = bg_color;
        style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, text_color);
        style.visuals.widgets.active.bg_stroke = egui::Stroke::NONE;

        let button = egui::Button::new(
            egui::RichText::new(text).size(15.0).color(text_color)
        )
        .min_size(egui::vec2(200.0, 40.0))
        .corner_radius(6.0);

        ui.add_enabled(enabled, button)
    }).inner
}

pub fn secondary_button(ui: &mut egui::Ui, text: &str, enabled: bool, theme: ThemeMode) -> egui::Response {
    let (bg_color, stroke_color, text_color, hover_bg) = match theme {
        ThemeMode::Dark => (
            ColorPalette::ZINC_800,
            ColorPalette::ZINC_600,
            ColorPalette::SLATE_200,
            ColorPalette::ZINC_700,
        ),
        ThemeMode::Light => (
            egui::Color32::WHITE,
            ColorPalette::GRAY_300,
            ColorPalette::GRAY_800,
            ColorPalette::GRAY_100,
        ),
    };

    ui.scope(|ui| {
        let style = ui.style_mut();
        style.visuals.widgets.inactive.bg_fill = bg_color;
        style.visuals.widgets.inactive.weak_bg_fill = bg_color;
        style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, text_color);
        style.visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, stroke_color);

        style.visuals.widgets.hovered.bg_fill = hover_bg;
        style.visuals.widgets.hovered.weak_bg_fill = hover_bg;
        style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, text_color);
        style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, stroke_color);

        style.visuals.widgets.active.bg_fill = bg_color;
        style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, text_color);

        let button = egui::Button::new(egui::RichText::new(text).size(14.0))
            .min_size(egui::vec2(180.0, 34.0));

        ui.add_enabled(enabled, button)
    }).inner
}
