use crate::config::{Config, FontConfig};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colors picked up from the GTK theme, with fallbacks for themes that do not
/// define the named colors.
pub struct ThemeColors {
    pub foreground: Srgba<f64>,
    pub accent: Srgba<f64>,
    pub arc_neutral: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            foreground: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
            ),
            accent: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(1.0, 0.0, 0.0, 1.0),
            ),
            arc_neutral: Self::lookup_color(
                context,
                "insensitive_fg_color",
                Srgba::new(0.83, 0.83, 0.83, 1.0),
            ),
        }
    }

    fn lookup_color(context: &gtk::StyleContext, name: &str, fallback: Srgba<f64>) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                )
            })
            .unwrap_or(fallback)
    }
}

/// Everything the paint routine needs besides the knob state: caption text,
/// fonts and resolved colors. Rebuilt on every draw so theme switches and
/// config reloads take effect immediately.
pub struct KnobStyle {
    pub caption: String,
    pub label_font: FontConfig,
    pub value_font: FontConfig,
    pub caption_font: FontConfig,
    pub pointer: Srgba<f64>,
    pub foreground: Srgba<f64>,
    pub arc_neutral: Srgba<f64>,
    pub arc_accent: Srgba<f64>,
    pub cap_top: Srgba<f64>,
    pub cap_bottom: Srgba<f64>,
}

impl KnobStyle {
    pub fn resolve(config: &Config, context: &gtk::StyleContext) -> Self {
        let colors = ThemeColors::from_context(context);
        let pointer = config
            .pointer_color
            .map(Into::into)
            .unwrap_or(colors.accent);

        Self {
            caption: config.caption.clone(),
            label_font: config.label_font.clone(),
            value_font: config.value_font.clone(),
            caption_font: config.caption_font.clone(),
            pointer,
            foreground: config
                .foreground
                .map(Into::into)
                .unwrap_or(colors.foreground),
            arc_neutral: colors.arc_neutral,
            arc_accent: pointer,
            cap_top: Srgba::new(0.83, 0.83, 0.83, 1.0),
            cap_bottom: Srgba::new(0.66, 0.66, 0.66, 1.0),
        }
    }
}

/// Componentwise linear interpolation, exact at both endpoints.
pub fn lerp(a: Srgba<f64>, b: Srgba<f64>, t: f64) -> Srgba<f64> {
    let t = t.clamp(0.0, 1.0);
    Srgba::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.rondel-window, .rondel-dial {
    background-color: #1d1d1d;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
