use crate::events::AppEvent;
use crate::gui::knob::LabelText;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgba;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub slant: FontSlant,
}

impl FontConfig {
    pub fn new(family: impl Into<String>, size: f64, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
            slant: FontSlant::Normal,
        }
    }
}

/// A color written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct ColorSpec(pub Srgba<f64>);

#[derive(Debug, Error)]
#[error("invalid color '{0}', expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(String);

impl FromStr for ColorSpec {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
            return Err(err());
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|_| err())
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self(Srgba::new(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            alpha,
        )))
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = self.0.into_components();
        if a < 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b), byte(a))
        } else {
            write!(f, "#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
        }
    }
}

impl From<ColorSpec> for Srgba<f64> {
    fn from(spec: ColorSpec) -> Self {
        spec.0
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub caption: String,
    pub labels: Vec<LabelText>,
    /// Index selected at startup, clamped into range.
    pub initial: usize,
    /// Unset colors follow the GTK theme.
    pub pointer_color: Option<ColorSpec>,
    pub foreground: Option<ColorSpec>,
    pub label_font: FontConfig,
    pub value_font: FontConfig,
    pub caption_font: FontConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            caption: "Sensitivity".into(),
            labels: ["Low", "Medium", "High"]
                .into_iter()
                .map(LabelText::new)
                .collect(),
            initial: 0,
            pointer_color: None,
            foreground: None,
            label_font: FontConfig::new("Sans", 8.0, FontWeight::Normal),
            value_font: FontConfig::new("Sans", 12.0, FontWeight::Bold),
            caption_font: FontConfig::new("Sans", 10.0, FontWeight::Normal),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("dev", "rondel", "rondel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("RONDEL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to the built-in configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Watches the config directory and reports edits of the config file, so the
/// label list and appearance can be changed while the knob is on screen.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config_file(tx).await {
        log::error!("Config watcher error: {}", e);
    }
}

async fn watch_config_file(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return Ok(());
    };
    fs_err::create_dir_all(&config_dir)?;

    // notify's callback runs on its own thread; bridge it into async land
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_deserialization() {
        let cases = vec![
            ("\"normal\"", FontWeight::Normal),
            ("\"Normal\"", FontWeight::Normal),
            ("\"BOLD\"", FontWeight::Bold),
            ("\"bold\"", FontWeight::Bold),
        ];

        for (json, expected) in cases {
            let deserialized: FontWeight = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_font_slant_deserialization() {
        let deserialized: FontSlant = serde_json::from_str("\"italic\"").unwrap();
        assert_eq!(deserialized, FontSlant::Italic);
        assert!(serde_json::from_str::<FontSlant>("\"upright\"").is_err());
    }

    #[test]
    fn test_color_parsing() {
        let c: ColorSpec = "#ff0000".parse().unwrap();
        assert_eq!(c.0, Srgba::new(1.0, 0.0, 0.0, 1.0));

        let c: ColorSpec = "#00ff0080".parse().unwrap();
        assert_eq!(c.0.green, 1.0);
        assert!((c.0.alpha - 128.0 / 255.0).abs() < 1e-12);

        for bad in ["ff0000", "#ff00", "#gg0000", "#ffffffffff"] {
            assert!(bad.parse::<ColorSpec>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_color_display_roundtrip() {
        for hex in ["#ff0000", "#12ab4c", "#12ab4c80"] {
            let c: ColorSpec = hex.parse().unwrap();
            assert_eq!(c.to_string(), hex);
        }
    }

    #[test]
    fn test_config_deserialization() {
        let json = r##"{
            "caption": "Gain",
            "labels": ["Off", "Half", "Full"],
            "initial": 1,
            "pointer_color": "#ff0000",
            "value_font": { "family": "Monospace", "size": 14.0, "weight": "bold" }
        }"##;

        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.caption, "Gain");
        assert_eq!(cfg.labels.len(), 3);
        assert_eq!(cfg.labels[2], LabelText::new("Full"));
        assert_eq!(cfg.initial, 1);
        assert_eq!(cfg.value_font.weight, FontWeight::Bold);
        assert_eq!(cfg.value_font.slant, FontSlant::Normal);
        // untouched fields keep their defaults
        assert_eq!(cfg.label_font.size, 8.0);
        assert!(cfg.foreground.is_none());
    }

    #[test]
    fn test_default_config_file_parses() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!cfg.labels.is_empty());
        assert_eq!(cfg.caption, Config::default().caption);
    }
}
