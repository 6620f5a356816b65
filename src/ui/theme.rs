use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub field_bg: String,
    pub field_active_bg: String,
    pub field_active_fg: String,
    pub success: String,
    pub warning: String,
}

impl Theme {
    /// Look up `name` in `<config_dir>/quicklearn/themes/` first, then the
    /// bundled set.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        let user_path = Config::config_dir().join("themes").join(&filename);
        if let Ok(content) = fs::read_to_string(&user_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => warn!(path = %user_path.display(), error = %e, "bad user theme"),
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// Load `name`, falling back to the default theme.
    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            warn!(name, "unknown theme, using default");
            Self::default()
        })
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            muted: "#6c7086".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            field_bg: "#313244".to_string(),
            field_active_bg: "#f5e0dc".to_string(),
            field_active_fg: "#1e1e2e".to_string(),
            success: "#a6e3a1".to_string(),
            warning: "#f9e2af".to_string(),
        }
    }
}

impl ThemeColors {
    /// `#rrggbb` to an RGB color; anything else renders white.
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn field_bg(&self) -> Color { Self::parse_color(&self.field_bg) }
    pub fn field_active_bg(&self) -> Color { Self::parse_color(&self.field_active_bg) }
    pub fn field_active_fg(&self) -> Color { Self::parse_color(&self.field_active_fg) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
}
