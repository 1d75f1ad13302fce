// Overlay settings: cursor style, tick rate and colors. Loaded from TOML;
// a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cursor::CursorStyle;
use crate::trail::DEFAULT_MAX_POINTS;
use crate::types::Rgba;

/// Everything the overlay reads at construction or on `configure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Which cursor decoration to draw
    #[serde(default)]
    pub style: CursorStyle,
    /// Animation tick interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub ripple: RippleConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            style: CursorStyle::default(),
            tick_ms: default_tick_ms(),
            cursor: CursorConfig::default(),
            trail: TrailConfig::default(),
            ripple: RippleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Half-length of the cross arms in pixels
    #[serde(default = "default_cursor_size")]
    pub size: i32,
    #[serde(default = "default_primary")]
    pub primary: Rgba,
    #[serde(default = "default_secondary")]
    pub secondary: Rgba,
    /// Drop shadow for the static variants (translucent)
    #[serde(default = "default_shadow")]
    pub shadow: Rgba,
    /// Start color of the animated arc gradient, also the idle particle color
    #[serde(default = "default_gradient")]
    pub gradient: Rgba,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            size: default_cursor_size(),
            primary: default_primary(),
            secondary: default_secondary(),
            shadow: default_shadow(),
            gradient: default_gradient(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailConfig {
    #[serde(default = "default_trail_color")]
    pub color: Rgba,
    /// Ring buffer capacity
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            color: default_trail_color(),
            max_points: default_max_points(),
        }
    }
}

/// The three colors clicks cycle through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleConfig {
    #[serde(default = "default_ripple_first")]
    pub first: Rgba,
    #[serde(default = "default_ripple_second")]
    pub second: Rgba,
    #[serde(default = "default_ripple_third")]
    pub third: Rgba,
}

impl RippleConfig {
    pub fn color(&self, index: usize) -> Rgba {
        match index % 3 {
            0 => self.first,
            1 => self.second,
            _ => self.third,
        }
    }
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            first: default_ripple_first(),
            second: default_ripple_second(),
            third: default_ripple_third(),
        }
    }
}

fn default_tick_ms() -> u64 {
    20
}

fn default_cursor_size() -> i32 {
    8
}

fn default_primary() -> Rgba {
    Rgba::rgb(222, 222, 222)
}

fn default_secondary() -> Rgba {
    Rgba::rgb(245, 245, 245)
}

fn default_shadow() -> Rgba {
    Rgba::new(0, 0, 0, 50)
}

fn default_gradient() -> Rgba {
    Rgba::rgb(0, 255, 255)
}

fn default_trail_color() -> Rgba {
    Rgba::WHITE
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS
}

fn default_ripple_first() -> Rgba {
    Rgba::rgb(0, 255, 255)
}

fn default_ripple_second() -> Rgba {
    Rgba::rgb(255, 255, 255)
}

fn default_ripple_third() -> Rgba {
    Rgba::rgb(192, 192, 192)
}

impl OverlayConfig {
    /// Load from `path`; a missing file means all defaults.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// `cursor-paint.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("cursor-paint.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = OverlayConfig::from_toml("").unwrap();
        assert_eq!(config, OverlayConfig::default());
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.trail.max_points, 15);
        assert_eq!(config.style, CursorStyle::Animated);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = OverlayConfig::from_toml(
            r#"
            style = "plus-sign"

            [cursor]
            size = 12
            shadow = [10, 20, 30, 40]

            [ripple]
            second = [255, 0, 0]
            "#,
        )
        .unwrap();

        assert_eq!(config.style, CursorStyle::PlusSign);
        assert_eq!(config.cursor.size, 12);
        assert_eq!(config.cursor.shadow, Rgba::new(10, 20, 30, 40));
        assert_eq!(config.cursor.primary, Rgba::rgb(222, 222, 222));
        assert_eq!(config.ripple.color(0), Rgba::rgb(0, 255, 255));
        assert_eq!(config.ripple.color(1), Rgba::rgb(255, 0, 0));
        assert_eq!(config.ripple.color(5), Rgba::rgb(192, 192, 192));
    }

    #[test]
    fn test_bad_color_is_a_config_error() {
        let err = OverlayConfig::from_toml("[trail]\ncolor = [1, 2]\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OverlayConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(OverlayConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("cursor-paint-does-not-exist.toml");
        let config = OverlayConfig::load(&path).unwrap();
        assert_eq!(config, OverlayConfig::default());
    }
}
