//! Compression profiles and the per-level parameter tables.

use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use crate::error::CompressionError;

/// Compression aggressiveness tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Extreme,
    High,
    Normal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Extreme => "extreme",
            Level::High => "high",
            Level::Normal => "normal",
        }
    }

    /// Baseline JPEG quality for standalone images.
    pub fn image_quality(&self) -> u8 {
        match self {
            Level::Extreme => 40,
            Level::High => 60,
            Level::Normal => 80,
        }
    }

    /// Longest side allowed for standalone images.
    pub fn image_max_dimension(&self) -> u32 {
        match self {
            Level::Extreme => 1200,
            Level::High => 1600,
            Level::Normal => 2000,
        }
    }

    /// JPEG quality for rasterized PDF pages. Lower than the image table
    /// since every page of text ends up as a photo.
    pub fn raster_quality(&self) -> u8 {
        match self {
            Level::Extreme => 20,
            Level::High => 40,
            Level::Normal => 60,
        }
    }

    /// Maximum width of a rasterized PDF page.
    pub fn raster_max_width(&self) -> u32 {
        match self {
            Level::Extreme => 800,
            Level::High => 1200,
            Level::Normal => 1600,
        }
    }

    pub fn raster_dpi(&self) -> u32 {
        match self {
            Level::Extreme => 50,
            Level::High => 72,
            Level::Normal => 96,
        }
    }
}

impl FromStr for Level {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "extreme" => Ok(Level::Extreme),
            "high" => Ok(Level::High),
            "normal" => Ok(Level::Normal),
            _ => Err(CompressionError::InvalidProfile(format!(
                "unknown level '{}' (expected extreme, high or normal)",
                s
            ))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to favour when the two conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Allow format changes (PNG to JPEG) to get closer to a target.
    #[default]
    Size,
    /// Keep lossless formats lossless.
    Quality,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Size => "size",
            Mode::Quality => "quality",
        }
    }
}

impl FromStr for Mode {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "size" => Ok(Mode::Size),
            "quality" => Ok(Mode::Quality),
            _ => Err(CompressionError::InvalidProfile(format!(
                "unknown mode '{}' (expected size or quality)",
                s
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request settings. Fixed for the lifetime of one `compress` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionProfile {
    pub level: Level,
    pub target_size: Option<NonZeroU64>,
    pub mode: Mode,
}

impl CompressionProfile {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Sets the byte budget. Zero means "no target".
    pub fn with_target_size(mut self, bytes: u64) -> Self {
        self.target_size = NonZeroU64::new(bytes);
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn target_bytes(&self) -> Option<u64> {
        self.target_size.map(NonZeroU64::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_is_case_insensitive() {
        assert_eq!("EXTREME".parse::<Level>().unwrap(), Level::Extreme);
        assert_eq!(" High ".parse::<Level>().unwrap(), Level::High);
        assert_eq!("normal".parse::<Level>().unwrap(), Level::Normal);
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        let err = "maximum".parse::<Level>().unwrap_err();
        assert!(matches!(err, CompressionError::InvalidProfile(_)));
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("quality".parse::<Mode>().unwrap(), Mode::Quality);
        assert!("speed".parse::<Mode>().is_err());
    }

    #[test]
    fn test_raster_tables_are_tighter_than_image_tables() {
        for level in [Level::Extreme, Level::High, Level::Normal] {
            assert!(level.raster_quality() < level.image_quality());
            assert!(level.raster_max_width() < level.image_max_dimension());
        }
    }

    #[test]
    fn test_zero_target_means_none() {
        let profile = CompressionProfile::new(Level::High).with_target_size(0);
        assert_eq!(profile.target_bytes(), None);
        let profile = profile.with_target_size(1024);
        assert_eq!(profile.target_bytes(), Some(1024));
    }

    #[test]
    fn test_defaults() {
        let profile = CompressionProfile::default();
        assert_eq!(profile.level, Level::Extreme);
        assert_eq!(profile.mode, Mode::Size);
        assert!(profile.target_size.is_none());
    }
}
