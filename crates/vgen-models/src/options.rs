//! Generation options shared by every item in a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing an aspect ratio or size string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionParseError {
    #[error("unsupported aspect ratio: {0}")]
    UnsupportedAspectRatio(String),
    #[error("unsupported size: {0}")]
    UnsupportedSize(String),
}

/// Target aspect ratio for generated video.
///
/// The remote job API accepts exactly these four values, serialized as
/// their literal "W:H" strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// Landscape (16:9)
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// Portrait (9:16)
    #[serde(rename = "9:16")]
    Portrait,
    /// Standard (3:2)
    #[serde(rename = "3:2")]
    Standard,
    /// Square (1:1)
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// The literal wire string for this ratio.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "3:2",
            AspectRatio::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "3:2" => Ok(AspectRatio::Standard),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(OptionParseError::UnsupportedAspectRatio(other.to_string())),
        }
    }
}

/// Output resolution for generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VideoSize {
    /// 720P
    #[default]
    #[serde(rename = "720P")]
    P720,
    /// 1080P
    #[serde(rename = "1080P")]
    P1080,
}

impl VideoSize {
    /// The literal wire string for this size.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoSize::P720 => "720P",
            VideoSize::P1080 => "1080P",
        }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoSize {
    type Err = OptionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "720P" | "720p" => Ok(VideoSize::P720),
            "1080P" | "1080p" => Ok(VideoSize::P1080),
            other => Err(OptionParseError::UnsupportedSize(other.to_string())),
        }
    }
}

/// Options applied uniformly to every item in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationOptions {
    pub aspect_ratio: AspectRatio,
    pub size: VideoSize,
}

impl GenerationOptions {
    pub fn new(aspect_ratio: AspectRatio, size: VideoSize) -> Self {
        Self { aspect_ratio, size }
    }
}
