//! Document configuration

use serde::{Deserialize, Serialize};

/// Options for a [`Dom`](crate::Dom)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Viewport width in CSS pixels
    pub viewport_width: f64,

    /// Viewport height in CSS pixels
    pub viewport_height: f64,

    /// Height of one line of text
    pub line_height: f64,

    /// Root font size, the base for `em`
    pub font_size: f64,

    /// Document URL; its fragment is the location hash
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            line_height: 18.0,
            font_size: 16.0,
            url: "about:blank".to_string(),
        }
    }
}

impl Config {
    pub(crate) fn viewport(&self) -> domops_layout::Viewport {
        domops_layout::Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            line_height: self.line_height,
            font_size: self.font_size,
        }
    }
}
