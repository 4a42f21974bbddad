//! Scene files: already projected screen-space triangles in JSON

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use raster_core::graphics::Rgb;
use raster_core::raster::Triangle;

pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 240;

/// Everything needed to render one frame
///
/// ```json
/// { "width": 64, "height": 48, "background": "#102030",
///   "triangles": [ { "vertices": [[0,0,1], [60,4,1], [8,40,2]], "color": [255,0,0] } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, with = "background")]
    pub background: Option<Rgb>,
    #[serde(default)]
    pub triangles: Vec<Triangle>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing scene {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    pub fn background(&self) -> Rgb {
        self.background.unwrap_or(Rgb::BLACK)
    }
}

/// Parse a colour given by name, `#rrggbb`, `0xrrggbb` or bare `rrggbb`
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    let named = match s.to_ascii_lowercase().as_str() {
        "black" => Some(Rgb::BLACK),
        "white" => Some(Rgb::WHITE),
        "red" => Some(Rgb::RED),
        "green" => Some(Rgb::GREEN),
        "blue" => Some(Rgb::BLUE),
        "yellow" => Some(Rgb::YELLOW),
        "purple" | "magenta" => Some(Rgb::PURPLE),
        "cyan" => Some(Rgb::CYAN),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let hex = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if hex.len() != 6 {
        return Err(format!("expected a colour name or 6 hex digits, got {s:?}"));
    }
    u32::from_str_radix(hex, 16)
        .map(Rgb::from_hex)
        .map_err(|err| format!("bad hex colour {s:?}: {err}"))
}

/// Backgrounds may be written like triangle colours or as a string
mod background {
    use raster_core::graphics::Rgb;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Color(Rgb),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Rgb>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Rgb>, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Color(color)) => Ok(Some(color)),
            Some(Repr::Text(text)) => super::parse_color(&text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
