//! Colors for console markup.
//!
//! Channels are floating point values in the range `0.0..=1.0`, which is how designers author them
//! in the editor. Nothing validates the range: values outside of it are clamped when the color is
//! rendered as text.

use std::fmt::{Display, Formatter};

use rgb::RGBA;

#[cfg_attr(
    feature = "serde_support",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ColorRepr", into = "ColorRepr")
)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(RGBA<f32>);

impl Color {
    pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 0.92156863, 0.015686275, 1.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const GREY: Color = Color::new(0.5, 0.5, 0.5, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new color.
    ///
    /// # Parameters
    /// * `r`: The red component.
    /// * `g`: The green component.
    /// * `b`: The blue component.
    /// * `a`: The alpha component.
    #[inline(always)]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(RGBA { r, g, b, a })
    }

    /// Creates a new opaque color from 8-bit components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        )
    }

    /// Retrieves the underlying components.
    #[inline(always)]
    pub fn rgba(&self) -> RGBA<f32> {
        self.0
    }

    /// Converts the color to 8-bit components, clamping every channel into range first.
    pub fn to_rgba8(&self) -> RGBA<u8> {
        RGBA {
            r: channel_to_u8(self.0.r),
            g: channel_to_u8(self.0.g),
            b: channel_to_u8(self.0.b),
            a: channel_to_u8(self.0.a),
        }
    }

    /// Renders the color as six upper-case hex digits (`RRGGBB`), ignoring alpha.
    pub fn to_html_rgb(&self) -> String {
        let rgba = self.to_rgba8();
        format!("{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b)
    }

    /// Parses an HTML color string.
    ///
    /// Accepted formats are `RRGGBB` and `RRGGBBAA`, optionally prefixed by `#`.
    pub fn parse_html(text: &str) -> Result<Self, String> {
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("Invalid color string: {text}."));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("Invalid color string: {text}."))
        };

        let mut color = Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?);
        if hex.len() == 8 {
            color.0.a = f32::from(byte(6)?) / 255.0;
        }
        Ok(color)
    }
}

fn channel_to_u8(value: f32) -> u8 {
    // `clamp` keeps NaN, which then saturates to 0 in the cast.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::CLEAR
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_html_rgb())
    }
}

impl From<RGBA<f32>> for Color {
    fn from(rgba: RGBA<f32>) -> Self {
        Self(rgba)
    }
}

impl From<rgb::RGB8> for Color {
    fn from(rgb: rgb::RGB8) -> Self {
        Self::from_rgb8(rgb.r, rgb.g, rgb.b)
    }
}

/// The serialized form of a [`Color`]: either an HTML string or separate components.
#[cfg(feature = "serde_support")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Html(String),
    Components {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

#[cfg(feature = "serde_support")]
fn opaque() -> f32 {
    1.0
}

#[cfg(feature = "serde_support")]
impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Html(text) => Color::parse_html(&text),
            ColorRepr::Components { r, g, b, a } => Ok(Color::new(r, g, b, a)),
        }
    }
}

#[cfg(feature = "serde_support")]
impl From<Color> for ColorRepr {
    fn from(color: Color) -> Self {
        let RGBA { r, g, b, a } = color.0;
        ColorRepr::Components { r, g, b, a }
    }
}
