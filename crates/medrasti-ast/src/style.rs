//! Styling primitives shared by all blocks

use std::fmt;

use serde::{Deserialize, Serialize};

/// Writing direction of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left-to-right (French)
    #[default]
    Ltr,
    /// Right-to-left (Arabic)
    Rtl,
}

impl Direction {
    /// The alignment a paragraph starts on in this direction
    pub fn start(self) -> Alignment {
        match self {
            Direction::Ltr => Alignment::Left,
            Direction::Rtl => Alignment::Right,
        }
    }

    /// The alignment a paragraph ends on in this direction
    pub fn end(self) -> Alignment {
        match self {
            Direction::Ltr => Alignment::Right,
            Direction::Rtl => Alignment::Left,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Width of a row cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellWidth {
    /// As wide as the content
    #[default]
    Auto,
    /// A share of the space left by the other cells
    Flex,
    /// A percentage of the row
    Percent(f32),
}

/// Font weight of a registered face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::Bold => 700,
        }
    }
}

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a `0xRRGGBB` literal
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A border drawn around or under a block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Stroke width in points
    pub width: f32,
    pub color: Color,
}

impl Border {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Text appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points
    pub size: f32,
    pub weight: FontWeight,
    pub color: Color,
    pub align: Alignment,
    /// Line height as a multiple of the font size
    pub line_height: Option<f32>,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            color: Color::BLACK,
            align: Alignment::Left,
            line_height: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let blue = Color::hex(0x3b82f6);
        assert_eq!(blue, Color::rgb(0x3b, 0x82, 0xf6));
        assert_eq!(blue.to_string(), "#3b82f6");
    }

    #[test]
    fn test_direction_edges() {
        assert_eq!(Direction::Ltr.start(), Alignment::Left);
        assert_eq!(Direction::Rtl.start(), Alignment::Right);
        assert_eq!(Direction::Rtl.end(), Alignment::Left);
    }

    #[test]
    fn test_text_style_builder() {
        let style = TextStyle::new(13.0).bold().align(Alignment::Center);
        assert_eq!(style.weight, FontWeight::Bold);
        assert_eq!(style.align, Alignment::Center);
        assert_eq!(style.size, 13.0);
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::Rtl).unwrap();
        assert_eq!(json, "\"rtl\"");
    }
}
