//! Document root, page geometry and font registration

use serde::{Deserialize, Serialize};

use crate::block::{Block, TextBlock};
use crate::style::{Direction, FontWeight};

/// A complete document ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: DocumentMeta,
    pub page: PageSetup,
    pub direction: Direction,
    pub font: FontFamily,
    /// Body blocks, flowed onto as many pages as needed
    pub blocks: Vec<Block>,
    /// Blocks pinned to the bottom of every page
    pub footer: Vec<Block>,
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub author: Option<String>,
    /// BCP 47 language tag
    pub lang: Option<String>,
}

/// Page geometry in physical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width_mm: f32,
    pub height_mm: f32,
    /// Page margin in points
    pub padding: f32,
    /// Base font size in points
    pub font_size: f32,
}

impl PageSetup {
    /// A5 portrait
    pub const A5: PageSetup = PageSetup {
        width_mm: 148.0,
        height_mm: 210.0,
        padding: 10.0,
        font_size: 9.0,
    };
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::A5
    }
}

/// A font family with its registered faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    pub name: String,
    pub faces: Vec<FontFace>,
}

impl FontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }

    pub fn with_face(mut self, weight: FontWeight, src: impl Into<String>) -> Self {
        self.faces.push(FontFace {
            weight,
            src: src.into(),
        });
        self
    }

    pub fn face(&self, weight: FontWeight) -> Option<&FontFace> {
        self.faces.iter().find(|f| f.weight == weight)
    }
}

/// One weight of a font family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFace {
    pub weight: FontWeight,
    /// Font file location
    pub src: String,
}

impl Document {
    /// Create an empty A5 document
    pub fn new(direction: Direction, font: FontFamily) -> Self {
        Self {
            metadata: DocumentMeta::default(),
            page: PageSetup::A5,
            direction,
            font,
            blocks: Vec::new(),
            footer: Vec::new(),
        }
    }

    /// Add a block to the body
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every text run in the body then the footer, in document order
    pub fn texts(&self) -> Vec<&TextBlock> {
        let mut out = Vec::new();
        for block in self.blocks.iter().chain(self.footer.iter()) {
            block.for_each_text(&mut |t| out.push(t));
        }
        out
    }

    /// Image sources referenced anywhere in the document
    pub fn image_sources(&self) -> Vec<&str> {
        fn walk<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
            match block {
                Block::Image(image) => out.push(image.src.as_str()),
                Block::Stack(stack) => stack.blocks.iter().for_each(|b| walk(b, out)),
                Block::Row(row) => row
                    .cells
                    .iter()
                    .flat_map(|c| c.blocks.iter())
                    .for_each(|b| walk(b, out)),
                _ => {}
            }
        }

        let mut out = Vec::new();
        for block in self.blocks.iter().chain(self.footer.iter()) {
            walk(block, &mut out);
        }
        out
    }
}
