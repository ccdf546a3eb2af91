//! Block-level elements for document layout
//!
//! Blocks are listed in visual order: the first cell of a row is the
//! leftmost one whatever the document direction. The direction only
//! governs how text inside a block is shaped.

use serde::{Deserialize, Serialize};

use crate::style::{Alignment, Border, CellWidth, Color, TextStyle};

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A run of styled text
    Text(TextBlock),
    /// A vertical container, optionally boxed
    Stack(Stack),
    /// A horizontal container
    Row(Row),
    /// A table with a header row
    Table(Table),
    /// A raster image
    Image(Image),
    /// A horizontal line
    Rule(Rule),
    /// Vertical space in points
    Spacer(f32),
}

impl Block {
    /// Shorthand for a text block
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Block::Text(TextBlock::new(content, style))
    }

    /// Visit every text block in document order, descending into containers
    pub fn for_each_text<'a>(&'a self, f: &mut dyn FnMut(&'a TextBlock)) {
        match self {
            Block::Text(text) => f(text),
            Block::Stack(stack) => stack.blocks.iter().for_each(|b| b.for_each_text(f)),
            Block::Row(row) => row
                .cells
                .iter()
                .flat_map(|cell| cell.blocks.iter())
                .for_each(|b| b.for_each_text(f)),
            Block::Table(_) | Block::Image(_) | Block::Rule(_) | Block::Spacer(_) => {}
        }
    }
}

/// A run of text with a single style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub content: String,
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }
}

/// A vertical container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stack {
    pub blocks: Vec<Block>,
    /// Background fill
    pub fill: Option<Color>,
    /// Outline drawn around the whole stack
    pub border: Option<Border>,
    /// Corner radius in points
    pub radius: f32,
    /// Inner padding in points
    pub padding: f32,
    /// Space below the stack in points
    pub spacing_after: f32,
}

impl Stack {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Default::default()
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

/// A horizontal container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<RowCell>,
    /// Placement of the whole row when its cells do not fill the width
    pub align: Alignment,
    /// Space between cells in points
    pub gap: f32,
    /// Space above the row in points
    pub spacing_before: f32,
    /// Line drawn above the row, inside the spacing
    pub top_border: Option<Border>,
}

impl Row {
    pub fn new(cells: Vec<RowCell>) -> Self {
        Self {
            cells,
            ..Default::default()
        }
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }
}

/// One cell of a row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowCell {
    pub width: CellWidth,
    pub blocks: Vec<Block>,
}

impl RowCell {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            width: CellWidth::Auto,
            blocks,
        }
    }

    pub fn flex(blocks: Vec<Block>) -> Self {
        Self {
            width: CellWidth::Flex,
            blocks,
        }
    }

    pub fn percent(width: f32, blocks: Vec<Block>) -> Self {
        Self {
            width: CellWidth::Percent(width),
            blocks,
        }
    }
}

/// A table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column widths as percentages
    pub columns: Vec<f32>,
    pub header: Vec<TableCell>,
    pub header_fill: Option<Color>,
    pub rows: Vec<TableRow>,
    pub border: Option<Border>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.columns
            .len()
            .max(self.header.len())
            .max(self.rows.first().map(|r| r.cells.len()).unwrap_or(0))
    }
}

/// A table body row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub fill: Option<Color>,
}

/// A table cell holding a single text run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    pub style: TextStyle,
}

impl TableCell {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A raster image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Image source URL or path
    pub src: String,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

/// A horizontal line across the available width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub border: Border,
    /// Space below the line in points
    pub spacing_after: f32,
}
