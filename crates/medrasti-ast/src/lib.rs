//! medrasti-ast - Declarative document tree
//!
//! This crate provides the types the invoice formatter produces and the
//! renderers consume: a fixed page, a text direction, a font family and a
//! list of blocks. Nothing here knows about invoices or about PDF.

pub mod assets;
pub mod block;
pub mod document;
pub mod style;

pub use assets::Assets;
pub use block::{Block, Image, Row, RowCell, Rule, Stack, Table, TableCell, TableRow, TextBlock};
pub use document::{Document, DocumentMeta, FontFace, FontFamily, PageSetup};
pub use style::{Alignment, Border, CellWidth, Color, Direction, FontWeight, TextStyle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
