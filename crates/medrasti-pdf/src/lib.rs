//! medrasti-pdf - PDF rendering via Typst
//!
//! # Architecture
//!
//! 1. **Transpiler** - Converts a `medrasti_ast::Document` to Typst markup
//! 2. **Compiler** - Compiles Typst markup to PDF bytes with the
//!    document's embedded font family
//!
//! [`PdfRenderer`] ties both together behind
//! [`medrasti_core::DocumentRenderer`].

mod compiler;
mod error;
mod transpiler;

use std::sync::Arc;

use medrasti_ast::{Assets, Document, FontFamily};
use medrasti_core::DocumentRenderer;
use sha2::{Digest, Sha256};
use tracing::debug;

pub use compiler::{load_family, Compiler};
pub use error::{PdfError, Result};
pub use transpiler::Transpiler;

/// Document renderer producing PDF bytes
///
/// Fonts are either preloaded once or read from the document's font
/// family on every render.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    fonts: Option<Arc<Vec<Vec<u8>>>>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the faces of `family`
    pub fn with_family(family: &FontFamily) -> Self {
        Self::with_font_data(load_family(family))
    }

    pub fn with_font_data(fonts: Vec<Vec<u8>>) -> Self {
        Self {
            fonts: Some(Arc::new(fonts)),
        }
    }

    /// The Typst markup a render would compile
    pub fn markup(&self, doc: &Document, assets: &Assets) -> String {
        Transpiler::transpile_with_assets(doc, assets)
    }

    pub fn render_pdf(&self, doc: &Document, assets: &Assets) -> Result<Vec<u8>> {
        let markup = self.markup(doc, assets);
        let fonts = match &self.fonts {
            Some(fonts) => fonts.as_ref().clone(),
            None => load_family(&doc.font),
        };
        let files = transpiler::asset_files(assets);
        let pdf = Compiler::compile(&markup, fonts, &files)?;
        debug!(bytes = pdf.len(), hash = %content_hash(&pdf), "pdf rendered");
        Ok(pdf)
    }
}

impl DocumentRenderer for PdfRenderer {
    type Error = PdfError;

    fn render(&self, document: &Document, assets: &Assets) -> Result<Vec<u8>> {
        self.render_pdf(document, assets)
    }
}

/// Compute SHA-256 hash of content
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    format!("sha256:{}", hex::encode(result))
}

pub(crate) mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes
            .as_ref()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let hash = content_hash(b"%PDF-1.7");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), 7 + 64);
        assert_eq!(hash, content_hash(b"%PDF-1.7"));
    }
}
