//! Typst to PDF compiler
//!
//! Compiles Typst markup to PDF bytes using typst-as-lib.

use medrasti_ast::FontFamily;
use tracing::{debug, warn};
use typst_as_lib::TypstEngine;

use crate::error::{PdfError, Result};

/// Compiler for converting Typst markup to PDF
pub struct Compiler;

impl Compiler {
    /// Compile Typst markup to PDF bytes
    ///
    /// # Arguments
    /// * `markup` - Typst markup string
    /// * `fonts` - Font files already in memory
    /// * `files` - Virtual files the markup may read, as `(path, bytes)`
    pub fn compile(
        markup: &str,
        fonts: Vec<Vec<u8>>,
        files: &[(String, Vec<u8>)],
    ) -> Result<Vec<u8>> {
        let engine = TypstEngine::builder()
            .main_file(markup.to_string())
            .fonts(fonts)
            .with_static_file_resolver(
                files
                    .iter()
                    .map(|(path, bytes)| (path.as_str(), bytes.clone())),
            )
            .build();

        // compiled is Warned<Result<Document, Error>>
        let compiled = engine.compile();
        if !compiled.warnings.is_empty() {
            debug!(warnings = compiled.warnings.len(), "typst reported warnings");
        }
        let document = compiled
            .output
            .map_err(|e| PdfError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| PdfError::Export(format!("{:?}", e)))?;

        Ok(pdf_bytes.into())
    }
}

/// Read every face of `family`, skipping the ones that cannot be read
///
/// A missing face makes Typst fall back to another weight or font, which
/// is better than failing the invoice.
pub fn load_family(family: &FontFamily) -> Vec<Vec<u8>> {
    family
        .faces
        .iter()
        .filter_map(|face| match std::fs::read(&face.src) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(font = %face.src, error = %e, "font face unavailable");
                None
            }
        })
        .collect()
}
