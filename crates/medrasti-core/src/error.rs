//! Error types for invoice loading and formatting

use thiserror::Error;

use crate::locale::Locale;

/// Result type for invoice operations
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Failures that end an invoice view
///
/// Every variant is terminal for the view that raised it. There is no
/// automatic retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvoiceError {
    /// No invoice identifier was supplied
    #[error("No invoice ID provided")]
    MissingIdentifier,

    /// The remote call failed (network, non-2xx status, malformed body)
    #[error("Failed to fetch invoice: {detail}")]
    FetchFailed {
        /// Message supplied by the server, if any
        message: Option<String>,
        /// Technical description for logs
        detail: String,
    },

    /// The call succeeded but the body was empty
    #[error("No invoice data found")]
    NoData,

    /// Formatting or serialization of the document failed
    #[error("Document generation failed: {0}")]
    GenerationFailed(String),

    /// A locale outside the supported set was requested
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
}

impl InvoiceError {
    /// Message to show the user, in the active locale
    ///
    /// A server-supplied message wins over the generic fetch failure text.
    pub fn user_message(&self, locale: Locale) -> String {
        let messages = &locale.config().messages;
        match self {
            InvoiceError::MissingIdentifier => messages.missing_identifier.to_string(),
            InvoiceError::FetchFailed {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            InvoiceError::FetchFailed { .. } => messages.fetch_failed.to_string(),
            InvoiceError::NoData => messages.no_data.to_string(),
            InvoiceError::GenerationFailed(_) => messages.generation_failed.to_string(),
            InvoiceError::UnsupportedLocale(tag) => {
                format!("{}: {}", messages.unsupported_locale, tag)
            }
        }
    }
}

/// Failures while mapping a record to a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A required part of the record is absent
    #[error("Invoice record is missing `{0}`")]
    MissingField(&'static str),

    /// An amount column sums past the representable range
    #[error("Invoice amounts are out of range")]
    AmountOutOfRange,
}

impl From<FormatError> for InvoiceError {
    fn from(err: FormatError) -> Self {
        InvoiceError::GenerationFailed(err.to_string())
    }
}

/// Failure reported by an invoice source
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{detail}")]
pub struct SourceError {
    /// User-displayable message from the server, if it sent one
    pub server_message: Option<String>,
    pub detail: String,
}

impl SourceError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            server_message: None,
            detail: detail.into(),
        }
    }

    pub fn with_server_message(mut self, message: impl Into<String>) -> Self {
        self.server_message = Some(message.into());
        self
    }
}

impl From<SourceError> for InvoiceError {
    fn from(err: SourceError) -> Self {
        InvoiceError::FetchFailed {
            message: err.server_message,
            detail: err.detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let err: InvoiceError = SourceError::new("HTTP 404")
            .with_server_message("Invoice not found")
            .into();
        assert_eq!(err.user_message(Locale::Fr), "Invoice not found");
        assert_eq!(err.user_message(Locale::Ar), "Invoice not found");
    }

    #[test]
    fn test_generic_fetch_message_is_localized() {
        let err: InvoiceError = SourceError::new("connection refused").into();
        assert!(err.user_message(Locale::Fr).starts_with("Échec du chargement"));
        assert!(err.user_message(Locale::Ar).starts_with("فشل تحميل"));
    }

    #[test]
    fn test_blank_server_message_falls_back() {
        let err = InvoiceError::FetchFailed {
            message: Some("  ".to_string()),
            detail: "HTTP 500".to_string(),
        };
        assert_eq!(
            err.user_message(Locale::Fr),
            Locale::Fr.config().messages.fetch_failed
        );
    }

    #[test]
    fn test_amount_overflow_becomes_generation_failure() {
        let err: InvoiceError = FormatError::AmountOutOfRange.into();
        assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("out of range")));
    }

    #[test]
    fn test_format_error_becomes_generation_failure() {
        let err: InvoiceError = FormatError::MissingField("enrollement").into();
        assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("enrollement")));
        assert_eq!(
            err.user_message(Locale::Fr),
            "Erreur lors de la génération du PDF. Veuillez réessayer."
        );
    }
}
