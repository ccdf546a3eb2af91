//! medrasti-core - Invoice to document mapping
//!
//! This crate turns a school invoice record into a renderer-agnostic
//! [`medrasti_ast::Document`], in French or Arabic, and drives the view
//! flow that fetches, formats, renders and delivers it.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use medrasti_core::{InvoiceFormatter, InvoiceRecord, Locale, Settings};
//!
//! let record = InvoiceRecord::from_slice(br#"{
//!     "ref": "INV-001",
//!     "paymentMethod": "CASH",
//!     "enrollement": {
//!         "enrollementPrice": 0,
//!         "student": {"firstName": "Amine", "lastName": "Ba", "matricule": "M1"},
//!         "schoolClass": {"name": "CE1"},
//!         "year": "2024-2025"
//!     },
//!     "monthInvoiceRelations": []
//! }"#).unwrap().unwrap();
//!
//! let formatter = InvoiceFormatter::from_settings(&Settings::default());
//! let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
//! let doc = formatter.format(&record, Locale::Ar, today).unwrap();
//! assert!(doc.direction.is_rtl());
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod formatter;
pub mod latch;
pub mod locale;
pub mod memory;
pub mod model;
pub mod naming;
pub mod session;

pub use config::Settings;
pub use error::{FormatError, InvoiceError, Result, SourceError};
pub use formatter::InvoiceFormatter;
pub use latch::OneShotLatch;
pub use locale::{Locale, LocaleConfig};
pub use memory::{BlobHandle, MemoryHost};
pub use model::{InvoiceRecord, MonthPaymentRow, PaymentMethod, PaymentStatus, Totals};
pub use session::{
    Delivery, DeliveryHost, DocumentRenderer, InvoiceSource, InvoiceView, OutputMode, Stage,
    ViewerHandle,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
