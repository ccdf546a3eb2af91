//! medrasti-loader - Invoice data loader
//!
//! Fetches complete invoice records from the billing API over HTTP and
//! implements [`medrasti_core::InvoiceSource`] for the view session.

pub mod client;
pub mod error;

pub use client::{server_message, InvoiceClient, DEFAULT_API_URL};
pub use error::{LoadError, Result};
