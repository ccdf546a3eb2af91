//! medrasti CLI - Command-line interface library
//!
//! # Binary Usage
//!
//! ```bash
//! # Document tree of invoice 42, French by default
//! medrasti view 42
//!
//! # Arabic PDF written to ./invoices/فاتورة_42_ar.pdf
//! medrasti download ar 42 --output-dir invoices
//!
//! # Temporary PDF for an external viewer, removed on Enter
//! medrasti embed fr 42
//! ```

pub mod app;
pub mod host;

pub use app::{
    download_command, embed_command, find_settings, init_logging, load_settings, parse_target,
    run_cli, view_command,
};
pub use host::{FsHost, TempFileHandle};
