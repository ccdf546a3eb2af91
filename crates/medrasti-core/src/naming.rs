//! Suggested file names for generated invoices

use crate::locale::Locale;

/// Name used when the document is saved as a download
///
/// `facture_<id>_fr.pdf`, `فاتورة_<id>_ar.pdf`
pub fn download_file_name(locale: Locale, invoice_id: &str) -> String {
    let word = locale.config().labels.file_word;
    sanitize_file_name(&format!("{}_{}_{}.pdf", word, invoice_id, locale.tag()))
}

/// Name shown for the embedded viewer copy
///
/// `facture-<ref>.pdf`, `فاتورة-<ref>.pdf`
pub fn viewer_file_name(locale: Locale, reference: &str) -> String {
    let word = locale.config().labels.file_word;
    sanitize_file_name(&format!("{}-{}.pdf", word, reference))
}

/// Replace path separators, reserved and control characters with `-`
///
/// Leading dots are stripped so the result is never hidden or relative.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    cleaned.trim_start_matches('.').trim().to_string()
}
