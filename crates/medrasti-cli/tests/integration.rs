//! Integration tests for the medrasti CLI commands
//!
//! The commands run against an in-process invoice source, so no network
//! is involved.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use medrasti_cli::{
    download_command, embed_command, find_settings, load_settings, parse_target, view_command,
};
use medrasti_core::{InvoiceRecord, InvoiceSource, Locale, Settings, SourceError};
use tempfile::TempDir;

const INVOICE: &str = r#"{
  "ref": "INV-001",
  "createdAt": "2024-09-01T08:30:00Z",
  "paymentMethod": "BANKILY",
  "monthInvoiceRelations": [
    {"totalAmount": 1000, "paidAmount": 1000, "remainingAmount": 0, "status": "PAID",
     "enrollementPayment": {"month": {"frenchName": "Janvier", "arabicName": "يناير"}}}
  ],
  "enrollement": {
    "enrollementPrice": 0,
    "student": {"firstName": "Amine", "lastName": "Ba", "matricule": "M1"},
    "schoolClass": {"name": "CE1"},
    "year": "2024-2025"
  }
}"#;

#[derive(Clone, Default)]
struct CannedSource {
    calls: Arc<AtomicUsize>,
}

impl InvoiceSource for CannedSource {
    async fn fetch(&self, _invoice_id: &str) -> Result<Option<InvoiceRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        InvoiceRecord::from_slice(INVOICE.as_bytes()).map_err(|e| SourceError::new(e.to_string()))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        Err(SourceError::new(format!("no asset {url}")))
    }
}

fn settings_in(dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.output.dir = dir.path().to_path_buf();
    settings
}

#[test]
fn test_parse_target() {
    let parts = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert_eq!(parse_target(&parts(&[])).unwrap(), (Locale::Fr, None));
    assert_eq!(
        parse_target(&parts(&["42"])).unwrap(),
        (Locale::Fr, Some("42".to_string()))
    );
    assert_eq!(
        parse_target(&parts(&["ar", "42"])).unwrap(),
        (Locale::Ar, Some("42".to_string()))
    );
    let err = parse_target(&parts(&["en", "42"])).unwrap_err();
    assert!(err.to_string().contains("en"));
}

#[test]
fn test_load_settings_from_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        "[api]\nbase_url = \"http://billing.local\"\n\n[school]\nname = \"Lycée Nour\"\n",
    )
    .unwrap();

    let settings = load_settings(Some(&path)).unwrap();
    assert_eq!(settings.school.name, "Lycée Nour");
    assert_eq!(settings.api.timeout_secs, 30);
}

#[test]
fn test_load_settings_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = load_settings(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_find_settings_candidates() {
    let dir = TempDir::new().unwrap();
    assert_eq!(find_settings(dir.path()), Settings::default());

    fs::write(dir.path().join(".medrasti.toml"), "[output]\ndir = \"pdfs\"\n").unwrap();
    assert_eq!(find_settings(dir.path()).output.dir.to_str(), Some("pdfs"));

    fs::write(dir.path().join("medrasti.toml"), "not = [valid").unwrap();
    assert_eq!(find_settings(dir.path()).output.dir.to_str(), Some("pdfs"));
}

#[tokio::test]
async fn test_view_prints_tree_and_markup() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let json = view_command(CannedSource::default(), &settings, Locale::Fr, Some("1"), false)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["direction"], "ltr");
    assert!(json.contains("Janvier"));
    assert!(json.contains("Bankily"));

    let typst = view_command(CannedSource::default(), &settings, Locale::Ar, Some("1"), true)
        .await
        .unwrap();
    assert!(typst.contains("dir: rtl, \"يناير\""));
}

#[tokio::test]
async fn test_download_writes_locale_named_pdf() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let path = download_command(
        CannedSource::default(),
        &settings,
        Locale::Fr,
        Some("42"),
        dir.path(),
    )
    .await
    .unwrap();
    assert_eq!(path, dir.path().join("facture_42_fr.pdf"));
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));

    let path = download_command(
        CannedSource::default(),
        &settings,
        Locale::Ar,
        Some("42"),
        dir.path(),
    )
    .await
    .unwrap();
    assert_eq!(path, dir.path().join("فاتورة_42_ar.pdf"));
}

#[tokio::test]
async fn test_missing_id_fails_without_fetching() {
    let dir = TempDir::new().unwrap();
    let source = CannedSource::default();

    let err = download_command(source.clone(), &settings_in(&dir), Locale::Fr, None, dir.path())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Aucun identifiant de facture fourni");
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_embed_file_lives_until_release() {
    let dir = TempDir::new().unwrap();
    let settings = settings_in(&dir);

    let path = embed_command(
        CannedSource::default(),
        &settings,
        Locale::Fr,
        Some("9"),
        |path| {
            assert!(path.ends_with("facture-INV-001.pdf"));
            assert!(fs::read(path).unwrap().starts_with(b"%PDF"));
            async {}
        },
    )
    .await
    .unwrap();

    assert!(!path.exists());
}
