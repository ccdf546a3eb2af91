//! Stage sequences and failure paths of the view session

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use medrasti_ast::{Assets, Document};
use medrasti_core::{
    Delivery, DeliveryHost, DocumentRenderer, InvoiceError, InvoiceFormatter, InvoiceRecord,
    InvoiceSource, InvoiceView, Locale, OutputMode, Settings, SourceError, Stage, ViewerHandle,
};
use serde_json::{json, Value};
use tokio::sync::watch;

fn invoice() -> Value {
    json!({
        "ref": "INV-009",
        "paymentMethod": "CASH",
        "createdAt": "2024-09-01T08:30:00.000Z",
        "monthInvoiceRelations": [{
            "totalAmount": 1000,
            "paidAmount": 250,
            "remainingAmount": 750,
            "status": "PARTIALLY_PAID",
            "enrollementPayment": {"month": {"frenchName": "Octobre", "arabicName": "أكتوبر"}}
        }],
        "enrollement": {
            "student": {"firstName": "Sara", "lastName": "Sy", "matricule": "M9"},
            "schoolClass": {"name": "CM2"}
        }
    })
}

/// Stage published by the view each time a collaborator is called
#[derive(Clone, Default)]
struct StageLog {
    rx: Arc<Mutex<Option<watch::Receiver<Stage>>>>,
    seen: Arc<Mutex<Vec<Stage>>>,
}

impl StageLog {
    fn attach(&self, rx: watch::Receiver<Stage>) {
        *self.rx.lock().unwrap() = Some(rx);
    }

    fn note(&self) {
        if let Some(rx) = self.rx.lock().unwrap().as_ref() {
            let stage = rx.borrow().clone();
            self.seen.lock().unwrap().push(stage);
        }
    }

    fn seen(&self) -> Vec<Stage> {
        self.seen.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct Source {
    body: Value,
    log: StageLog,
}

impl InvoiceSource for Source {
    async fn fetch(&self, _invoice_id: &str) -> Result<Option<InvoiceRecord>, SourceError> {
        self.log.note();
        InvoiceRecord::from_value(self.body.clone()).map_err(|err| SourceError::new(err.to_string()))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        Err(SourceError::new(format!("no asset at {url}")))
    }
}

#[derive(Clone, Default)]
struct Renderer {
    log: StageLog,
    broken: bool,
    calls: Arc<AtomicUsize>,
}

impl DocumentRenderer for Renderer {
    type Error = io::Error;

    fn render(&self, document: &Document, _assets: &Assets) -> Result<Vec<u8>, io::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.note();
        if self.broken {
            return Err(io::Error::other("font table corrupt"));
        }
        Ok(document.texts().len().to_string().into_bytes())
    }
}

struct Handle {
    released: Arc<AtomicUsize>,
}

impl ViewerHandle for Handle {
    fn location(&self) -> String {
        "test:viewer".to_string()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct Host {
    log: StageLog,
    broken: bool,
    released: Arc<AtomicUsize>,
}

impl DeliveryHost for Host {
    type Handle = Handle;
    type Error = io::Error;

    fn save_download(&self, file_name: &str, _bytes: &[u8]) -> Result<String, io::Error> {
        self.log.note();
        if self.broken {
            return Err(io::Error::other("disk full"));
        }
        Ok(format!("test:{file_name}"))
    }

    fn embed(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<Handle, io::Error> {
        self.log.note();
        if self.broken {
            return Err(io::Error::other("no temp dir"));
        }
        Ok(Handle {
            released: Arc::clone(&self.released),
        })
    }
}

fn view(
    renderer: Renderer,
    host: Host,
    mode: OutputMode,
    log: &StageLog,
) -> InvoiceView<Source, Renderer, Host> {
    view_over(invoice(), renderer, host, mode, log)
}

fn view_over(
    body: Value,
    renderer: Renderer,
    host: Host,
    mode: OutputMode,
    log: &StageLog,
) -> InvoiceView<Source, Renderer, Host> {
    let source = Source {
        body,
        log: log.clone(),
    };
    let v = InvoiceView::new(
        source,
        InvoiceFormatter::from_settings(&Settings::default()),
        renderer,
        host,
        Locale::Fr,
        mode,
    )
    .with_generation_date(NaiveDate::from_ymd_opt(2024, 10, 2).unwrap());
    log.attach(v.subscribe());
    v
}

#[tokio::test]
async fn test_download_publishes_each_stage() {
    let log = StageLog::default();
    let renderer = Renderer {
        log: log.clone(),
        ..Renderer::default()
    };
    let host = Host {
        log: log.clone(),
        ..Host::default()
    };
    let mut v = view(renderer, host, OutputMode::Download, &log);
    let rx = v.subscribe();

    let delivery = v.run(Some("9")).await.unwrap();

    assert!(matches!(delivery, Delivery::Downloaded { ref location, .. } if location == "test:facture_9_fr.pdf"));
    assert_eq!(
        log.seen(),
        [Stage::FetchingData, Stage::GeneratingDocument, Stage::Downloading]
    );
    assert_eq!(*rx.borrow(), Stage::Complete);
}

#[tokio::test]
async fn test_embed_publishes_each_stage() {
    let log = StageLog::default();
    let host = Host {
        log: log.clone(),
        ..Host::default()
    };
    let released = Arc::clone(&host.released);
    let renderer = Renderer {
        log: log.clone(),
        ..Renderer::default()
    };
    let mut v = view(renderer, host, OutputMode::Embed, &log);

    v.run(Some("9")).await.unwrap();
    assert_eq!(
        log.seen(),
        [Stage::FetchingData, Stage::GeneratingDocument, Stage::GeneratingDocument]
    );
    assert_eq!(v.stage(), Stage::EmbeddingReady);

    v.teardown();
    assert_eq!(v.stage(), Stage::Complete);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_renderer_error_fails_generation() {
    let log = StageLog::default();
    let renderer = Renderer {
        broken: true,
        ..Renderer::default()
    };
    let calls = Arc::clone(&renderer.calls);
    let host = Host {
        log: log.clone(),
        ..Host::default()
    };
    let mut v = view(renderer, host, OutputMode::Download, &log);

    let err = v.run(Some("9")).await.unwrap_err();
    assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("font table corrupt")));
    assert_eq!(v.stage(), Stage::Failed(err.clone()));
    assert!(v.has_generated());

    // Only the fetch reached a collaborator; nothing was saved
    assert_eq!(log.seen(), [Stage::FetchingData]);
    assert_eq!(v.generate().await, Err(err));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_save_error_fails_while_downloading() {
    let log = StageLog::default();
    let host = Host {
        log: log.clone(),
        broken: true,
        ..Host::default()
    };
    let mut v = view(Renderer::default(), host, OutputMode::Download, &log);

    let err = v.run(Some("9")).await.unwrap_err();
    assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("disk full")));
    assert_eq!(log.seen(), [Stage::FetchingData, Stage::Downloading]);
    assert_eq!(v.stage(), Stage::Failed(err));
    assert!(v.has_generated());
}

#[tokio::test]
async fn test_embed_error_fails_without_handle() {
    let log = StageLog::default();
    let host = Host {
        log: log.clone(),
        broken: true,
        ..Host::default()
    };
    let released = Arc::clone(&host.released);
    let mut v = view(Renderer::default(), host, OutputMode::Embed, &log);

    let err = v.run(Some("9")).await.unwrap_err();
    assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("no temp dir")));
    assert_eq!(log.seen(), [Stage::FetchingData, Stage::GeneratingDocument]);
    assert_eq!(v.stage(), Stage::Failed(err));
    assert!(v.has_generated());
    assert!(v.viewer_location().is_none());

    v.teardown();
    assert_eq!(released.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_out_of_range_amounts_fail_generation() {
    let mut body = invoice();
    let row = body["monthInvoiceRelations"][0].clone();
    body["monthInvoiceRelations"] = json!([row.clone(), row]);
    for row in body["monthInvoiceRelations"].as_array_mut().unwrap() {
        row["totalAmount"] = json!("79228162514264337593543950335");
    }
    let log = StageLog::default();
    let renderer = Renderer::default();
    let calls = Arc::clone(&renderer.calls);
    let mut v = view_over(body, renderer, Host::default(), OutputMode::Download, &log);

    let err = v.run(Some("9")).await.unwrap_err();
    assert!(matches!(err, InvoiceError::GenerationFailed(ref m) if m.contains("out of range")));
    assert_eq!(v.stage(), Stage::Failed(err));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
