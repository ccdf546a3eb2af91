//! Invoice view session
//!
//! One [`InvoiceView`] owns the whole fetch, format, render and deliver
//! flow for one invoice at a time. The flow is sequential; its progress is
//! published on a [`watch`] channel so a front end can show the transient
//! status strings of the active locale.
//!
//! ```text
//! Idle -> FetchingData -> GeneratingDocument -> Downloading    -> Complete
//!                                            -> EmbeddingReady -> Complete
//!                                            -> Complete (inline)
//!         FetchingData | GeneratingDocument | Downloading -> Failed
//! ```

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use medrasti_ast::{Assets, Document};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{InvoiceError, Result, SourceError};
use crate::formatter::InvoiceFormatter;
use crate::latch::OneShotLatch;
use crate::locale::Locale;
use crate::model::InvoiceRecord;
use crate::naming::{download_file_name, viewer_file_name};

/// How the generated invoice is handed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The document tree itself, for an interactive renderer
    #[default]
    Inline,
    /// Serialized bytes saved under a suggested file name
    Download,
    /// Serialized bytes exposed through a releasable viewer handle
    Embed,
}

/// Progress of an invoice view
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Stage {
    #[default]
    Idle,
    FetchingData,
    GeneratingDocument,
    Downloading,
    EmbeddingReady,
    Complete,
    Failed(InvoiceError),
}

impl Stage {
    /// Whether `next` is a legal successor of this stage
    ///
    /// Any stage may go back to `Idle` when the view is reset.
    pub fn can_advance_to(&self, next: &Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (_, Idle)
                | (Idle, FetchingData)
                | (FetchingData, GeneratingDocument)
                | (FetchingData, Failed(_))
                | (GeneratingDocument, Downloading)
                | (GeneratingDocument, EmbeddingReady)
                | (GeneratingDocument, Complete)
                | (GeneratingDocument, Failed(_))
                | (Downloading, Complete)
                | (Downloading, Failed(_))
                | (EmbeddingReady, Complete)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed(_))
    }

    /// Status line for the user, in the given locale
    pub fn status_message(&self, locale: Locale) -> String {
        let messages = &locale.config().messages;
        match self {
            Stage::Idle => messages.idle.to_string(),
            Stage::FetchingData => messages.fetching.to_string(),
            Stage::GeneratingDocument => messages.generating.to_string(),
            Stage::Downloading => messages.downloading.to_string(),
            Stage::EmbeddingReady => messages.embedding_ready.to_string(),
            Stage::Complete => messages.complete.to_string(),
            Stage::Failed(err) => err.user_message(locale),
        }
    }
}

/// Remote invoice data and image assets
pub trait InvoiceSource: Send + Sync {
    /// Fetch the record for `invoice_id`; `Ok(None)` means an empty answer
    fn fetch(
        &self,
        invoice_id: &str,
    ) -> impl Future<Output = std::result::Result<Option<InvoiceRecord>, SourceError>> + Send;

    /// Fetch the raw bytes behind an image URL
    fn fetch_asset(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<Vec<u8>, SourceError>> + Send;
}

/// Serializes a document tree to a binary file
pub trait DocumentRenderer: Send + Sync + 'static {
    type Error: StdError + Send + Sync + 'static;

    fn render(
        &self,
        document: &Document,
        assets: &Assets,
    ) -> std::result::Result<Vec<u8>, Self::Error>;
}

/// Where serialized invoices go
pub trait DeliveryHost: Send + Sync {
    type Handle: ViewerHandle;
    type Error: StdError + Send + Sync + 'static;

    /// Hand bytes to the save mechanism, returning where they ended up
    fn save_download(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> std::result::Result<String, Self::Error>;

    /// Expose bytes to an embedded viewer until the handle is released
    fn embed(&self, file_name: &str, bytes: Vec<u8>)
        -> std::result::Result<Self::Handle, Self::Error>;
}

/// A short-lived byte-stream handle owned by one view
///
/// Dropping a handle releases it. `release` makes the point explicit.
pub trait ViewerHandle: Send {
    /// Address the viewer opens
    fn location(&self) -> String;

    fn release(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// What a successful generation produced
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Inline(Document),
    Downloaded { file_name: String, location: String },
    Embedded { file_name: String, uri: String },
    /// Generation already ran for the loaded record
    AlreadyGenerated,
}

/// A view over one invoice at a time
pub struct InvoiceView<S, R, H: DeliveryHost> {
    source: S,
    formatter: InvoiceFormatter,
    renderer: Arc<R>,
    host: H,
    locale: Locale,
    mode: OutputMode,
    generated_on: Option<NaiveDate>,
    stage: watch::Sender<Stage>,
    latch: OneShotLatch,
    invoice_id: Option<String>,
    record: Option<Arc<InvoiceRecord>>,
    handle: Option<H::Handle>,
}

impl<S, R, H> InvoiceView<S, R, H>
where
    S: InvoiceSource,
    R: DocumentRenderer,
    H: DeliveryHost,
{
    pub fn new(
        source: S,
        formatter: InvoiceFormatter,
        renderer: R,
        host: H,
        locale: Locale,
        mode: OutputMode,
    ) -> Self {
        let (stage, _) = watch::channel(Stage::Idle);
        Self {
            source,
            formatter,
            renderer: Arc::new(renderer),
            host,
            locale,
            mode,
            generated_on: None,
            stage,
            latch: OneShotLatch::new(),
            invoice_id: None,
            record: None,
            handle: None,
        }
    }

    /// Fix the date printed in the footer instead of using today
    pub fn with_generation_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn stage(&self) -> Stage {
        self.stage.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage.subscribe()
    }

    /// Record currently held by the view, if any
    pub fn record(&self) -> Option<Arc<InvoiceRecord>> {
        self.record.clone()
    }

    /// Whether generation was triggered for the loaded record
    pub fn has_generated(&self) -> bool {
        self.latch.is_armed()
    }

    /// Location of the live viewer handle, if one is held
    pub fn viewer_location(&self) -> Option<String> {
        self.handle.as_ref().map(ViewerHandle::location)
    }

    /// Load the invoice `invoice_id`
    ///
    /// Opening the id already loaded keeps the record and the latch.
    /// Opening another id tears the previous one down first. A missing
    /// or blank id fails without calling the source.
    pub async fn open(&mut self, invoice_id: Option<&str>) -> Result<Arc<InvoiceRecord>> {
        let invoice_id = invoice_id.map(str::trim).filter(|id| !id.is_empty());

        if let (Some(id), Some(record)) = (invoice_id, &self.record) {
            if self.invoice_id.as_deref() == Some(id) {
                debug!(invoice_id = id, "invoice already loaded");
                return Ok(Arc::clone(record));
            }
        }

        self.teardown();
        self.advance(Stage::Idle);
        self.advance(Stage::FetchingData);

        let Some(id) = invoice_id else {
            return Err(self.fail(InvoiceError::MissingIdentifier));
        };
        self.invoice_id = Some(id.to_string());

        info!(invoice_id = id, locale = %self.locale, "fetching invoice");
        let record = match self.source.fetch(id).await {
            Ok(Some(record)) => Arc::new(record),
            Ok(None) => return Err(self.fail(InvoiceError::NoData)),
            Err(err) => return Err(self.fail(err.into())),
        };
        debug!(
            invoice_id = id,
            reference = %record.reference,
            rows = record.rows().len(),
            "invoice loaded"
        );
        self.record = Some(Arc::clone(&record));
        Ok(record)
    }

    /// Generate and deliver the loaded invoice in the view's output mode
    ///
    /// Runs at most once per loaded record; later calls return
    /// [`Delivery::AlreadyGenerated`].
    pub async fn generate(&mut self) -> Result<Delivery> {
        if let Stage::Failed(err) = self.stage() {
            return Err(err);
        }
        let Some(record) = self.record.clone() else {
            return Err(InvoiceError::NoData);
        };
        if !self.latch.try_arm() {
            debug!(reference = %record.reference, "generation already ran");
            return Ok(Delivery::AlreadyGenerated);
        }

        self.advance(Stage::GeneratingDocument);
        let generated_on = self
            .generated_on
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let document = match self.formatter.format(&record, self.locale, generated_on) {
            Ok(document) => document,
            Err(err) => return Err(self.fail(err.into())),
        };

        match self.mode {
            OutputMode::Inline => {
                self.advance(Stage::Complete);
                Ok(Delivery::Inline(document))
            }
            OutputMode::Download => {
                let bytes = self.serialize(&record, document).await?;
                self.advance(Stage::Downloading);
                let invoice_id = self.invoice_id.clone().unwrap_or_default();
                let file_name = download_file_name(self.locale, &invoice_id);
                match self.host.save_download(&file_name, &bytes) {
                    Ok(location) => {
                        info!(%location, "invoice saved");
                        self.advance(Stage::Complete);
                        Ok(Delivery::Downloaded { file_name, location })
                    }
                    Err(err) => Err(self.fail(InvoiceError::GenerationFailed(err.to_string()))),
                }
            }
            OutputMode::Embed => {
                let bytes = self.serialize(&record, document).await?;
                let file_name = viewer_file_name(self.locale, &record.reference);
                match self.host.embed(&file_name, bytes) {
                    Ok(handle) => {
                        let uri = handle.location();
                        self.handle = Some(handle);
                        self.advance(Stage::EmbeddingReady);
                        Ok(Delivery::Embedded { file_name, uri })
                    }
                    Err(err) => Err(self.fail(InvoiceError::GenerationFailed(err.to_string()))),
                }
            }
        }
    }

    /// Open `invoice_id` and generate it
    pub async fn run(&mut self, invoice_id: Option<&str>) -> Result<Delivery> {
        self.open(invoice_id).await?;
        self.generate().await
    }

    /// Release the viewer handle and forget the loaded record
    pub fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!(location = %handle.location(), "releasing viewer handle");
            handle.release();
            if *self.stage.borrow() == Stage::EmbeddingReady {
                self.advance(Stage::Complete);
            }
        }
        self.record = None;
        self.invoice_id = None;
        self.latch.reset();
    }

    async fn collect_assets(&self, document: &Document) -> Assets {
        let mut assets = Assets::new();
        for src in document.image_sources() {
            if assets.contains(src) {
                continue;
            }
            match self.source.fetch_asset(src).await {
                Ok(bytes) => assets.insert(src, bytes),
                Err(err) => warn!(src, error = %err, "image unavailable, omitting it"),
            }
        }
        assets
    }

    /// Render off the async runtime; failures end the view
    async fn serialize(&self, record: &InvoiceRecord, document: Document) -> Result<Vec<u8>> {
        let assets = self.collect_assets(&document).await;
        let renderer = Arc::clone(&self.renderer);
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&document, &assets))
            .await
            .map_err(|err| InvoiceError::GenerationFailed(err.to_string()))
            .and_then(|res| res.map_err(|err| InvoiceError::GenerationFailed(err.to_string())));
        match rendered {
            Ok(bytes) => {
                info!(
                    reference = %record.reference,
                    bytes = bytes.len(),
                    "invoice rendered"
                );
                Ok(bytes)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: InvoiceError) -> InvoiceError {
        warn!(error = %err, "invoice view failed");
        self.advance(Stage::Failed(err.clone()));
        err
    }

    fn advance(&self, next: Stage) {
        let current = self.stage.borrow().clone();
        if current == next {
            return;
        }
        debug_assert!(
            current.can_advance_to(&next),
            "illegal stage transition {current:?} -> {next:?}"
        );
        debug!(from = ?current, to = ?next, "stage transition");
        self.stage.send_replace(next);
    }
}

impl<S, R, H: DeliveryHost> Drop for InvoiceView<S, R, H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }
}
