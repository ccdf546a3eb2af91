//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use medrasti_ast::{Assets, Document};
use medrasti_core::{
    Delivery, InvoiceError, InvoiceFormatter, InvoiceSource, InvoiceView, Locale, MemoryHost,
    OutputMode, Settings, Stage,
};
use medrasti_loader::InvoiceClient;
use medrasti_pdf::{PdfRenderer, Transpiler};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::host::FsHost;

#[derive(Parser)]
#[command(name = "medrasti")]
#[command(author, version, about = "Bilingual school invoices", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the invoice document tree
    View {
        #[command(flatten)]
        target: Target,

        /// Print the Typst markup instead of JSON
        #[arg(long)]
        typst: bool,
    },

    /// Render the invoice to a PDF file
    Download {
        #[command(flatten)]
        target: Target,

        /// Output directory (defaults to [output] dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Expose the invoice PDF as a temporary file until Enter is pressed
    Embed {
        #[command(flatten)]
        target: Target,
    },
}

/// `[LOCALE] <ID>`
#[derive(Args, Debug, Clone)]
struct Target {
    /// Optional locale (fr or ar) followed by the invoice ID
    #[arg(value_name = "[LOCALE] ID", num_args = 0..=2)]
    parts: Vec<String>,
}

/// Run the CLI application
///
/// Parses arguments, loads the configuration and dispatches to the
/// requested command on a Tokio runtime.
pub fn run_cli() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    let source = InvoiceClient::from_settings(&settings.api)
        .with_context(|| format!("Invalid API configuration: {}", settings.api.base_url))?;

    match cli.command {
        Commands::View { target, typst } => {
            let (locale, id) = parse_target(&target.parts)?;
            let output = view_command(source, &settings, locale, id.as_deref(), typst).await?;
            println!("{output}");
        }
        Commands::Download { target, output_dir } => {
            let (locale, id) = parse_target(&target.parts)?;
            let dir = output_dir.unwrap_or_else(|| settings.output.dir.clone());
            let path = download_command(source, &settings, locale, id.as_deref(), &dir).await?;
            println!("{}", path.display());
        }
        Commands::Embed { target } => {
            let (locale, id) = parse_target(&target.parts)?;
            embed_command(source, &settings, locale, id.as_deref(), |path| {
                println!("file://{}", path.display());
                wait_for_release(locale)
            })
            .await?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` refines it
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Split `[LOCALE] <ID>` into a locale and an optional identifier
///
/// A single value is the identifier of a French invoice. With no value
/// the identifier is missing, which the view reports itself.
pub fn parse_target(parts: &[String]) -> Result<(Locale, Option<String>)> {
    match parts {
        [] => Ok((Locale::default(), None)),
        [id] => Ok((Locale::default(), Some(id.clone()))),
        [locale, id] => {
            let locale = locale.parse::<Locale>().map_err(|err| {
                anyhow::anyhow!("{} (expected fr or ar)", err.user_message(Locale::default()))
            })?;
            Ok((locale, Some(id.clone())))
        }
        _ => anyhow::bail!("Expected at most a locale and an invoice ID"),
    }
}

/// Load settings from an explicit file or the usual candidates
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let settings = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        }
        None => find_settings(Path::new(".")),
    };
    Ok(settings.with_env_overrides())
}

/// First parseable `medrasti.toml` or `.medrasti.toml` in `dir`
pub fn find_settings(dir: &Path) -> Settings {
    let candidates = ["medrasti.toml", ".medrasti.toml"];
    for candidate in candidates {
        let path = dir.join(candidate);
        if !path.exists() {
            continue;
        }
        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| Settings::from_toml_str(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(settings) => return settings,
            Err(e) => warn!(path = %path.display(), error = %e, "ignoring config file"),
        }
    }
    Settings::default()
}

/// Execute the view command: the document tree as JSON or Typst markup
pub async fn view_command<S: InvoiceSource>(
    source: S,
    settings: &Settings,
    locale: Locale,
    invoice_id: Option<&str>,
    typst: bool,
) -> Result<String> {
    let mut view = InvoiceView::new(
        source,
        InvoiceFormatter::from_settings(settings),
        PdfRenderer::new(),
        MemoryHost::new(),
        locale,
        OutputMode::Inline,
    );
    let document = match finish(locale, view.run(invoice_id).await)? {
        Delivery::Inline(document) => document,
        other => anyhow::bail!("Unexpected delivery in inline mode: {other:?}"),
    };
    render_inline(&document, typst)
}

fn render_inline(document: &Document, typst: bool) -> Result<String> {
    if typst {
        Ok(Transpiler::transpile_with_assets(document, &Assets::new()))
    } else {
        serde_json::to_string_pretty(document).context("Failed to serialize document")
    }
}

/// Execute the download command, returning the written file
pub async fn download_command<S: InvoiceSource>(
    source: S,
    settings: &Settings,
    locale: Locale,
    invoice_id: Option<&str>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let mut view = InvoiceView::new(
        source,
        InvoiceFormatter::from_settings(settings),
        PdfRenderer::with_family(&settings.fonts.family()),
        FsHost::new(output_dir),
        locale,
        OutputMode::Download,
    );
    let status = spawn_status_printer(view.subscribe(), locale);

    let result = view.run(invoice_id).await;
    drop(view);
    let _ = status.await;

    match finish(locale, result)? {
        Delivery::Downloaded { location, .. } => {
            info!(%location, "invoice downloaded");
            Ok(PathBuf::from(location))
        }
        other => anyhow::bail!("Unexpected delivery in download mode: {other:?}"),
    }
}

/// Execute the embed command
///
/// `on_ready` receives the temporary file and resolves when the viewer is
/// done with it. The file is removed afterwards, and on every early exit.
pub async fn embed_command<S, F, Fut>(
    source: S,
    settings: &Settings,
    locale: Locale,
    invoice_id: Option<&str>,
    on_ready: F,
) -> Result<PathBuf>
where
    S: InvoiceSource,
    F: FnOnce(&Path) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut view = InvoiceView::new(
        source,
        InvoiceFormatter::from_settings(settings),
        PdfRenderer::with_family(&settings.fonts.family()),
        FsHost::new(&settings.output.dir),
        locale,
        OutputMode::Embed,
    );
    let status = spawn_status_printer(view.subscribe(), locale);

    let path = match finish(locale, view.run(invoice_id).await) {
        Ok(Delivery::Embedded { uri, .. }) => {
            let path = PathBuf::from(uri.trim_start_matches("file://"));
            on_ready(&path).await;
            view.teardown();
            Ok(path)
        }
        Ok(other) => Err(anyhow::anyhow!(
            "Unexpected delivery in embed mode: {other:?}"
        )),
        Err(err) => Err(err),
    };

    drop(view);
    let _ = status.await;
    path
}

/// Turn a view failure into the localized message shown to the user
fn finish(locale: Locale, result: medrasti_core::Result<Delivery>) -> Result<Delivery> {
    result.map_err(|err: InvoiceError| anyhow::anyhow!(err.user_message(locale)))
}

/// Print transient status lines until the view goes away
fn spawn_status_printer(
    mut stages: watch::Receiver<Stage>,
    locale: Locale,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = stages.borrow_and_update().clone();
            match stage {
                Stage::Idle | Stage::Failed(_) => {}
                stage => eprintln!("{}", stage.status_message(locale)),
            }
        }
    })
}

async fn wait_for_release(locale: Locale) {
    let prompt = match locale {
        Locale::Fr => "Appuyez sur Entrée pour libérer le document",
        Locale::Ar => "اضغط على Enter لتحرير المستند",
    };
    eprintln!("{prompt}");

    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        _ = stdin.read_line(&mut line) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}
