use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::env::{network as network_env, EnvError, EnvVar};
use crate::network::session::{FetchFailure, Fetcher, Session};
use crate::output::{snapshot_dir_name, SnapshotWriter};
use crate::parsers::css::{inline_stylesheets, InlineSummary};
use crate::parsers::html::{find_anchor_hrefs, html_to_dom, serialize_document};
use crate::parsers::link_rewriter::{rewrite_links_in_dom, LinkRewriteMap};
use crate::utils::url::{is_http_url, normalize_url, parse_normalized, Url};
use crate::whitelist::Whitelist;

pub const DEFAULT_OUTPUT_DIR: &str = "pages";
/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("sitesnap/", env!("CARGO_PKG_VERSION"));

/// Errors that end a snapshot run.
///
/// Failures to fetch a single subpage or stylesheet are not errors; they are
/// logged and show up in the [`SnapshotReport`].
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not fetch base page {url}: {failure}")]
    BaseUnavailable { url: String, failure: FetchFailure },

    #[error("could not read whitelist file {}: {source}", path.display())]
    WhitelistFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("could not set up HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("could not serialize document: {0}")]
    Serialize(#[from] io::Error),

    #[error("could not encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Process exit code: `2` for bad input, `1` for failures at runtime.
    pub fn exit_code(&self) -> u8 {
        match self {
            SnapshotError::InvalidBaseUrl { .. }
            | SnapshotError::WhitelistFile { .. }
            | SnapshotError::Env(_) => 2,
            _ => 1,
        }
    }
}

/// Cooperative stop signal, checked before each subpage fetch.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Configuration of one snapshot run
#[derive(Clone, Debug)]
pub struct SnapshotOptions {
    pub base_url: String,
    pub whitelist: Whitelist,
    pub output_root: PathBuf,
    pub timeout: u64,
    pub user_agent: String,
    pub write_report: bool,
    pub cancellation: CancellationToken,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        SnapshotOptions {
            base_url: String::new(),
            whitelist: Whitelist::default(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            write_report: false,
            cancellation: CancellationToken::default(),
        }
    }
}

impl SnapshotOptions {
    /// Defaults overridden by whatever `SITESNAP_*` variables are set.
    pub fn from_env() -> Result<SnapshotOptions, SnapshotError> {
        let mut options = SnapshotOptions::default();

        if let Some(timeout) = network_env::Timeout::get()? {
            options.timeout = timeout;
        }
        if let Some(user_agent) = network_env::UserAgent::get()? {
            options.user_agent = user_agent;
        }

        Ok(options)
    }
}

/// One crawl run: where it started, when, and where its files go.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub base_url: Url,
    pub created_at: DateTime<Local>,
    pub directory: PathBuf,
}

impl Snapshot {
    pub fn new(base_url: Url, output_root: &Path, created_at: DateTime<Local>) -> Snapshot {
        let directory = output_root.join(snapshot_dir_name(&created_at, &base_url));

        Snapshot {
            base_url,
            created_at,
            directory,
        }
    }
}

/// A fetched page and what became of it.
#[derive(Clone, Debug)]
pub struct PageRecord {
    pub source_url: Url,
    pub raw_html: String,
    pub transformed_html: String,
    pub file_name: String,
    pub css: InlineSummary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    Saved {
        stylesheets_inlined: usize,
        stylesheets_failed: usize,
    },
    Skipped {
        reason: String,
    },
    Cancelled,
}

impl PageOutcome {
    /// Saved, but with at least one stylesheet left as a link.
    pub fn is_css_partial(&self) -> bool {
        matches!(self, PageOutcome::Saved { stylesheets_failed, .. } if *stylesheets_failed > 0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub url: String,
    pub file_name: Option<String>,
    pub outcome: PageOutcome,
}

/// Per-page outcome of a run, in processing order (base page first).
#[derive(Clone, Debug, Serialize)]
pub struct SnapshotReport {
    pub base_url: String,
    pub created_at: String,
    pub directory: PathBuf,
    pub pages: Vec<PageReport>,
}

impl SnapshotReport {
    fn new(snapshot: &Snapshot) -> SnapshotReport {
        SnapshotReport {
            base_url: snapshot.base_url.to_string(),
            created_at: snapshot
                .created_at
                .to_rfc3339_opts(SecondsFormat::Secs, false),
            directory: snapshot.directory.clone(),
            pages: Vec::new(),
        }
    }

    fn record_saved(&mut self, record: &PageRecord) {
        self.pages.push(PageReport {
            url: record.source_url.to_string(),
            file_name: Some(record.file_name.clone()),
            outcome: PageOutcome::Saved {
                stylesheets_inlined: record.css.inlined,
                stylesheets_failed: record.css.failed,
            },
        });
    }

    fn record(&mut self, url: &str, outcome: PageOutcome) {
        self.pages.push(PageReport {
            url: url.to_string(),
            file_name: None,
            outcome,
        });
    }

    pub fn page(&self, url: &str) -> Option<&PageReport> {
        self.pages.iter().find(|page| page.url == url)
    }

    pub fn saved_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| matches!(page.outcome, PageOutcome::Saved { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| matches!(page.outcome, PageOutcome::Skipped { .. }))
            .count()
    }
}

/// Parses the base URL given by the user; only http(s) can be snapshotted.
pub fn parse_base_url(base_url: &str) -> Result<Url, SnapshotError> {
    let url = Url::parse(base_url.trim()).map_err(|e| SnapshotError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    if !is_http_url(&url) {
        return Err(SnapshotError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }

    Ok(url)
}

/// Finds the pages linked from the base page that belong in the snapshot.
///
/// Only anchors resolving to http(s) URLs other than the base page itself are
/// considered. The result is de-duplicated and sorted.
pub fn find_subpages(base_url: &Url, html: &str, whitelist: &Whitelist) -> BTreeSet<String> {
    let dom = html_to_dom(html);
    let base_normalized = normalize_url(base_url, "");

    find_anchor_hrefs(&dom.document)
        .iter()
        .map(|href| normalize_url(base_url, href))
        .filter(|url| *url != base_normalized)
        .filter(|url| parse_normalized(url).is_some_and(|parsed| is_http_url(&parsed)))
        .filter(|url| whitelist.matches(url))
        .collect()
}

/// Inlines the stylesheets of a fetched page and rewrites its links.
///
/// The page is parsed once, both passes run over the same tree, and the result
/// is serialized once.
pub fn transform_page<F: Fetcher + ?Sized>(
    fetcher: &F,
    rewrite_map: &LinkRewriteMap,
    source_url: Url,
    raw_html: String,
) -> Result<PageRecord, SnapshotError> {
    let dom = html_to_dom(&raw_html);

    let css = inline_stylesheets(&dom, fetcher, &source_url);
    let links = rewrite_links_in_dom(&dom, &source_url, rewrite_map);
    debug!(url = %source_url, stylesheets = css.inlined, links, "transformed page");

    let transformed_html = serialize_document(&dom)?;
    let file_name = rewrite_map.file_name(&source_url);

    Ok(PageRecord {
        source_url,
        raw_html,
        transformed_html,
        file_name,
        css,
    })
}

fn log_saved(record: &PageRecord) {
    if record.css.failed > 0 {
        warn!(
            url = %record.source_url,
            file = %record.file_name,
            inlined = record.css.inlined,
            failed = record.css.failed,
            "saved page with some stylesheets left as links"
        );
    } else {
        info!(url = %record.source_url, file = %record.file_name, "saved page");
    }
}

/// Takes a snapshot of `options.base_url` and its in-scope subpages.
///
/// The base page is fetched, transformed and written as `index.html` before
/// any subpage is fetched. Subpages that cannot be fetched are skipped; only
/// an unreachable base page or a filesystem failure ends the run early.
pub fn create_snapshot<F: Fetcher + ?Sized>(
    options: &SnapshotOptions,
    fetcher: &F,
) -> Result<SnapshotReport, SnapshotError> {
    let base_url = parse_base_url(&options.base_url)?;
    let snapshot = Snapshot::new(base_url, &options.output_root, Local::now());
    let base_url = &snapshot.base_url;

    info!(url = %base_url, "fetching base page");
    let base_html = fetcher
        .fetch(base_url)
        .map_err(|failure| SnapshotError::BaseUnavailable {
            url: base_url.to_string(),
            failure,
        })?;

    let subpages = find_subpages(base_url, &base_html, &options.whitelist);
    info!(count = subpages.len(), "found subpages");
    let rewrite_map = LinkRewriteMap::plan(base_url, &subpages);

    let writer = SnapshotWriter::create(&snapshot.directory)?;
    let mut report = SnapshotReport::new(&snapshot);

    let index = transform_page(fetcher, &rewrite_map, base_url.clone(), base_html)?;
    writer.write(&index.file_name, &index.transformed_html)?;
    log_saved(&index);
    report.record_saved(&index);

    for subpage in &subpages {
        if options.cancellation.is_cancelled() {
            debug!(url = %subpage, "cancelled before fetch");
            report.record(subpage, PageOutcome::Cancelled);
            continue;
        }

        let Some(subpage_url) = parse_normalized(subpage) else {
            continue;
        };

        let html = match fetcher.fetch(&subpage_url) {
            Ok(html) => html,
            Err(failure) => {
                warn!(url = %subpage_url, %failure, "skipping page");
                report.record(
                    subpage,
                    PageOutcome::Skipped {
                        reason: failure.to_string(),
                    },
                );
                continue;
            }
        };

        let record = transform_page(fetcher, &rewrite_map, subpage_url, html)?;
        writer.write(&record.file_name, &record.transformed_html)?;
        log_saved(&record);
        report.record_saved(&record);
    }

    if options.write_report {
        writer.write_report(&report)?;
    }

    info!(
        directory = %writer.directory().display(),
        saved = report.saved_count(),
        skipped = report.skipped_count(),
        "snapshot complete"
    );

    Ok(report)
}

/// Runs [`create_snapshot`] over HTTP.
pub fn run(options: &SnapshotOptions) -> Result<SnapshotReport, SnapshotError> {
    parse_base_url(&options.base_url)?;
    let session = Session::new(options)?;

    create_snapshot(options, &session)
}
