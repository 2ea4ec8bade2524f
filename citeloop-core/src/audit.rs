use citeloop_scanner::error::AuditError;
use citeloop_scanner::fetch::DEFAULT_TIMEOUT_SECS;
use citeloop_scanner::{CitationExplorer, HttpFetcher, Report, TargetSpecification, GEN_MAX, GEN_MIN};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Options for configuring an audit
pub struct AuditOptions {
    pub target: TargetSpecification,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl AuditOptions {
    /// Build options from the raw command-line values.
    pub fn from_args(url: &str, max_generation: &str) -> Result<Self, AuditError> {
        let origin = parse_target_url(url)?;
        let max_generation = parse_max_generation(max_generation)?;
        Ok(Self {
            target: TargetSpecification::new(origin, max_generation)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress_bars: false,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_progress_bars(mut self, show: bool) -> Self {
        self.show_progress_bars = show;
        self
    }
}

/// Callback for reporting which page is being opened
pub type AuditProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

fn generation_error() -> AuditError {
    AuditError::Configuration(format!(
        "MAX_GEN should be between {} and {}, inclusive.",
        GEN_MIN, GEN_MAX
    ))
}

/// Parse a MAX_GEN argument. Whole-valued decimals such as `3.0` are accepted.
pub fn parse_max_generation(raw: &str) -> Result<i64, AuditError> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| AuditError::Configuration(format!("MAX_GEN is not a number: {:?}", raw)))?;
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(generation_error());
            }
            value as i64
        }
    };

    if !(i64::from(GEN_MIN)..=i64::from(GEN_MAX)).contains(&value) {
        return Err(generation_error());
    }
    Ok(value)
}

/// Parse a target URL, trying `http://` when no scheme is given.
pub fn parse_target_url(raw: &str) -> Result<Url, AuditError> {
    let raw = raw.trim();
    if let Ok(url) = Url::parse(raw)
        && url.has_host()
    {
        return Ok(url);
    }

    Url::parse(&format!("http://{}", raw))
        .map_err(|e| AuditError::Configuration(format!("Invalid URL '{}': {}", raw, e)))
}

/// Host and path of a URL, for compact progress lines
pub fn short_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|host| format!("{}{}", host, u.path())))
        .unwrap_or_else(|| url.to_string())
}

/// Execute an audit with the given options
pub async fn execute_audit(
    options: AuditOptions,
    progress_callback: Option<AuditProgressCallback>,
) -> Result<Report, AuditError> {
    let AuditOptions {
        target,
        timeout_secs,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting audit...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let opened = Arc::new(AtomicUsize::new(0));
    let opened_clone = opened.clone();
    let pb_clone = progress_bar.clone();
    let explorer_callback: citeloop_scanner::ProgressCallback =
        Arc::new(move |generation: u8, url: String| {
            let count = opened_clone.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "[gen {}] {} ({} pages opened)",
                    generation,
                    short_url(&url),
                    count
                ));
            }
            if let Some(ref callback) = progress_callback {
                callback(url);
            }
        });

    debug!("Request timeout {}s", timeout_secs);
    let fetcher = HttpFetcher::with_timeout(timeout_secs)?;
    let outcome = CitationExplorer::new(fetcher)
        .with_progress_callback(explorer_callback)
        .explore(&target)
        .await;

    if let Some(ref pb) = progress_bar {
        let total = opened.load(Ordering::Relaxed);
        match outcome {
            Ok(_) => pb.finish_with_message(format!("Audit complete! {} pages opened", total)),
            Err(_) => pb.finish_and_clear(),
        }
    }

    outcome
}
