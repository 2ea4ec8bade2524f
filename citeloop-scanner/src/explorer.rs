use crate::classify::{Disposition, ReferenceClassifier};
use crate::density::DensityThresholds;
use crate::error::{AuditError, Result};
use crate::extract::{Candidate, GeneralExtractor, LinkExtractor, SiteFamily, WikiExtractor, extract_candidates};
use crate::fetch::PageFetcher;
use crate::report::Report;
use crate::state::TraversalState;
use crate::target::TargetSpecification;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Called with `(generation, url)` each time a page is opened.
pub type ProgressCallback = Arc<dyn Fn(u8, String) + Send + Sync>;

/// Breadth-first walker over a page's citation graph.
pub struct CitationExplorer<F> {
    fetcher: F,
    wiki: WikiExtractor,
    general: GeneralExtractor,
    classifier: ReferenceClassifier,
    progress_callback: Option<ProgressCallback>,
}

impl<F: PageFetcher> CitationExplorer<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            wiki: WikiExtractor,
            general: GeneralExtractor::new(),
            classifier: ReferenceClassifier::new(),
            progress_callback: None,
        }
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.general = self.general.with_markers(markers);
        self
    }

    pub fn with_density(mut self, density: DensityThresholds) -> Self {
        self.general = self.general.with_density(density);
        self
    }

    pub fn with_red_herrings<I, S>(mut self, red_herrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classifier = self.classifier.with_red_herrings(red_herrings);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Walk the citation graph of `target` and report what was found.
    ///
    /// Returns [`AuditError::CircularCitation`] as soon as any descendant links
    /// back to the origin; nothing else aborts the walk.
    pub async fn explore(&self, target: &TargetSpecification) -> Result<Report> {
        info!(
            "Auditing {} to generation {}",
            target.origin(),
            target.max_generation()
        );

        let mut state = TraversalState::new(target.origin().clone());
        let pages_expanded = self.walk(target, &mut state).await?;
        let report = Report::from_state(&state, pages_expanded);

        info!(
            "Audit complete. {} pages opened, {} branches, {} loops",
            report.pages_expanded, report.branches, report.loops
        );
        Ok(report)
    }

    /// Drain the frontier, returning how many pages were opened.
    pub(crate) async fn walk(
        &self,
        target: &TargetSpecification,
        state: &mut TraversalState,
    ) -> Result<usize> {
        let mut pages_expanded = 0;

        while let Some(url) = state.frontier.pop_front() {
            let Some(generation) = state.generation_of(&url) else {
                continue;
            };
            // Checked on dequeue, so children of the last generation are
            // recorded but never opened.
            if generation > target.max_generation() {
                debug!("Not opening {} (generation {})", url, generation);
                continue;
            }

            pages_expanded += 1;
            info!("Opening page: {}", url);
            if let Some(ref callback) = self.progress_callback {
                callback(generation, url.to_string());
            }

            let candidates = match self.fetcher.fetch_page(url.as_str()).await {
                Ok(body) => self.candidates_for(&url, &body),
                Err(e) => {
                    warn!("Could not open {}: {}", url, e);
                    state.faulty += 1;
                    Vec::new()
                }
            };

            let branches_before = state.begin_page();
            for candidate in candidates {
                let disposition = self
                    .classifier
                    .classify(&self.fetcher, &candidate.href, &url, generation, state)
                    .await;

                if disposition == Disposition::CircularBackReference {
                    warn!("{} cites the origin via {}", url, candidate.href);
                    return Err(AuditError::CircularCitation {
                        page: url.to_string(),
                        target: candidate.href,
                    });
                }
            }
            state.finish_page(branches_before);
        }

        Ok(pages_expanded)
    }

    fn candidates_for(&self, url: &Url, body: &str) -> Vec<Candidate> {
        let extractor: &dyn LinkExtractor = match SiteFamily::for_url(url) {
            SiteFamily::Wiki => &self.wiki,
            SiteFamily::General => &self.general,
        };
        let candidates = extract_candidates(extractor, body);
        debug!("{} candidate references on {}", candidates.len(), url);
        candidates
    }
}
