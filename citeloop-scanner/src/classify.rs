use crate::fetch::PageFetcher;
use crate::normalize::{LinkTarget, ResolvedLink, is_web_scheme, resolve};
use crate::state::TraversalState;
use crate::target::GEN_MIN;
use tracing::{debug, warn};
use url::Url;

/// URL substrings that mark a link as site furniture rather than a citation.
pub const DEFAULT_RED_HERRINGS: [&str; 5] =
    ["aboutus", "author", "subscribe", "subscription", "terms"];

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// What the classifier decided about one candidate link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// First sighting of a web URL; queued one generation below its ancestor.
    NewBranch,
    /// Already classified while expanding the current page.
    IntraPageDuplicate,
    /// Already visited through another branch.
    CrossBranchLoop,
    /// Points back at the origin. Fatal for the run.
    CircularBackReference,
    /// PDF document or a link without an http/https scheme.
    Miscellaneous,
    /// Could not be resolved or probed.
    Faulty,
    /// Matched a red-herring substring.
    Filtered,
}

#[derive(Debug, Clone)]
pub struct ReferenceClassifier {
    red_herrings: Vec<String>,
}

impl Default for ReferenceClassifier {
    fn default() -> Self {
        Self {
            red_herrings: DEFAULT_RED_HERRINGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ReferenceClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_red_herrings<I, S>(mut self, red_herrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.red_herrings = red_herrings.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_red_herring(&self, url: &str) -> bool {
        self.red_herrings.iter().any(|r| url.contains(r.as_str()))
    }

    /// Classify `raw`, found on `ancestor`, and apply the matching update to `state`.
    ///
    /// Rules are tried in order and the first match wins:
    /// unresolvable, duplicate on this page, content-type probe (failure or PDF),
    /// red herring, non-web scheme, already visited, new.
    pub async fn classify<F: PageFetcher>(
        &self,
        fetcher: &F,
        raw: &str,
        ancestor: &Url,
        ancestor_generation: u8,
        state: &mut TraversalState,
    ) -> Disposition {
        let Some(resolved) = resolve(raw, ancestor) else {
            debug!("Unresolvable reference {:?} on {}", raw, ancestor);
            state.faulty += 1;
            return Disposition::Faulty;
        };

        if !state.per_page_seen.insert(resolved.target.as_str().to_string()) {
            debug!("Reference was already counted in this url: {}", resolved.target.as_str());
            return Disposition::IntraPageDuplicate;
        }

        if let Some(url) = resolved.target.web_url() {
            match fetcher.probe_content_type(url.as_str()).await {
                Ok(content_type) => {
                    if content_type.is_some_and(|ct| ct.contains(PDF_CONTENT_TYPE)) {
                        debug!("PDF reference {}", url);
                        state.misc += 1;
                        return Disposition::Miscellaneous;
                    }
                }
                Err(e) => {
                    warn!("Faulty reference {}: {}", url, e);
                    state.faulty += 1;
                    return Disposition::Faulty;
                }
            }
        }

        if self.is_red_herring(resolved.target.as_str()) {
            debug!("Red herring {}", resolved.target.as_str());
            return Disposition::Filtered;
        }

        let (url, source) = match resolved {
            ResolvedLink {
                target: LinkTarget::Absolute(url),
                source,
            } if is_web_scheme(url.scheme()) => (url, source),
            other => {
                debug!("No recognized protocol: {}", other.target.as_str());
                state.misc += 1;
                return Disposition::Miscellaneous;
            }
        };

        match state.generation_of(&url) {
            Some(GEN_MIN) => Disposition::CircularBackReference,
            Some(_) => {
                debug!("Loop through {}", url);
                state.add_loop(&url);
                Disposition::CrossBranchLoop
            }
            None => {
                debug!("New branch {} (generation {})", url, ancestor_generation + 1);
                state.add_branch(url, source, ancestor_generation);
                Disposition::NewBranch
            }
        }
    }
}
