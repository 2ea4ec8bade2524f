use crate::density::DensityThresholds;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Host whose pages carry a structured reference list.
pub const WIKI_HOST: &str = "en.wikipedia.org";

/// Substrings of a `class` or `id` value that mark a reference section.
pub const DEFAULT_MARKERS: [&str; 4] = ["bibliography", "citation", "cited", "reference"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteFamily {
    Wiki,
    General,
}

impl SiteFamily {
    pub fn for_url(url: &Url) -> Self {
        if url.host_str() == Some(WIKI_HOST) {
            SiteFamily::Wiki
        } else {
            SiteFamily::General
        }
    }
}

/// The part of the page an anchor was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOrigin {
    WikiReference,
    Prose,
    MarkedSection(String),
}

/// An outgoing link considered for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub href: String,
    pub origin: CandidateOrigin,
}

pub trait LinkExtractor {
    /// Ordered candidate links of a parsed page. Missing structure yields no candidates.
    fn extract_links(&self, document: &Html) -> Vec<Candidate>;
}

/// Parse `body` and run `extractor` over it.
pub fn extract_candidates(extractor: &dyn LinkExtractor, body: &str) -> Vec<Candidate> {
    let document = Html::parse_document(body);
    extractor.extract_links(&document)
}

fn parse_selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn anchors_in(element: ElementRef<'_>, anchor: &Selector, origin: &CandidateOrigin) -> Vec<Candidate> {
    element
        .select(anchor)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| Candidate {
            href: href.to_string(),
            origin: origin.clone(),
        })
        .collect()
}

/// Reads the `ol.references` list of a wiki article, keeping only web citations.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikiExtractor;

impl LinkExtractor for WikiExtractor {
    fn extract_links(&self, document: &Html) -> Vec<Candidate> {
        let (Some(list), Some(item), Some(web_cite), Some(anchor)) = (
            parse_selector("ol.references"),
            parse_selector("li"),
            parse_selector("cite.citation.web"),
            parse_selector("a[href]"),
        ) else {
            return Vec::new();
        };

        let Some(references) = document.select(&list).next() else {
            debug!("No reference list on page");
            return Vec::new();
        };

        references
            .select(&item)
            .filter_map(|entry| {
                let cite = entry.select(&web_cite).next()?;
                let link = cite
                    .select(&anchor)
                    .next()
                    .or_else(|| entry.select(&anchor).next())?;
                Some(Candidate {
                    href: link.value().attr("href")?.to_string(),
                    origin: CandidateOrigin::WikiReference,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerAttr {
    Class,
    Id,
}

/// Collects links from prose paragraphs, then from sections whose class or id
/// looks like a bibliography.
#[derive(Debug, Clone)]
pub struct GeneralExtractor {
    markers: Vec<String>,
    density: DensityThresholds,
}

impl Default for GeneralExtractor {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            density: DensityThresholds::default(),
        }
    }
}

impl GeneralExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_density(mut self, density: DensityThresholds) -> Self {
        self.density = density;
        self
    }

    fn is_marker(&self, value: &str) -> bool {
        self.markers.iter().any(|m| value.contains(m.as_str()))
    }

    fn prose_links(&self, document: &Html, anchor: &Selector) -> Vec<Candidate> {
        let Some(paragraph) = parse_selector("p") else {
            return Vec::new();
        };

        document
            .select(&paragraph)
            .filter(|p| {
                let text: String = p.text().map(str::trim).collect();
                self.density.accepts(&text)
            })
            .flat_map(|p| anchors_in(p, anchor, &CandidateOrigin::Prose))
            .collect()
    }

    /// Marker values in discovery order: all class tokens first, then ids.
    fn marker_values(&self, document: &Html) -> Vec<(MarkerAttr, String)> {
        let (Some(with_class), Some(with_id)) = (parse_selector("[class]"), parse_selector("[id]"))
        else {
            return Vec::new();
        };

        let mut values: Vec<(MarkerAttr, String)> = Vec::new();
        let mut push = |attr: MarkerAttr, value: &str| {
            if !values.iter().any(|(a, v)| *a == attr && v == value) {
                values.push((attr, value.to_string()));
            }
        };

        for element in document.select(&with_class) {
            for class in element.value().classes().filter(|c| self.is_marker(c)) {
                push(MarkerAttr::Class, class);
            }
        }
        for element in document.select(&with_id) {
            if let Some(id) = element.value().id().filter(|id| self.is_marker(id)) {
                push(MarkerAttr::Id, id);
            }
        }
        values
    }

    fn marked_section_links(&self, document: &Html, anchor: &Selector) -> Vec<Candidate> {
        let Some(div) = parse_selector("div") else {
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for (attr, value) in self.marker_values(document) {
            debug!("Reference section marker {:?}={}", attr, value);
            let origin = CandidateOrigin::MarkedSection(value.clone());
            for section in document.select(&div) {
                let element = section.value();
                let matches = match attr {
                    MarkerAttr::Class => element.classes().any(|c| c == value),
                    MarkerAttr::Id => element.id() == Some(value.as_str()),
                };
                if matches {
                    candidates.extend(anchors_in(section, anchor, &origin));
                }
            }
        }
        candidates
    }
}

impl LinkExtractor for GeneralExtractor {
    fn extract_links(&self, document: &Html) -> Vec<Candidate> {
        let Some(anchor) = parse_selector("a[href]") else {
            return Vec::new();
        };

        let mut candidates = self.prose_links(document, &anchor);
        candidates.extend(self.marked_section_links(document, &anchor));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.href.as_str()).collect()
    }

    #[test]
    fn test_site_family_by_host() {
        let wiki = Url::parse("https://en.wikipedia.org/wiki/Pizza").unwrap();
        let other = Url::parse("https://de.wikipedia.org/wiki/Pizza").unwrap();
        assert_eq!(SiteFamily::for_url(&wiki), SiteFamily::Wiki);
        assert_eq!(SiteFamily::for_url(&other), SiteFamily::General);
    }

    #[test]
    fn test_wiki_keeps_only_web_citations() {
        let html = r#"<html><body>
            <ol class="references">
              <li id="cite_note-1"><span class="mw-cite-backlink">^</span>
                <span class="reference-text"><cite class="citation web cs1">
                  <a class="external text" href="https://example.com/story">Story</a></cite></span></li>
              <li id="cite_note-2"><span class="mw-cite-backlink">^</span>
                <span class="reference-text"><cite class="citation book">
                  <a href="https://books.example.com/isbn">Book</a></cite></span></li>
              <li id="cite_note-3"><span class="reference-text">Plain note, no cite.</span></li>
              <li id="cite_note-4"><span class="reference-text"><cite class="citation web">
                  <a href="https://news.example.org/item">Item</a></cite></span></li>
            </ol>
        </body></html>"#;

        let candidates = extract_candidates(&WikiExtractor, html);
        assert_eq!(
            hrefs(&candidates),
            vec!["https://example.com/story", "https://news.example.org/item"]
        );
        assert!(candidates
            .iter()
            .all(|c| c.origin == CandidateOrigin::WikiReference));
    }

    #[test]
    fn test_wiki_without_reference_list_yields_nothing() {
        let html = "<html><body><p>No references here.</p></body></html>";
        assert!(extract_candidates(&WikiExtractor, html).is_empty());
    }

    #[test]
    fn test_general_prose_pass_filters_boilerplate() {
        let html = r#"<html><body>
            <p><a href="/home">Home</a> <a href="/about">About</a></p>
            <p>Researchers at the coastal institute measured how quickly the river delta
            expanded over the last decade, according to <a href="https://survey.example.com/report">a survey</a>.
            Their findings suggest that sediment transport doubled after the northern dam was removed.</p>
        </body></html>"#;

        let candidates = extract_candidates(&GeneralExtractor::new(), html);
        assert_eq!(hrefs(&candidates), vec!["https://survey.example.com/report"]);
        assert_eq!(candidates[0].origin, CandidateOrigin::Prose);
    }

    #[test]
    fn test_general_marked_sections_by_class_and_id() {
        let html = r#"<html><body>
            <div class="article-references">
              <a href="https://one.example.com/">One</a>
              <a href="https://two.example.com/">Two</a>
            </div>
            <div id="works-cited"><a href="https://three.example.com/">Three</a></div>
            <div class="sidebar"><a href="https://ads.example.com/">Ad</a></div>
        </body></html>"#;

        let candidates = extract_candidates(&GeneralExtractor::new(), html);
        assert_eq!(
            hrefs(&candidates),
            vec![
                "https://one.example.com/",
                "https://two.example.com/",
                "https://three.example.com/",
            ]
        );
        assert_eq!(
            candidates[2].origin,
            CandidateOrigin::MarkedSection("works-cited".to_string())
        );
    }

    #[test]
    fn test_marker_on_non_div_element_is_not_extracted() {
        let html = r#"<html><body>
            <section class="bibliography"><a href="https://skipped.example.com/">x</a></section>
        </body></html>"#;
        assert!(extract_candidates(&GeneralExtractor::new(), html).is_empty());
    }

    #[test]
    fn test_marker_match_is_case_sensitive() {
        let html = r#"<div class="References"><a href="https://x.example.com/">x</a></div>"#;
        assert!(extract_candidates(&GeneralExtractor::new(), html).is_empty());
    }

    #[test]
    fn test_injected_markers_replace_defaults() {
        let html = r#"<div class="sources"><a href="https://x.example.com/">x</a></div>
            <div class="references"><a href="https://y.example.com/">y</a></div>"#;
        let extractor = GeneralExtractor::new().with_markers(["sources"]);
        assert_eq!(
            hrefs(&extract_candidates(&extractor, html)),
            vec!["https://x.example.com/"]
        );
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        let html = "<div class=\"citation\"><a href=\"https://x.example.com/\">unterminated";
        let candidates = extract_candidates(&GeneralExtractor::new(), html);
        assert_eq!(hrefs(&candidates), vec!["https://x.example.com/"]);
    }
}
