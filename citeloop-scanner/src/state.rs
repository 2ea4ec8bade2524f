use crate::normalize::Source;
use crate::target::GEN_MIN;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitRecord {
    pub generation: u8,
    pub hit_count: usize,
}

/// Everything a run accumulates. Owned by the explorer and lent to the
/// classifier one link at a time.
///
/// A URL is inserted into `visited` once; its generation never changes.
#[derive(Debug, Default)]
pub struct TraversalState {
    pub(crate) visited: HashMap<Url, VisitRecord>,
    pub(crate) sources: BTreeMap<Source, usize>,
    pub(crate) frontier: VecDeque<Url>,
    pub(crate) per_page_seen: HashSet<String>,
    pub(crate) loops: usize,
    pub(crate) branches: usize,
    pub(crate) faulty: usize,
    pub(crate) misc: usize,
}

impl TraversalState {
    /// Seed the frontier with the origin at the minimum generation.
    pub fn new(origin: Url) -> Self {
        let mut state = Self::default();
        state.visited.insert(
            origin.clone(),
            VisitRecord {
                generation: GEN_MIN,
                hit_count: 1,
            },
        );
        state.frontier.push_back(origin);
        state
    }

    pub fn visit_record(&self, url: &Url) -> Option<&VisitRecord> {
        self.visited.get(url)
    }

    pub fn generation_of(&self, url: &Url) -> Option<u8> {
        self.visited.get(url).map(|r| r.generation)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn sources(&self) -> &BTreeMap<Source, usize> {
        &self.sources
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn loops(&self) -> usize {
        self.loops
    }

    pub fn branches(&self) -> usize {
        self.branches
    }

    pub fn faulty(&self) -> usize {
        self.faulty
    }

    pub fn misc(&self) -> usize {
        self.misc
    }

    /// Clear the per-page duplicate set and return the branch count to correct against.
    pub(crate) fn begin_page(&mut self) -> usize {
        self.per_page_seen.clear();
        self.branches
    }

    /// A page that produced new branches was itself counted as one when it was
    /// discovered, so one of its children is taken back.
    pub(crate) fn finish_page(&mut self, branches_before: usize) {
        if self.branches > branches_before {
            self.branches -= 1;
        }
    }

    /// Record a URL seen for the first time as a child of a page at `parent_generation`.
    pub(crate) fn add_branch(&mut self, url: Url, source: Option<Source>, parent_generation: u8) {
        if let Some(source) = source {
            *self.sources.entry(source).or_insert(0) += 1;
        }
        self.visited.insert(
            url.clone(),
            VisitRecord {
                generation: parent_generation + 1,
                hit_count: 1,
            },
        );
        self.frontier.push_back(url);
        self.branches += 1;
    }

    pub(crate) fn add_loop(&mut self, url: &Url) {
        if let Some(record) = self.visited.get_mut(url) {
            record.hit_count += 1;
        }
        self.loops += 1;
    }
}
