use crate::state::TraversalState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final tallies of a completed audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub loops: usize,
    pub branches: usize,
    pub distinct_sources: usize,
    pub faulty_refs: usize,
    pub misc_refs: usize,
    pub pages_expanded: usize,
    pub sources: BTreeMap<String, usize>,
}

impl Report {
    pub fn from_state(state: &TraversalState, pages_expanded: usize) -> Self {
        Self {
            loops: state.loops(),
            branches: state.branches(),
            distinct_sources: state.sources().len(),
            faulty_refs: state.faulty(),
            misc_refs: state.misc(),
            pages_expanded,
            sources: state
                .sources()
                .iter()
                .map(|(source, count)| (source.to_string(), *count))
                .collect(),
        }
    }
}
