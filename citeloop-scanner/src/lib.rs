pub mod classify;
pub mod density;
pub mod error;
pub mod explorer;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod report;
pub mod state;
pub mod target;

pub use classify::{Disposition, ReferenceClassifier};
pub use error::AuditError;
pub use explorer::{CitationExplorer, ProgressCallback};
pub use fetch::{HttpFetcher, PageFetcher};
pub use report::Report;
pub use state::TraversalState;
pub use target::{GEN_MAX, GEN_MIN, TargetSpecification};
