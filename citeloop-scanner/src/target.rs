use crate::error::{AuditError, Result};
use crate::normalize::is_web_scheme;
use url::Url;

/// Generation of the origin page.
pub const GEN_MIN: u8 = 1;
/// Deepest generation a run may be configured to expand.
pub const GEN_MAX: u8 = 4;

/// The page under audit and how many generations of references to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpecification {
    origin: Url,
    max_generation: u8,
}

impl TargetSpecification {
    pub fn new(origin: Url, max_generation: i64) -> Result<Self> {
        if !(i64::from(GEN_MIN)..=i64::from(GEN_MAX)).contains(&max_generation) {
            return Err(AuditError::Configuration(format!(
                "MAX_GEN should be between {} and {}, inclusive.",
                GEN_MIN, GEN_MAX
            )));
        }
        if !is_web_scheme(origin.scheme()) {
            return Err(AuditError::Configuration(format!(
                "Target URL must use http or https: {}",
                origin
            )));
        }

        Ok(Self {
            origin,
            max_generation: max_generation as u8,
        })
    }

    pub fn parse(origin: &str, max_generation: i64) -> Result<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| AuditError::Configuration(format!("Invalid URL: {}", e)))?;
        Self::new(origin, max_generation)
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn max_generation(&self) -> u8 {
        self.max_generation
    }
}
