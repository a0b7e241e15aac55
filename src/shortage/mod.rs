//! Drug shortage estimation over the bundled drug catalog.

pub mod catalog;
pub mod estimator;

use thiserror::Error;

pub use catalog::{Alternative, DrugCatalog, DrugCatalogEntry};
pub use estimator::{estimate, Recommendation, RiskAssessment, ShortageEstimate};

#[derive(Error, Debug)]
pub enum ShortageError {
    #[error("Drug catalog parse error: {0}")]
    CatalogParse(String),

    #[error("Invalid shortage risk {score} for {drug}")]
    InvalidRiskScore { drug: String, score: f64 },
}
