//! Anonymization data models

pub mod result;

pub use result::{
    AnonymizationResult, AnonymizationStats, AnonymizedEntity, ConfidenceBucket,
    ConfidenceDistribution,
};
