//! Quoting domain errors

use thiserror::Error;

use domain_cargo::CandidateClass;

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("No cargo classes to price")]
    NoCandidates,

    #[error("No offers available for classes {}", format_classes(.tried))]
    Unavailable { tried: Vec<CandidateClass> },
}

fn format_classes(classes: &[CandidateClass]) -> String {
    classes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
