//! Claims Domain
//!
//! This crate turns a placed order into a delivery claim at the provider:
//! it builds the claim request, creates the claim, records its id against
//! the order and then accepts it.
//!
//! # Claim Lifecycle
//!
//! ```text
//! NotStarted -> Created -> Accepted
//!     |            |
//!     v            v
//!   Failed    AcceptFailed
//! ```
//!
//! A claim that was created but not accepted keeps its provider id; only a
//! claim that was never created is a failure.

pub mod claim;
pub mod request;
pub mod submitter;
pub mod ports;
pub mod error;

pub use claim::{Claim, ClaimStatus};
pub use request::{
    build_claim_request, sanitize_phone, ClaimItem, ClaimLine, ClaimOrder, ClaimRequest, ClaimRoutePoint,
    ClientRequirements, Contact, PointType, Sender,
};
pub use submitter::{ClaimOutcome, ClaimSubmitter};
pub use ports::{AcceptedClaim, ClaimPort, CreatedClaim, OrderRecordPort};
pub use error::ClaimError;
