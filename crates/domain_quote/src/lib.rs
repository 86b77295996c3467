//! Quoting Domain
//!
//! This crate asks the provider for prices, picks the cheapest offer and
//! turns it into the rate shown at checkout.
//!
//! # Negotiation
//!
//! ```text
//! candidate classes -> pricing request per class -> cheapest offer -> ShippingRate
//!                                                         |
//!                                                         v
//!                                                   QuoteSession (payload kept for booking)
//! ```

pub mod offer;
pub mod ports;
pub mod negotiator;
pub mod rate;
pub mod session;
pub mod error;

pub use offer::{Offer, OfferPayload};
pub use ports::{PricingItem, PricingPort, PricingRequest, PricingRequirements, PricingResponse, QuotedOffer, RoutePoint, Waypoint};
pub use negotiator::QuoteNegotiator;
pub use rate::{is_cargo_method, rate_id, RateMeta, ShippingRate, METHOD_ID};
pub use session::{InMemoryQuoteSessionStore, QuoteSession, QuoteSessionStore, SessionDestination, DEFAULT_SESSION_TTL_HOURS};
pub use error::QuoteError;
