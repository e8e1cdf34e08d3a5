pub mod model;
pub mod negotiation;

pub use model::*;
pub use negotiation::{AnswerDecision, NegotiationState, Negotiator, OfferDecision};
