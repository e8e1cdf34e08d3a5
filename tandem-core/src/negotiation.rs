//! Endpoint-side offer/answer bookkeeping.
//!
//! The server relays offers blindly, so two endpoints that renegotiate at the
//! same moment each see the other's offer while their own is still unanswered.
//! Both sides run a [`Negotiator`] and break the tie by room role: the
//! Responder keeps its offer, the Initiator rolls its own back and answers.

use crate::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Stable,
    HaveLocalOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    /// Apply the remote offer and reply with an answer. `rolled_back` is set
    /// when a pending local offer had to be discarded first.
    Accept { rolled_back: bool },
    /// Drop the remote offer; our own pending offer wins.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerDecision {
    Applied,
    Unexpected,
}

#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    role: Role,
    state: NegotiationState,
}

impl Negotiator {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: NegotiationState::Stable,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// The peer went away. The server promotes a lone member to Initiator.
    pub fn reset(&mut self) {
        self.role = Role::Initiator;
        self.state = NegotiationState::Stable;
    }

    /// Only the Initiator opens negotiation when the room becomes ready.
    pub fn should_offer_on_ready(&self) -> bool {
        self.role == Role::Initiator
    }

    pub fn local_offer(&mut self) {
        self.state = NegotiationState::HaveLocalOffer;
    }

    pub fn remote_offer(&mut self) -> OfferDecision {
        match (self.state, self.role) {
            (NegotiationState::Stable, _) => OfferDecision::Accept { rolled_back: false },
            (NegotiationState::HaveLocalOffer, Role::Responder) => OfferDecision::Ignore,
            (NegotiationState::HaveLocalOffer, _) => {
                self.state = NegotiationState::Stable;
                OfferDecision::Accept { rolled_back: true }
            }
        }
    }

    pub fn remote_answer(&mut self) -> AnswerDecision {
        match self.state {
            NegotiationState::HaveLocalOffer => {
                self.state = NegotiationState::Stable;
                AnswerDecision::Applied
            }
            NegotiationState::Stable => AnswerDecision::Unexpected,
        }
    }
}
