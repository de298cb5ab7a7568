use common::types::RequestId;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};

use crate::errors::RaffleError;

/// Correlates randomness responses with the single live request.
#[derive(BorshDeserialize, BorshSerialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestTracker {
    last_issued: RequestId,
    outstanding: Option<RequestId>,
}

impl RequestTracker {
    /// Issues a fresh identifier and makes it the outstanding one.
    /// Identifiers are never reused, so late answers to abandoned
    /// requests can never match.
    pub fn issue(&mut self) -> RequestId {
        self.last_issued += 1;
        self.outstanding = Some(self.last_issued);
        self.last_issued
    }

    pub fn outstanding(&self) -> Option<RequestId> {
        self.outstanding
    }

    pub fn validate(&self, received: RequestId) -> Result<(), RaffleError> {
        match self.outstanding {
            None => Err(RaffleError::NoOutstandingRequest { received }),
            Some(expected) if expected != received => {
                Err(RaffleError::RequestIdMismatch { expected, received })
            }
            Some(_) => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.outstanding = None;
    }
}
