use common::ring_buffer::{Identifier, RingBuffer};
use common::types::RoundNumber;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;

pub type RoundHistory = RingBuffer<RoundRecord, RoundNumber>;

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub enum RoundOutcome {
    Paid { winner: AccountId, amount: U128 },
    Refunded,
}

/// How a finished round ended.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
#[derive(Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct RoundRecord {
    pub round: RoundNumber,
    pub outcome: RoundOutcome,
    pub finished_at: u64,
}

impl Identifier<RoundNumber> for RoundRecord {
    fn id(&self) -> RoundNumber {
        self.round
    }
}
