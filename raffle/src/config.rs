use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::{U128, U64};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{AccountId, Balance};

use crate::errors::RaffleError;
use crate::utils::gas;

/// Where and how randomness is requested.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct RandomnessParams {
    /// Account of the randomness coordinator. The only account allowed
    /// to deliver random words.
    pub coordinator: AccountId,
    /// Gas lane the coordinator prices the request on.
    pub key_hash: String,
    pub subscription_id: U64,
    /// Gas the coordinator attaches when calling back `fulfill_random_words`.
    pub callback_gas_limit: U64,
}

/// Fixed at initialization. There is no method that mutates it.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct RaffleConfig {
    /// Exact deposit required to enter, in yoctoNEAR.
    pub entrance_fee: U128,
    /// Minimum time between the end of a round and the next drawing.
    pub interval_ms: U64,
    /// How long a drawing may wait for randomness before anyone can fail it.
    pub draw_timeout_ms: U64,
    pub randomness: RandomnessParams,
}

impl RaffleConfig {
    pub fn entrance_fee(&self) -> Balance {
        self.entrance_fee.0
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.0
    }

    pub fn draw_timeout_ms(&self) -> u64 {
        self.draw_timeout_ms.0
    }

    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.entrance_fee.0 == 0 {
            return Err(RaffleError::InvalidConfig("entrance fee must be positive"));
        }
        if self.draw_timeout_ms.0 == 0 {
            return Err(RaffleError::InvalidConfig("draw timeout must be positive"));
        }
        if self.randomness.key_hash.is_empty() {
            return Err(RaffleError::InvalidConfig("key hash must not be empty"));
        }
        if self.randomness.callback_gas_limit.0 < gas::FULFILL_RANDOM_WORDS.0 {
            return Err(RaffleError::InvalidConfig("callback gas limit cannot cover prize settlement"));
        }
        Ok(())
    }
}
