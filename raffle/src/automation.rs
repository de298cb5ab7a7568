use common::types::{RandomWordsRequest, RequestId};
use near_sdk::json_types::U64;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, log, near_bindgen, Promise};

use crate::errors::OrPanic;
use crate::external::ext_coordinator;
use crate::interfaces::automation::AutomationCompatible;
use crate::utils::{gas, NUM_WORDS, REQUEST_CONFIRMATIONS};
use crate::*;

/// Each Open -> Drawing guard on its own, plus whether a stalled draw
/// may be failed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub struct UpkeepStatus {
    pub is_open: bool,
    pub interval_elapsed: bool,
    pub has_players: bool,
    pub balance_matches: bool,
    pub draw_timed_out: bool,
    pub upkeep_needed: bool,
}

impl Contract {
    pub(crate) fn upkeep_status(&self) -> UpkeepStatus {
        self.round
            .upkeep_status(&self.config, env::block_timestamp_ms(), self.held_balance())
    }

    fn request_randomness(&self, request_id: RequestId) -> Promise {
        let params = &self.config.randomness;

        ext_coordinator::ext(params.coordinator.clone())
            .with_static_gas(gas::REQUEST_RANDOM_WORDS)
            .request_random_words(RandomWordsRequest {
                request_id: U64(request_id),
                key_hash: params.key_hash.clone(),
                subscription_id: params.subscription_id,
                request_confirmations: REQUEST_CONFIRMATIONS,
                callback_gas_limit: params.callback_gas_limit,
                num_words: NUM_WORDS,
            })
    }
}

#[near_bindgen]
impl AutomationCompatible for Contract {
    fn check_upkeep(&self, check_data: String) -> (bool, String) {
        (self.upkeep_status().upkeep_needed, check_data)
    }

    fn perform_upkeep(&mut self, perform_data: String) {
        let held_balance = self.held_balance();
        let request_id = self
            .round
            .start_draw(&self.config, env::block_timestamp_ms(), held_balance)
            .or_panic();

        if !perform_data.is_empty() {
            log!("Upkeep performed with data: {}", perform_data);
        }
        events::draw_requested(
            self.round.number(),
            request_id,
            self.round.ledger().len(),
            self.round.ledger().pot(),
        );

        // The response arrives later through `fulfill_random_words`, or never.
        self.request_randomness(request_id);
    }
}
