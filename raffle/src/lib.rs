use common::ring_buffer::RingBuffer;
use common::types::RandomWord;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U64;
use near_sdk::{env, near_bindgen, PanicOnDefault, Promise};

use config::RaffleConfig;
use errors::{OrPanic, RaffleError};
use history::{RoundHistory, RoundOutcome, RoundRecord};
use interfaces::randomness::RandomnessConsumer;
use payout::Escrow;
use round::Round;
use utils::storage_keys::StorageKeys;
use utils::{caller, ROUND_HISTORY_CAPACITY};

pub mod automation;
pub mod config;
pub mod errors;
pub mod external;
pub mod history;
pub mod interfaces;
pub mod ledger;
pub mod payout;
pub mod request;
pub mod round;
pub mod timing;
mod events;
mod utils;
mod views;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod invariants;

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    config: RaffleConfig,
    round: Round,
    escrow: Escrow,
    history: RoundHistory,
}

#[near_bindgen]
impl Contract {
    #[init]
    pub fn new(config: RaffleConfig) -> Self {
        assert!(!env::state_exists(), "Already initialized");
        config.validate().or_panic();

        Self {
            config,
            round: Round::new(StorageKeys::Round, env::block_timestamp_ms()),
            escrow: Escrow::default(),
            history: RingBuffer::new(StorageKeys::RoundHistory, ROUND_HISTORY_CAPACITY),
        }
    }

    /// Joins the open round. Attach exactly the entrance fee.
    #[payable]
    pub fn enter(&mut self) {
        let account_id = caller();
        let deposit = env::attached_deposit();
        self.round.enter(&self.config, &account_id, deposit).or_panic();

        self.escrow.receive(deposit);
        events::raffle_enter(&account_id, deposit, self.round.number());
    }

    /// Abandons a drawing whose randomness never arrived. Anyone may call
    /// this once the draw timeout has passed.
    pub fn fail_round(&mut self) {
        let request_id = self.round.outstanding_request();
        self.round
            .fail_round(&self.config, env::block_timestamp_ms())
            .or_panic();

        events::round_failed(
            self.round.number(),
            request_id,
            self.round.ledger().len(),
            self.round.ledger().pot(),
        );
    }

    /// Closes a round whose prize went out but whose transfer callback never
    /// settled it. Anyone may call this once the draw timeout has passed
    /// since the prize was dispatched.
    pub fn finalize_payout(&mut self) {
        let now = env::block_timestamp_ms();
        let (claim, finished) = self.round.settle_stalled_payout(&self.config, now).or_panic();
        self.record_payout(&claim, finished, now);
    }

    /// Sends the caller's deposit back after the round failed.
    pub fn claim_refund(&mut self) -> Promise {
        let account_id = caller();
        let amount = self.round.begin_refund(&account_id).or_panic();
        self.dispatch_refund(account_id, amount)
    }

    /// Reopens a failed round once every deposit has been returned.
    pub fn restart_round(&mut self) {
        let now = env::block_timestamp_ms();
        let finished = self.round.restart(now).or_panic();

        self.history.add(&RoundRecord {
            round: finished,
            outcome: RoundOutcome::Refunded,
            finished_at: now,
        });
        events::round_restarted(finished, self.round.number());
    }
}

#[near_bindgen]
impl RandomnessConsumer for Contract {
    fn fulfill_random_words(&mut self, request_id: U64, random_words: Vec<RandomWord>) -> Promise {
        let caller = caller();
        if caller != self.config.randomness.coordinator {
            env::panic_str(&RaffleError::OnlyCoordinatorCanFulfill { caller }.to_string());
        }

        let claim = self
            .round
            .fulfill(request_id.0, &random_words, env::block_timestamp_ms())
            .or_panic();
        self.dispatch_prize(&claim)
    }
}
