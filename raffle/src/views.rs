use common::types::RoundNumber;
use near_sdk::json_types::{U128, U64};
use near_sdk::{near_bindgen, AccountId};

use crate::automation::UpkeepStatus;
use crate::config::RaffleConfig;
use crate::history::RoundRecord;
use crate::round::Phase;
use crate::utils::{NUM_WORDS, REQUEST_CONFIRMATIONS};
use crate::*;

#[near_bindgen]
impl Contract {
    pub fn get_config(&self) -> RaffleConfig {
        self.config.clone()
    }

    pub fn get_entrance_fee(&self) -> U128 {
        self.config.entrance_fee
    }

    pub fn get_interval(&self) -> u64 {
        self.config.interval_ms()
    }

    pub fn get_draw_timeout(&self) -> u64 {
        self.config.draw_timeout_ms()
    }

    pub fn get_num_words(&self) -> u32 {
        NUM_WORDS
    }

    pub fn get_request_confirmations(&self) -> u16 {
        REQUEST_CONFIRMATIONS
    }

    pub fn get_phase(&self) -> Phase {
        self.round.phase()
    }

    pub fn get_pot(&self) -> U128 {
        U128(self.round.ledger().pot())
    }

    pub fn get_held_balance(&self) -> U128 {
        U128(self.held_balance())
    }

    pub fn get_number_of_players(&self) -> u64 {
        self.round.ledger().len()
    }

    pub fn get_player(&self, index: u64) -> Option<AccountId> {
        self.round.ledger().participant(index)
    }

    /// Participants in entry order. Refunded accounts leave the list, which
    /// may reorder the remaining ones.
    pub fn get_players(&self, from_index: u64, limit: u64) -> Vec<AccountId> {
        self.round.ledger().participants(from_index, limit)
    }

    pub fn has_entered(&self, account_id: AccountId) -> bool {
        self.round.ledger().contains(&account_id)
    }

    /// Deposit recorded for the account this round, whatever the phase.
    pub fn get_deposit(&self, account_id: AccountId) -> U128 {
        U128(self.round.ledger().deposit_of(&account_id))
    }

    /// Zero unless the round has failed.
    pub fn get_refundable_balance(&self, account_id: AccountId) -> U128 {
        U128(self.round.refundable_balance_of(&account_id))
    }

    pub fn get_last_completed_at(&self) -> u64 {
        self.round.timing().last_completed_at
    }

    pub fn get_drawing_started_at(&self) -> Option<u64> {
        self.round.timing().drawing_started_at
    }

    pub fn get_outstanding_request(&self) -> Option<U64> {
        self.round.outstanding_request().map(U64)
    }

    pub fn get_recent_winner(&self) -> Option<AccountId> {
        self.round.recent_winner().cloned()
    }

    pub fn get_round_number(&self) -> RoundNumber {
        self.round.number()
    }

    pub fn get_upkeep_status(&self) -> UpkeepStatus {
        self.upkeep_status()
    }

    pub fn get_round(&self, round: RoundNumber) -> Option<RoundRecord> {
        self.history.get_by_identifier(&round)
    }

    /// Finished rounds, newest first.
    pub fn get_round_history(&self, from_index: u64, limit: u64) -> Vec<RoundRecord> {
        self.history.newest_first(from_index, limit)
    }
}
