use common::types::RoundNumber;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::{U128, U64};
use near_sdk::{env, log, near_bindgen, AccountId, Balance, Promise};

use crate::errors::RaffleError;
use crate::history::{RoundOutcome, RoundRecord};
use crate::round::PrizeClaim;
use crate::utils::{gas, is_promise_success, storage_stake};
use crate::*;

/// Value the contract holds on behalf of the round.
///
/// Credited when a deposit is accepted, debited when a transfer leaves,
/// credited back when a transfer bounces.
#[derive(BorshDeserialize, BorshSerialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Escrow {
    held: Balance,
}

impl Escrow {
    pub fn held(&self) -> Balance {
        self.held
    }

    pub fn receive(&mut self, amount: Balance) {
        self.held += amount;
    }

    pub fn release(&mut self, amount: Balance) {
        assert!(
            amount <= self.held,
            "escrow holds {} but {} is being released",
            self.held,
            amount
        );
        self.held -= amount;
    }

    pub fn restore(&mut self, amount: Balance) {
        self.held += amount;
    }
}

fn log_transfer_failure(account_id: &AccountId, amount: Balance) {
    let err = RaffleError::TransferFailed { account_id: account_id.clone(), amount };
    log!("{}", err);
}

impl Contract {
    /// Escrowed value, capped by what the account can actually spend.
    pub(crate) fn held_balance(&self) -> Balance {
        let spendable = env::account_balance().saturating_sub(storage_stake());
        self.escrow.held().min(spendable)
    }

    pub(crate) fn dispatch_prize(&mut self, claim: &PrizeClaim) -> Promise {
        self.escrow.release(claim.amount);

        Promise::new(claim.winner.clone()).transfer(claim.amount).then(
            Self::ext(env::current_account_id())
                .with_static_gas(gas::ON_PRIZE_TRANSFER)
                .with_unused_gas_weight(1)
                .on_prize_transfer(U64(claim.request_id)),
        )
    }

    pub(crate) fn resolve_prize_transfer(&mut self, request_id: u64, success: bool) -> bool {
        if !success {
            return match self.round.rollback_payout(request_id) {
                Ok(claim) => {
                    self.escrow.restore(claim.amount);
                    log_transfer_failure(&claim.winner, claim.amount);
                    events::payout_failed(self.round.number(), request_id, &claim.winner, claim.amount);
                    false
                }
                Err(err) => {
                    log!("Ignoring bounced prize: {}", err);
                    false
                }
            };
        }

        let now = env::block_timestamp_ms();
        match self.round.settle_payout(request_id, now) {
            Ok((claim, finished)) => {
                self.record_payout(&claim, finished, now);
                true
            }
            Err(err) => {
                log!("Ignoring prize settlement: {}", err);
                false
            }
        }
    }

    pub(crate) fn record_payout(&mut self, claim: &PrizeClaim, finished: RoundNumber, now: u64) {
        self.history.add(&RoundRecord {
            round: finished,
            outcome: RoundOutcome::Paid {
                winner: claim.winner.clone(),
                amount: U128(claim.amount),
            },
            finished_at: now,
        });
        events::winner_picked(finished, claim.request_id, &claim.winner, claim.amount);
    }

    pub(crate) fn dispatch_refund(&mut self, account_id: AccountId, amount: Balance) -> Promise {
        self.escrow.release(amount);

        Promise::new(account_id.clone()).transfer(amount).then(
            Self::ext(env::current_account_id())
                .with_static_gas(gas::ON_REFUND_TRANSFER)
                .on_refund_transfer(account_id, U128(amount)),
        )
    }

    pub(crate) fn resolve_refund_transfer(
        &mut self,
        account_id: &AccountId,
        amount: Balance,
        success: bool,
    ) -> bool {
        if success {
            self.round.settle_refund();
            events::refund_issued(account_id, amount, self.round.number());
        } else {
            self.round.rollback_refund(account_id, amount);
            self.escrow.restore(amount);
            log_transfer_failure(account_id, amount);
            events::refund_failed(account_id, amount, self.round.number());
        }
        success
    }
}

#[near_bindgen]
impl Contract {
    #[private]
    pub fn on_prize_transfer(&mut self, request_id: U64) -> bool {
        self.resolve_prize_transfer(request_id.0, is_promise_success())
    }

    #[private]
    pub fn on_refund_transfer(&mut self, account_id: AccountId, amount: U128) -> bool {
        self.resolve_refund_transfer(&account_id, amount.0, is_promise_success())
    }
}
