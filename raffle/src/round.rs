use std::fmt;

use common::types::{RandomWord, RequestId, RoundNumber};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{AccountId, Balance, IntoStorageKey};

use crate::automation::UpkeepStatus;
use crate::config::RaffleConfig;
use crate::errors::RaffleError;
use crate::ledger::RoundLedger;
use crate::request::RequestTracker;
use crate::timing::{has_timed_out, RoundTiming};
use crate::utils::MAX_PARTICIPANTS;

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[serde(crate = "near_sdk::serde")]
pub enum Phase {
    Open,
    Drawing,
    /// Winner selected, prize transfer not settled yet.
    Completed,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Open => "Open",
            Phase::Drawing => "Drawing",
            Phase::Completed => "Completed",
            Phase::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// A prize that was awarded but not yet paid out.
#[derive(BorshDeserialize, BorshSerialize, Clone, Debug, PartialEq, Eq)]
pub struct PrizeClaim {
    pub request_id: RequestId,
    pub winner: AccountId,
    pub amount: Balance,
    /// When the prize transfer was dispatched.
    pub awarded_at: u64,
}

/// The round state machine.
///
/// Every operation takes the clock and the observed held balance as
/// arguments, checks all of its guards first and only then mutates.
/// A returned error means nothing changed.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct Round {
    phase: Phase,
    ledger: RoundLedger,
    requests: RequestTracker,
    timing: RoundTiming,
    recent_winner: Option<AccountId>,
    pending_payout: Option<PrizeClaim>,
    refunds_in_flight: u32,
    number: RoundNumber,
}

impl Round {
    pub fn new<S: IntoStorageKey>(prefix: S, now_ms: u64) -> Self {
        Self {
            phase: Phase::Open,
            ledger: RoundLedger::new(prefix),
            requests: RequestTracker::default(),
            timing: RoundTiming::new(now_ms),
            recent_winner: None,
            pending_payout: None,
            refunds_in_flight: 0,
            number: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ledger(&self) -> &RoundLedger {
        &self.ledger
    }

    pub fn timing(&self) -> &RoundTiming {
        &self.timing
    }

    pub fn number(&self) -> RoundNumber {
        self.number
    }

    pub fn recent_winner(&self) -> Option<&AccountId> {
        self.recent_winner.as_ref()
    }

    pub fn outstanding_request(&self) -> Option<RequestId> {
        self.requests.outstanding()
    }

    pub fn pending_payout(&self) -> Option<&PrizeClaim> {
        self.pending_payout.as_ref()
    }

    pub fn refunds_in_flight(&self) -> u32 {
        self.refunds_in_flight
    }

    /// What `account_id` could reclaim right now.
    pub fn refundable_balance_of(&self, account_id: &AccountId) -> Balance {
        match self.phase {
            Phase::Failed => self.ledger.deposit_of(account_id),
            _ => 0,
        }
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), RaffleError> {
        if self.phase == expected {
            return Ok(());
        }
        let phase = self.phase;
        Err(match expected {
            Phase::Open => RaffleError::NotOpen { phase },
            Phase::Failed => RaffleError::NotFailed { phase },
            Phase::Drawing | Phase::Completed => RaffleError::NotDrawing { phase },
        })
    }

    pub fn enter(
        &mut self,
        config: &RaffleConfig,
        account_id: &AccountId,
        deposit: Balance,
    ) -> Result<(), RaffleError> {
        self.ensure_phase(Phase::Open)?;
        if self.ledger.contains(account_id) {
            return Err(RaffleError::AlreadyEntered { account_id: account_id.clone() });
        }
        if deposit != config.entrance_fee() {
            return Err(RaffleError::IncorrectEntranceFee {
                expected: config.entrance_fee(),
                attached: deposit,
            });
        }
        if self.ledger.len() >= MAX_PARTICIPANTS {
            return Err(RaffleError::RoundFull { max: MAX_PARTICIPANTS });
        }

        self.ledger.record_entry(account_id, deposit);
        Ok(())
    }

    pub fn upkeep_status(&self, config: &RaffleConfig, now_ms: u64, held_balance: Balance) -> UpkeepStatus {
        let is_open = self.phase == Phase::Open;
        let interval_elapsed = self.timing.interval_elapsed(now_ms, config.interval_ms());
        let has_players = !self.ledger.is_empty();
        let balance_matches = held_balance == self.ledger.pot();

        UpkeepStatus {
            is_open,
            interval_elapsed,
            has_players,
            balance_matches,
            draw_timed_out: self.phase == Phase::Drawing
                && self.timing.draw_timed_out(now_ms, config.draw_timeout_ms()),
            upkeep_needed: is_open && interval_elapsed && has_players && balance_matches,
        }
    }

    /// Open -> Drawing. Returns the identifier the randomness response must carry.
    pub fn start_draw(
        &mut self,
        config: &RaffleConfig,
        now_ms: u64,
        held_balance: Balance,
    ) -> Result<RequestId, RaffleError> {
        if !self.upkeep_status(config, now_ms, held_balance).upkeep_needed {
            return Err(RaffleError::UpkeepNotNeeded {
                held_balance,
                pot: self.ledger.pot(),
                players: self.ledger.len(),
                phase: self.phase,
            });
        }

        self.phase = Phase::Drawing;
        self.timing.start_drawing(now_ms);
        Ok(self.requests.issue())
    }

    /// Drawing -> Completed. Picks the winner from the first word and
    /// parks the prize until its transfer settles.
    pub fn fulfill(
        &mut self,
        request_id: RequestId,
        random_words: &[RandomWord],
        now_ms: u64,
    ) -> Result<PrizeClaim, RaffleError> {
        self.ensure_phase(Phase::Drawing)?;
        self.requests.validate(request_id)?;
        let word = random_words.first().ok_or(RaffleError::NoRandomWords)?;
        let winner = self.ledger.winner_for(word).ok_or(RaffleError::NoPlayers)?;

        let claim = PrizeClaim { request_id, winner, amount: self.ledger.pot(), awarded_at: now_ms };

        self.phase = Phase::Completed;
        self.pending_payout = Some(claim.clone());
        Ok(claim)
    }

    fn take_pending_payout(&mut self, request_id: RequestId) -> Result<PrizeClaim, RaffleError> {
        let settles_pending = self.phase == Phase::Completed
            && self
                .pending_payout
                .as_ref()
                .map_or(false, |claim| claim.request_id == request_id);
        if !settles_pending {
            return Err(RaffleError::SettlementMismatch { request_id });
        }
        self.pending_payout
            .take()
            .ok_or(RaffleError::SettlementMismatch { request_id })
    }

    /// Completed -> Open once the prize has arrived. Returns the settled
    /// claim and the number of the round it closed.
    pub fn settle_payout(
        &mut self,
        request_id: RequestId,
        now_ms: u64,
    ) -> Result<(PrizeClaim, RoundNumber), RaffleError> {
        let claim = self.take_pending_payout(request_id)?;

        self.ledger.reset();
        self.requests.clear();
        self.timing.complete(now_ms);
        self.recent_winner = Some(claim.winner.clone());
        self.phase = Phase::Open;

        let finished = self.number;
        self.number += 1;
        Ok((claim, finished))
    }

    /// Completed -> Open when the transfer callback never settled the prize.
    ///
    /// A bounced transfer rolls back within a few blocks, so a prize still
    /// pending a full draw timeout after dispatch was delivered and only
    /// its settlement was lost. Open to anyone.
    pub fn settle_stalled_payout(
        &mut self,
        config: &RaffleConfig,
        now_ms: u64,
    ) -> Result<(PrizeClaim, RoundNumber), RaffleError> {
        let claim = match (&self.pending_payout, self.phase) {
            (Some(claim), Phase::Completed) => claim,
            (_, phase) => return Err(RaffleError::NotDrawing { phase }),
        };
        if !has_timed_out(now_ms, claim.awarded_at, config.draw_timeout_ms()) {
            return Err(RaffleError::SettlementNotStalled {
                deadline_ms: claim.awarded_at.saturating_add(config.draw_timeout_ms()),
                now_ms,
            });
        }

        let request_id = claim.request_id;
        self.settle_payout(request_id, now_ms)
    }

    /// Completed -> Drawing after the prize transfer bounced. The request
    /// stays outstanding and the timeout keeps counting from the original start.
    pub fn rollback_payout(&mut self, request_id: RequestId) -> Result<PrizeClaim, RaffleError> {
        let claim = self.take_pending_payout(request_id)?;
        self.phase = Phase::Drawing;
        Ok(claim)
    }

    /// Drawing -> Failed. Open to anyone once the draw timeout has passed.
    pub fn fail_round(&mut self, config: &RaffleConfig, now_ms: u64) -> Result<(), RaffleError> {
        self.ensure_phase(Phase::Drawing)?;
        if !self.timing.draw_timed_out(now_ms, config.draw_timeout_ms()) {
            return Err(RaffleError::DrawTimeoutNotElapsed {
                deadline_ms: self
                    .timing
                    .draw_deadline(config.draw_timeout_ms())
                    .unwrap_or_default(),
                now_ms,
            });
        }

        self.requests.clear();
        self.phase = Phase::Failed;
        Ok(())
    }

    /// Removes the caller from the round and returns the deposit to send back.
    pub fn begin_refund(&mut self, account_id: &AccountId) -> Result<Balance, RaffleError> {
        self.ensure_phase(Phase::Failed)?;
        if !self.ledger.contains(account_id) {
            return Err(RaffleError::NothingToRefund { account_id: account_id.clone() });
        }

        let amount = self.ledger.withdraw(account_id);
        self.refunds_in_flight += 1;
        Ok(amount)
    }

    pub fn settle_refund(&mut self) {
        self.refunds_in_flight = self.refunds_in_flight.saturating_sub(1);
    }

    /// Puts a participant back after its refund transfer bounced.
    pub fn rollback_refund(&mut self, account_id: &AccountId, amount: Balance) {
        self.ledger.restore(account_id, amount);
        self.refunds_in_flight = self.refunds_in_flight.saturating_sub(1);
    }

    /// Failed -> Open once every deposit went back. Returns the number of
    /// the abandoned round.
    pub fn restart(&mut self, now_ms: u64) -> Result<RoundNumber, RaffleError> {
        self.ensure_phase(Phase::Failed)?;
        if self.ledger.pot() != 0 || self.refunds_in_flight != 0 {
            return Err(RaffleError::RefundsOutstanding {
                pot: self.ledger.pot(),
                in_flight: self.refunds_in_flight,
            });
        }

        self.ledger.reset();
        self.timing.complete(now_ms);
        self.phase = Phase::Open;

        let finished = self.number;
        self.number += 1;
        Ok(finished)
    }
}
