use common::types::RequestId;
use near_sdk::{env, AccountId, Balance};
use thiserror::Error;

use crate::round::Phase;

/// Every way a raffle operation can be refused.
///
/// Guards run before any mutation, so an `Err` always leaves the round
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaffleError {
    #[error("raffle is not open (phase: {phase})")]
    NotOpen { phase: Phase },

    #[error("no drawing in progress (phase: {phase})")]
    NotDrawing { phase: Phase },

    #[error("round has not failed (phase: {phase})")]
    NotFailed { phase: Phase },

    #[error("entrance fee is exactly {expected} yoctoNEAR, attached {attached}")]
    IncorrectEntranceFee { expected: Balance, attached: Balance },

    #[error("{account_id} already entered this round")]
    AlreadyEntered { account_id: AccountId },

    #[error("upkeep not needed (held balance: {held_balance}, pot: {pot}, players: {players}, phase: {phase})")]
    UpkeepNotNeeded {
        held_balance: Balance,
        pot: Balance,
        players: u64,
        phase: Phase,
    },

    #[error("draw timeout not elapsed: round can be failed at {deadline_ms}, now {now_ms}")]
    DrawTimeoutNotElapsed { deadline_ms: u64, now_ms: u64 },

    #[error("no randomness request outstanding, received response for {received}")]
    NoOutstandingRequest { received: RequestId },

    #[error("randomness response for request {received} does not match outstanding request {expected}")]
    RequestIdMismatch { expected: RequestId, received: RequestId },

    #[error("only the coordinator can fulfill randomness, called by {caller}")]
    OnlyCoordinatorCanFulfill { caller: AccountId },

    #[error("randomness response carries no words")]
    NoRandomWords,

    #[error("{account_id} has nothing to refund")]
    NothingToRefund { account_id: AccountId },

    #[error("transfer of {amount} yoctoNEAR to {account_id} failed")]
    TransferFailed { account_id: AccountId, amount: Balance },

    #[error("refunds outstanding (pot: {pot}, in flight: {in_flight})")]
    RefundsOutstanding { pot: Balance, in_flight: u32 },

    #[error("no settlement pending for request {request_id}")]
    SettlementMismatch { request_id: RequestId },

    #[error("prize settlement pending until {deadline_ms}, now {now_ms}")]
    SettlementNotStalled { deadline_ms: u64, now_ms: u64 },

    #[error("round is full ({max} players)")]
    RoundFull { max: u64 },

    #[error("round has no players")]
    NoPlayers,

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub(crate) trait OrPanic<T> {
    /// Aborts the call with the error message; the host reverts the call.
    fn or_panic(self) -> T;
}

impl<T> OrPanic<T> for Result<T, RaffleError> {
    fn or_panic(self) -> T {
        self.unwrap_or_else(|err| env::panic_str(&err.to_string()))
    }
}
