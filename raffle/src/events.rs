use common::types::{RequestId, RoundNumber};
use near_sdk::json_types::{U128, U64};
use near_sdk::serde::Serialize;
use near_sdk::serde_json::json;
use near_sdk::{log, AccountId, Balance};

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct ParticipantEvent<'a> {
    pub account_id: &'a AccountId,
    pub amount: U128,
    pub round: U64,
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct DrawEvent {
    pub round: U64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<U64>,
    pub players: U64,
    pub pot: U128,
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct PrizeEvent<'a> {
    pub round: U64,
    pub request_id: U64,
    pub winner: &'a AccountId,
    pub amount: U128,
}

fn log_event<T: Serialize>(event: &str, data: T) {
    let event = json!({
        "standard": "raffle",
        "version": "1.0.0",
        "event": event,
        "data": [data]
    });

    log!("EVENT_JSON:{}", event.to_string());
}

pub fn raffle_enter(account_id: &AccountId, amount: Balance, round: RoundNumber) {
    log_event(
        "raffle_enter",
        ParticipantEvent { account_id, amount: U128(amount), round: U64(round) },
    );
}

pub fn draw_requested(round: RoundNumber, request_id: RequestId, players: u64, pot: Balance) {
    log_event(
        "draw_requested",
        DrawEvent {
            round: U64(round),
            request_id: Some(U64(request_id)),
            players: U64(players),
            pot: U128(pot),
        },
    );
}

pub fn winner_picked(round: RoundNumber, request_id: RequestId, winner: &AccountId, amount: Balance) {
    log_event(
        "winner_picked",
        PrizeEvent { round: U64(round), request_id: U64(request_id), winner, amount: U128(amount) },
    );
}

pub fn payout_failed(round: RoundNumber, request_id: RequestId, winner: &AccountId, amount: Balance) {
    log_event(
        "payout_failed",
        PrizeEvent { round: U64(round), request_id: U64(request_id), winner, amount: U128(amount) },
    );
}

pub fn round_failed(round: RoundNumber, request_id: Option<RequestId>, players: u64, pot: Balance) {
    log_event(
        "round_failed",
        DrawEvent {
            round: U64(round),
            request_id: request_id.map(U64),
            players: U64(players),
            pot: U128(pot),
        },
    );
}

pub fn refund_issued(account_id: &AccountId, amount: Balance, round: RoundNumber) {
    log_event(
        "refund_issued",
        ParticipantEvent { account_id, amount: U128(amount), round: U64(round) },
    );
}

pub fn refund_failed(account_id: &AccountId, amount: Balance, round: RoundNumber) {
    log_event(
        "refund_failed",
        ParticipantEvent { account_id, amount: U128(amount), round: U64(round) },
    );
}

pub fn round_restarted(finished_round: RoundNumber, round: RoundNumber) {
    log_event(
        "round_restarted",
        json!({ "finished_round": U64(finished_round), "round": U64(round) }),
    );
}
