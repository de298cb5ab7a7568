//! Arbitrary call sequences against the round aggregate, including
//! bounced transfers, with the accounting invariants checked after
//! every step.

use std::sync::atomic::{AtomicU64, Ordering};

use common::types::{RequestId, U256};
use near_sdk::test_utils::VMContextBuilder;
use near_sdk::{testing_env, AccountId, Balance};
use proptest::prelude::*;

use crate::config::RaffleConfig;
use crate::payout::Escrow;
use crate::round::{Phase, Round};
use crate::test_utils::{alice, bob, charlie, config, ntoy, DRAW_TIMEOUT_MS, INTERVAL_MS};

static NEXT_PREFIX: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug)]
enum Action {
    Enter { player: usize, exact_fee: bool },
    Wait { ms: u64 },
    StartDraw,
    Fulfill { stale: bool, word: u64 },
    SettlePrize { success: bool },
    /// The prize callback never arrives; someone settles it after the timeout.
    FinalizeStalledPrize,
    FailRound,
    ClaimRefund { player: usize },
    SettleRefund { success: bool },
    Restart,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let enter = (0usize..3, prop::bool::weighted(0.8))
        .prop_map(|(player, exact_fee)| Action::Enter { player, exact_fee });
    let wait = prop_oneof![
        Just(INTERVAL_MS),
        Just(DRAW_TIMEOUT_MS),
        0u64..DRAW_TIMEOUT_MS,
    ]
    .prop_map(|ms| Action::Wait { ms });
    let fulfill = (prop::bool::weighted(0.2), any::<u64>())
        .prop_map(|(stale, word)| Action::Fulfill { stale, word });

    prop_oneof![
        5 => enter,
        3 => wait,
        2 => Just(Action::StartDraw),
        2 => fulfill,
        2 => any::<bool>().prop_map(|success| Action::SettlePrize { success }),
        1 => Just(Action::FinalizeStalledPrize),
        2 => Just(Action::FailRound),
        3 => (0usize..3).prop_map(|player| Action::ClaimRefund { player }),
        2 => any::<bool>().prop_map(|success| Action::SettleRefund { success }),
        1 => Just(Action::Restart),
    ]
}

/// The round plus the value movements the contract performs around it.
struct Harness {
    config: RaffleConfig,
    round: Round,
    escrow: Escrow,
    players: Vec<AccountId>,
    now_ms: u64,
    refunds_in_flight: Vec<(AccountId, Balance)>,
    paid_in: Balance,
    paid_out: Balance,
}

impl Harness {
    fn new() -> Self {
        testing_env!(VMContextBuilder::new().build());
        let prefix = NEXT_PREFIX.fetch_add(1, Ordering::Relaxed);
        Self {
            config: config(),
            round: Round::new(format!("case{}", prefix).into_bytes(), 0),
            escrow: Escrow::default(),
            players: vec![alice(), bob(), charlie()],
            now_ms: 0,
            refunds_in_flight: Vec::new(),
            paid_in: 0,
            paid_out: 0,
        }
    }

    fn snapshot(&self) -> (Phase, Balance, u64, Option<RequestId>, Balance) {
        (
            self.round.phase(),
            self.round.ledger().pot(),
            self.round.ledger().len(),
            self.round.outstanding_request(),
            self.escrow.held(),
        )
    }

    fn apply(&mut self, action: Action) {
        let before = self.snapshot();
        let rejected = match action {
            Action::Enter { player, exact_fee } => {
                let account_id = self.players[player].clone();
                let deposit = if exact_fee { ntoy(1) } else { ntoy(1) + 1 };
                let result = self.round.enter(&self.config, &account_id, deposit);
                if result.is_ok() {
                    self.escrow.receive(deposit);
                    self.paid_in += deposit;
                }
                result.is_err()
            }
            Action::Wait { ms } => {
                self.now_ms += ms;
                false
            }
            Action::StartDraw => self
                .round
                .start_draw(&self.config, self.now_ms, self.escrow.held())
                .is_err(),
            Action::Fulfill { stale, word } => {
                let request_id = self.round.outstanding_request().unwrap_or(0) + u64::from(stale);
                match self.round.fulfill(request_id, &[U256::from(word)], self.now_ms) {
                    Ok(claim) => {
                        self.escrow.release(claim.amount);
                        false
                    }
                    Err(_) => true,
                }
            }
            Action::SettlePrize { success } => match self.round.pending_payout().cloned() {
                Some(claim) if success => {
                    self.round.settle_payout(claim.request_id, self.now_ms).unwrap();
                    self.paid_out += claim.amount;
                    false
                }
                Some(claim) => {
                    self.round.rollback_payout(claim.request_id).unwrap();
                    self.escrow.restore(claim.amount);
                    false
                }
                None => true,
            },
            Action::FinalizeStalledPrize => {
                match self.round.settle_stalled_payout(&self.config, self.now_ms) {
                    Ok((claim, _)) => {
                        self.paid_out += claim.amount;
                        false
                    }
                    Err(_) => true,
                }
            }
            Action::FailRound => self.round.fail_round(&self.config, self.now_ms).is_err(),
            Action::ClaimRefund { player } => {
                let account_id = self.players[player].clone();
                match self.round.begin_refund(&account_id) {
                    Ok(amount) => {
                        self.escrow.release(amount);
                        self.refunds_in_flight.push((account_id, amount));
                        false
                    }
                    Err(_) => true,
                }
            }
            Action::SettleRefund { success } => match self.refunds_in_flight.pop() {
                Some((_, amount)) if success => {
                    self.round.settle_refund();
                    self.paid_out += amount;
                    false
                }
                Some((account_id, amount)) => {
                    self.round.rollback_refund(&account_id, amount);
                    self.escrow.restore(amount);
                    false
                }
                None => true,
            },
            Action::Restart => self.round.restart(self.now_ms).is_err(),
        };

        if rejected {
            assert_eq!(self.snapshot(), before, "a rejected call changed state");
        }
    }

    fn check(&self) {
        let ledger = self.round.ledger();
        let phase = self.round.phase();
        let registered = ledger.participants(0, u64::MAX);

        if matches!(phase, Phase::Open | Phase::Drawing) {
            assert_eq!(self.escrow.held(), ledger.pot(), "held balance drifted from pot in {}", phase);
        }

        let mut deposits: Balance = 0;
        for account_id in &self.players {
            assert_eq!(ledger.contains(account_id), registered.contains(account_id));
            if phase != Phase::Failed {
                assert_eq!(self.round.refundable_balance_of(account_id), 0);
            }
            if ledger.contains(account_id) {
                assert!(ledger.deposit_of(account_id) > 0);
            } else {
                assert_eq!(ledger.deposit_of(account_id), 0);
            }
            deposits += ledger.deposit_of(account_id);
        }
        assert_eq!(registered.len() as u64, ledger.len());
        assert_eq!(deposits, ledger.pot());
        assert!(ledger.pot() == 0 || !ledger.is_empty(), "value stranded in an empty round");

        let in_flight: Balance = self.refunds_in_flight.iter().map(|(_, amount)| amount).sum();
        let prize_in_flight = self.round.pending_payout().map_or(0, |claim| claim.amount);
        assert_eq!(self.round.refunds_in_flight() as usize, self.refunds_in_flight.len());
        assert_eq!(self.paid_in, self.paid_out + self.escrow.held() + in_flight + prize_in_flight);

        if phase == Phase::Failed {
            let refundable: Balance = self
                .players
                .iter()
                .map(|account_id| self.round.refundable_balance_of(account_id))
                .sum();
            assert_eq!(refundable, ledger.pot());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn pbt_round_keeps_accounting_invariants(
        actions in prop::collection::vec(action_strategy(), 0..80)
    ) {
        let mut harness = Harness::new();
        harness.check();
        for action in actions {
            harness.apply(action);
            harness.check();
        }
    }

    /// Whatever happened before, a failed round can always be drained and reopened.
    #[test]
    fn pbt_failed_round_always_recovers(
        actions in prop::collection::vec(action_strategy(), 0..60)
    ) {
        let mut harness = Harness::new();
        for action in actions {
            harness.apply(action);
        }

        // settle whatever is still in flight
        while !harness.refunds_in_flight.is_empty() {
            harness.apply(Action::SettleRefund { success: true });
        }
        harness.apply(Action::SettlePrize { success: true });

        if harness.round.phase() == Phase::Drawing {
            harness.apply(Action::Wait { ms: DRAW_TIMEOUT_MS });
            harness.apply(Action::FailRound);
        }
        if harness.round.phase() == Phase::Failed {
            for player in 0..harness.players.len() {
                harness.apply(Action::ClaimRefund { player });
                harness.apply(Action::SettleRefund { success: true });
            }
            harness.check();
            prop_assert_eq!(harness.round.ledger().pot(), 0);
            prop_assert!(harness.round.restart(harness.now_ms).is_ok());
        }

        prop_assert_eq!(harness.round.phase(), Phase::Open);
        harness.check();
        prop_assert_eq!(harness.escrow.held(), harness.round.ledger().pot());
        prop_assert_eq!(harness.paid_in, harness.paid_out + harness.escrow.held());
    }
}
