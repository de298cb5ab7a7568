use near_sdk::json_types::{U128, U64};
use near_sdk::{AccountId, Balance};

use crate::config::{RaffleConfig, RandomnessParams};

pub const INTERVAL_MS: u64 = 60_000;
pub const DRAW_TIMEOUT_MS: u64 = 600_000;

pub fn raffle() -> AccountId {
    "raffle".parse().unwrap()
}

pub fn coordinator() -> AccountId {
    "coordinator".parse().unwrap()
}

pub fn alice() -> AccountId {
    "alice".parse().unwrap()
}
pub fn bob() -> AccountId {
    "bob".parse().unwrap()
}
pub fn charlie() -> AccountId {
    "charlie".parse().unwrap()
}

pub fn ntoy(near_amount: Balance) -> Balance {
    near_amount * 10u128.pow(24)
}

pub fn config() -> RaffleConfig {
    RaffleConfig {
        entrance_fee: U128(ntoy(1)),
        interval_ms: U64(INTERVAL_MS),
        draw_timeout_ms: U64(DRAW_TIMEOUT_MS),
        randomness: RandomnessParams {
            coordinator: coordinator(),
            key_hash: "lane-500".to_string(),
            subscription_id: U64(1),
            callback_gas_limit: U64(100_000_000_000_000),
        },
    }
}

pub mod tests {
    use common::types::{RandomWord, RequestId};
    use near_sdk::test_utils::VMContextBuilder;
    use near_sdk::{testing_env, Gas, VMContext};
    use rand::Rng;

    use crate::interfaces::automation::AutomationCompatible;
    use crate::utils::MAX_PARTICIPANTS;
    use crate::*;

    use super::*;

    pub fn generate_random_seed() -> [u8; 32] {
        rand::thread_rng().gen::<[u8; 32]>()
    }

    /// Drives a contract instance with a synthetic clock and caller.
    pub struct Emulator {
        pub contract: Contract,
        pub block_timestamp_ms: u64,
        pub account_balance: Balance,
        pub prepaid_gas: Gas,
        pub context: VMContext,
    }

    impl Emulator {
        pub fn new(config: RaffleConfig) -> Self {
            let account_balance = ntoy(1_000);
            let context = VMContextBuilder::new()
                .current_account_id(raffle())
                .account_balance(account_balance)
                .build();
            testing_env!(context.clone());
            let contract = Contract::new(config);
            Emulator {
                contract,
                block_timestamp_ms: 0,
                account_balance,
                prepaid_gas: Gas(300 * Gas::ONE_TERA.0),
                context,
            }
        }

        pub fn update_context(&mut self, predecessor: AccountId, deposit: Balance) {
            self.context = VMContextBuilder::new()
                .current_account_id(raffle())
                .predecessor_account_id(predecessor)
                .attached_deposit(deposit)
                .account_balance(self.account_balance)
                .block_timestamp(self.block_timestamp_ms * 1_000_000)
                .random_seed(generate_random_seed())
                .prepaid_gas(self.prepaid_gas)
                .build();
            testing_env!(self.context.clone());
        }

        pub fn skip_ms(&mut self, ms: u64) {
            self.block_timestamp_ms += ms;
        }

        pub fn enter(&mut self, account_id: AccountId, deposit: Balance) {
            self.account_balance += deposit;
            self.update_context(account_id, deposit);
            self.contract.enter();
        }

        pub fn perform_upkeep(&mut self, caller: AccountId) -> RequestId {
            self.update_context(caller, 0);
            self.contract.perform_upkeep(String::new());
            self.contract.round.outstanding_request().unwrap()
        }

        pub fn fulfill(&mut self, request_id: RequestId, words: Vec<RandomWord>) {
            self.update_context(coordinator(), 0);
            self.contract.fulfill_random_words(U64(request_id), words);
        }

        pub fn player(idx: u64) -> AccountId {
            format!("player{}", idx).parse().unwrap()
        }

        /// Fills the round up to the participant cap.
        pub fn fill_round(&mut self) {
            for idx in self.contract.round.ledger().len()..MAX_PARTICIPANTS {
                self.enter(Self::player(idx), ntoy(1));
            }
        }

        pub fn claim_refund(&mut self, account_id: AccountId) {
            self.update_context(account_id, 0);
            self.contract.claim_refund();
        }

        /// Runs the transfer callback as the runtime would.
        pub fn settle_prize(&mut self, request_id: RequestId, success: bool) -> bool {
            self.update_context(raffle(), 0);
            if success {
                let amount = self.contract.round.pending_payout().map_or(0, |claim| claim.amount);
                self.account_balance -= amount;
            }
            self.contract.resolve_prize_transfer(request_id, success)
        }

        pub fn settle_refund(&mut self, account_id: AccountId, amount: Balance, success: bool) -> bool {
            self.update_context(raffle(), 0);
            if success {
                self.account_balance -= amount;
            }
            self.contract.resolve_refund_transfer(&account_id, amount, success)
        }
    }
}
