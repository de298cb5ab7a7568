use common::types::{RandomWord, U256};
use near_sdk::{env, AccountId, PromiseResult};

pub mod storage_keys{
    use near_sdk::BorshStorageKey;
    use near_sdk::borsh::{self, BorshSerialize};

    #[derive(BorshStorageKey, BorshSerialize)]
    pub enum StorageKeys {
        Round,
        RoundHistory,
    }
}

pub mod gas{
    use near_sdk::Gas;

    pub const REQUEST_RANDOM_WORDS: Gas = Gas(Gas::ONE_TERA.0 * 20);
    /// Enough to clear a full registry; the callback also receives any
    /// gas left over in `fulfill_random_words`.
    pub const ON_PRIZE_TRANSFER: Gas = Gas(Gas::ONE_TERA.0 * 60);
    pub const ON_REFUND_TRANSFER: Gas = Gas(Gas::ONE_TERA.0 * 10);
    /// Lowest callback gas a coordinator may be configured with: the
    /// prize callback plus validation and the transfer itself.
    pub const FULFILL_RANDOM_WORDS: Gas = Gas(ON_PRIZE_TRANSFER.0 + Gas::ONE_TERA.0 * 20);
}

/// Number of confirmations the coordinator waits for before answering.
pub const REQUEST_CONFIRMATIONS: u16 = 3;
/// Only the first word of a response is consumed.
pub const NUM_WORDS: u32 = 1;
/// Finished rounds kept in the history ring buffer.
pub const ROUND_HISTORY_CAPACITY: u64 = 16;
/// Players per round. Bounds the storage work of settling a prize.
pub const MAX_PARTICIPANTS: u64 = 200;

/// Reduces a random word to an index in `0..len`.
///
/// Plain modulo reduction: when `len` does not divide 2^256 the lower
/// indices are favoured by at most one part in 2^256 / len, which is
/// negligible for any registry that fits in storage.
pub(crate) fn reduce_to_index(word: &RandomWord, len: u64) -> u64{
    assert!(len > 0, "cannot reduce into an empty range");
    (*word % U256::from(len)).low_u64()
}

/// True when the single promise this callback waits on succeeded.
pub(crate) fn is_promise_success() -> bool{
    env::promise_results_count() == 1
        && matches!(env::promise_result(0), PromiseResult::Successful(_))
}

pub(crate) fn storage_stake() -> near_sdk::Balance{
    env::storage_byte_cost() * near_sdk::Balance::from(env::storage_usage())
}

pub(crate) fn caller() -> AccountId{
    env::predecessor_account_id()
}
