use common::types::{RandomWord, RandomWordsRequest, RequestId};
use common::utils::{block_seed, expand_seed};
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::UnorderedMap;
use near_sdk::json_types::U64;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{env, ext_contract, log, near_bindgen, AccountId, BorshStorageKey, Gas, PanicOnDefault, Promise};


#[derive(BorshStorageKey, BorshSerialize)]
enum StorageKeys {
    Requests,
}

#[ext_contract(ext_consumer)]
pub trait RandomnessConsumer {
    fn fulfill_random_words(&mut self, request_id: U64, random_words: Vec<RandomWord>);
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[derive(BorshDeserialize, BorshSerialize)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "near_sdk::serde")]
pub struct PendingRequest {
    pub consumer: AccountId,
    pub request: RandomWordsRequest,
    pub requested_at: u64,
}

/// Development randomness coordinator. Words come from the block random
/// seed, which validators can predict; never use it outside local networks.
#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Contract {
    requests: UnorderedMap<(AccountId, RequestId), PendingRequest>,
    fulfilled: u64,
}

#[near_bindgen]
impl Contract {
    #[init]
    pub fn new() -> Self {
        assert!(!env::state_exists(), "Already initialized");
        Self { requests: UnorderedMap::new(StorageKeys::Requests), fulfilled: 0 }
    }

    /// Queues a request from the calling consumer.
    pub fn request_random_words(&mut self, request: RandomWordsRequest) {
        let consumer = env::predecessor_account_id();
        let key = (consumer.clone(), request.request_id.0);
        assert!(self.requests.get(&key).is_none(), "request {} already queued", request.request_id.0);
        assert!(request.num_words > 0, "at least one word must be requested");

        log!("Queued request {} from {}", request.request_id.0, consumer);
        self.requests.insert(
            &key,
            &PendingRequest { consumer, request, requested_at: env::block_timestamp_ms() },
        );
    }

    /// Answers a queued request. Each request is answered at most once.
    pub fn fulfill_random_words(&mut self, consumer: AccountId, request_id: U64) -> Promise {
        let pending = self
            .requests
            .remove(&(consumer.clone(), request_id.0))
            .unwrap_or_else(|| env::panic_str(&format!("no pending request {} from {}", request_id.0, consumer)));
        self.fulfilled += 1;

        let random_words = expand_seed(&block_seed(), request_id.0, pending.request.num_words);
        ext_consumer::ext(consumer)
            .with_static_gas(Gas(pending.request.callback_gas_limit.0))
            .fulfill_random_words(request_id, random_words)
    }

    pub fn get_pending_request(&self, consumer: AccountId, request_id: U64) -> Option<PendingRequest> {
        self.requests.get(&(consumer, request_id.0))
    }

    pub fn get_pending_requests(&self, from_index: u64, limit: u64) -> Vec<PendingRequest> {
        self.requests
            .values()
            .skip(from_index as usize)
            .take(limit as usize)
            .collect()
    }

    pub fn get_fulfilled_count(&self) -> u64 {
        self.fulfilled
    }
}
