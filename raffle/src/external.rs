use common::types::RandomWordsRequest;
use near_sdk::ext_contract;

#[ext_contract(ext_coordinator)]
pub trait RandomnessCoordinator {
    fn request_random_words(&mut self, request: RandomWordsRequest);
}
