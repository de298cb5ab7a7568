use borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U64;
use serde::{Deserialize, Serialize};
use uint::construct_uint;

pub type RequestId = u64;
pub type RoundNumber = u64;

construct_uint!{
    /// 256-bit unsigned integer
    #[derive(Serialize, Deserialize, BorshDeserialize, BorshSerialize)]
    pub struct U256(4);
}

pub type RandomWord = U256;

/// Arguments sent to a randomness coordinator when a drawing starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, BorshDeserialize, BorshSerialize)]
pub struct RandomWordsRequest {
    pub request_id: U64,
    /// Gas lane the coordinator should price the request on.
    pub key_hash: String,
    pub subscription_id: U64,
    pub request_confirmations: u16,
    pub callback_gas_limit: U64,
    pub num_words: u32,
}
