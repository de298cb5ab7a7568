pub mod ring_buffer{
    use near_sdk::collections::{LookupMap, Vector};
    use near_sdk::IntoStorageKey;
    use borsh::{BorshDeserialize, BorshSerialize};

    pub trait Identifier<T>{
        fn id(&self) -> T;
    }

    /// Keeps the last `capacity` elements, overwriting the oldest one.
    /// Elements can be looked up by position or by their identifier.
    #[derive(BorshSerialize, BorshDeserialize)]
    pub struct RingBuffer<T, TID>{
        arr: Vector<T>,
        capacity: u64,
        current_index: u64,
        id_idx_map: LookupMap<TID, u64>,
    }

    impl<T, TID> RingBuffer<T, TID>
    where
        T: BorshSerialize + BorshDeserialize + Identifier<TID>,
        TID: BorshSerialize + BorshDeserialize,
    {
        pub fn new<S: IntoStorageKey>(prefix: S, capacity: u64) -> Self{
            assert_ne!(capacity, 0, "capacity cannot be lower than 1");
            let prefix = prefix.into_storage_key();

            Self {
                arr: Vector::new([prefix.as_slice(), b"a"].concat()),
                capacity,
                current_index: 0,
                id_idx_map: LookupMap::new([prefix.as_slice(), b"i"].concat()),
            }
        }

        /// calculate next index
        fn next_index(&self) -> u64{
            (self.current_index + 1) % self.capacity
        }

        pub fn capacity(&self) -> u64{
            self.capacity
        }

        pub fn len(&self) -> u64{
            self.arr.len()
        }

        pub fn is_empty(&self) -> bool{
            self.arr.is_empty()
        }

        /// adds element to the buffer, evicting the oldest one when full
        pub fn add(&mut self, element: &T){
            if self.arr.len() < self.capacity {
                self.arr.push(element);
            } else {
                let replaced_element = self.arr.replace(self.current_index, element);
                self.id_idx_map.remove(&replaced_element.id());
            }

            self.id_idx_map.insert(&element.id(), &self.current_index);
            self.current_index = self.next_index();
        }

        pub fn get_by_index(&self, idx: u64) -> Option<T>{
            self.arr.get(idx)
        }

        pub fn get_by_identifier(&self, id: &TID) -> Option<T> {
            self.id_idx_map
                .get(id)
                .and_then(|idx| self.get_by_index(idx))
        }

        /// Elements from newest to oldest.
        pub fn newest_first(&self, from_index: u64, limit: u64) -> Vec<T>{
            let len = self.arr.len();
            (from_index..len)
                .take(limit as usize)
                .filter_map(|offset| {
                    let idx = (self.current_index + self.capacity - 1 - offset) % self.capacity;
                    self.arr.get(idx)
                })
                .collect()
        }
    }
}

pub mod types;

pub mod utils{
    use near_sdk::env;

    use crate::types::{RandomWord, U256};

    pub fn as_u256(arr: &[u8; 32]) -> U256{
        U256::from_little_endian(arr)
    }

    /// Derives `num_words` words from a 32-byte seed, one keccak per word.
    pub fn expand_seed(seed: &[u8; 32], salt: u64, num_words: u32) -> Vec<RandomWord>{
        (0..num_words)
            .map(|word_idx| {
                let preimage = [seed.as_slice(), &salt.to_le_bytes(), &word_idx.to_le_bytes()].concat();
                as_u256(&env::keccak256_array(&preimage))
            })
            .collect()
    }

    /// The block random seed as a fixed-size array.
    pub fn block_seed() -> [u8; 32]{
        let random_seed = env::random_seed(); // len 32
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&random_seed[..32]);
        seed
    }
}
