pub mod automation {
    /// Poll/act pair driven by an external scheduler.
    pub trait AutomationCompatible {
        /// Whether a drawing should start now. Never mutates state; the
        /// `check_data` is handed back unchanged.
        fn check_upkeep(&self, check_data: String) -> (bool, String);
        fn perform_upkeep(&mut self, perform_data: String);
    }
}

pub mod randomness {
    use common::types::RandomWord;
    use near_sdk::json_types::U64;
    use near_sdk::Promise;

    pub trait RandomnessConsumer {
        fn fulfill_random_words(&mut self, request_id: U64, random_words: Vec<RandomWord>) -> Promise;
    }
}
