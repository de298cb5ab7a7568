use common::types::RandomWord;
use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::{LookupMap, Vector};
use near_sdk::{AccountId, Balance, IntoStorageKey};

use crate::utils::reduce_to_index;

/// Participants of the current round and the value they escrowed.
///
/// An account is a member exactly when it has a slot in `positions`, and
/// that slot always points at its entry in `participants`. Deposits are
/// only ever recorded for members, so `pot` is the sum of member deposits.
#[derive(BorshDeserialize, BorshSerialize)]
pub struct RoundLedger {
    participants: Vector<AccountId>,
    positions: LookupMap<AccountId, u64>,
    deposits: LookupMap<AccountId, Balance>,
    pot: Balance,
}

impl RoundLedger {
    pub fn new<S: IntoStorageKey>(prefix: S) -> Self {
        let prefix = prefix.into_storage_key();
        Self {
            participants: Vector::new([prefix.as_slice(), b"p"].concat()),
            positions: LookupMap::new([prefix.as_slice(), b"i"].concat()),
            deposits: LookupMap::new([prefix.as_slice(), b"d"].concat()),
            pot: 0,
        }
    }

    pub fn pot(&self) -> Balance {
        self.pot
    }

    pub fn len(&self) -> u64 {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn contains(&self, account_id: &AccountId) -> bool {
        self.positions.contains_key(account_id)
    }

    pub fn deposit_of(&self, account_id: &AccountId) -> Balance {
        self.deposits.get(account_id).unwrap_or_default()
    }

    pub fn participant(&self, index: u64) -> Option<AccountId> {
        self.participants.get(index)
    }

    pub fn participants(&self, from_index: u64, limit: u64) -> Vec<AccountId> {
        (from_index..self.participants.len())
            .take(limit as usize)
            .filter_map(|idx| self.participants.get(idx))
            .collect()
    }

    /// Registers a new member with its deposit. Callers check membership first.
    pub fn record_entry(&mut self, account_id: &AccountId, amount: Balance) {
        assert!(!self.contains(account_id), "account is already registered");

        self.positions.insert(account_id, &self.participants.len());
        self.participants.push(account_id);
        self.deposits.insert(account_id, &amount);
        self.pot += amount;
    }

    /// The member at `word mod len`, or `None` for an empty registry.
    pub fn winner_for(&self, word: &RandomWord) -> Option<AccountId> {
        if self.is_empty() {
            return None;
        }
        self.participants.get(reduce_to_index(word, self.participants.len()))
    }

    /// Unregisters `account_id` and returns the deposit it held, zero if
    /// it was not a member. Registry order is not preserved.
    pub fn withdraw(&mut self, account_id: &AccountId) -> Balance {
        let position = match self.positions.remove(account_id) {
            Some(position) => position,
            None => return 0,
        };

        self.participants.swap_remove(position);
        if let Some(moved) = self.participants.get(position) {
            self.positions.insert(&moved, &position);
        }

        let amount = self.deposits.remove(account_id).unwrap_or_default();
        self.pot -= amount;
        amount
    }

    /// Re-registers an account whose withdrawal could not be paid out.
    pub fn restore(&mut self, account_id: &AccountId, amount: Balance) {
        self.record_entry(account_id, amount);
    }

    /// Empties the registry, every deposit and the pot. Costs three
    /// storage removals per participant.
    pub fn reset(&mut self) {
        while let Some(account_id) = self.participants.pop() {
            self.positions.remove(&account_id);
            self.deposits.remove(&account_id);
        }
        self.pot = 0;
    }
}
