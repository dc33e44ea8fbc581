//! Energy ledger port and an in-memory adapter
//!
//! The battle core only ever reads a Guardian's spendable balance. How the
//! balance is earned (steps) and persisted is somebody else's problem.

use std::sync::RwLock;

use ahash::AHashMap;

use crate::core::types::GuardianId;

/// Source of a Guardian's current spendable energy
#[cfg_attr(test, mockall::automock)]
pub trait EnergyLedger: Send + Sync {
    /// Earned minus spent, floored at zero
    fn current_energy_balance(&self, guardian_id: GuardianId) -> u32;
}

/// Thread-safe balance table for simulations and tests
///
/// Unknown Guardians have a balance of 0.
#[derive(Debug, Default)]
pub struct InMemoryEnergyLedger {
    balances: RwLock<AHashMap<GuardianId, u32>>,
}

impl InMemoryEnergyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(balances: impl IntoIterator<Item = (GuardianId, u32)>) -> Self {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    pub fn set_balance(&self, guardian_id: GuardianId, amount: u32) {
        let mut balances = self.balances.write().unwrap_or_else(|e| e.into_inner());
        balances.insert(guardian_id, amount);
    }

    /// Add earned energy, saturating at `u32::MAX`
    pub fn credit(&self, guardian_id: GuardianId, amount: u32) -> u32 {
        let mut balances = self.balances.write().unwrap_or_else(|e| e.into_inner());
        let balance = balances.entry(guardian_id).or_insert(0);
        *balance = balance.saturating_add(amount);
        *balance
    }

    /// Deduct spent energy; the balance never goes below zero
    pub fn spend(&self, guardian_id: GuardianId, amount: u32) -> u32 {
        let mut balances = self.balances.write().unwrap_or_else(|e| e.into_inner());
        let balance = balances.entry(guardian_id).or_insert(0);
        *balance = balance.saturating_sub(amount);
        *balance
    }
}

impl EnergyLedger for InMemoryEnergyLedger {
    fn current_energy_balance(&self, guardian_id: GuardianId) -> u32 {
        let balances = self.balances.read().unwrap_or_else(|e| e.into_inner());
        balances.get(&guardian_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_guardian_has_no_energy() {
        let ledger = InMemoryEnergyLedger::new();
        assert_eq!(ledger.current_energy_balance(GuardianId::new()), 0);
    }

    #[test]
    fn test_credit_and_spend() {
        let guardian = GuardianId::new();
        let ledger = InMemoryEnergyLedger::with_balances([(guardian, 40)]);
        assert_eq!(ledger.credit(guardian, 10), 50);
        assert_eq!(ledger.spend(guardian, 15), 35);
        assert_eq!(ledger.current_energy_balance(guardian), 35);
    }

    #[test]
    fn test_spend_floors_at_zero() {
        let guardian = GuardianId::new();
        let ledger = InMemoryEnergyLedger::new();
        ledger.set_balance(guardian, 5);
        assert_eq!(ledger.spend(guardian, 20), 0);
    }

    #[test]
    fn test_ledger_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryEnergyLedger>();
    }
}
