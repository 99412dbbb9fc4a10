//! Escrow account ledger.
//!
//! Tracks, per identity, a withdrawable balance and the amount
//! currently locked into active games. Balances are `u64`, so
//! non-negativity holds by construction; every debit and credit is
//! checked before it is applied, which keeps failed operations free
//! of partial mutation even at the integer boundaries.

use crate::error::WagerError;
use crate::types::PlayerId;
use std::collections::HashMap;

const OVERFLOW: WagerError = WagerError::InvariantViolation("ledger amount overflows");

#[derive(Clone, Copy, Debug, Default)]
struct Account {
    available: u64,
    locked: u64,
}

/// Per-identity fund table.
///
/// `locked` is a sum across all games the identity participates in,
/// so concurrent games for the same player lock and unlock their own
/// shares independently.
#[derive(Debug, Default)]
pub struct AccountLedger {
    accounts: HashMap<PlayerId, Account>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the identity's available balance. Fails only when the
    /// credit would push the balance past the integer range.
    pub fn deposit(&mut self, id: PlayerId, amount: u64) -> Result<(), WagerError> {
        let account = self.accounts.entry(id).or_default();
        account.available = account.available.checked_add(amount).ok_or(OVERFLOW)?;
        Ok(())
    }

    /// Move `amount` from available into locked.
    pub fn lock(&mut self, id: PlayerId, amount: u64) -> Result<(), WagerError> {
        let account = self.accounts.entry(id).or_default();
        if account.available < amount {
            return Err(WagerError::InsufficientFunds);
        }
        account.locked = account.locked.checked_add(amount).ok_or(OVERFLOW)?;
        account.available -= amount;
        Ok(())
    }

    /// Move `amount` from locked back into available.
    ///
    /// Callers only unlock what they previously locked, so a shortfall
    /// here is a bug, not user error.
    pub fn unlock(&mut self, id: PlayerId, amount: u64) -> Result<(), WagerError> {
        let account = self.accounts.entry(id).or_default();
        if account.locked < amount {
            return Err(WagerError::InvariantViolation("unlock exceeds locked funds"));
        }
        account.available = account.available.checked_add(amount).ok_or(OVERFLOW)?;
        account.locked -= amount;
        Ok(())
    }

    /// Settle a decided game: both stakes leave locked, the winner's
    /// available balance is credited with the full pot. Net effect:
    /// winner gains `bet_amount`, loser loses `bet_amount`.
    pub fn payout(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
        bet_amount: u64,
    ) -> Result<(), WagerError> {
        // Every check, including the pot arithmetic, runs before
        // either side is touched, so a failure leaves no partial
        // mutation.
        self.check_locked(winner, bet_amount)?;
        self.check_locked(loser, bet_amount)?;
        let pot = bet_amount.checked_mul(2).ok_or(OVERFLOW)?;
        let credited = self
            .balance_of(winner)
            .checked_add(pot)
            .ok_or(OVERFLOW)?;

        self.debit_locked(winner, bet_amount);
        self.debit_locked(loser, bet_amount);
        self.accounts.entry(winner).or_default().available = credited;
        Ok(())
    }

    /// Settle a tied game: each side's stake returns to their own
    /// available balance, no net transfer.
    pub fn tie(
        &mut self,
        player1: PlayerId,
        player2: PlayerId,
        bet_amount: u64,
    ) -> Result<(), WagerError> {
        self.check_locked(player1, bet_amount)?;
        self.check_locked(player2, bet_amount)?;
        self.check_credit(player1, bet_amount)?;
        self.check_credit(player2, bet_amount)?;
        self.unlock(player1, bet_amount)?;
        self.unlock(player2, bet_amount)?;
        Ok(())
    }

    /// Debit the identity's available balance. Returns the debited
    /// amount so the substrate can signal the external transfer
    /// collaborator.
    pub fn withdraw(&mut self, id: PlayerId, amount: u64) -> Result<u64, WagerError> {
        let account = self.accounts.entry(id).or_default();
        if amount == 0 || amount > account.available {
            return Err(WagerError::InsufficientFunds);
        }
        account.available -= amount;
        Ok(amount)
    }

    /// Withdrawable balance; funds staked in active games live in
    /// `locked` and are excluded by construction.
    pub fn balance_of(&self, id: PlayerId) -> u64 {
        self.accounts.get(&id).map(|a| a.available).unwrap_or(0)
    }

    /// Total currently locked into active games.
    pub fn locked_amount(&self, id: PlayerId) -> u64 {
        self.accounts.get(&id).map(|a| a.locked).unwrap_or(0)
    }

    /// Sum of available + locked over all identities. Changes only by
    /// the net of deposits minus withdrawals.
    pub fn total_funds(&self) -> u64 {
        self.accounts
            .values()
            .map(|a| a.available + a.locked)
            .sum()
    }

    fn check_locked(&self, id: PlayerId, amount: u64) -> Result<(), WagerError> {
        if self.locked_amount(id) < amount {
            return Err(WagerError::InvariantViolation("settlement exceeds locked funds"));
        }
        Ok(())
    }

    fn check_credit(&self, id: PlayerId, amount: u64) -> Result<(), WagerError> {
        self.balance_of(id).checked_add(amount).ok_or(OVERFLOW)?;
        Ok(())
    }

    fn debit_locked(&mut self, id: PlayerId, amount: u64) {
        let account = self.accounts.entry(id).or_default();
        account.locked = account.locked.saturating_sub(amount);
    }
}
