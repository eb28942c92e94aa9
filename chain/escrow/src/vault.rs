//! Token vault — overflow-checked custody balances
//!
//! Balances are `holder -> (token -> amount)`. Every mutation is
//! checked; a failed debit or credit changes nothing.

use crate::errors::VaultError;
use ethers::types::{Address, U256};
use std::collections::HashMap;

/// Per-(holder, token) balance book backing the escrow contract.
#[derive(Debug, Default)]
pub struct TokenVault {
    balances: HashMap<Address, HashMap<Address, U256>>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` in `token`.
    pub fn balance(&self, holder: Address, token: Address) -> U256 {
        self.balances
            .get(&holder)
            .and_then(|tokens| tokens.get(&token))
            .copied()
            .unwrap_or_default()
    }

    /// Add `amount` to a holder's balance, rejecting overflow.
    pub fn credit(
        &mut self,
        holder: Address,
        token: Address,
        amount: U256,
    ) -> Result<(), VaultError> {
        let balance = self
            .balances
            .entry(holder)
            .or_default()
            .entry(token)
            .or_insert_with(U256::zero);
        *balance = balance.checked_add(amount).ok_or(VaultError::Overflow)?;
        Ok(())
    }

    /// Subtract `amount` from a holder's balance.
    pub fn debit(
        &mut self,
        holder: Address,
        token: Address,
        amount: U256,
    ) -> Result<(), VaultError> {
        let available = self.balance(holder, token);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        // Checked above; entry must exist for a nonzero balance
        if let Some(balance) = self
            .balances
            .get_mut(&holder)
            .and_then(|tokens| tokens.get_mut(&token))
        {
            *balance = available - amount;
        } else if !amount.is_zero() {
            return Err(VaultError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        Ok(())
    }

    /// Move `amount` of `token` from one holder to another.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        token: Address,
        amount: U256,
    ) -> Result<(), VaultError> {
        self.debit(from, token, amount)?;
        self.credit(to, token, amount)
    }
}
