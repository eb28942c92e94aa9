//! The escrow contract: instances, custody, transitions, events
//!
//! Models the contract-execution environment: calls are serialized per
//! contract, transitions are strict, and a rejected call is a definitive
//! failure with no funds moved.

use crate::errors::EscrowError;
use crate::events::{
    EscrowCreated, EscrowDeposited, EscrowEvent, EscrowRefunded, EscrowReleased,
};
use crate::instance::{EscrowInstance, EscrowState};
use crate::vault::TokenVault;
use ethers::types::{Address, H256, U256};
use signing::verify::recover_signer;
use signing::{Eip712Domain, OrderCodec};
use std::collections::HashMap;
use types::ids::EscrowId;
use types::order::SigningScheme;

/// Deployed escrow contract holding all instances and custodied funds.
pub struct EscrowContract {
    domain: Eip712Domain,
    instances: HashMap<EscrowId, EscrowInstance>,
    vault: TokenVault,
    /// Emitted events, append-only
    events: Vec<EscrowEvent>,
}

impl EscrowContract {
    pub fn new(domain: Eip712Domain) -> Self {
        Self {
            domain,
            instances: HashMap::new(),
            vault: TokenVault::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Instantiation ─────────────────────────

    /// Create an instance awaiting its deposit.
    ///
    /// `trade_hash` ties the instance to the off-chain-agreed trade it
    /// settles.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        depositor: Address,
        counterparty: Address,
        arbiter: Address,
        asset: Address,
        amount: U256,
        trade_hash: H256,
        now: u64,
    ) -> Result<EscrowId, EscrowError> {
        if amount.is_zero() {
            return Err(EscrowError::InvalidAmount);
        }

        let instance = EscrowInstance::new(
            depositor,
            counterparty,
            arbiter,
            asset,
            amount,
            trade_hash,
            now,
        );
        let instance_id = instance.instance_id;

        self.events.push(EscrowEvent::Created(EscrowCreated {
            instance_id,
            trade_id: trade_hash,
            amount,
            party: depositor,
        }));
        self.instances.insert(instance_id, instance);
        Ok(instance_id)
    }

    /// Credit a party's external balance, modeling a transfer into the
    /// contract's token ledger.
    pub fn fund(&mut self, party: Address, token: Address, amount: U256) -> Result<(), EscrowError> {
        self.vault.credit(party, token, amount)?;
        Ok(())
    }

    // ───────────────────────── Transitions ─────────────────────────

    /// `AwaitingDeposit → AwaitingConfirmation`, by the depositor, for
    /// exactly the configured amount.
    pub fn deposit(
        &mut self,
        instance_id: EscrowId,
        caller: Address,
        amount: U256,
    ) -> Result<&EscrowEvent, EscrowError> {
        let instance = Self::instance_mut(&mut self.instances, instance_id)?;
        Self::ensure_state(instance, EscrowState::AwaitingDeposit)?;
        if caller != instance.depositor {
            return Err(EscrowError::Unauthorized { role: "depositor" });
        }
        if amount != instance.amount {
            return Err(EscrowError::AmountMismatch {
                expected: instance.amount,
                actual: amount,
            });
        }

        self.vault
            .transfer(caller, instance.custody_address(), instance.asset, amount)?;
        instance.state = EscrowState::AwaitingConfirmation;

        self.events.push(EscrowEvent::Deposited(EscrowDeposited {
            instance_id,
            trade_id: instance.trade_hash,
            amount,
            party: caller,
        }));
        Ok(self.events.last().expect("event just pushed"))
    }

    /// `AwaitingConfirmation → Complete`, by the counterparty. Custody
    /// moves to the counterparty.
    pub fn confirm_trade(
        &mut self,
        instance_id: EscrowId,
        caller: Address,
    ) -> Result<&EscrowEvent, EscrowError> {
        let instance = Self::instance_mut(&mut self.instances, instance_id)?;
        Self::ensure_state(instance, EscrowState::AwaitingConfirmation)?;
        if caller != instance.counterparty {
            return Err(EscrowError::Unauthorized {
                role: "counterparty",
            });
        }

        self.vault.transfer(
            instance.custody_address(),
            instance.counterparty,
            instance.asset,
            instance.amount,
        )?;
        instance.state = EscrowState::Complete;

        self.events.push(EscrowEvent::Released(EscrowReleased {
            instance_id,
            trade_id: instance.trade_hash,
            amount: instance.amount,
            party: caller,
        }));
        Ok(self.events.last().expect("event just pushed"))
    }

    /// `AwaitingConfirmation → Complete` on an arbiter-signed
    /// authorization. Custody moves to `to`, which need not be the
    /// counterparty — this is the arbitrated-dispute path.
    pub fn release_with_signature(
        &mut self,
        instance_id: EscrowId,
        to: Address,
        asset: Address,
        amount: U256,
        signature: &str,
    ) -> Result<&EscrowEvent, EscrowError> {
        let instance = Self::instance_mut(&mut self.instances, instance_id)?;
        Self::ensure_state(instance, EscrowState::AwaitingConfirmation)?;
        if asset != instance.asset || amount != instance.amount {
            return Err(EscrowError::AmountMismatch {
                expected: instance.amount,
                actual: amount,
            });
        }

        let digest =
            OrderCodec::release_digest(instance_id.as_word(), to, asset, amount, &self.domain);
        let recovered = recover_signer(digest, signature, SigningScheme::Eip712)?;
        if recovered != instance.arbiter {
            return Err(EscrowError::InvalidSignature);
        }

        self.vault
            .transfer(instance.custody_address(), to, asset, amount)?;
        instance.state = EscrowState::Complete;

        self.events.push(EscrowEvent::Released(EscrowReleased {
            instance_id,
            trade_id: instance.trade_hash,
            amount,
            party: to,
        }));
        Ok(self.events.last().expect("event just pushed"))
    }

    /// `AwaitingConfirmation → Refunded`, by the arbiter. Custody
    /// returns to the depositor.
    pub fn refund(
        &mut self,
        instance_id: EscrowId,
        caller: Address,
    ) -> Result<&EscrowEvent, EscrowError> {
        let instance = Self::instance_mut(&mut self.instances, instance_id)?;
        Self::ensure_state(instance, EscrowState::AwaitingConfirmation)?;
        if caller != instance.arbiter {
            return Err(EscrowError::Unauthorized { role: "arbiter" });
        }

        self.vault.transfer(
            instance.custody_address(),
            instance.depositor,
            instance.asset,
            instance.amount,
        )?;
        instance.state = EscrowState::Refunded;

        self.events.push(EscrowEvent::Refunded(EscrowRefunded {
            instance_id,
            trade_id: instance.trade_hash,
            amount: instance.amount,
            party: instance.depositor,
        }));
        Ok(self.events.last().expect("event just pushed"))
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn instance(&self, instance_id: EscrowId) -> Option<&EscrowInstance> {
        self.instances.get(&instance_id)
    }

    pub fn balance(&self, holder: Address, token: Address) -> U256 {
        self.vault.balance(holder, token)
    }

    /// All emitted events.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    /// Events for one instance.
    pub fn events_for(&self, instance_id: EscrowId) -> Vec<&EscrowEvent> {
        self.events
            .iter()
            .filter(|e| e.instance_id() == instance_id)
            .collect()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EscrowEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Guards ─────────────────────────

    fn instance_mut(
        instances: &mut HashMap<EscrowId, EscrowInstance>,
        instance_id: EscrowId,
    ) -> Result<&mut EscrowInstance, EscrowError> {
        instances
            .get_mut(&instance_id)
            .ok_or(EscrowError::NotFound { instance_id })
    }

    fn ensure_state(
        instance: &EscrowInstance,
        required: EscrowState,
    ) -> Result<(), EscrowError> {
        if instance.state != required {
            return Err(EscrowError::WrongState {
                required,
                actual: instance.state,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::{LocalWallet, Signer};

    fn domain() -> Eip712Domain {
        Eip712Domain::new(1, Address::from([0x0C; 20]))
    }

    fn token() -> Address {
        Address::from([0xEE; 20])
    }

    struct Setup {
        contract: EscrowContract,
        instance_id: EscrowId,
        depositor: Address,
        counterparty: Address,
        arbiter: LocalWallet,
    }

    fn setup() -> Setup {
        let depositor = Address::from([0x0D; 20]);
        let counterparty = Address::from([0x0E; 20]);
        let arbiter = LocalWallet::from_bytes(&[0x0A; 32]).unwrap();

        let mut contract = EscrowContract::new(domain());
        contract
            .fund(depositor, token(), U256::from(500u64))
            .unwrap();
        let instance_id = contract
            .create(
                depositor,
                counterparty,
                arbiter.address(),
                token(),
                U256::from(100u64),
                H256::from([0x77; 32]),
                1_700_000_000,
            )
            .unwrap();

        Setup {
            contract,
            instance_id,
            depositor,
            counterparty,
            arbiter,
        }
    }

    fn deposited() -> Setup {
        let mut s = setup();
        s.contract
            .deposit(s.instance_id, s.depositor, U256::from(100u64))
            .unwrap();
        s
    }

    #[test]
    fn test_create_rejects_zero_amount() {
        let mut contract = EscrowContract::new(domain());
        let result = contract.create(
            Address::from([1; 20]),
            Address::from([2; 20]),
            Address::from([3; 20]),
            token(),
            U256::zero(),
            H256::zero(),
            0,
        );
        assert_eq!(result.unwrap_err(), EscrowError::InvalidAmount);
    }

    #[test]
    fn test_deposit_moves_funds_and_state() {
        let mut s = setup();
        s.contract
            .deposit(s.instance_id, s.depositor, U256::from(100u64))
            .unwrap();

        let instance = s.contract.instance(s.instance_id).unwrap();
        assert_eq!(instance.state, EscrowState::AwaitingConfirmation);
        assert_eq!(
            s.contract.balance(s.depositor, token()),
            U256::from(400u64)
        );
        assert_eq!(
            s.contract.balance(instance.custody_address(), token()),
            U256::from(100u64)
        );
    }

    #[test]
    fn test_deposit_wrong_caller() {
        let mut s = setup();
        let result = s
            .contract
            .deposit(s.instance_id, s.counterparty, U256::from(100u64));
        assert_eq!(
            result.unwrap_err(),
            EscrowError::Unauthorized { role: "depositor" }
        );
    }

    #[test]
    fn test_deposit_amount_mismatch() {
        let mut s = setup();
        let result = s
            .contract
            .deposit(s.instance_id, s.depositor, U256::from(99u64));
        assert!(matches!(
            result.unwrap_err(),
            EscrowError::AmountMismatch { .. }
        ));
        // No state change, no funds moved
        let instance = s.contract.instance(s.instance_id).unwrap();
        assert_eq!(instance.state, EscrowState::AwaitingDeposit);
        assert_eq!(
            s.contract.balance(s.depositor, token()),
            U256::from(500u64)
        );
    }

    #[test]
    fn test_deposit_twice_fails_wrong_state() {
        let mut s = deposited();
        let result = s
            .contract
            .deposit(s.instance_id, s.depositor, U256::from(100u64));
        assert!(matches!(result.unwrap_err(), EscrowError::WrongState { .. }));
    }

    #[test]
    fn test_confirm_pays_counterparty() {
        let mut s = deposited();
        s.contract
            .confirm_trade(s.instance_id, s.counterparty)
            .unwrap();

        let instance = s.contract.instance(s.instance_id).unwrap();
        assert_eq!(instance.state, EscrowState::Complete);
        assert_eq!(
            s.contract.balance(s.counterparty, token()),
            U256::from(100u64)
        );
        assert!(s
            .contract
            .balance(instance.custody_address(), token())
            .is_zero());
    }

    #[test]
    fn test_confirm_before_deposit_fails() {
        let mut s = setup();
        let result = s.contract.confirm_trade(s.instance_id, s.counterparty);
        assert!(matches!(result.unwrap_err(), EscrowError::WrongState { .. }));
    }

    #[test]
    fn test_release_with_arbiter_signature() {
        let mut s = deposited();
        let recipient = Address::from([0x99; 20]);

        let digest = OrderCodec::release_digest(
            s.instance_id.as_word(),
            recipient,
            token(),
            U256::from(100u64),
            &domain(),
        );
        let signature = format!("0x{}", s.arbiter.sign_hash(digest).unwrap());

        s.contract
            .release_with_signature(
                s.instance_id,
                recipient,
                token(),
                U256::from(100u64),
                &signature,
            )
            .unwrap();

        assert_eq!(
            s.contract.instance(s.instance_id).unwrap().state,
            EscrowState::Complete
        );
        assert_eq!(s.contract.balance(recipient, token()), U256::from(100u64));
    }

    #[test]
    fn test_release_rejects_non_arbiter_signature() {
        let mut s = deposited();
        let recipient = Address::from([0x99; 20]);
        let impostor = LocalWallet::from_bytes(&[0x66; 32]).unwrap();

        let digest = OrderCodec::release_digest(
            s.instance_id.as_word(),
            recipient,
            token(),
            U256::from(100u64),
            &domain(),
        );
        let signature = format!("0x{}", impostor.sign_hash(digest).unwrap());

        let result = s.contract.release_with_signature(
            s.instance_id,
            recipient,
            token(),
            U256::from(100u64),
            &signature,
        );
        assert_eq!(result.unwrap_err(), EscrowError::InvalidSignature);
    }

    #[test]
    fn test_release_signature_bound_to_recipient() {
        let mut s = deposited();
        let recipient = Address::from([0x99; 20]);
        let hijacker = Address::from([0x98; 20]);

        let digest = OrderCodec::release_digest(
            s.instance_id.as_word(),
            recipient,
            token(),
            U256::from(100u64),
            &domain(),
        );
        let signature = format!("0x{}", s.arbiter.sign_hash(digest).unwrap());

        // Replaying the signature with another recipient fails
        let result = s.contract.release_with_signature(
            s.instance_id,
            hijacker,
            token(),
            U256::from(100u64),
            &signature,
        );
        assert_eq!(result.unwrap_err(), EscrowError::InvalidSignature);
    }

    #[test]
    fn test_refund_by_arbiter() {
        let mut s = deposited();
        s.contract
            .refund(s.instance_id, s.arbiter.address())
            .unwrap();

        let instance = s.contract.instance(s.instance_id).unwrap();
        assert_eq!(instance.state, EscrowState::Refunded);
        assert_eq!(
            s.contract.balance(s.depositor, token()),
            U256::from(500u64),
            "depositor made whole"
        );
    }

    #[test]
    fn test_refund_by_non_arbiter_fails() {
        let mut s = deposited();
        let result = s.contract.refund(s.instance_id, s.depositor);
        assert_eq!(
            result.unwrap_err(),
            EscrowError::Unauthorized { role: "arbiter" }
        );
    }

    #[test]
    fn test_at_most_one_terminal_transition() {
        // confirm, then refund must fail with WrongState
        let mut s = deposited();
        s.contract
            .confirm_trade(s.instance_id, s.counterparty)
            .unwrap();
        let result = s.contract.refund(s.instance_id, s.arbiter.address());
        assert!(matches!(result.unwrap_err(), EscrowError::WrongState { .. }));

        // refund, then confirm must fail with WrongState
        let mut s = deposited();
        s.contract.refund(s.instance_id, s.arbiter.address()).unwrap();
        let result = s.contract.confirm_trade(s.instance_id, s.counterparty);
        assert!(matches!(result.unwrap_err(), EscrowError::WrongState { .. }));
    }

    #[test]
    fn test_events_carry_trade_linkage() {
        let mut s = deposited();
        s.contract
            .confirm_trade(s.instance_id, s.counterparty)
            .unwrap();

        let events = s.contract.events_for(s.instance_id);
        let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["EscrowCreated", "EscrowDeposited", "EscrowReleased"]
        );
        for event in events {
            match event {
                EscrowEvent::Created(e) => assert_eq!(e.trade_id, H256::from([0x77; 32])),
                EscrowEvent::Deposited(e) => assert_eq!(e.trade_id, H256::from([0x77; 32])),
                EscrowEvent::Released(e) => assert_eq!(e.trade_id, H256::from([0x77; 32])),
                EscrowEvent::Refunded(e) => assert_eq!(e.trade_id, H256::from([0x77; 32])),
            }
        }
    }

    #[test]
    fn test_unknown_instance() {
        let mut s = setup();
        let ghost = EscrowId::new();
        let result = s.contract.deposit(ghost, s.depositor, U256::from(1u64));
        assert!(matches!(result.unwrap_err(), EscrowError::NotFound { .. }));
    }
}
