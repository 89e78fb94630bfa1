//! In-memory host.
//!
//! [`MemoryHost`] implements every capability the protocol needs without a
//! real chain:
//!
//! - **Fungible tokens** with balances, allowances and EIP-2612 permits
//! - **Multi-tokens** (id-addressed balances) moved through the data-driven
//!   transfer path; the transfer data is the 32-byte token id
//! - **Read-only contracts** registered as closures, plus `balanceOf` /
//!   `allowance` on every token
//! - **Callback receivers** that may re-enter the protocol
//! - **Contract wallets** that accept signatures from an owner key (ERC-1271)
//! - **Snapshots** so failed fills leave balances untouched
//!
//! Every static call is counted, which lets tests observe predicate
//! short-circuiting.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::{Eip712Domain, SolInterface, SolStruct};

use crate::abi::{self, IERC20::IERC20Calls};
use crate::auth::recover_signer;
use crate::engine::LimitOrderProtocol;
use crate::error::{CallError, HostError, PermitError, TransferError};
use crate::host::{AssetTransfer, ChainView, FillNotice, Host, PermitExecutor, Transfer};
use crate::types::Permit;

/// Read-only contract: call data in, return data out.
pub type ContractFn = Box<dyn Fn(&[u8]) -> Result<Bytes, CallError>>;

/// Post-fill callback receiver.
pub type ReceiverFn =
    Box<dyn FnMut(&mut LimitOrderProtocol, &mut MemoryHost, &FillNotice) -> Result<(), HostError>>;

/// Token flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Balance per holder; standard transfer path
    Fungible,
    /// Balance per (id, holder); data-driven transfer path
    MultiToken,
}

#[derive(Debug, Clone)]
struct Token {
    name: String,
    kind: TokenKind,
}

/// Everything a snapshot captures.
#[derive(Debug, Clone, Default)]
struct Books {
    tokens: BTreeMap<Address, Token>,
    balances: HashMap<(Address, Address), U256>,
    item_balances: HashMap<(Address, U256, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
    operators: HashSet<(Address, Address, Address)>,
    permit_nonces: HashMap<(Address, Address), U256>,
    used_permits: HashSet<B256>,
    notices: Vec<(Address, FillNotice)>,
}

/// In-memory implementation of [`Host`].
pub struct MemoryHost {
    chain_id: u64,
    timestamp: u64,
    books: Books,
    snapshots: Vec<Books>,
    contracts: HashMap<Address, ContractFn>,
    receivers: HashMap<Address, ReceiverFn>,
    wallets: HashMap<Address, Address>,
    static_calls: Cell<usize>,
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("chain_id", &self.chain_id)
            .field("timestamp", &self.timestamp)
            .field("tokens", &self.books.tokens.len())
            .field("snapshots", &self.snapshots.len())
            .field("contracts", &self.contracts.len())
            .field("receivers", &self.receivers.len())
            .finish()
    }
}

impl MemoryHost {
    pub fn new(chain_id: u64, timestamp: u64) -> Self {
        Self {
            chain_id,
            timestamp,
            books: Books::default(),
            snapshots: Vec::new(),
            contracts: HashMap::new(),
            receivers: HashMap::new(),
            wallets: HashMap::new(),
            static_calls: Cell::new(0),
        }
    }

    // ========================================================================
    // Environment
    // ========================================================================

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Number of static calls served so far.
    pub fn static_call_count(&self) -> usize {
        self.static_calls.get()
    }

    pub fn reset_static_call_count(&self) {
        self.static_calls.set(0);
    }

    pub fn register_contract(
        &mut self,
        address: Address,
        contract: impl Fn(&[u8]) -> Result<Bytes, CallError> + 'static,
    ) {
        self.contracts.insert(address, Box::new(contract));
    }

    pub fn register_receiver(
        &mut self,
        address: Address,
        receiver: impl FnMut(&mut LimitOrderProtocol, &mut MemoryHost, &FillNotice) -> Result<(), HostError>
            + 'static,
    ) {
        self.receivers.insert(address, Box::new(receiver));
    }

    /// Make `wallet` accept signatures produced by `owner`.
    pub fn register_wallet(&mut self, wallet: Address, owner: Address) {
        self.wallets.insert(wallet, owner);
    }

    /// Callbacks delivered so far, oldest first.
    pub fn notices(&self) -> &[(Address, FillNotice)] {
        &self.books.notices
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    pub fn deploy_token(&mut self, asset: Address, name: impl Into<String>) {
        self.deploy(asset, name.into(), TokenKind::Fungible);
    }

    pub fn deploy_multi_token(&mut self, asset: Address, name: impl Into<String>) {
        self.deploy(asset, name.into(), TokenKind::MultiToken);
    }

    fn deploy(&mut self, asset: Address, name: String, kind: TokenKind) {
        self.books.tokens.insert(asset, Token { name, kind });
    }

    pub fn mint(&mut self, asset: Address, holder: Address, amount: U256) {
        let balance = self.books.balances.entry((asset, holder)).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn mint_item(&mut self, asset: Address, id: U256, holder: Address, amount: U256) {
        let balance = self.books.item_balances.entry((asset, id, holder)).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: U256) {
        self.books.allowances.insert((asset, owner, spender), amount);
    }

    pub fn set_approval_for_all(&mut self, asset: Address, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.books.operators.insert((asset, owner, operator));
        } else {
            self.books.operators.remove(&(asset, owner, operator));
        }
    }

    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.books.balances.get(&(asset, holder)).copied().unwrap_or_default()
    }

    pub fn item_balance_of(&self, asset: Address, id: U256, holder: Address) -> U256 {
        self.books
            .item_balances
            .get(&(asset, id, holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.books
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn permit_nonce(&self, asset: Address, owner: Address) -> U256 {
        self.books
            .permit_nonces
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    // ========================================================================
    // Permits
    // ========================================================================

    fn permit_domain(&self, asset: Address) -> Result<Eip712Domain, PermitError> {
        let token = self
            .books
            .tokens
            .get(&asset)
            .filter(|token| token.kind == TokenKind::Fungible)
            .ok_or(PermitError::Unsupported(asset))?;
        Ok(Eip712Domain::new(
            Some(token.name.clone().into()),
            Some("1".into()),
            Some(U256::from(self.chain_id)),
            Some(asset),
            None,
        ))
    }

    /// EIP-2612 digest for the owner's next permit on `asset`.
    pub fn permit_digest(
        &self,
        asset: Address,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: u64,
    ) -> Result<B256, PermitError> {
        let domain = self.permit_domain(asset)?;
        let message = abi::Permit {
            owner,
            spender,
            value,
            nonce: self.permit_nonce(asset, owner),
            deadline: U256::from(deadline),
        };
        Ok(message.eip712_signing_hash(&domain))
    }

    /// Build and sign the owner's next permit on `asset`.
    pub fn sign_permit(
        &self,
        signer: &PrivateKeySigner,
        asset: Address,
        spender: Address,
        value: U256,
        deadline: u64,
    ) -> Result<Permit, PermitError> {
        let owner = signer.address();
        let digest = self.permit_digest(asset, owner, spender, value, deadline)?;
        let signature = signer
            .sign_hash_sync(&digest)
            .map_err(|_| PermitError::InvalidSignature)?;
        Ok(Permit {
            owner,
            spender,
            value,
            deadline,
            signature: Bytes::copy_from_slice(&signature.as_bytes()),
        })
    }

    // ========================================================================
    // Transfer paths
    // ========================================================================

    fn transfer_fungible(&mut self, transfer: &Transfer<'_>) -> Result<(), TransferError> {
        let key = (transfer.asset, transfer.from, transfer.operator);
        let allowance = self.books.allowances.get(&key).copied().unwrap_or_default();
        if allowance < transfer.amount {
            return Err(TransferError::InsufficientAllowance);
        }
        let from_balance = self.balance_of(transfer.asset, transfer.from);
        if from_balance < transfer.amount {
            return Err(TransferError::InsufficientBalance);
        }

        if allowance != U256::MAX {
            self.books.allowances.insert(key, allowance - transfer.amount);
        }
        self.books
            .balances
            .insert((transfer.asset, transfer.from), from_balance - transfer.amount);
        let to_balance = self.books.balances.entry((transfer.asset, transfer.to)).or_default();
        *to_balance = to_balance.saturating_add(transfer.amount);
        Ok(())
    }

    fn transfer_item(&mut self, transfer: &Transfer<'_>) -> Result<(), TransferError> {
        let id_bytes: [u8; 32] = transfer
            .data
            .try_into()
            .map_err(|_| TransferError::MalformedData)?;
        let id = U256::from_be_bytes(id_bytes);

        if !self
            .books
            .operators
            .contains(&(transfer.asset, transfer.from, transfer.operator))
        {
            return Err(TransferError::InsufficientAllowance);
        }
        let from_balance = self.item_balance_of(transfer.asset, id, transfer.from);
        if from_balance < transfer.amount {
            return Err(TransferError::InsufficientBalance);
        }

        self.books
            .item_balances
            .insert((transfer.asset, id, transfer.from), from_balance - transfer.amount);
        let to_balance = self
            .books
            .item_balances
            .entry((transfer.asset, id, transfer.to))
            .or_default();
        *to_balance = to_balance.saturating_add(transfer.amount);
        Ok(())
    }

    fn token_call(&self, asset: Address, data: &[u8]) -> Result<Bytes, CallError> {
        let call = IERC20Calls::abi_decode(data).map_err(|_| CallError::Reverted(Bytes::new()))?;
        let word = match call {
            IERC20Calls::balanceOf(call) => self.balance_of(asset, call.account),
            IERC20Calls::allowance(call) => self.allowance(asset, call.owner, call.spender),
        };
        Ok(Bytes::copy_from_slice(&word.to_be_bytes::<32>()))
    }
}

// ============================================================================
// Capability impls
// ============================================================================

impl ChainView for MemoryHost {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn static_call(&self, target: Address, data: &[u8]) -> Result<Bytes, CallError> {
        self.static_calls.set(self.static_calls.get() + 1);
        if self.books.tokens.contains_key(&target) {
            return self.token_call(target, data);
        }
        match self.contracts.get(&target) {
            Some(contract) => contract(data),
            None => Err(CallError::NoContract(target)),
        }
    }
}

impl AssetTransfer for MemoryHost {
    fn transfer(&mut self, transfer: &Transfer<'_>) -> Result<(), TransferError> {
        let kind = self
            .books
            .tokens
            .get(&transfer.asset)
            .map(|token| token.kind)
            .ok_or(TransferError::UnknownAsset(transfer.asset))?;

        match (kind, transfer.is_standard()) {
            (TokenKind::Fungible, true) => self.transfer_fungible(transfer),
            (TokenKind::MultiToken, false) => self.transfer_item(transfer),
            _ => Err(TransferError::MalformedData),
        }
    }
}

impl PermitExecutor for MemoryHost {
    fn permit(&mut self, asset: Address, permit: &Permit) -> Result<(), PermitError> {
        let domain = self.permit_domain(asset)?;

        if self.timestamp > permit.deadline {
            return Err(PermitError::Expired);
        }

        let signature_id = keccak256(&permit.signature);
        if self.books.used_permits.contains(&signature_id) {
            return Err(PermitError::AlreadyUsed);
        }

        let nonce = self.permit_nonce(asset, permit.owner);
        let message = abi::Permit {
            owner: permit.owner,
            spender: permit.spender,
            value: permit.value,
            nonce,
            deadline: U256::from(permit.deadline),
        };
        let digest = message.eip712_signing_hash(&domain);
        if recover_signer(&digest, &permit.signature) != Some(permit.owner) {
            return Err(PermitError::InvalidSignature);
        }

        self.books.used_permits.insert(signature_id);
        self.books
            .permit_nonces
            .insert((asset, permit.owner), nonce + U256::from(1));
        self.books
            .allowances
            .insert((asset, permit.owner, permit.spender), permit.value);
        Ok(())
    }
}

impl Host for MemoryHost {
    fn snapshot(&mut self) -> usize {
        self.snapshots.push(self.books.clone());
        self.snapshots.len() - 1
    }

    fn revert_to(&mut self, id: usize) {
        if id >= self.snapshots.len() {
            return;
        }
        self.snapshots.truncate(id + 1);
        if let Some(books) = self.snapshots.pop() {
            self.books = books;
        }
    }

    fn release(&mut self, id: usize) {
        self.snapshots.truncate(id);
    }

    fn notify_fill(
        &mut self,
        protocol: &mut LimitOrderProtocol,
        target: Address,
        notice: &FillNotice,
    ) -> Result<(), HostError> {
        self.books.notices.push((target, notice.clone()));

        let Some(mut receiver) = self.receivers.remove(&target) else {
            return Ok(());
        };
        let result = receiver(protocol, self, notice);
        self.receivers.entry(target).or_insert(receiver);
        result
    }

    fn is_valid_signature(&self, signer: Address, hash: B256, signature: &[u8]) -> bool {
        match self.wallets.get(&signer) {
            Some(owner) => recover_signer(&hash, signature) == Some(*owner),
            None => false,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
