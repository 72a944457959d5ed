//! Core types and data structures for the token system

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Token amounts and native-currency amounts (smallest unit, e.g. wei)
pub type Amount = u128;

/// Fixed-size account identity (20 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    const LEN: usize = 20;

    /// Build an address with every byte set to `byte`
    pub const fn repeat_byte(byte: u8) -> Self {
        Address([byte; 20])
    }

    /// Generate a fresh, unique address for a newly created instance
    ///
    /// The last 16 bytes come from a random v4 UUID; the first 4 bytes are
    /// left zero.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 20];
        bytes[4..].copy_from_slice(Uuid::new_v4().as_bytes());
        Address(bytes)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TokenError::Validation(format!(
                "Address contains non-hex characters: '{}'",
                s
            )));
        }

        if digits.len() != Self::LEN * 2 {
            return Err(TokenError::Validation(format!(
                "Address must be {} hex digits, got {}",
                Self::LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; Self::LEN];
        for (byte, pair) in bytes.iter_mut().zip(digits.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).unwrap_or_default();
            *byte = u8::from_str_radix(pair, 16).map_err(|_| {
                TokenError::Validation(format!("Invalid hex in address: '{}'", pair))
            })?;
        }

        Ok(Address(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Descriptive token metadata, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Human-readable token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Version string of the token standard
    pub standard: String,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Dapp Token".to_string(),
            symbol: "DAPP".to_string(),
            standard: "Dapp Token v1.0".to_string(),
        }
    }
}

/// Events emitted by successful state transitions
///
/// Serialized externally tagged by event name, e.g.
/// `{"Transfer":{"from":"0x..","to":"0x..","value":10}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Tokens moved between two accounts
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    /// An owner set a spender's allowance
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
    /// Tokens were sold to a buyer through the sale
    Sell { buyer: Address, amount: Amount },
}

impl Event {
    /// Name of the event, as a caller would see it in logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Transfer { .. } => "Transfer",
            Event::Approval { .. } => "Approval",
            Event::Sell { .. } => "Sell",
        }
    }
}

/// One entry in an instance's event journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Call that produced the event
    pub tx_id: Uuid,
    pub event: Event,
    pub recorded_at: NaiveDateTime,
}

/// Outcome of a successful mutating call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier of the call
    pub tx_id: Uuid,
    /// Success indicator returned by the operation
    pub success: bool,
    /// Events emitted by the called instance, in order
    pub logs: Vec<Event>,
}

impl Receipt {
    pub(crate) fn new(tx_id: Uuid, logs: Vec<Event>) -> Self {
        Self {
            tx_id,
            success: true,
            logs,
        }
    }
}

/// Fieldless classification of rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InsufficientBalance,
    InsufficientAllowance,
    InvalidPayment,
    InsufficientInventory,
    Unauthorized,
    SaleClosed,
    Validation,
    Config,
}

/// Errors that can occur in the token system
///
/// Every variant is a rejected state transition: nothing was changed and no
/// event was emitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Insufficient balance: {account} holds {balance}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: Amount,
        needed: Amount,
    },
    #[error("Insufficient allowance: {spender} may move {allowance} from {owner}, needs {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowance: Amount,
        needed: Amount,
    },
    #[error("Invalid payment: {units} units at {unit_price} each, received {received}")]
    InvalidPayment {
        units: Amount,
        unit_price: Amount,
        received: Amount,
    },
    #[error("Insufficient inventory: {available} available, {requested} requested")]
    InsufficientInventory { available: Amount, requested: Amount },
    #[error("Unauthorized caller: {caller}")]
    Unauthorized { caller: Address },
    #[error("Sale is closed")]
    SaleClosed,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TokenError {
    /// Classify the error without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            TokenError::InsufficientAllowance { .. } => ErrorKind::InsufficientAllowance,
            TokenError::InvalidPayment { .. } => ErrorKind::InvalidPayment,
            TokenError::InsufficientInventory { .. } => ErrorKind::InsufficientInventory,
            TokenError::Unauthorized { .. } => ErrorKind::Unauthorized,
            TokenError::SaleClosed => ErrorKind::SaleClosed,
            TokenError::Validation(_) => ErrorKind::Validation,
            TokenError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(err: serde_json::Error) -> Self {
        TokenError::Config(err.to_string())
    }
}

/// Result type for token operations
pub type TokenResult<T> = Result<T, TokenError>;
