//! Hex codec for the JSON-RPC wire primitives.
//!
//! Every numeric or binary field on the wire is a `0x`-prefixed hex string.
//! Four shapes exist:
//!
//! | Type         | Wire form                                   |
//! |--------------|---------------------------------------------|
//! | [`Quantity`] | minimal digits, `0x0` for zero              |
//! | [`Bytes`]    | even digit count, leading zeros preserved   |
//! | [`Address`]  | exactly 20 bytes                            |
//! | [`H256`]     | exactly 32 bytes                            |
//!
//! `Address` and `H256` wrap `alloy_primitives::{Address, B256}` and convert
//! to and from them freely; only the hex form is owned here.
//!
//! Encoding always emits lower-case digits; decoding accepts either case.
//! Every decode failure is a [`MalformedValue`] naming the raw input and the
//! kind it was decoded as.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The wire kind a hex string was expected to decode as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Quantity,
    Bytes,
    Address,
    Hash,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quantity => write!(f, "quantity"),
            Self::Bytes => write!(f, "bytes"),
            Self::Address => write!(f, "address"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

/// A value that could not be decoded as (or encoded to) its wire kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} value {raw:?}: {reason}")]
pub struct MalformedValue {
    /// The offending input, verbatim.
    pub raw: String,
    /// What the input was decoded as.
    pub kind: ValueKind,
    pub reason: String,
}

impl MalformedValue {
    pub fn new(raw: impl Into<String>, kind: ValueKind, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind,
            reason: reason.into(),
        }
    }
}

// serde erases error types, so the typed failure from a field deserializer is
// parked here and picked up by `decode_json` on the same thread.
thread_local! {
    static LAST_MALFORMED: RefCell<Option<MalformedValue>> = const { RefCell::new(None) };
}

fn park(err: &MalformedValue) {
    LAST_MALFORMED.with(|slot| *slot.borrow_mut() = Some(err.clone()));
}

fn take_parked() -> Option<MalformedValue> {
    LAST_MALFORMED.with(|slot| slot.borrow_mut().take())
}

/// Failure to decode a JSON value into a typed result.
#[derive(Debug, Error)]
pub enum JsonDecodeError {
    /// A hex field inside the value was malformed.
    #[error(transparent)]
    Malformed(MalformedValue),
    /// The JSON shape did not match the target type.
    #[error("{0}")]
    Shape(serde_json::Error),
}

/// Decode a JSON value into `T`, preserving [`MalformedValue`] when a hex
/// field is the cause of the failure.
pub fn decode_json<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, JsonDecodeError> {
    take_parked();
    serde_json::from_value(value).map_err(|e| match take_parked() {
        // An untagged enum may park a value and then succeed on a later
        // variant; only trust the slot when the final error is that value.
        Some(malformed) if e.to_string().starts_with(&malformed.to_string()) => {
            JsonDecodeError::Malformed(malformed)
        }
        _ => JsonDecodeError::Shape(e),
    })
}

fn strip_hex_prefix(raw: &str, kind: ValueKind) -> Result<&str, MalformedValue> {
    raw.strip_prefix("0x")
        .ok_or_else(|| MalformedValue::new(raw, kind, "missing 0x prefix"))
}

fn decode_even_hex(raw: &str, kind: ValueKind) -> Result<Vec<u8>, MalformedValue> {
    let digits = strip_hex_prefix(raw, kind)?;
    if digits.len() % 2 != 0 {
        return Err(MalformedValue::new(raw, kind, "odd number of hex digits"));
    }
    hex::decode(digits).map_err(|e| MalformedValue::new(raw, kind, e.to_string()))
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.encode())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$ty>::decode(&raw).map_err(|e| {
                    park(&e);
                    de::Error::custom(e)
                })
            }
        }

        impl FromStr for $ty {
            type Err = MalformedValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::decode(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.encode())
            }
        }
    };
}

// ─── Quantity ─────────────────────────────────────────────────────────────────

/// Arbitrary-precision non-negative integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(BigUint);

impl Quantity {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        u64::try_from(&self.0).ok()
    }

    /// Minimal lower-case hex, `0x0` for zero.
    pub fn encode(&self) -> String {
        format!("0x{}", self.0.to_str_radix(16))
    }

    /// Accepts `0x` followed by one or more hex digits of any count.
    pub fn decode(raw: &str) -> Result<Self, MalformedValue> {
        let digits = strip_hex_prefix(raw, ValueKind::Quantity)?;
        if digits.is_empty() {
            return Err(MalformedValue::new(raw, ValueKind::Quantity, "no hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MalformedValue::new(raw, ValueKind::Quantity, "non-hex digit"));
        }
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(Self)
            .ok_or_else(|| MalformedValue::new(raw, ValueKind::Quantity, "non-hex digit"))
    }
}

hex_serde!(Quantity);

impl From<BigUint> for Quantity {
    fn from(v: BigUint) -> Self {
        Self(v)
    }
}

impl From<u64> for Quantity {
    fn from(v: u64) -> Self {
        Self(BigUint::from(v))
    }
}

impl From<u128> for Quantity {
    fn from(v: u128) -> Self {
        Self(BigUint::from(v))
    }
}

impl TryFrom<i64> for Quantity {
    type Error = MalformedValue;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        u64::try_from(v)
            .map(Self::from)
            .map_err(|_| MalformedValue::new(v.to_string(), ValueKind::Quantity, "negative quantity"))
    }
}

impl TryFrom<i128> for Quantity {
    type Error = MalformedValue;

    fn try_from(v: i128) -> Result<Self, Self::Error> {
        u128::try_from(v)
            .map(Self::from)
            .map_err(|_| MalformedValue::new(v.to_string(), ValueKind::Quantity, "negative quantity"))
    }
}

// ─── Bytes ────────────────────────────────────────────────────────────────────

/// Opaque byte string of any length.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Even-length lower-case hex; the empty string is `0x`.
    pub fn encode(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    pub fn decode(raw: &str) -> Result<Self, MalformedValue> {
        decode_even_hex(raw, ValueKind::Bytes).map(Self)
    }
}

hex_serde!(Bytes);

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ─── Fixed-width values ───────────────────────────────────────────────────────

macro_rules! fixed_bytes {
    ($(#[$doc:meta])* $name:ident, $inner:ty, $len:expr, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub $inner);

        impl $name {
            pub const LEN: usize = $len;

            pub fn zero() -> Self {
                Self(<$inner>::ZERO)
            }

            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_slice()
            }

            pub fn into_inner(self) -> $inner {
                self.0
            }

            /// Lower-case hex, never checksummed.
            pub fn encode(&self) -> String {
                format!("0x{}", hex::encode(self.0.as_slice()))
            }

            /// Rejects any input that is not exactly the fixed width.
            pub fn decode(raw: &str) -> Result<Self, MalformedValue> {
                let bytes = decode_even_hex(raw, $kind)?;
                Self::from_checked(raw, &bytes)
            }

            fn from_checked(raw: &str, bytes: &[u8]) -> Result<Self, MalformedValue> {
                if bytes.len() != $len {
                    return Err(MalformedValue::new(
                        raw,
                        $kind,
                        format!("expected {} bytes, got {}", $len, bytes.len()),
                    ));
                }
                Ok(Self(<$inner>::from_slice(bytes)))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(v: [u8; $len]) -> Self {
                Self(<$inner>::from(v))
            }
        }

        impl From<$inner> for $name {
            fn from(v: $inner) -> Self {
                Self(v)
            }
        }

        impl From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = MalformedValue;

            fn try_from(v: &[u8]) -> Result<Self, Self::Error> {
                Self::from_checked(&format!("0x{}", hex::encode(v)), v)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_slice()
            }
        }

        hex_serde!($name);
    };
}

fixed_bytes!(
    /// 20-byte account address.
    Address,
    alloy_primitives::Address,
    20,
    ValueKind::Address
);

fixed_bytes!(
    /// 32-byte digest: block/transaction hashes, storage words, topics.
    H256,
    alloy_primitives::B256,
    32,
    ValueKind::Hash
);
