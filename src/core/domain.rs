//! Domain primitives shared by the approval engine, the payment layer and the CLI.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::WalletError;

/// Sequential transaction identifier, starting at 0.
pub type TxId = u64;

/// Transfer value in minimal units (wei).
pub type Amount = u128;

/// Length of an account identity in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identity, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity. Never a valid owner.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Deterministic address whose last byte is `n`. Handy for fixtures.
    pub const fn from_low_u8(n: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = n;
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Short form used in log lines, e.g. `0x1234…abcd`.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| WalletError::InvalidAddress(format!("missing 0x prefix: {}", s)))?;
        if body.len() != ADDRESS_LEN * 2 {
            return Err(WalletError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                ADDRESS_LEN * 2,
                body.len()
            )));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(body, &mut bytes)
            .map_err(|e| WalletError::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for [`Amount`] fields.
///
/// Amounts serialize as decimal strings so values above `u64::MAX` survive
/// JSON and internally tagged enums. Deserialization accepts either a
/// decimal string or a plain integer.
pub mod amount_serde {
    use super::Amount;
    use serde::{de, Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> de::Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.parse::<Amount>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let addr: Address = "0x00000000000000000000000000000000000000AB".parse().unwrap();
        assert_eq!(addr, Address::from_low_u8(0xab));
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000ab");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("1234".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz000000000000000000000000000000000000ab".parse::<Address>().is_err());
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_low_u8(1).is_zero());
        let parsed: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(parsed.is_zero());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr = Address::from_low_u8(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000007\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_amount_serde_above_u64() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Wrapper {
            #[serde(with = "amount_serde")]
            amount: Amount,
        }

        let big = u64::MAX as Amount + 1;
        let json = serde_json::to_string(&Wrapper { amount: big }).unwrap();
        assert_eq!(json, r#"{"amount":"18446744073709551616"}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), Wrapper { amount: big });
        assert_eq!(
            serde_json::from_str::<Wrapper>(r#"{"amount":42}"#).unwrap(),
            Wrapper { amount: 42 }
        );
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount":-1}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"amount":"12x"}"#).is_err());
    }

    #[test]
    fn test_short_form() {
        let addr = Address::from_low_u8(0xcd);
        assert_eq!(addr.short(), "0x0000…00cd");
    }
}
