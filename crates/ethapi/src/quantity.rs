//! Hex quantity encoding
//!
//! Ethereum encodes integers as `0x`-prefixed, lowercase hex strings
//! (`"0x0"`, `"0x1a"`). Decoding is strict about the prefix and the digit
//! set; anything else is an [`EthApiError::InvalidQuantity`].

use crate::error::{EthApiError, Result};

/// Parse a quantity into a signed 64-bit integer
pub fn parse_quantity(s: &str) -> Result<i64> {
    let digits = hex_digits(s)?;
    i64::from_str_radix(digits, 16)
        .map_err(|e| EthApiError::InvalidQuantity(format!("{s}: {e}")))
}

/// Parse a quantity that may exceed 64 bits (difficulty, wei amounts)
pub fn parse_big_quantity(s: &str) -> Result<u128> {
    let digits = hex_digits(s)?;
    u128::from_str_radix(digits, 16)
        .map_err(|e| EthApiError::InvalidQuantity(format!("{s}: {e}")))
}

/// Format an integer as a quantity string
pub fn format_quantity(value: u128) -> String {
    format!("0x{value:x}")
}

fn hex_digits(s: &str) -> Result<&str> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| EthApiError::InvalidQuantity(format!("{s}: missing 0x prefix")))?;

    if digits.is_empty() {
        return Err(EthApiError::InvalidQuantity(format!("{s}: no digits")));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EthApiError::InvalidQuantity(format!("{s}: non-hex digit")));
    }
    Ok(digits)
}

/// Serde adapter for `i64` fields encoded as quantities
pub mod hex_i64 {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    /// Encode as a quantity, rejecting negative values
    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let value = u128::try_from(*value)
            .map_err(|_| <S::Error as ser::Error>::custom(format!("negative quantity: {value}")))?;
        serializer.serialize_str(&super::format_quantity(value))
    }

    /// Decode from a quantity string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_quantity(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for `Option<i64>` quantity fields; `null` maps to `None`
pub mod hex_i64_opt {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Encode `Some` as a quantity; `None` as null
    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::hex_i64::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Decode an optional quantity string
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_quantity(&s).map_err(de::Error::custom))
            .transpose()
    }
}

/// Serde adapter for `u128` quantity fields
pub mod hex_u128 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Encode as a quantity
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_quantity(*value))
    }

    /// Decode from a quantity string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_big_quantity(&s).map_err(de::Error::custom)
    }
}

/// Serde adapter for `Option<u128>` quantity fields
pub mod hex_u128_opt {
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Encode `Some` as a quantity; `None` as null
    pub fn serialize<S: Serializer>(
        value: &Option<u128>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&super::format_quantity(*v)),
            None => serializer.serialize_none(),
        }
    }

    /// Decode an optional quantity string
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u128>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| super::parse_big_quantity(&s).map_err(de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x100").unwrap(), 256);
        assert_eq!(parse_quantity("0XFF").unwrap(), 255);
        assert_eq!(parse_quantity("0x7fffffffffffffff").unwrap(), i64::MAX);
    }

    #[test]
    fn test_parse_quantity_requires_prefix() {
        let err = parse_quantity("100").unwrap_err();
        assert!(matches!(err, EthApiError::InvalidQuantity(_)));
    }

    #[test]
    fn test_parse_quantity_rejects_bad_digits() {
        assert!(parse_quantity("0xzz").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0x+1").is_err());
        assert!(parse_quantity("0x-1").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_parse_quantity_overflow() {
        assert!(parse_quantity("0x8000000000000000").is_err());
        assert_eq!(
            parse_big_quantity("0x8000000000000000").unwrap(),
            9_223_372_036_854_775_808
        );
    }

    #[test]
    fn test_parse_big_quantity() {
        assert_eq!(
            parse_big_quantity("0xde0b6b3a7640000").unwrap(),
            1_000_000_000_000_000_000
        );
        assert!(parse_big_quantity("de0b6b3a7640000").is_err());
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(0), "0x0");
        assert_eq!(format_quantity(26), "0x1a");
        assert_eq!(format_quantity(21000), "0x5208");
    }

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Fields {
        #[serde(with = "hex_i64")]
        gas: i64,
        #[serde(default, with = "hex_i64_opt")]
        nonce: Option<i64>,
        #[serde(with = "hex_u128")]
        value: u128,
    }

    #[test]
    fn test_serde_adapters() {
        let fields: Fields =
            serde_json::from_str(r#"{"gas":"0x5208","nonce":null,"value":"0x3e8"}"#).unwrap();
        assert_eq!(
            fields,
            Fields {
                gas: 21000,
                nonce: None,
                value: 1000
            }
        );

        let missing: Fields = serde_json::from_str(r#"{"gas":"0x1","value":"0x0"}"#).unwrap();
        assert_eq!(missing.nonce, None);

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["gas"], "0x5208");
        assert_eq!(json["value"], "0x3e8");
    }

    #[test]
    fn test_serde_rejects_negative() {
        let fields = Fields {
            gas: -1,
            nonce: None,
            value: 0,
        };
        assert!(serde_json::to_value(&fields).is_err());
    }
}
