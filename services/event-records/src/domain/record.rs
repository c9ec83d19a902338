/// ストアから取得したレコードの値型
///
/// DynamoDBのアイテムはスキーマを持たないため、属性値をタグ付きの
/// 値型として保持し、レスポンス生成時にそのままJSONへ変換する。
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// 数値文字列の解析エラー
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid number: {0}")]
pub struct StoreNumberError(pub String);

/// ストアの数値（任意精度10進数）
///
/// DynamoDBの数値は文字列で受け渡されるため、精度を落とさないよう
/// `BigDecimal`で保持する。JSON化の際、小数部が0なら整数、
/// それ以外は浮動小数点数として出力する（`5` と `5.5` を区別する）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreNumber(BigDecimal);

impl StoreNumber {
    /// 数値文字列を解析
    pub fn parse(text: &str) -> Result<Self, StoreNumberError> {
        BigDecimal::from_str(text.trim())
            .map(Self)
            .map_err(|_| StoreNumberError(text.to_string()))
    }

    /// 小数部が0でない場合にtrue
    pub fn has_fraction(&self) -> bool {
        self.0.with_scale(0) != self.0
    }

    /// 内部の10進数への参照を取得
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<i64> for StoreNumber {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for StoreNumber {
    type Err = StoreNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 整数は指数表記を使わず桁をそのまま出力する
impl fmt::Display for StoreNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_fraction() {
            write!(f, "{}", self.0)
        } else {
            let (integer, _) = self.0.with_scale(0).into_bigint_and_exponent();
            write!(f, "{}", integer)
        }
    }
}

impl Serialize for StoreNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !self.has_fraction() {
            let (integer, _) = self.0.with_scale(0).into_bigint_and_exponent();
            if let Some(int) = integer.to_i64() {
                return serializer.serialize_i64(int);
            }
            if let Some(int) = integer.to_u64() {
                return serializer.serialize_u64(int);
            }
            if let Some(int) = integer.to_i128() {
                return serializer.serialize_i128(int);
            }
            if let Some(int) = integer.to_u128() {
                return serializer.serialize_u128(int);
            }

            // 128ビットに収まらない整数は桁をそのままJSON数値にする
            let number =
                serde_json::Number::from_str(&integer.to_string()).map_err(S::Error::custom)?;
            return number.serialize(serializer);
        }

        match self.0.to_f64() {
            Some(float) if float.is_finite() => serializer.serialize_f64(float),
            _ => Err(S::Error::custom(format!(
                "number out of range: {}",
                self.0
            ))),
        }
    }
}

/// レコードの属性値
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Null,
    Bool(bool),
    String(String),
    Number(StoreNumber),
    List(Vec<RecordValue>),
    Map(BTreeMap<String, RecordValue>),
}

/// 属性名から属性値へのマッピング（1アイテム分）
pub type Record = BTreeMap<String, RecordValue>;

/// キー条件の値
///
/// パーティションキーは文字列、ソートキーは数値として扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    String(String),
    Number(StoreNumber),
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::String(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        KeyValue::String(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        KeyValue::Number(StoreNumber::from(value))
    }
}

impl From<StoreNumber> for KeyValue {
    fn from(value: StoreNumber) -> Self {
        KeyValue::Number(value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::String(s) => write!(f, "{}", s),
            KeyValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> StoreNumber {
        StoreNumber::parse(text).unwrap()
    }

    // ==================== StoreNumber ====================

    #[test]
    fn test_parse_integer_and_fraction() {
        assert!(!number("42").has_fraction());
        assert!(number("42.5").has_fraction());
        assert!(number("-0.25").has_fraction());
    }

    #[test]
    fn test_zero_fraction_is_integer() {
        // 5.0 は小数部が0なので整数扱い
        assert!(!number("5.0").has_fraction());
        assert!(!number("1E+2").has_fraction());
    }

    #[test]
    fn test_parse_invalid_number() {
        let result = StoreNumber::parse("abc");
        assert_eq!(result, Err(StoreNumberError("abc".to_string())));
    }

    #[test]
    fn test_serialize_integer_without_decimal_point() {
        assert_eq!(serde_json::to_string(&number("5")).unwrap(), "5");
        assert_eq!(serde_json::to_string(&number("5.0")).unwrap(), "5");
        assert_eq!(serde_json::to_string(&number("-17")).unwrap(), "-17");
    }

    #[test]
    fn test_serialize_fraction_as_float() {
        assert_eq!(serde_json::to_string(&number("5.5")).unwrap(), "5.5");
        assert_eq!(serde_json::to_string(&number("-2.5")).unwrap(), "-2.5");
    }

    #[test]
    fn test_serialize_large_unsigned_integer() {
        let value = number("18446744073709551615");
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            "18446744073709551615"
        );
    }

    /// 64ビットを超える整数も桁を落とさず整数として出力する
    #[test]
    fn test_serialize_integers_beyond_64_bits_exactly() {
        for (input, expected) in [
            ("100000000000000000000", "100000000000000000000"),
            ("-10000000000000000000", "-10000000000000000000"),
            (
                "99999999999999999999999999999999999999",
                "99999999999999999999999999999999999999",
            ),
            ("1E+30", "1000000000000000000000000000000"),
            (
                "1E+50",
                "100000000000000000000000000000000000000000000000000",
            ),
        ] {
            let encoded = serde_json::to_string(&number(input)).unwrap();
            assert_eq!(encoded, expected, "input {}", input);

            let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();
            assert!(!decoded.is_f64(), "input {}", input);
            assert_eq!(
                BigDecimal::from_str(&decoded.to_string()).unwrap(),
                *number(input).as_decimal()
            );
        }
    }

    #[test]
    fn test_large_integer_inside_record_value() {
        let mut record = Record::new();
        record.insert(
            "Total".to_string(),
            RecordValue::Number(number("123456789012345678901234567890")),
        );

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Total":123456789012345678901234567890}"#
        );
    }

    /// 整数・小数どちらも、デコードすると数値として等しい
    #[test]
    fn test_encoded_numbers_decode_to_equal_values() {
        let integer: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&number("20200101")).unwrap()).unwrap();
        assert!(integer.is_i64());
        assert_eq!(integer.as_i64(), Some(20200101));

        let float: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&number("3.75")).unwrap()).unwrap();
        assert!(float.is_f64());
        assert_eq!(float.as_f64(), Some(3.75));
    }

    #[test]
    fn test_store_number_from_i64() {
        assert_eq!(StoreNumber::from(7), number("7"));
        assert_eq!(StoreNumber::from(7).to_string(), "7");
        assert_eq!(number("1E+2").to_string(), "100");
    }

    // ==================== RecordValue ====================

    #[test]
    fn test_record_value_serializes_untagged() {
        let mut nested = BTreeMap::new();
        nested.insert("flag".to_string(), RecordValue::Bool(true));
        nested.insert("missing".to_string(), RecordValue::Null);

        let mut record = Record::new();
        record.insert("EventId".to_string(), RecordValue::String("42".to_string()));
        record.insert("EventDay".to_string(), RecordValue::Number(number("20200101")));
        record.insert("Ratio".to_string(), RecordValue::Number(number("0.5")));
        record.insert(
            "Tags".to_string(),
            RecordValue::List(vec![RecordValue::String("a".to_string())]),
        );
        record.insert("Meta".to_string(), RecordValue::Map(nested));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "EventId": "42",
                "EventDay": 20200101,
                "Ratio": 0.5,
                "Tags": ["a"],
                "Meta": {"flag": true, "missing": null}
            })
        );
    }

    // ==================== KeyValue ====================

    #[test]
    fn test_key_value_conversions() {
        assert_eq!(KeyValue::from("42"), KeyValue::String("42".to_string()));
        assert_eq!(
            KeyValue::from(20200101_i64),
            KeyValue::Number(number("20200101"))
        );
        assert_eq!(KeyValue::from(number("5")).to_string(), "5");
        assert_eq!(
            KeyValue::from(number("123456789012345678901234")).to_string(),
            "123456789012345678901234"
        );
        assert_eq!(KeyValue::from("abc").to_string(), "abc");
    }
}
