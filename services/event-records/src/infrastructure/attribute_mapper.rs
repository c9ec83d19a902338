/// DynamoDBの属性値とドメイン型の相互変換
use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

use crate::domain::{KeyValue, Record, RecordValue, StoreNumber, StoreNumberError};

/// 属性変換エラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AttributeMappingError {
    /// JSONで表現できない型（バイナリなど）
    #[error("unsupported attribute type {type_name} for {attribute}")]
    UnsupportedType {
        attribute: String,
        type_name: &'static str,
    },

    /// 数値文字列が不正
    #[error("invalid number for {attribute}: {source}")]
    InvalidNumber {
        attribute: String,
        source: StoreNumberError,
    },
}

/// DynamoDBアイテムをレコードに変換
pub fn to_record(item: HashMap<String, AttributeValue>) -> Result<Record, AttributeMappingError> {
    item.into_iter()
        .map(|(name, value)| to_record_value(&name, value).map(|converted| (name, converted)))
        .collect()
}

/// 属性値をレコード値に変換
///
/// `attribute`はエラーメッセージ用の属性名。
/// SS/NSはリストとして扱う。B/BSはエラー。
pub fn to_record_value(
    attribute: &str,
    value: AttributeValue,
) -> Result<RecordValue, AttributeMappingError> {
    match value {
        AttributeValue::S(s) => Ok(RecordValue::String(s)),
        AttributeValue::N(n) => parse_number(attribute, &n).map(RecordValue::Number),
        AttributeValue::Bool(b) => Ok(RecordValue::Bool(b)),
        AttributeValue::Null(_) => Ok(RecordValue::Null),
        AttributeValue::L(list) => list
            .into_iter()
            .map(|v| to_record_value(attribute, v))
            .collect::<Result<Vec<_>, _>>()
            .map(RecordValue::List),
        AttributeValue::M(map) => map
            .into_iter()
            .map(|(name, v)| to_record_value(&name, v).map(|converted| (name, converted)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(RecordValue::Map),
        AttributeValue::Ss(strings) => Ok(RecordValue::List(
            strings.into_iter().map(RecordValue::String).collect(),
        )),
        AttributeValue::Ns(numbers) => numbers
            .iter()
            .map(|n| parse_number(attribute, n).map(RecordValue::Number))
            .collect::<Result<Vec<_>, _>>()
            .map(RecordValue::List),
        AttributeValue::B(_) => Err(unsupported(attribute, "B")),
        AttributeValue::Bs(_) => Err(unsupported(attribute, "BS")),
        _ => Err(unsupported(attribute, "unknown")),
    }
}

/// キー条件の値を属性値に変換
pub fn key_attribute(value: &KeyValue) -> AttributeValue {
    match value {
        KeyValue::String(s) => AttributeValue::S(s.clone()),
        KeyValue::Number(n) => AttributeValue::N(n.to_string()),
    }
}

fn parse_number(attribute: &str, text: &str) -> Result<StoreNumber, AttributeMappingError> {
    StoreNumber::parse(text).map_err(|source| AttributeMappingError::InvalidNumber {
        attribute: attribute.to_string(),
        source,
    })
}

fn unsupported(attribute: &str, type_name: &'static str) -> AttributeMappingError {
    AttributeMappingError::UnsupportedType {
        attribute: attribute.to_string(),
        type_name,
    }
}
