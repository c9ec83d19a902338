/// DynamoDBからイベント集計レコードを取得するためのレコードリポジトリ
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

use super::attribute_mapper::{self, AttributeMappingError};
use crate::domain::{KeyValue, PARTITION_KEY, Record, SORT_KEY};

/// カウンター加算のデフォルト増分
pub const DEFAULT_INCREMENT: i64 = 1;

/// パーティションキー完全一致のキー条件式
const EXACT_KEY_CONDITION: &str = "#pk = :pk";

/// パーティションキー一致 + ソートキー下限のキー条件式
const RANGE_KEY_CONDITION: &str = "#pk = :pk AND #sk >= :sk";

/// カウンター加算の更新式（アイテムが無ければ作成される）
const INCREMENT_EXPRESSION: &str = "ADD #attr :amount";

/// リポジトリ操作のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    /// DynamoDBからの読み取りに失敗
    #[error("Read error: {0}")]
    ReadError(String),

    /// DynamoDBへの書き込みに失敗
    #[error("Write error: {0}")]
    WriteError(String),

    /// アイテムの変換に失敗
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<AttributeMappingError> for RepositoryError {
    fn from(err: AttributeMappingError) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

/// レコード取得・カウンター更新用トレイト
///
/// 実際のDynamoDB実装とテスト用モックを差し替えられるよう抽象化する。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// パーティションキーが一致するレコードをすべて取得
    ///
    /// 順序はストアが返した順のまま。
    async fn query_exact(
        &self,
        partition_key: &str,
        partition_value: &KeyValue,
    ) -> Result<Vec<Record>, RepositoryError>;

    /// パーティションキーが一致し、ソートキーが`sort_value`以上のレコードを取得
    async fn query_range(
        &self,
        partition_key: &str,
        partition_value: &KeyValue,
        sort_key: &str,
        sort_value: &KeyValue,
    ) -> Result<Vec<Record>, RepositoryError>;

    /// `(event_name, event_day)`のカウンター属性に`amount`を原子的に加算
    ///
    /// # 引数
    /// * `event_name` - パーティションキー（EventId）の値
    /// * `event_day` - ソートキー（EventDay）の値
    /// * `attribute_name` - 加算対象の数値属性名
    /// * `amount` - 増分（通常は`DEFAULT_INCREMENT`）
    async fn increment_counter(
        &self,
        event_name: &str,
        event_day: i64,
        attribute_name: &str,
        amount: i64,
    ) -> Result<(), RepositoryError>;
}

/// RecordRepositoryのDynamoDB実装
///
/// クライアントはプロセス起動時に一度だけ作成し、呼び出し間で再利用する。
#[derive(Debug, Clone)]
pub struct DynamoRecordRepository {
    /// DynamoDBクライアント
    client: DynamoDbClient,
    /// レコードテーブル名
    table_name: String,
}

impl DynamoRecordRepository {
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// クエリ結果のアイテムをレコードに変換
    fn into_records(
        items: Option<Vec<HashMap<String, AttributeValue>>>,
    ) -> Result<Vec<Record>, RepositoryError> {
        items
            .unwrap_or_default()
            .into_iter()
            .map(|item| attribute_mapper::to_record(item).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl RecordRepository for DynamoRecordRepository {
    async fn query_exact(
        &self,
        partition_key: &str,
        partition_value: &KeyValue,
    ) -> Result<Vec<Record>, RepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(EXACT_KEY_CONDITION)
            .expression_attribute_names("#pk", partition_key)
            .expression_attribute_values(":pk", attribute_mapper::key_attribute(partition_value))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        Self::into_records(result.items)
    }

    async fn query_range(
        &self,
        partition_key: &str,
        partition_value: &KeyValue,
        sort_key: &str,
        sort_value: &KeyValue,
    ) -> Result<Vec<Record>, RepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(RANGE_KEY_CONDITION)
            .expression_attribute_names("#pk", partition_key)
            .expression_attribute_names("#sk", sort_key)
            .expression_attribute_values(":pk", attribute_mapper::key_attribute(partition_value))
            .expression_attribute_values(":sk", attribute_mapper::key_attribute(sort_value))
            .send()
            .await
            .map_err(|e| RepositoryError::ReadError(e.into_service_error().to_string()))?;

        Self::into_records(result.items)
    }

    async fn increment_counter(
        &self,
        event_name: &str,
        event_day: i64,
        attribute_name: &str,
        amount: i64,
    ) -> Result<(), RepositoryError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(PARTITION_KEY, AttributeValue::S(event_name.to_string()))
            .key(SORT_KEY, AttributeValue::N(event_day.to_string()))
            .update_expression(INCREMENT_EXPRESSION)
            .expression_attribute_names("#attr", attribute_name)
            .expression_attribute_values(":amount", AttributeValue::N(amount.to_string()))
            .send()
            .await
            .map_err(|e| RepositoryError::WriteError(e.into_service_error().to_string()))?;

        Ok(())
    }
}
