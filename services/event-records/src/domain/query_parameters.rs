/// 検証済みのリクエストパラメータとクエリ計画
use std::collections::BTreeMap;

use super::record::{KeyValue, StoreNumber};

/// パーティションキー名
pub const PARTITION_KEY: &str = "EventId";

/// ソートキー名
pub const SORT_KEY: &str = "EventDay";

/// 開始日フィルターのクエリ文字列キー
pub const START_DATE_PARAM: &str = "startDate";

/// リクエストから抽出したパラメータ
///
/// `resource_id` はパス末尾の数字セグメントであることが保証される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// クエリ文字列（コピー）
    params: BTreeMap<String, String>,
    /// パス末尾の数字セグメント
    resource_id: String,
    /// 開始日（ソートキーの下限）
    start_date: Option<StoreNumber>,
}

impl QueryParameters {
    pub fn new(
        params: BTreeMap<String, String>,
        resource_id: String,
        start_date: Option<StoreNumber>,
    ) -> Self {
        Self {
            params,
            resource_id,
            start_date,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn start_date(&self) -> Option<&StoreNumber> {
        self.start_date.as_ref()
    }

    /// クエリ文字列の値を取得
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// 実行すべきクエリを決定
    ///
    /// 開始日がなければパーティション完全一致、あればソートキー下限付きの範囲クエリ。
    pub fn plan(&self) -> QueryPlan {
        let partition_value = KeyValue::String(self.resource_id.clone());
        match &self.start_date {
            None => QueryPlan::Exact {
                partition_key: PARTITION_KEY,
                partition_value,
            },
            Some(start_date) => QueryPlan::Range {
                partition_key: PARTITION_KEY,
                partition_value,
                sort_key: SORT_KEY,
                sort_value: KeyValue::Number(start_date.clone()),
            },
        }
    }
}

/// ストアに発行するクエリの形
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// パーティションキー完全一致
    Exact {
        partition_key: &'static str,
        partition_value: KeyValue,
    },
    /// パーティションキー一致 かつ ソートキー >= 下限
    Range {
        partition_key: &'static str,
        partition_value: KeyValue,
        sort_key: &'static str,
        sort_value: KeyValue,
    },
}

impl QueryPlan {
    /// ログ用のクエリ種別名
    pub fn kind(&self) -> &'static str {
        match self {
            QueryPlan::Exact { .. } => "exact",
            QueryPlan::Range { .. } => "range",
        }
    }
}
