/// Lambdaプロキシ統合向けのレスポンスエンベロープ
///
/// 成功・失敗を問わず、すべての呼び出しはこの固定形状で返却する。
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Content-Typeヘッダー名
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// CORS許可オリジンヘッダー名
pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// レスポンスエンベロープ
///
/// `statusCode` は文字列（"200"、"404" など）で返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: String,
    /// JSONエンコード済みの本文
    pub body: String,
    pub headers: BTreeMap<String, String>,
}

impl ResponseEnvelope {
    /// 固定ヘッダー付きのエンベロープを作成
    pub fn new(status_code: u16, body: String) -> Self {
        Self {
            status_code: status_code.to_string(),
            body,
            headers: Self::default_headers(),
        }
    }

    /// 固定ヘッダー
    ///
    /// - Content-Type: application/json
    /// - Access-Control-Allow-Origin: *
    pub fn default_headers() -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert(
            CONTENT_TYPE_HEADER.to_string(),
            "application/json".to_string(),
        );
        headers.insert(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string());
        headers
    }

    pub fn is_success(&self) -> bool {
        self.status_code == "200"
    }
}
