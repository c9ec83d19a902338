/// API Gatewayプロキシイベントのパーサー
///
/// パス末尾のリソースIDとクエリ文字列を抽出・検証する。
/// 検証失敗はパニックではなく`Err(ParseError)`として返す。
use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::domain::{QueryParameters, START_DATE_PARAM, StoreNumber};

/// リクエストパースエラー
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// パス末尾のセグメントが数字でない（空を含む）
    #[error("resource_id not a number")]
    ResourceIdNotANumber,

    /// pathが文字列でない
    #[error("path must be a string")]
    InvalidPath,

    /// queryStringParametersがオブジェクトでない
    #[error("queryStringParameters must be an object")]
    InvalidQueryString,

    /// startDateが数値として解釈できない
    #[error("startDate not a number")]
    InvalidStartDate,

    /// bodyが欠落、またはJSONとして不正
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// リクエストパーサー
pub struct RequestParser;

impl RequestParser {
    /// イベントから検証済みパラメータを抽出
    ///
    /// # 引数
    /// * `event` - API Gatewayプロキシイベント
    ///
    /// # 戻り値
    /// * `Ok(QueryParameters)` - 抽出成功時
    /// * `Err(ParseError)` - 検証失敗時
    ///
    /// # 例
    /// ```
    /// use event_records::application::RequestParser;
    ///
    /// let event = serde_json::json!({"path": "/events/42"});
    /// let params = RequestParser::parse(&event).unwrap();
    /// assert_eq!(params.resource_id(), "42");
    /// ```
    pub fn parse(event: &Value) -> Result<QueryParameters, ParseError> {
        let resource_id = Self::extract_resource_id(event)?;
        let params = Self::extract_query_string(event)?;

        let start_date = params
            .get(START_DATE_PARAM)
            .map(|raw| Self::parse_start_date(raw))
            .transpose()?;

        Ok(QueryParameters::new(params, resource_id, start_date))
    }

    /// リクエストボディをJSONとしてパース
    ///
    /// 読み取り系の処理では使用しない。書き込み系の拡張向け。
    pub fn parse_body(event: &Value) -> Result<Value, ParseError> {
        let body = event
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::InvalidBody("body is missing".to_string()))?;

        serde_json::from_str(body).map_err(|e| ParseError::InvalidBody(e.to_string()))
    }

    /// パスの最後の`/`区切りセグメントをリソースIDとして取得
    fn extract_resource_id(event: &Value) -> Result<String, ParseError> {
        let path = match event.get("path") {
            None | Some(Value::Null) => "",
            Some(Value::String(path)) => path.as_str(),
            Some(_) => return Err(ParseError::InvalidPath),
        };

        let segment = path.rsplit('/').next().unwrap_or_default();

        if Self::is_resource_id(segment) {
            Ok(segment.to_string())
        } else {
            Err(ParseError::ResourceIdNotANumber)
        }
    }

    fn is_resource_id(segment: &str) -> bool {
        !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
    }

    /// クエリ文字列をコピー（欠落・nullは空）
    ///
    /// 文字列以外の値はJSON表記の文字列に変換し、nullは除外する。
    fn extract_query_string(event: &Value) -> Result<BTreeMap<String, String>, ParseError> {
        match event.get("queryStringParameters") {
            None | Some(Value::Null) => Ok(BTreeMap::new()),
            Some(Value::Object(map)) => Ok(map
                .iter()
                .filter_map(|(key, value)| match value {
                    Value::Null => None,
                    Value::String(s) => Some((key.clone(), s.clone())),
                    other => Some((key.clone(), other.to_string())),
                })
                .collect()),
            Some(_) => Err(ParseError::InvalidQueryString),
        }
    }

    /// 開始日を整数として解析（符号付き、桁数の上限なし）
    fn parse_start_date(raw: &str) -> Result<StoreNumber, ParseError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidStartDate);
        }

        StoreNumber::parse(trimmed).map_err(|_| ParseError::InvalidStartDate)
    }
}
