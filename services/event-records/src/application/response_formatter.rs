/// レスポンスエンベロープの生成
///
/// 結果またはエラーを固定形状のエンベロープ（ステータス、JSON本文、固定ヘッダー）へ変換する。
use serde::Serialize;
use thiserror::Error;

use super::request_parser::ParseError;
use crate::domain::ResponseEnvelope;

/// 成功時のステータスコード
pub const SUCCESS_CODE: u16 = 200;

/// エラーコード未指定時のステータスコード
pub const DEFAULT_ERROR_CODE: u16 = 400;

/// リソースが返せない場合のステータスコード
pub const NOT_FOUND_CODE: u16 = 404;

/// 呼び出し元へ返すエラー
///
/// 本文の`message`は`message()`から取得する。内部エラーの詳細は
/// `NotFound`に畳み込まれ、呼び出し元には露出しない。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResponseError {
    /// リクエスト検証エラー（メッセージをそのまま返す）
    #[error(transparent)]
    Validation(#[from] ParseError),

    /// 汎用の取得失敗
    #[error("Not found")]
    NotFound,
}

impl ResponseError {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// レスポンスフォーマッター
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// 結果をJSON本文とする200レスポンスを生成
    ///
    /// 数値は小数部が0なら整数、それ以外は浮動小数点数としてエンコードされる。
    pub fn success<T>(result: &T) -> Result<ResponseEnvelope, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_string(result)?;
        Ok(ResponseEnvelope::new(SUCCESS_CODE, body))
    }

    /// `{"message": ...}`を本文とするエラーレスポンスを生成
    pub fn failure(error: &ResponseError, error_code: u16) -> ResponseEnvelope {
        let body = serde_json::json!({ "message": error.message() }).to_string();
        ResponseEnvelope::new(error_code, body)
    }

    /// デフォルトのエラーコード（400）でエラーレスポンスを生成
    pub fn error(error: &ResponseError) -> ResponseEnvelope {
        Self::failure(error, DEFAULT_ERROR_CODE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, RecordValue, StoreNumber};
    use serde_json::{Value, json};

    fn body_json(envelope: &ResponseEnvelope) -> Value {
        serde_json::from_str(&envelope.body).unwrap()
    }

    fn assert_fixed_headers(envelope: &ResponseEnvelope) {
        assert_eq!(envelope.headers.len(), 2);
        assert_eq!(envelope.headers["Content-Type"], "application/json");
        assert_eq!(envelope.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn test_success_returns_200_with_json_body() {
        let envelope = ResponseFormatter::success(&json!([{"EventId": "42"}])).unwrap();

        assert_eq!(envelope.status_code, "200");
        assert_eq!(body_json(&envelope), json!([{"EventId": "42"}]));
        assert_fixed_headers(&envelope);
    }

    #[test]
    fn test_success_empty_result() {
        let records: Vec<Record> = Vec::new();
        let envelope = ResponseFormatter::success(&records).unwrap();

        assert_eq!(envelope.status_code, "200");
        assert_eq!(envelope.body, "[]");
    }

    /// 小数部0の数値は整数、それ以外は浮動小数点数として出力される
    #[test]
    fn test_success_preserves_integer_float_distinction() {
        let mut record = Record::new();
        record.insert(
            "count".to_string(),
            RecordValue::Number(StoreNumber::parse("5").unwrap()),
        );
        record.insert(
            "whole".to_string(),
            RecordValue::Number(StoreNumber::parse("5.0").unwrap()),
        );
        record.insert(
            "ratio".to_string(),
            RecordValue::Number(StoreNumber::parse("5.25").unwrap()),
        );

        let envelope = ResponseFormatter::success(&vec![record]).unwrap();

        assert_eq!(envelope.body, r#"[{"count":5,"ratio":5.25,"whole":5}]"#);

        let decoded = body_json(&envelope);
        assert_eq!(decoded[0]["count"].as_i64(), Some(5));
        assert_eq!(decoded[0]["whole"].as_i64(), Some(5));
        assert_eq!(decoded[0]["ratio"].as_f64(), Some(5.25));
    }

    #[test]
    fn test_failure_uses_supplied_code_and_message() {
        let error = ResponseError::from(ParseError::ResourceIdNotANumber);
        let envelope = ResponseFormatter::failure(&error, 404);

        assert_eq!(envelope.status_code, "404");
        assert_eq!(
            body_json(&envelope),
            json!({"message": "resource_id not a number"})
        );
        assert_fixed_headers(&envelope);
    }

    #[test]
    fn test_error_defaults_to_400() {
        let envelope = ResponseFormatter::error(&ResponseError::NotFound);

        assert_eq!(envelope.status_code, "400");
        assert_eq!(body_json(&envelope), json!({"message": "Not found"}));
    }

    #[test]
    fn test_message_is_json_escaped() {
        let error = ResponseError::Validation(ParseError::InvalidBody(
            "unexpected \"quote\"".to_string(),
        ));
        let envelope = ResponseFormatter::failure(&error, 404);

        assert_eq!(
            body_json(&envelope)["message"],
            "invalid body: unexpected \"quote\""
        );
    }

    #[test]
    fn test_response_error_message() {
        assert_eq!(ResponseError::NotFound.message(), "Not found");
        assert_eq!(
            ResponseError::Validation(ParseError::InvalidStartDate).message(),
            "startDate not a number"
        );
    }
}
