/// レコード取得ハンドラー
///
/// API Gatewayプロキシイベントを受け取り、パース → クエリ → レスポンス生成を行う。
/// 呼び出し間で状態は保持しない（リポジトリのクライアントのみ再利用）。
use serde_json::Value;
use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::request_parser::RequestParser;
use super::response_formatter::{NOT_FOUND_CODE, ResponseError, ResponseFormatter};
use crate::domain::{QueryParameters, QueryPlan, Record, ResponseEnvelope};
use crate::infrastructure::{RecordRepository, RepositoryError};

/// パース後の処理で発生したエラー
///
/// 呼び出し元には詳細を返さず、ログ出力のみ行う。
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to encode response body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DispatchError {
    /// ログ用のエラー種別名
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Repository(RepositoryError::ReadError(_)) => "read_error",
            DispatchError::Repository(RepositoryError::WriteError(_)) => "write_error",
            DispatchError::Repository(RepositoryError::SerializationError(_)) => {
                "item_conversion_error"
            }
            DispatchError::Serialization(_) => "serialization_error",
        }
    }
}

/// レコード取得リクエストを処理するハンドラー
pub struct RecordQueryHandler<R>
where
    R: RecordRepository,
{
    /// レコードリポジトリ
    repository: R,
}

impl<R> RecordQueryHandler<R>
where
    R: RecordRepository,
{
    /// 新しいハンドラーを作成
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// イベントを処理してレスポンスエンベロープを返す
    ///
    /// # 処理フロー
    /// 1. リクエストをパース（失敗時は検証メッセージを404で返却）
    /// 2. 開始日の有無でクエリを選択して実行
    /// 3. 結果を200で返却
    ///
    /// パース後の失敗はすべてログ出力し、"Not found"（404）に変換する。
    pub async fn handle(&self, event: &Value) -> ResponseEnvelope {
        let path = event.get("path").and_then(Value::as_str).unwrap_or_default();
        let span = info_span!("record_query", path = path);

        async {
            let params = match RequestParser::parse(event) {
                Ok(params) => params,
                Err(err) => {
                    warn!(error = %err, "リクエスト検証失敗");
                    return ResponseFormatter::failure(&ResponseError::from(err), NOT_FOUND_CODE);
                }
            };

            match self.query_and_respond(&params).await {
                Ok(response) => response,
                Err(err) => {
                    error!(
                        resource_id = params.resource_id(),
                        error_type = err.kind(),
                        error = %err,
                        "レコード取得失敗"
                    );
                    ResponseFormatter::failure(&ResponseError::NotFound, NOT_FOUND_CODE)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn query_and_respond(
        &self,
        params: &QueryParameters,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let plan = params.plan();
        let start_date = params.start_date().map(ToString::to_string);

        info!(
            resource_id = params.resource_id(),
            start_date = start_date.as_deref(),
            query = plan.kind(),
            "レコード取得開始"
        );

        let records = self.execute(&plan).await?;

        debug!(count = records.len(), "レコード取得完了");

        Ok(ResponseFormatter::success(&records)?)
    }

    /// クエリ計画に従ってリポジトリを呼び出す
    pub async fn execute(&self, plan: &QueryPlan) -> Result<Vec<Record>, RepositoryError> {
        match plan {
            QueryPlan::Exact {
                partition_key,
                partition_value,
            } => {
                self.repository
                    .query_exact(partition_key, partition_value)
                    .await
            }
            QueryPlan::Range {
                partition_key,
                partition_value,
                sort_key,
                sort_value,
            } => {
                self.repository
                    .query_range(partition_key, partition_value, sort_key, sort_value)
                    .await
            }
        }
    }
}
