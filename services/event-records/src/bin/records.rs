/// レコード取得Lambdaエントリポイント
///
/// API Gateway（RESTプロキシ統合）経由のリクエストを処理し、
/// DynamoDBのイベント集計レコードをJSONで返却する。
use event_records::application::RecordQueryHandler;
use event_records::infrastructure::{DynamoDbConfig, DynamoRecordRepository, init_logging};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // DynamoDB設定はコールドスタート時に一度だけ読み込み、以降の呼び出しで再利用する
    let config = DynamoDbConfig::from_env().await.map_err(|err| {
        error!(error = %err, "DynamoDB設定読み込み失敗");
        err
    })?;

    info!(table_name = config.table_name(), "レコード取得Lambda関数を初期化");

    let repository =
        DynamoRecordRepository::new(config.client().clone(), config.table_name().to_string());
    let handler = RecordQueryHandler::new(repository);
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<_, Error>(handler.handle(&event.payload).await)
    }))
    .await
}
