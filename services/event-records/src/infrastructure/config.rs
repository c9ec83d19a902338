/// DynamoDB接続設定
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;

/// テーブル名の環境変数
pub const RECORDS_TABLE_VAR: &str = "RECORDS_TABLE";

/// テーブル名の既定値
pub const DEFAULT_TABLE_NAME: &str = "user-visits-sam";

/// リージョンが環境から解決できない場合の既定値
pub const DEFAULT_REGION: &str = "us-east-2";

/// DynamoDB設定のエラー型
#[derive(Debug, Error)]
pub enum DynamoDbConfigError {
    #[error("Empty environment variable: {0}")]
    EmptyEnvVar(String),
}

/// テーブル名とクライアントを持つDynamoDB設定
///
/// Lambdaのコールドスタート時に一度だけ作成する。
/// - RECORDS_TABLE: レコードテーブル名（未設定時は`user-visits-sam`）
/// - AWS_REGION: リージョン（未解決時は`us-east-2`）
#[derive(Debug, Clone)]
pub struct DynamoDbConfig {
    /// DynamoDBクライアントインスタンス
    client: DynamoDbClient,
    /// レコードテーブル名
    table_name: String,
}

impl DynamoDbConfig {
    /// 環境からAWS設定とテーブル名を読み込んで作成
    pub async fn from_env() -> Result<Self, DynamoDbConfigError> {
        let table_name = Self::table_name_from_env()?;

        // 認証情報・リージョンは標準のプロバイダーチェーンから読み込み
        let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let client = DynamoDbClient::new(&aws_config);

        Ok(Self { client, table_name })
    }

    /// 環境変数からテーブル名を取得
    ///
    /// 未設定なら既定値、空文字ならエラー。
    pub fn table_name_from_env() -> Result<String, DynamoDbConfigError> {
        match std::env::var(RECORDS_TABLE_VAR) {
            Ok(name) if name.trim().is_empty() => {
                Err(DynamoDbConfigError::EmptyEnvVar(RECORDS_TABLE_VAR.to_string()))
            }
            Ok(name) => Ok(name),
            Err(_) => Ok(DEFAULT_TABLE_NAME.to_string()),
        }
    }

    /// DynamoDBクライアントへの参照を取得
    pub fn client(&self) -> &DynamoDbClient {
        &self.client
    }

    /// レコードテーブル名を取得
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}
