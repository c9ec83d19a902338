// インフラストラクチャ層モジュール
pub mod attribute_mapper;
pub mod config;
pub mod logging;
pub mod record_repository;

// 再エクスポート
pub use attribute_mapper::AttributeMappingError;
pub use config::{DynamoDbConfig, DynamoDbConfigError};
pub use logging::{init_logging, init_test_logging};
pub use record_repository::{
    DEFAULT_INCREMENT, DynamoRecordRepository, RecordRepository, RepositoryError,
};
