// ドメイン層モジュール
pub mod query_parameters;
pub mod record;
pub mod response_envelope;

// 再エクスポート
pub use query_parameters::{
    PARTITION_KEY, QueryParameters, QueryPlan, SORT_KEY, START_DATE_PARAM,
};
pub use record::{KeyValue, Record, RecordValue, StoreNumber, StoreNumberError};
pub use response_envelope::ResponseEnvelope;
