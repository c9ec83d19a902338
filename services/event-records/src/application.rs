// アプリケーション層モジュール
pub mod record_query_handler;
pub mod request_parser;
pub mod response_formatter;

// 再エクスポート
pub use record_query_handler::{DispatchError, RecordQueryHandler};
pub use request_parser::{ParseError, RequestParser};
pub use response_formatter::{
    DEFAULT_ERROR_CODE, NOT_FOUND_CODE, ResponseError, ResponseFormatter, SUCCESS_CODE,
};
