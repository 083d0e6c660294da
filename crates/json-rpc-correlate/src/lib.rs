//! # JSON-RPC 2.0 Message Correlation
//!
//! A transport-agnostic JSON-RPC 2.0 core that validates incoming messages and
//! correlates the results of method calls back to the requests that caused
//! them, including batches. The crate performs no I/O: a transport supplies
//! raw request text and writes out whatever serialized response comes back.
//!
//! ## Features
//! - Wire validation with JSON-RPC 2.0 error classification
//! - Batches answered in array order, with notifications left out
//! - Immutable responses: attaching a result always returns a new value
//! - Async handler/dispatcher seam with the `async` feature
//!
//! ```rust
//! use json_rpc_correlate::{Response, ResponseResult};
//!
//! let response = Response::new(r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#);
//! let answered = response.handle_result(ResponseResult::success(19)).unwrap();
//! assert_eq!(
//!     answered.to_json_string().as_deref(),
//!     Some(r#"{"jsonrpc":"2.0","result":19,"id":1}"#)
//! );
//! ```

pub mod batch;
pub mod error;
pub mod method;
pub mod params;
pub mod recovery;
pub mod request;
pub mod response;
pub mod result;
pub mod types;

#[cfg(feature = "async")]
pub mod r#async;

pub mod prelude;

// Re-export main types
pub use batch::{Batch, Batched};
pub use error::{JsonRpcError, JsonRpcErrorCode};
pub use method::Method;
pub use params::{Param, ParamKey, ParamMode};
pub use recovery::Recover;
pub use request::Procedure;
pub use response::Response;
pub use result::{JsonRpcErrorObject, ResponseResult, ResultCollection, ResultPayload};
pub use types::{CodeId, JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use r#async::{FunctionHandler, JsonRpcDispatcher, JsonRpcHandler, ToJsonRpcError};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const SERVER_ERROR: i64 = -32000;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
