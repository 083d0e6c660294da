//! # JSON-RPC Correlation Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use json_rpc_correlate::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::batch::Batched;
pub use crate::error::{JsonRpcError, JsonRpcErrorCode};
pub use crate::method::Method;
pub use crate::params::{Param, ParamKey};
pub use crate::request::Procedure;
pub use crate::response::Response;
pub use crate::result::{JsonRpcErrorObject, ResponseResult, ResultCollection};
pub use crate::types::{CodeId, JsonRpcVersion, RequestId};

#[cfg(feature = "async")]
pub use crate::r#async::{FunctionHandler, JsonRpcDispatcher, JsonRpcHandler, ToJsonRpcError};

// Standard error codes
pub use crate::error_codes::*;
