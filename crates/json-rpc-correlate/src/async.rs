use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    batch::Batched,
    error::JsonRpcError,
    method::Method,
    params::Param,
    request::Procedure,
    response::Response,
    result::{JsonRpcErrorObject, ResponseResult, ResultCollection},
};

/// Trait for handling JSON-RPC method calls
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// The error type returned by this handler
    type Error: std::error::Error + Send + Sync + 'static;

    /// Handle a request. Returns domain errors only; the dispatcher turns
    /// them into error results.
    async fn handle(&self, method: &Method, params: &Param) -> Result<Value, Self::Error>;

    /// Handle a notification (optional - default does nothing)
    async fn handle_notification(
        &self,
        method: &Method,
        params: &Param,
    ) -> Result<(), Self::Error> {
        let _ = (method, params);
        Ok(())
    }

    /// List supported methods (optional - used for introspection)
    fn supported_methods(&self) -> Vec<String> {
        vec![]
    }
}

/// A simple function-based handler
pub struct FunctionHandler<F, E>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(Method, Param) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    handler_fn: F,
    methods: Vec<String>,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> FunctionHandler<F, E>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(Method, Param) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self {
            handler_fn,
            methods: vec![],
            _error: PhantomData,
        }
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }
}

#[async_trait]
impl<F, E> JsonRpcHandler for FunctionHandler<F, E>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(Method, Param) -> BoxFuture<'static, Result<Value, E>> + Send + Sync,
{
    type Error = E;

    async fn handle(&self, method: &Method, params: &Param) -> Result<Value, Self::Error> {
        (self.handler_fn)(method.clone(), params.clone()).await
    }

    fn supported_methods(&self) -> Vec<String> {
        self.methods.clone()
    }
}

/// Trait for errors that can be converted to JSON-RPC error objects
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    /// Convert this error to a JSON-RPC error object
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

impl ToJsonRpcError for JsonRpcError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        JsonRpcErrorObject::from_fault(self, None)
    }
}

/// Method invoker feeding the response engine.
///
/// Calls run one after another in slot order, so results line up with the
/// batch slots they answer.
pub struct JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    pub handlers: HashMap<String, Arc<dyn JsonRpcHandler<Error = E>>>,
    pub default_handler: Option<Arc<dyn JsonRpcHandler<Error = E>>>,
}

impl<E> JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            default_handler: None,
        }
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(&mut self, method: impl Into<String>, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(handler));
    }

    /// Register a handler for multiple methods
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        let handler_arc: Arc<dyn JsonRpcHandler<Error = E>> = Arc::new(handler);
        for method in methods {
            self.handlers.insert(method, handler_arc.clone());
        }
    }

    /// Set a default handler for unregistered methods. Reserved `rpc.`
    /// methods never fall through to it.
    pub fn set_default_handler<H>(&mut self, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.default_handler = Some(Arc::new(handler));
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    fn resolve(&self, method: &Method) -> Option<&Arc<dyn JsonRpcHandler<Error = E>>> {
        match self.handlers.get(method.name()) {
            Some(handler) => Some(handler),
            None if method.is_system_extension() => None,
            None => self.default_handler.as_ref(),
        }
    }

    /// Run one procedure and return its result.
    ///
    /// A notification always yields a null success; handler failures on
    /// notifications are logged and otherwise dropped.
    pub async fn invoke(&self, procedure: &Procedure) -> ResponseResult {
        let method = procedure.method();
        let params = procedure.params();

        let Some(handler) = self.resolve(method) else {
            debug!("No handler for method {}", method);
            return if procedure.is_notification() {
                ResponseResult::Success(Value::Null)
            } else {
                ResponseResult::Error(JsonRpcErrorObject::method_not_found())
            };
        };

        if procedure.is_notification() {
            if let Err(error) = handler.handle_notification(method, params).await {
                warn!("Notification handler for {} failed: {}", method, error);
            }
            return ResponseResult::Success(Value::Null);
        }

        match handler.handle(method, params).await {
            Ok(result) => ResponseResult::Success(result),
            Err(domain_error) => ResponseResult::Error(domain_error.to_error_object()),
        }
    }

    /// Resolve every slot of `response` and return the answered response.
    ///
    /// One result is queued per slot in slot order. Slots that already
    /// carry a recorded fault get a placeholder that the fault outranks.
    pub async fn handle_response(&self, response: &Response) -> Result<Response, JsonRpcError> {
        let mut results = ResultCollection::new();
        for member in response.members() {
            let result = match member.request() {
                Some(procedure) => self.invoke(procedure).await,
                None => ResponseResult::Success(Value::Null),
            };
            results.push(result);
        }
        response.handle_result(results)
    }

    /// Raw request text in, text to send back out. `None` means nothing
    /// must be written (notifications only).
    pub async fn handle_message(&self, text: &str) -> Result<Option<String>, JsonRpcError> {
        let response = Response::new(text);
        let answered = self.handle_response(&response).await?;
        Ok(answered.to_json_string())
    }
}

impl<E> Default for JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    fn default() -> Self {
        Self::new()
    }
}
