//! Shared object behaviour

use crate::client::IntacctClient;
use crate::content::{Content, ReadMore};
use crate::error::{Error, Result};
use crate::request::{HandlerFactory, XmlHandlerFactory};
use crate::response::OperationResult;
use crate::types::Params;
use std::sync::Arc;
use tracing::debug;

/// Dispatch behaviour shared by object types
#[derive(Clone)]
pub struct IntacctObject {
    factory: Arc<dyn HandlerFactory>,
}

impl IntacctObject {
    /// Use the HTTP request handler; requests made through this object share
    /// transports per set of transport settings
    pub fn new() -> Self {
        Self::with_factory(Arc::new(XmlHandlerFactory::new()))
    }

    /// Use a custom handler factory
    pub fn with_factory(factory: Arc<dyn HandlerFactory>) -> Self {
        Self { factory }
    }

    /// Build a handler from `handler_config`, execute `content` with `config`
    /// and return the first function result
    ///
    /// The result status is not checked here.
    pub async fn execute(
        &self,
        handler_config: &Params,
        config: &Params,
        content: &Content,
    ) -> Result<OperationResult> {
        let handler = self.factory.create(handler_config)?;
        let operation = handler.execute_content(config, content).await?;
        operation.into_result()
    }

    /// Fetch the next page of an earlier read
    ///
    /// Accepts `result_id` (or `view`/`object`) and `control_id`; session
    /// defaults are merged underneath.
    pub async fn read_more(&self, params: &Params, client: &IntacctClient) -> Result<OperationResult> {
        let config = params.merged_over(&client.session_config());
        let read_more = ReadMore::from_params(params)?;
        debug!(cursor = ?read_more.target, "Reading more records");
        let content = Content::single(read_more);

        let result = self.execute(&config, &config, &content).await?;
        ensure_success(result, "An error occurred trying to read more records")
    }
}

impl Default for IntacctObject {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IntacctObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntacctObject").finish_non_exhaustive()
    }
}

/// Turn a non-success result into [`Error::Read`] with its errors
pub(crate) fn ensure_success(result: OperationResult, message: &str) -> Result<OperationResult> {
    if result.is_success() {
        Ok(result)
    } else {
        Err(Error::read(message, result.errors))
    }
}
