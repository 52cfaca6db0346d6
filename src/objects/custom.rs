//! Custom object reads
//!
//! View reads return one page; [`CustomObjects::get_view_records`] walks every
//! page with `readMore` and returns the records in server order.

use super::intacct_object::{ensure_success, IntacctObject};
use crate::client::IntacctClient;
use crate::content::{Content, ReadRelated, ReadView, DEFAULT_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::request::HandlerFactory;
use crate::response::OperationResult;
use crate::types::{Params, Record};
use std::sync::Arc;
use tracing::{debug, info};

/// Default upper bound on `totalcount` for [`CustomObjects::get_view_records`]
pub const MAX_QUERY_TOTAL_COUNT: u64 = 100_000;

/// Reads records from custom views and relationships
#[derive(Debug, Clone, Default)]
pub struct CustomObjects {
    object: IntacctObject,
}

impl CustomObjects {
    /// Use the HTTP request handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom handler factory
    pub fn with_factory(factory: Arc<dyn HandlerFactory>) -> Self {
        Self {
            object: IntacctObject::with_factory(factory),
        }
    }

    /// Read one page of a custom view
    ///
    /// Options:
    ///
    /// - `view`: (string, required)
    /// - `control_id`: (string)
    /// - `page_size`: (int, default 1000)
    /// - `return_format`: (string, default "xml")
    pub async fn read_view(&self, params: &Params, client: &IntacctClient) -> Result<OperationResult> {
        let config = params.merged_over(&client.session_config());
        let content = Content::single(ReadView::from_params(params)?);

        let result = self.object.execute(&config, &config, &content).await?;
        ensure_success(result, "An error occurred trying to read view records")
    }

    /// Read every page of a custom view
    ///
    /// Accepts the [`read_view`](Self::read_view) options plus
    /// `max_total_count` (int, default 100000). Fails with
    /// [`Error::LimitExceeded`] when the view's `totalcount` is above that
    /// bound; no partial results are returned.
    ///
    /// The number of `readMore` calls is fixed from the first page's
    /// `numremaining` and `page_size`.
    pub async fn get_view_records(
        &self,
        params: &Params,
        client: &IntacctClient,
    ) -> Result<Vec<Record>> {
        let defaults = Params::new().with("max_total_count", MAX_QUERY_TOTAL_COUNT);
        let mut config = params.merged_over(&defaults);

        let result = self.read_view(&config, client).await?;
        let result = ensure_success(result, "An error occurred trying to get view records")?;

        let total_count = result.total_count();
        let num_remaining = result.num_remaining();
        let result_id = result.result_id().map(String::from);
        let mut records = result.into_records();

        let max_total_count = config
            .get_u64("max_total_count")?
            .unwrap_or(MAX_QUERY_TOTAL_COUNT);
        if total_count > max_total_count {
            return Err(Error::LimitExceeded { max_total_count });
        }

        if num_remaining > 0 {
            let page_size = config.get_u64("page_size")?.unwrap_or(DEFAULT_PAGE_SIZE);
            if page_size == 0 {
                return Err(Error::invalid_value(
                    "page_size",
                    "page size cannot be less than 1",
                ));
            }
            let pages = num_remaining.div_ceil(page_size);
            // without a resultId readMore continues the view itself
            if let Some(result_id) = result_id {
                config.insert("result_id", result_id);
            }

            for page in 1..=pages {
                let more = self.object.read_more(&config, client).await?;
                debug!(
                    page,
                    pages,
                    records = more.data().map_or(0, |d| d.records().len()),
                    "Fetched view page"
                );
                records.extend(more.into_records());
            }
        }

        info!(
            records = records.len(),
            total_count, "Fetched view records"
        );
        Ok(records)
    }

    /// Read records related to the given keys
    ///
    /// Options:
    ///
    /// - `object`: (string, required)
    /// - `relation`: (string, required)
    /// - `fields`: (array)
    /// - `keys`: (array)
    /// - `control_id`: (string)
    /// - `return_format`: (string, default "xml")
    ///
    /// The request handler is built from `params` alone, so transport
    /// settings from the session (such as `endpoint_url`) only apply when the
    /// caller repeats them. Credentials still come from the merged session.
    pub async fn read_related_objects(
        &self,
        params: &Params,
        client: &IntacctClient,
    ) -> Result<OperationResult> {
        let config = params.merged_over(&client.session_config());
        let content = Content::single(ReadRelated::from_params(params)?);

        let result = self.object.execute(params, &config, &content).await?;
        ensure_success(result, "An error occurred trying to read related records")
    }
}
