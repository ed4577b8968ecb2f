//! Upstream adapters.
//!
//! | Adapter | Site | Provides |
//! |---------|------|----------|
//! | [`MoexAdapter`] | iss.moex.com | index composition, prices |
//! | [`CbrAdapter`] | cbr.ru | key rate |
//! | [`SmartLabScraper`] | smart-lab.ru | metrics tables, pros/cons |

mod cbr;
mod moex;
mod smartlab;

pub use cbr::CbrAdapter;
pub use moex::MoexAdapter;
pub use smartlab::SmartLabScraper;

use tracing::debug;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{SourceError, SourceId};

/// Executes a request and returns the body of a 2xx response.
pub(crate) async fn fetch_body(
    http_client: &dyn HttpClient,
    source_id: SourceId,
    request: HttpRequest,
) -> Result<String, SourceError> {
    let url = request.full_url();
    debug!(source = %source_id, %url, "GET");

    let response = http_client.execute(request).await.map_err(|error| {
        let prefix = if error.timed_out() {
            "timed out"
        } else {
            "transport error"
        };
        SourceError::transport(
            source_id,
            format!("{source_id} {prefix}: {}", error.message()),
        )
    })?;

    if !response.is_success() {
        return Err(SourceError::status(source_id, response.status, &url));
    }

    Ok(response.body)
}
