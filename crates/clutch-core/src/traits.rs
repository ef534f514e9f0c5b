use std::future::Future;

use crate::error::AppError;

/// Fetches the raw HTML body of a URL.
///
/// The single seam between the extraction core and the network.
/// Implementations own their retry, header, and pacing policy; the driver
/// only sees one `Ok(body)` or one `Err` per page.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}
