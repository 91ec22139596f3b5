//! Connectivity probe seam shared by the backend consumers.

use async_trait::async_trait;

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A backend that can be checked for reachability.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Round-trip a trivial request to the backend
    async fn ping(&self) -> AppResult<()>;
}
