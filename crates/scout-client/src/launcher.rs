//! Opens result sources in the system browser.

use scout_core::Navigator;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Launches each navigation on its own blocking task.
///
/// Launches are not awaited: there is no ordering between them and a failed
/// launch is only logged.
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    runtime: Handle,
}

impl BrowserNavigator {
    /// Bind to the tokio runtime of the calling context.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoRuntime`] outside a tokio runtime.
    pub fn from_current() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        Ok(Self { runtime })
    }
}

impl Navigator for BrowserNavigator {
    fn dispatch(&self, target: &str) {
        let target = target.to_string();
        debug!(%target, "dispatching browser launch");
        drop(self.runtime.spawn_blocking(move || {
            if let Err(err) = open::that(&target) {
                warn!(%target, error = %err, "failed to open source");
            }
        }));
    }
}
