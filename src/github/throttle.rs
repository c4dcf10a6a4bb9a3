//! Static request throttling

use log::trace;
use std::time::Duration;
use tokio::time::sleep;

/// Fixed pause between consecutive requests of one kind.
///
/// No backoff and no accounting of the remote quota.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        trace!("Throttling for {:?}", self.delay);
        sleep(self.delay).await;
    }
}
