use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use wired_rust::{handler, handlers};

use super::messages::{Escalate, Forward};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("nobody to escalate {0} to")]
    NoEscalation(u32),
}

/// Handlers that hand back boxed futures instead of using `async fn`.
#[derive(Default)]
pub struct Relay {
    pub forwarded: AtomicUsize,
    pub escalated: AtomicUsize,
}

#[handlers]
impl Relay {
    /// Takes a while and never looks at cancellation.
    #[handler]
    pub fn forward(&self, _command: Forward) -> BoxFuture<'_, ()> {
        async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.forwarded.fetch_add(1, Ordering::SeqCst);
        }
        .boxed()
    }

    #[handler]
    pub fn escalate(
        &self,
        command: Escalate,
    ) -> Pin<Box<dyn Future<Output = Result<(), RelayError>> + Send + '_>> {
        Box::pin(async move {
            if command.id == 0 {
                return Err(RelayError::NoEscalation(command.id));
            }
            self.escalated.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}
