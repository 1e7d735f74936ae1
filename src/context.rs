//! Request context carrying cancellation and deadlines.
//!
//! Every request made through [`ZendeskClient`](crate::ZendeskClient) runs
//! inside a [`Context`]. Cancelling the context (or letting its deadline
//! pass) aborts the in-flight HTTP call, including any request body that is
//! still being written.

use std::future::Future;
use std::time::Duration;

use futures::future::select_all;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{Result, ZendeskError};

/// Cancellation and deadline scope for API calls.
///
/// Contexts are cheap to clone. Derived contexts inherit every cancel
/// signal of their parent and the earlier of the two deadlines.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancels: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Handle used to cancel a context created by [`Context::with_cancel`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the associated context and all contexts derived from it.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether `cancel` has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a cancellable context.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut ctx = self.clone();
        ctx.cancels.push(rx);
        (ctx, CancelHandle { tx })
    }

    /// Derive a context that expires after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let mut ctx = self.clone();
        ctx.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        ctx
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The terminal error of this context, or `None` while it is live.
    pub fn err(&self) -> Option<ZendeskError> {
        if self.cancels.iter().any(|rx| *rx.borrow()) {
            return Some(ZendeskError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ZendeskError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ZendeskError {
        let mut cancels = self.cancels.clone();

        let cancelled = async {
            if cancels.is_empty() {
                return std::future::pending::<()>().await;
            }
            let waits = cancels.iter_mut().map(|rx| {
                Box::pin(async move {
                    loop {
                        if *rx.borrow_and_update() {
                            return;
                        }
                        // A dropped handle can no longer cancel.
                        if rx.changed().await.is_err() {
                            std::future::pending::<()>().await;
                        }
                    }
                })
            });
            select_all(waits).await;
        };

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            () = cancelled => ZendeskError::Cancelled,
            () = expired => ZendeskError::DeadlineExceeded,
        }
    }

    /// Run `fut` unless the context ends first.
    ///
    /// An already-ended context returns its error without polling `fut`.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok, assert_pending, assert_ready};

    #[tokio::test]
    async fn test_background_runs_future() {
        let ctx = Context::background();
        let value = assert_ok!(ctx.run(async { Ok(7) }).await);
        assert_eq!(value, 7);
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn test_done_waits_for_cancel() {
        let (ctx, handle) = Context::background().with_cancel();
        let mut done = tokio_test::task::spawn(ctx.done());

        assert_pending!(done.poll());
        handle.cancel();
        assert!(done.is_woken());
        assert!(matches!(assert_ready!(done.poll()), ZendeskError::Cancelled));
    }

    #[tokio::test]
    async fn test_background_is_never_done() {
        let ctx = Context::background();
        let mut done = tokio_test::task::spawn(ctx.done());
        assert_pending!(done.poll());
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls() {
        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();

        let polled = std::sync::atomic::AtomicBool::new(false);
        let result: Result<()> = ctx
            .run(async {
                polled.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ZendeskError::Cancelled)));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_future() {
        let (ctx, handle) = Context::background().with_cancel();

        let task = tokio::spawn(async move {
            ctx.run(async {
                std::future::pending::<()>().await;
                Ok(())
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(ZendeskError::Cancelled)));
    }

    #[tokio::test]
    async fn test_child_inherits_parent_cancel() {
        let (parent, handle) = Context::background().with_cancel();
        let child = parent.with_timeout(Duration::from_secs(60));
        handle.cancel();
        assert!(matches!(child.err(), Some(ZendeskError::Cancelled)));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));
        let result: Result<()> = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(assert_err!(result), ZendeskError::DeadlineExceeded));
    }

    #[test]
    fn test_deadline_keeps_earliest() {
        let short = Context::background().with_timeout(Duration::from_secs(1));
        let derived = short.with_timeout(Duration::from_secs(60));
        assert_eq!(derived.deadline(), short.deadline());
    }
}
