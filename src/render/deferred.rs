use std::panic::{catch_unwind, AssertUnwindSafe};

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use crate::error::{Error, Result};

/// A result that a worker on the rayon pool will deliver later.
///
/// Once spawned the job runs to completion; there is no cancellation.
/// Dropping the `Deferred` discards the result when it arrives.
#[derive(Debug)]
pub struct Deferred<T> {
    rx: Receiver<Result<T>>,
    fail: fn(String) -> Error,
}

impl<T: Send + 'static> Deferred<T> {
    /// Run `job` on the pool. A panic or a lost worker is a `RenderFailure`.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        Self::spawn_with(Error::RenderFailure, job)
    }

    /// Like `spawn`, with `fail` building the error for a panic or a lost worker.
    pub fn spawn_with<F>(fail: fn(String) -> Error, job: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        rayon::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(job))
                .unwrap_or_else(|_| Err(fail("worker panicked".into())));
            // The receiver may already be gone; nobody is waiting then.
            let _ = tx.send(result);
        });

        Self { rx, fail }
    }

    /// An already-settled result.
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = bounded(1);
        let _ = tx.send(result);
        Self {
            rx,
            fail: Error::RenderFailure,
        }
    }

    /// Block until the worker delivers.
    pub fn wait(self) -> Result<T> {
        let fail = self.fail;
        self.rx.recv().unwrap_or_else(|_| Err(lost(fail)))
    }

    /// The result if it has arrived, without blocking.
    pub fn try_wait(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(lost(self.fail))),
        }
    }
}

fn lost(fail: fn(String) -> Error) -> Error {
    fail("worker exited without delivering a result".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_value() {
        let deferred = Deferred::spawn(|| Ok(21 * 2));
        assert_eq!(deferred.wait().ok(), Some(42));
    }

    #[test]
    fn delivers_error() {
        let deferred: Deferred<()> =
            Deferred::spawn(|| Err(Error::RenderFailure("backend refused".into())));
        assert!(matches!(deferred.wait(), Err(Error::RenderFailure(_))));
    }

    #[test]
    fn panicking_worker_is_a_render_failure() {
        let deferred: Deferred<u32> = Deferred::spawn(|| panic!("boom"));
        assert!(matches!(deferred.wait(), Err(Error::RenderFailure(_))));
    }

    #[test]
    fn panicking_loader_keeps_its_failure_kind() {
        let deferred: Deferred<u32> =
            Deferred::spawn_with(Error::DecodeFailure, || panic!("corrupt header"));
        assert!(matches!(deferred.wait(), Err(Error::DecodeFailure(_))));
    }

    #[test]
    fn try_wait_eventually_settles() {
        let mut deferred = Deferred::ready(Ok("done"));
        assert_eq!(deferred.try_wait().and_then(|r| r.ok()), Some("done"));
        // The single result has been taken and the sender is gone.
        assert!(matches!(deferred.try_wait(), Some(Err(Error::RenderFailure(_)))));
    }
}
