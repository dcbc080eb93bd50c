//! Cancellable periodic background work.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::warn;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A named background thread that runs `tick` once per interval.
///
/// The task ends when [`PeriodicTask::cancel`] is called or the value is
/// dropped; both wake the thread immediately and join it, so no tick runs
/// after cancellation returns.
pub struct PeriodicTask {
    name: String,
    cancel: Option<Sender<()>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn the task. The first tick happens one `interval` after spawning.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let interval = interval.max(MIN_INTERVAL);
        let (cancel, cancelled) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || loop {
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            name: name.to_string(),
            cancel: Some(cancel),
            thread_handle: Some(handle),
        })
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Stop the task and wait for its thread. Safe to call more than once.
    pub fn cancel(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        self.cancel.take();
        if let Some(handle) = self.thread_handle.take() {
            if handle.thread().id() == thread::current().id() {
                warn!("{} cancelled from its own thread; skipping join", self.name);
            } else if handle.join().is_err() {
                warn!("{} thread panicked during join", self.name);
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
