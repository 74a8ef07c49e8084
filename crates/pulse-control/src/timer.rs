//! Cancellable repeating task on its own thread.
//!
//! Used for both the reroll timer and the frame timer. The task runs every
//! `interval` until it returns `false` or the handle is stopped. Ticks that
//! come due while the task is still running collapse into one, so a slow
//! task or a paused process never causes a catch-up burst.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Sender};

pub struct RepeatingTask {
    name: String,
    running: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RepeatingTask {
    /// Start calling `task` every `interval`. The first call happens one
    /// interval after start.
    pub fn start<F>(name: &str, interval: Duration, mut task: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let thread_name = name.to_string();

        let thread = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let ticker = channel::tick(interval);
                loop {
                    crossbeam::select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if !running_clone.load(Ordering::Acquire) {
                                break;
                            }
                            if !task() {
                                log::debug!("{} finished on its own", thread_name);
                                break;
                            }
                        }
                    }
                }
                running_clone.store(false, Ordering::Release);
            })
            .expect("failed to spawn timer thread");

        log::debug!("{} started, every {:?}", name, interval);
        Self {
            name: name.to_string(),
            running,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        }
    }

    /// Stop the task and wait for its thread. A call already in flight
    /// completes first. Calling `stop` again, or from inside the task
    /// itself, is a no-op apart from clearing the running flag.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        // Dropping the sender disconnects the channel, which wakes the select.
        let was_live = self.stop_tx.take().is_some();
        if let Some(thread) = self.thread.take() {
            if thread.thread().id() == thread::current().id() {
                // Joining ourselves would deadlock; the loop exits after this call returns.
                return;
            }
            let _ = thread.join();
        }
        if was_live {
            log::debug!("{} stopped", self.name);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.stop();
    }
}
