//! Bridges process signals onto the control loop's request flags

use crate::errors::{FanRegError, Result};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Shutdown and reload requests, raised asynchronously and polled once per iteration
#[derive(Debug, Default)]
pub struct ControlFlags {
    shutdown: AtomicBool,
    reload: AtomicBool,
    wake: Notify,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Sticky: once set it stays set
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Consume a pending reload request
    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }

    /// Sleep for `interval`, returning early if a request arrives
    pub async fn wait(&self, interval: Duration) {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = self.wake.notified() => {}
        }
    }
}

fn listen(kind: SignalKind, name: &'static str) -> Result<Signal> {
    signal(kind).map_err(|source| FanRegError::SignalSetup { signal: name, source })
}

/// Install listeners for the termination group (SIGINT, SIGTERM, SIGTSTP)
/// and the reload group (SIGHUP, SIGUSR1).
///
/// Must be called from within a tokio runtime. Any registration failure aborts startup.
pub fn install(flags: Arc<ControlFlags>) -> Result<JoinHandle<()>> {
    let mut int = listen(SignalKind::interrupt(), "SIGINT")?;
    let mut term = listen(SignalKind::terminate(), "SIGTERM")?;
    let mut tstp = listen(SignalKind::from_raw(libc::SIGTSTP), "SIGTSTP")?;
    let mut hup = listen(SignalKind::hangup(), "SIGHUP")?;
    let mut usr1 = listen(SignalKind::user_defined1(), "SIGUSR1")?;

    Ok(tokio::spawn(async move {
        loop {
            let (name, shutdown) = tokio::select! {
                Some(()) = int.recv() => ("SIGINT", true),
                Some(()) = term.recv() => ("SIGTERM", true),
                Some(()) = tstp.recv() => ("SIGTSTP", true),
                Some(()) = hup.recv() => ("SIGHUP", false),
                Some(()) = usr1.recv() => ("SIGUSR1", false),
                else => break,
            };

            info!("caught signal: {}", name);
            if shutdown {
                flags.request_shutdown();
            } else {
                flags.request_reload();
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_reload_is_consumed_once() {
        let flags = ControlFlags::new();
        assert!(!flags.take_reload());
        flags.request_reload();
        assert!(flags.take_reload());
        assert!(!flags.take_reload());
    }

    #[test]
    fn test_shutdown_is_sticky() {
        let flags = ControlFlags::new();
        flags.request_shutdown();
        assert!(flags.shutdown_requested());
        assert!(flags.shutdown_requested());
    }

    #[tokio::test]
    async fn test_request_cuts_wait_short() {
        let flags = ControlFlags::new();
        flags.request_reload();

        let started = Instant::now();
        flags.wait(Duration::from_secs(3600)).await;
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_reload_signal_sets_flag() {
        let flags = Arc::new(ControlFlags::new());
        let handle = install(flags.clone()).unwrap();

        // SAFETY: raise only delivers SIGUSR1 to this process, which tokio now handles
        unsafe {
            libc::raise(libc::SIGUSR1);
        }

        let _ = tokio::time::timeout(Duration::from_secs(5), flags.wait(Duration::from_secs(5))).await;
        assert!(flags.take_reload());
        assert!(!flags.shutdown_requested());
        handle.abort();
    }
}
