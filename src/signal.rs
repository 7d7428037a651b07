// Signal relay - forwards signals received by hottest to the `go test` child
//
// Every signal the listener observes is delivered to the child exactly once.
// A child that already exited is not an error; other delivery errors are
// collected and reported after the run, and the relay keeps going.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::{fmt, io};

use futures::stream::{BoxStream, Stream, StreamExt};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Platform signal number
pub type RawSignal = i32;

/// Error delivering a signal to the child
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("process already finished")]
    ProcessDone,
    #[error("{0}")]
    Failed(#[source] io::Error),
}

/// Something signals can be delivered to
pub trait SignalTarget: Send {
    fn deliver(&self, signal: RawSignal) -> Result<(), DeliveryError>;
}

/// A signal that could not be delivered
#[derive(Debug)]
pub struct RelayFailure {
    pub signal: RawSignal,
    pub error: DeliveryError,
}

impl fmt::Display for RelayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to send {}: {}", signal_name(self.signal), self.error)
    }
}

impl std::error::Error for RelayFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// What happened to the signals received during one run
#[derive(Debug, Default)]
pub struct RelaySummary {
    pub received: usize,
    pub delivered: usize,
    /// Signals that arrived after the child had exited
    pub already_exited: usize,
    pub failures: Vec<RelayFailure>,
}

impl RelaySummary {
    fn forward<T: SignalTarget>(&mut self, target: &T, signal: RawSignal) {
        self.received += 1;
        debug!("Relaying {} to child", signal_name(signal));

        match target.deliver(signal) {
            Ok(()) => self.delivered += 1,
            Err(DeliveryError::ProcessDone) => self.already_exited += 1,
            Err(error) => {
                debug!("Failed to relay {}: {}", signal_name(signal), error);
                self.failures.push(RelayFailure { signal, error });
            }
        }
    }
}

/// Deliver each signal from `signals` to `target` until `stop` resolves or the
/// signal stream ends.
pub async fn relay_signals<S, T>(
    mut signals: S,
    target: T,
    mut stop: oneshot::Receiver<()>,
) -> RelaySummary
where
    S: Stream<Item = RawSignal> + Unpin,
    T: SignalTarget,
{
    let mut summary = RelaySummary::default();

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => break,
            signal = signals.next() => match signal {
                Some(signal) => summary.forward(&target, signal),
                None => break,
            },
        }
    }

    summary
}

/// A relay loop running on its own task
pub struct SignalRelay {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<RelaySummary>,
}

impl SignalRelay {
    /// Start relaying in the background
    pub fn spawn<S, T>(signals: S, target: T) -> Self
    where
        S: Stream<Item = RawSignal> + Unpin + Send + 'static,
        T: SignalTarget + 'static,
    {
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(relay_signals(signals, target, stop_rx));
        Self { stop, handle }
    }

    /// Stop the loop and collect its summary
    pub async fn stop(self) -> RelaySummary {
        // The loop may already be gone if the signal stream ended
        let _ = self.stop.send(());
        match self.handle.await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Signal relay task failed: {}", e);
                RelaySummary::default()
            }
        }
    }
}

/// Stream of the signals hottest relays to its child
pub fn listen() -> io::Result<BoxStream<'static, RawSignal>> {
    imp::listen()
}

/// Human-readable name of a signal number
pub fn signal_name(signal: RawSignal) -> String {
    imp::signal_name(signal)
}

pub use imp::ChildProcess;

#[cfg(unix)]
mod imp {
    use super::*;
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use tokio::signal::unix::{SignalKind, signal};
    use tokio_stream::wrappers::SignalStream;

    /// Signals that can be caught without taking over job control
    const RELAYED: [Signal; 7] = [
        Signal::SIGHUP,
        Signal::SIGINT,
        Signal::SIGQUIT,
        Signal::SIGTERM,
        Signal::SIGUSR1,
        Signal::SIGUSR2,
        Signal::SIGWINCH,
    ];

    pub(super) fn listen() -> io::Result<BoxStream<'static, RawSignal>> {
        let mut streams = Vec::with_capacity(RELAYED.len());
        for sig in RELAYED {
            let raw = sig as RawSignal;
            let stream = SignalStream::new(signal(SignalKind::from_raw(raw))?).map(move |()| raw);
            streams.push(stream);
        }
        Ok(futures::stream::select_all(streams).boxed())
    }

    pub(super) fn signal_name(signal: RawSignal) -> String {
        match Signal::try_from(signal) {
            Ok(sig) => sig.as_str().to_string(),
            Err(_) => format!("signal {signal}"),
        }
    }

    /// A running child process, addressed by pid.
    ///
    /// Clones share the reaped flag; once it is set the pid may belong to
    /// another process and nothing is sent to it.
    #[derive(Debug, Clone)]
    pub struct ChildProcess {
        pid: Pid,
        reaped: Arc<AtomicBool>,
    }

    impl ChildProcess {
        pub fn new(pid: u32) -> Self {
            Self {
                pid: Pid::from_raw(pid as i32),
                reaped: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Record that the child was waited for
        pub fn mark_reaped(&self) {
            self.reaped.store(true, Ordering::SeqCst);
        }
    }

    impl SignalTarget for ChildProcess {
        fn deliver(&self, signal: RawSignal) -> Result<(), DeliveryError> {
            if self.reaped.load(Ordering::SeqCst) {
                return Err(DeliveryError::ProcessDone);
            }
            let signal =
                Signal::try_from(signal).map_err(|e| DeliveryError::Failed(io::Error::from(e)))?;
            match kill(self.pid, signal) {
                Ok(()) => Ok(()),
                Err(Errno::ESRCH) => Err(DeliveryError::ProcessDone),
                Err(e) => Err(DeliveryError::Failed(io::Error::from(e))),
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    const CTRL_C: RawSignal = 2;

    pub(super) fn listen() -> io::Result<BoxStream<'static, RawSignal>> {
        let stream = futures::stream::unfold((), |()| async {
            tokio::signal::ctrl_c().await.ok().map(|()| (CTRL_C, ()))
        });
        Ok(stream.boxed())
    }

    pub(super) fn signal_name(signal: RawSignal) -> String {
        match signal {
            CTRL_C => "CTRL_C".to_string(),
            other => format!("signal {other}"),
        }
    }

    /// A running child process.
    ///
    /// The console delivers Ctrl-C to every process attached to it, so the
    /// child already has the event and delivery is a no-op.
    #[derive(Debug, Clone)]
    pub struct ChildProcess {
        _pid: u32,
        reaped: Arc<AtomicBool>,
    }

    impl ChildProcess {
        pub fn new(pid: u32) -> Self {
            Self {
                _pid: pid,
                reaped: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Record that the child was waited for
        pub fn mark_reaped(&self) {
            self.reaped.store(true, Ordering::SeqCst);
        }
    }

    impl SignalTarget for ChildProcess {
        fn deliver(&self, _signal: RawSignal) -> Result<(), DeliveryError> {
            if self.reaped.load(Ordering::SeqCst) {
                return Err(DeliveryError::ProcessDone);
            }
            Ok(())
        }
    }
}
