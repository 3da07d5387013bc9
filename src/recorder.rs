//! Handoff of finished runs to storage and announcement
//!
//! The timer never waits on persistence. A finished run is pushed into an
//! unbounded channel by [`RunSubmitter::submit`] and a recorder task drains it
//! into a [`RunSink`] at its own pace.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::types::PlayerSlot;

/// A run that reached the end zone and passed every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CompletedRun {
    pub player: PlayerSlot,
    /// Course name as registered by the map
    pub course: String,
    pub course_number: u32,
    pub mode: String,
    /// Final time in seconds
    pub time: f64,
    pub teleports: u32,
    /// False if the run was invalidated at any point
    pub valid: bool,
}

/// Destination for finished runs (database, global API, chat announcer).
#[async_trait::async_trait]
pub trait RunSink: Send + 'static {
    /// Store or announce one run.
    ///
    /// Errors are logged by the recorder and the run is dropped; the next run
    /// is attempted normally.
    async fn store(&mut self, run: CompletedRun) -> anyhow::Result<()>;
}

/// Non-blocking sender of finished runs.
#[derive(Debug, Clone)]
pub struct RunSubmitter {
    tx: mpsc::UnboundedSender<CompletedRun>,
}

impl RunSubmitter {
    /// Queue a run. Returns false if no recorder is listening any more.
    pub fn submit(&self, run: CompletedRun) -> bool {
        match self.tx.send(run) {
            Ok(()) => true,
            Err(mpsc::error::SendError(run)) => {
                warn!(player = %run.player, course = %run.course, "Run recorder is gone, dropping run");
                false
            }
        }
    }
}

/// Result of spawning the recorder task
pub struct RecorderChannels {
    /// Sender handed to the timer
    pub submitter: RunSubmitter,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
}

/// Recorder spawns and manages the run storage task
pub struct RunRecorder;

impl RunRecorder {
    /// Create a bare channel for hosts that drive their own receive loop.
    pub fn channel() -> (RunSubmitter, mpsc::UnboundedReceiver<CompletedRun>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RunSubmitter { tx }, rx)
    }

    /// Spawn a task that drains submitted runs into `sink`.
    ///
    /// Must be called from within a tokio runtime. The task ends when the
    /// token is cancelled or every submitter has been dropped.
    pub fn spawn<S>(sink: S) -> RecorderChannels
    where
        S: RunSink,
    {
        let (submitter, rx) = Self::channel();
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::recorder_task(sink, rx, cancel_task).await;
        });

        RecorderChannels { submitter, cancel }
    }

    async fn recorder_task<S>(
        mut sink: S,
        mut rx: mpsc::UnboundedReceiver<CompletedRun>,
        cancel: CancellationToken,
    ) where
        S: RunSink,
    {
        info!("Run recorder task started");
        let mut stored = 0u64;
        let mut failed = 0u64;

        loop {
            let run = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Run recorder cancelled");
                    break;
                }
                run = rx.recv() => run,
            };

            let Some(run) = run else {
                debug!("All run submitters dropped, shutting down");
                break;
            };

            let player = run.player;
            let course = run.course.clone();
            match sink.store(run).await {
                Ok(()) => {
                    stored += 1;
                    debug!(player = %player, course = %course, "Run stored");
                }
                Err(e) => {
                    failed += 1;
                    warn!(player = %player, course = %course, "Failed to store run: {:#}", e);
                }
            }
        }

        info!(stored, failed, "Run recorder task ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct MemorySink {
        runs: Arc<Mutex<Vec<CompletedRun>>>,
        fail_course: Option<String>,
    }

    #[async_trait::async_trait]
    impl RunSink for MemorySink {
        async fn store(&mut self, run: CompletedRun) -> anyhow::Result<()> {
            if self.fail_course.as_deref() == Some(run.course.as_str()) {
                anyhow::bail!("database unavailable");
            }
            self.runs.lock().unwrap().push(run);
            Ok(())
        }
    }

    fn run(course: &str, time: f64) -> CompletedRun {
        CompletedRun {
            player: PlayerSlot(3),
            course: course.to_string(),
            course_number: 1,
            mode: "classic".to_string(),
            time,
            teleports: 0,
            valid: true,
        }
    }

    #[tokio::test]
    async fn recorder_drains_runs_into_sink() {
        let _ = tracing_subscriber::fmt::try_init();
        let runs = Arc::new(Mutex::new(Vec::new()));
        let sink = MemorySink { runs: runs.clone(), fail_course: Some("broken".into()) };

        let channels = RunRecorder::spawn(sink);
        assert!(channels.submitter.submit(run("main", 12.5)));
        assert!(channels.submitter.submit(run("broken", 1.0)));
        assert!(channels.submitter.submit(run("bonus", 30.0)));

        // Dropping the only submitter lets the task drain and finish.
        drop(channels.submitter);
        for _ in 0..100 {
            if runs.lock().unwrap().len() == 2 {
                break;
            }
            tokio::task::yield_now().await;
        }

        let stored = runs.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].course, "main");
        assert_eq!(stored[1].course, "bonus");
    }

    #[test]
    fn submit_without_receiver_reports_failure() {
        let (submitter, rx) = RunRecorder::channel();
        drop(rx);
        assert!(!submitter.submit(run("main", 1.0)));
    }

    #[test]
    fn bare_channel_delivers_in_order() {
        let (submitter, mut rx) = RunRecorder::channel();
        submitter.submit(run("a", 1.0));
        submitter.submit(run("b", 2.0));
        assert_eq!(rx.try_recv().unwrap().course, "a");
        assert_eq!(rx.try_recv().unwrap().course, "b");
        assert!(rx.try_recv().is_err());
    }
}
