//! # Hand-Tracking Pipeline
//!
//! The tracking collaborator runs on its own capture thread and pushes raw
//! frames into a bounded channel. The render tick drains the channel once per
//! frame and keeps only the newest frame.
//!
//! ```text
//! ┌──────────────────┐  Option<RawLandmarks>  ┌──────────────────┐
//! │ capture thread   │ ────────────────────>  │ HandTracker::poll│
//! │ (LandmarkSource) │    crossbeam bounded   │ (render tick)    │
//! └──────────────────┘                        └──────────────────┘
//! ```
//!
//! - One capture thread per tracker, so a source never re-enters itself.
//! - `disable` signals the loop and returns at once; the thread finishes its
//!   current capture, releases the camera handle and off-screen surface, and
//!   is joined by a later `poll`. Calling it twice is harmless.
//! - `shutdown` (and drop) waits for every stopped thread. Never call it from
//!   the render tick.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};
use crate::landmark::{LandmarkFrame, RawLandmarks};

/// Result of asking a source for its next capture.
#[derive(Clone, Debug, PartialEq)]
pub enum SourcePoll {
    /// A capture completed. `None` means no hand was detected.
    Frame(Option<RawLandmarks>),
    /// Nothing new yet.
    Pending,
    /// The source has no more frames.
    Finished,
}

/// Anything that can deliver landmark frames.
///
/// Implemented by the binding to the real tracking library and by
/// [`ScriptedSource`] for simulation.
pub trait LandmarkSource: Send + 'static {
    /// Opens the camera and loads the model.
    ///
    /// # Errors
    ///
    /// [`InputError::TrackingUnavailable`] when the device or model cannot be used.
    fn initialize(&mut self) -> InputResult<()>;

    /// Returns the next capture. May block up to the source's own cadence.
    fn poll_frame(&mut self) -> SourcePoll;

    /// Releases the capture device and any injected surface.
    fn shutdown(&mut self);
}

/// Capture pipeline settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Sleep between polls when the source reports `Pending`.
    pub idle_poll_ms: u64,
    /// Frames buffered between the capture thread and the tick.
    pub channel_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            idle_poll_ms: 5,
            channel_capacity: 8,
        }
    }
}

/// A running capture thread.
struct Worker {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
    frames: Receiver<Option<RawLandmarks>>,
}

/// Owns the capture thread and the most recent validated frame.
pub struct HandTracker {
    config: TrackerConfig,
    worker: Mutex<Option<Worker>>,
    stopping: Mutex<Vec<JoinHandle<()>>>,
    latest: Option<LandmarkFrame>,
    malformed_frames: u64,
}

impl HandTracker {
    /// Creates an idle tracker.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            worker: Mutex::new(None),
            stopping: Mutex::new(Vec::new()),
            latest: None,
            malformed_frames: 0,
        }
    }

    /// Initializes the source and starts the capture thread.
    ///
    /// Waits for any previously stopped source to release its device first.
    ///
    /// # Errors
    ///
    /// - [`InputError::AlreadyRunning`] if a capture thread exists
    /// - [`InputError::TrackingUnavailable`] if initialization or thread spawn fails
    pub fn enable<S: LandmarkSource>(&mut self, mut source: S) -> InputResult<()> {
        if self.worker.get_mut().is_some() {
            return Err(InputError::AlreadyRunning);
        }
        self.reap(true);

        if let Err(err) = source.initialize() {
            source.shutdown();
            return Err(err);
        }

        let (tx, rx) = bounded(self.config.channel_capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));
        let idle = Duration::from_millis(self.config.idle_poll_ms);
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("arbora-capture".into())
            .spawn(move || capture_loop(source, &tx, &thread_stop, idle))
            .map_err(|e| InputError::TrackingUnavailable {
                reason: format!("capture thread: {e}"),
            })?;

        *self.worker.get_mut() = Some(Worker {
            handle,
            stop,
            frames: rx,
        });
        self.latest = None;
        tracing::info!("Hand tracking enabled");
        Ok(())
    }

    /// Tells the capture thread to stop. Idempotent and non-blocking.
    ///
    /// The source is released once its in-flight capture returns.
    pub fn disable(&self) {
        let Some(worker) = self.worker.lock().take() else {
            return;
        };
        worker.stop.store(true, Ordering::Release);
        // Producer sees Disconnected on its next send.
        drop(worker.frames);
        self.stopping.lock().push(worker.handle);
        self.reap(false);
        tracing::info!("Hand tracking disabled");
    }

    /// Disables tracking and waits for every capture thread to exit.
    pub fn shutdown(&self) {
        self.disable();
        self.reap(true);
    }

    /// Stopped capture threads that have not exited yet.
    #[must_use]
    pub fn stopping(&self) -> usize {
        self.stopping.lock().len()
    }

    /// Joins stopped threads; only finished ones unless `wait`.
    fn reap(&self, wait: bool) {
        let mut stopping = self.stopping.lock();
        let mut i = 0;
        while i < stopping.len() {
            if wait || stopping[i].is_finished() {
                if stopping.swap_remove(i).join().is_err() {
                    tracing::warn!("Capture thread panicked during shutdown");
                }
            } else {
                i += 1;
            }
        }
    }

    /// Returns true while a capture thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Drains pending captures and returns the newest validated frame.
    ///
    /// The previous frame is kept until a newer capture arrives, so a
    /// 30 Hz source read by a 60 Hz tick does not flicker to "no hand".
    pub fn poll(&mut self) -> Option<&LandmarkFrame> {
        if !self.stopping.get_mut().is_empty() {
            self.reap(false);
        }
        let mut newest = None;
        let mut finished = false;

        if let Some(worker) = self.worker.get_mut().as_ref() {
            loop {
                match worker.frames.try_recv() {
                    Ok(frame) => newest = Some(frame),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }

        if let Some(capture) = newest {
            self.latest = match capture {
                Some(raw) => match LandmarkFrame::from_raw(&raw) {
                    Ok(frame) => Some(frame),
                    Err(err) => {
                        self.malformed_frames += 1;
                        tracing::debug!("Dropping landmark frame: {}", err);
                        None
                    }
                },
                None => None,
            };
        }

        if finished {
            tracing::info!("Capture pipeline ended");
            self.latest = None;
            self.disable();
        }

        self.latest.as_ref()
    }

    /// Most recent validated frame without draining the channel.
    #[must_use]
    pub fn latest(&self) -> Option<&LandmarkFrame> {
        self.latest.as_ref()
    }

    /// Number of frames rejected at the ingestion boundary.
    #[must_use]
    pub const fn malformed_frames(&self) -> u64 {
        self.malformed_frames
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl Drop for HandTracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of the capture thread.
fn capture_loop<S: LandmarkSource>(
    mut source: S,
    tx: &Sender<Option<RawLandmarks>>,
    stop: &AtomicBool,
    idle: Duration,
) {
    while !stop.load(Ordering::Acquire) {
        match source.poll_frame() {
            SourcePoll::Frame(frame) => match tx.try_send(frame) {
                // Consumer is behind; it only wants the newest frame anyway.
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            },
            SourcePoll::Pending => thread::sleep(idle),
            SourcePoll::Finished => break,
        }
    }
    source.shutdown();
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource: simulation, always available
// ════════════════════════════════════════════════════════════════════════════

/// A source that replays a fixed list of captures at a fixed cadence.
pub struct ScriptedSource {
    frames: VecDeque<Option<RawLandmarks>>,
    cadence: Duration,
    loop_last: bool,
    last: Option<Option<RawLandmarks>>,
    init_error: Option<String>,
    shutdowns: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Replays `frames` once, one every `cadence`.
    #[must_use]
    pub fn new(frames: Vec<Option<RawLandmarks>>, cadence: Duration) -> Self {
        Self {
            frames: frames.into(),
            cadence,
            loop_last: false,
            last: None,
            init_error: None,
            shutdowns: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Keeps repeating the final capture instead of finishing.
    #[must_use]
    pub fn holding_last(mut self) -> Self {
        self.loop_last = true;
        self
    }

    /// Makes `initialize` fail, as a denied camera permission would.
    #[must_use]
    pub fn failing(mut self, reason: &str) -> Self {
        self.init_error = Some(reason.to_owned());
        self
    }

    /// Counter incremented on every `shutdown` call.
    #[must_use]
    pub fn shutdown_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.shutdowns)
    }
}

impl LandmarkSource for ScriptedSource {
    fn initialize(&mut self) -> InputResult<()> {
        match &self.init_error {
            Some(reason) => Err(InputError::TrackingUnavailable {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn poll_frame(&mut self) -> SourcePoll {
        if !self.cadence.is_zero() {
            thread::sleep(self.cadence);
        }
        match self.frames.pop_front() {
            Some(frame) => {
                self.last = Some(frame.clone());
                SourcePoll::Frame(frame)
            }
            None => match (&self.last, self.loop_last) {
                (Some(frame), true) => SourcePoll::Frame(frame.clone()),
                _ => SourcePoll::Finished,
            },
        }
    }

    fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::AcqRel);
    }
}
