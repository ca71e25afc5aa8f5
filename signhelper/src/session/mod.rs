//! Translation session: capture → classify → display.
//!
//! A capture thread pulls frames from a `FrameSource`, samples every Nth
//! one and hands it to a classifier thread over a bounded channel.
//! Classifications flow back to the calling thread, which alone owns the
//! `Translator`.  End of input, a shutdown request or SIGINT/SIGTERM stops
//! capture; the channels then close in cascade.

pub mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::recognition::{
    CapturedFrame, Classification, GestureClassifier, Translator, TranslatorEvent,
};
use source::FrameSource;

/// Set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install handlers so a signal ends capture gracefully.
///
/// A second signal exits immediately, for a capture thread stuck on a
/// blocking read.
pub fn install_signal_handlers() {
    let handler = signal_handler as extern "C" fn(libc::c_int) as libc::sighandler_t;
    unsafe {
        libc::signal(libc::SIGTERM, handler);
        libc::signal(libc::SIGINT, handler);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    if SHUTDOWN_REQUESTED.swap(true, Ordering::SeqCst) {
        unsafe { libc::_exit(130) };
    }
}

fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

// ── Config ─────────────────────────────────────────────────

/// Pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Forward one frame out of this many.
    pub sample_every: u32,
    /// Frames that may wait for the classifier.
    pub queue_depth: usize,
    /// Sleep to honor frame timestamps, and drop frames while the
    /// classifier is busy, like a live camera.
    pub realtime: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_every: 3,
            queue_depth: 4,
            realtime: false,
        }
    }
}

// ── Sampling ───────────────────────────────────────────────

/// Passes every Nth frame (the Nth, 2Nth, ...).
#[derive(Debug, Clone)]
pub struct FrameSampler {
    every: u64,
    seen: u64,
}

impl FrameSampler {
    pub fn new(every: u32) -> Self {
        Self {
            every: u64::from(every.max(1)),
            seen: 0,
        }
    }

    /// Count a frame; true if it should be processed.
    pub fn admit(&mut self) -> bool {
        self.seen += 1;
        self.seen % self.every == 0
    }
}

// ── Control ────────────────────────────────────────────────

/// Flags shared with the capture thread.
#[derive(Debug, Clone)]
pub struct SessionControl {
    active: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl SessionControl {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Frames captured while paused are dropped.
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Ask capture to end after the current frame.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed) || shutdown_requested()
    }
}

impl Default for SessionControl {
    fn default() -> Self {
        Self::new()
    }
}

// ── Report ─────────────────────────────────────────────────

/// Counters and outcome of a finished session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionReport {
    /// Frames pulled from the source.
    pub frames_read: u64,
    /// Frames that failed to parse.
    pub frames_invalid: u64,
    /// Frames dropped because the session was paused.
    pub frames_inactive: u64,
    /// Frames handed to the classifier.
    pub frames_sampled: u64,
    /// Sampled frames dropped because the classifier was busy.
    pub frames_dropped: u64,
    /// Final sentence.
    pub sentence: String,
}

#[derive(Debug, Default)]
struct CaptureStats {
    read: u64,
    invalid: u64,
    inactive: u64,
    sampled: u64,
    dropped: u64,
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    Panicked(&'static str),

    #[error("frame source failed: {0}")]
    Source(#[from] source::FrameError),
}

struct SampledFrame {
    frame: CapturedFrame,
    at: Duration,
}

struct Classified {
    classification: Classification,
    at: Duration,
}

// ── Session ────────────────────────────────────────────────

/// One run of the translation pipeline.
pub struct TranslationSession {
    pub config: SessionConfig,
    classifier: GestureClassifier,
    translator: Translator,
    control: SessionControl,
}

impl TranslationSession {
    pub fn new(config: SessionConfig, classifier: GestureClassifier, translator: Translator) -> Self {
        Self {
            config,
            classifier,
            translator,
            control: SessionControl::new(),
        }
    }

    /// Handle for pausing or stopping from elsewhere.
    pub fn control(&self) -> SessionControl {
        self.control.clone()
    }

    /// Run until the source is exhausted or shutdown is requested,
    /// calling `on_event` on this thread for every translator event.
    pub fn run<F>(
        mut self,
        source: Box<dyn FrameSource>,
        mut on_event: F,
    ) -> Result<SessionReport, SessionError>
    where
        F: FnMut(&TranslatorEvent),
    {
        let (frame_tx, frame_rx) = bounded::<SampledFrame>(self.config.queue_depth.max(1));
        let (result_tx, result_rx) = unbounded::<Classified>();

        let started = Instant::now();
        let capture = {
            let config = self.config.clone();
            let control = self.control.clone();
            thread::Builder::new()
                .name("capture".into())
                .spawn(move || capture_loop(source, config, control, frame_tx, started))
                .map_err(|source| SessionError::Spawn {
                    name: "capture",
                    source,
                })?
        };
        let classify = {
            let classifier = self.classifier.clone();
            thread::Builder::new()
                .name("classify".into())
                .spawn(move || classify_loop(classifier, frame_rx, result_tx))
                .map_err(|source| SessionError::Spawn {
                    name: "classify",
                    source,
                })?
        };

        info!(
            "translation session started (every {} frame(s), realtime {})",
            self.config.sample_every, self.config.realtime
        );
        self.translator.start();
        for result in result_rx.iter() {
            for event in self.translator.apply(result.classification, result.at) {
                on_event(&event);
            }
        }

        let stats = capture
            .join()
            .map_err(|_| SessionError::Panicked("capture"))??;
        classify
            .join()
            .map_err(|_| SessionError::Panicked("classify"))?;

        let report = SessionReport {
            frames_read: stats.read,
            frames_invalid: stats.invalid,
            frames_inactive: stats.inactive,
            frames_sampled: stats.sampled,
            frames_dropped: stats.dropped,
            sentence: self.translator.sentence().text(),
        };
        self.translator.stop();
        info!(
            "translation session ended: {} read, {} sampled, {} dropped, {} invalid",
            report.frames_read, report.frames_sampled, report.frames_dropped, report.frames_invalid
        );
        Ok(report)
    }
}

/// Capture thread body.
fn capture_loop(
    mut source: Box<dyn FrameSource>,
    config: SessionConfig,
    control: SessionControl,
    tx: Sender<SampledFrame>,
    started: Instant,
) -> Result<CaptureStats, SessionError> {
    let mut stats = CaptureStats::default();
    let mut sampler = FrameSampler::new(config.sample_every);

    while !control.should_stop() {
        let frame = match source.next_frame() {
            None => break,
            Some(Ok(frame)) => frame,
            Some(Err(e)) if e.is_recoverable() => {
                warn!("skipping frame: {}", e);
                stats.invalid += 1;
                continue;
            }
            Some(Err(e)) => return Err(e.into()),
        };
        stats.read += 1;

        let at = match frame.timestamp_ms {
            Some(ms) => {
                let at = Duration::from_millis(ms);
                if config.realtime {
                    if let Some(wait) = at.checked_sub(started.elapsed()) {
                        thread::sleep(wait);
                    }
                }
                at
            }
            None => started.elapsed(),
        };

        if !control.is_active() {
            stats.inactive += 1;
            continue;
        }
        if !sampler.admit() {
            continue;
        }

        let job = SampledFrame { frame, at };
        if config.realtime {
            match tx.try_send(job) {
                Ok(()) => stats.sampled += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("classifier busy, dropping frame at {:?}", at);
                    stats.dropped += 1;
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        } else {
            if tx.send(job).is_err() {
                break;
            }
            stats.sampled += 1;
        }
    }

    debug!("capture finished after {} frame(s)", stats.read);
    Ok(stats)
}

/// Classifier thread body.
fn classify_loop(
    classifier: GestureClassifier,
    rx: Receiver<SampledFrame>,
    tx: Sender<Classified>,
) {
    for job in rx.iter() {
        let classification = classifier.classify(&job.frame.hands);
        if tx
            .send(Classified {
                classification,
                at: job.at,
            })
            .is_err()
        {
            break;
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
