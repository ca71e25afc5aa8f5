//! Frame sources: where landmark frames come from.
//!
//! The pose estimator runs outside this process; frames arrive as one JSON
//! object per line on stdin or in a file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::recognition::CapturedFrame;

/// Failures while pulling a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("invalid frame at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl FrameError {
    /// Whether the source can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Anything that yields captured frames in order.
pub trait FrameSource: Send {
    /// Next frame, an error for a bad frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Option<Result<CapturedFrame, FrameError>>;
}

// ── JSON lines ─────────────────────────────────────────────

/// Reads one `CapturedFrame` per line; blank lines are skipped.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead + Send> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame, FrameError>> {
        loop {
            self.buf.clear();
            self.line += 1;
            // Raw bytes: a line that is not UTF-8 is a bad frame, not a dead stream
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(source) => {
                    return Some(Err(FrameError::Read {
                        line: self.line,
                        source,
                    }))
                }
            }
            let text = self.buf.trim_ascii();
            if text.is_empty() {
                continue;
            }
            return Some(serde_json::from_slice(text).map_err(|source| FrameError::Parse {
                line: self.line,
                source,
            }));
        }
    }
}

/// Open frames from `path`, or stdin when `path` is `None` or `-`.
pub fn open(path: Option<&Path>) -> Result<Box<dyn FrameSource>, FrameError> {
    match path {
        Some(p) if p != Path::new("-") => {
            let file = File::open(p).map_err(|source| FrameError::Open {
                path: p.to_path_buf(),
                source,
            })?;
            debug!("reading frames from {}", p.display());
            Ok(Box::new(JsonLinesSource::new(BufReader::new(file))))
        }
        _ => {
            debug!("reading frames from stdin");
            Ok(Box::new(JsonLinesSource::new(BufReader::new(io::stdin()))))
        }
    }
}

// ── In-memory ──────────────────────────────────────────────

/// Frames held in memory, yielded front to back.
#[derive(Debug, Default)]
pub struct MemorySource {
    frames: VecDeque<CapturedFrame>,
}

impl MemorySource {
    pub fn new(frames: impl IntoIterator<Item = CapturedFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Option<Result<CapturedFrame, FrameError>> {
        self.frames.pop_front().map(Ok)
    }
}

// ── Tests ──────────────────────────────────────────────────
