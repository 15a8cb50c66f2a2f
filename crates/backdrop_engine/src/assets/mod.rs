//! Asset loading
//!
//! The backdrop has exactly one asynchronous dependency: the font used to
//! extrude the logo. Loads are modeled as a one-shot channel that delivers a
//! single `Result`, wrapped in a [`TimedLoad`] that turns a load which never
//! finishes into [`AssetError::TimedOut`] once its deadline passes. The frame
//! loop polls without blocking.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError};
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes are not a usable font
    #[error("Failed to parse font: {0}")]
    Parse(String),

    /// The loader went away without delivering a result
    #[error("Loader disconnected before completing")]
    Disconnected,

    /// The deadline passed before the load completed
    #[error("Load timed out after {0:.1}s")]
    TimedOut(f32),
}

/// Raw font file contents, validated as a parseable font
#[derive(Clone, PartialEq, Eq)]
pub struct FontData {
    name: String,
    bytes: Arc<[u8]>,
}

impl FontData {
    /// Wrap font bytes without validation
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read and validate a font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let path = path.as_ref();
        log::debug!("Loading font from: {:?}", path);

        let bytes = std::fs::read(path)?;
        fontdue::Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
            .map_err(|e| AssetError::Parse(format!("{}: {e}", path.display())))?;

        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().to_string());
        log::info!("Loaded font '{}' ({} bytes)", name, bytes.len());
        Ok(Self::new(name, bytes))
    }

    /// Font name, derived from the file stem
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Font file bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Completion side of a pending load; consumed by the single delivery
#[derive(Debug)]
pub struct AssetSender<T> {
    sender: Sender<Result<T, AssetError>>,
}

impl<T> AssetSender<T> {
    /// Deliver the result
    pub fn complete(self, result: Result<T, AssetError>) {
        // The receiver may already have timed out and gone away.
        if self.sender.send(result).is_err() {
            log::debug!("Asset result arrived after the load was abandoned");
        }
    }
}

/// A load that delivers exactly one result
#[derive(Debug)]
pub struct PendingAsset<T> {
    receiver: Receiver<Result<T, AssetError>>,
}

impl<T> PendingAsset<T> {
    /// Create a connected sender/pending pair
    pub fn channel() -> (AssetSender<T>, Self) {
        let (sender, receiver) = bounded(1);
        (AssetSender { sender }, Self { receiver })
    }

    /// A load that has already completed
    pub fn ready(result: Result<T, AssetError>) -> Self {
        let (sender, pending) = Self::channel();
        sender.complete(result);
        pending
    }

    /// Take the result if it has arrived, without blocking
    pub fn try_take(&self) -> Option<Result<T, AssetError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AssetError::Disconnected)),
        }
    }
}

/// A pending load with a deadline on the frame clock
///
/// The clock is whatever the caller polls with; it need not start at zero.
#[derive(Debug)]
pub struct TimedLoad<T> {
    pending: Option<PendingAsset<T>>,
    started_at: Option<f32>,
    timeout: f32,
}

impl<T> TimedLoad<T> {
    /// Bound `pending` to `timeout` seconds after the first poll
    pub fn new(pending: PendingAsset<T>, timeout: f32) -> Self {
        Self {
            pending: Some(pending),
            started_at: None,
            timeout,
        }
    }

    /// Bound `pending` to `timeout` seconds after clock time `started_at`
    pub fn starting_at(pending: PendingAsset<T>, started_at: f32, timeout: f32) -> Self {
        Self {
            pending: Some(pending),
            started_at: Some(started_at),
            timeout,
        }
    }

    /// Poll at clock time `elapsed`
    ///
    /// Returns the final result exactly once: the delivered result if it has
    /// arrived, otherwise [`AssetError::TimedOut`] once the deadline passes.
    /// Every call after that returns `None`.
    pub fn poll(&mut self, elapsed: f32) -> Option<Result<T, AssetError>> {
        let pending = self.pending.as_ref()?;
        let started_at = *self.started_at.get_or_insert(elapsed);

        let outcome = match pending.try_take() {
            Some(result) => Some(result),
            None if elapsed - started_at >= self.timeout => Some(Err(AssetError::TimedOut(self.timeout))),
            None => None,
        };

        if outcome.is_some() {
            self.pending = None;
        }
        outcome
    }

    /// Whether the final result has been handed out
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }
}

/// Source of asynchronously loaded assets
pub trait AssetLoader {
    /// Begin loading the font at `path`
    fn load_font(&mut self, path: &str) -> PendingAsset<FontData>;
}

/// Loads fonts from disk on a worker thread
#[derive(Debug, Default)]
pub struct FileFontLoader;

impl FileFontLoader {
    /// Create a loader
    pub fn new() -> Self {
        Self
    }
}

impl AssetLoader for FileFontLoader {
    fn load_font(&mut self, path: &str) -> PendingAsset<FontData> {
        let (sender, pending) = PendingAsset::channel();
        let path = path.to_string();

        let spawned = std::thread::Builder::new()
            .name("font-loader".to_string())
            .spawn(move || sender.complete(FontData::from_file(&path)));

        match spawned {
            Ok(_) => pending,
            Err(e) => PendingAsset::ready(Err(AssetError::Io(e))),
        }
    }
}

/// One-shot "loading complete" latch
///
/// Fires at most once however many completion paths race to it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadySignal {
    fired: bool,
}

impl ReadySignal {
    /// Create an unfired signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal; `true` only for the call that actually fired it
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    /// Whether the signal has fired
    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_load_delivers_once() {
        let mut load = TimedLoad::new(PendingAsset::ready(Ok(7)), 5.0);
        assert!(matches!(load.poll(0.0), Some(Ok(7))));
        assert!(load.is_settled());
        assert!(load.poll(10.0).is_none());
    }

    #[test]
    fn test_stalled_load_times_out() {
        let (_sender, pending) = PendingAsset::<u32>::channel();
        let mut load = TimedLoad::starting_at(pending, 1.0, 5.0);
        assert!(load.poll(3.0).is_none());
        assert!(load.poll(5.9).is_none());
        assert!(matches!(load.poll(6.0), Some(Err(AssetError::TimedOut(_)))));
        assert!(load.poll(7.0).is_none());
    }

    #[test]
    fn test_deadline_anchors_on_first_poll() {
        let (_sender, pending) = PendingAsset::<u32>::channel();
        let mut load = TimedLoad::new(pending, 5.0);
        assert!(load.poll(100.0).is_none());
        assert!(load.poll(104.9).is_none());
        assert!(matches!(load.poll(105.0), Some(Err(AssetError::TimedOut(_)))));
    }

    #[test]
    fn test_result_wins_over_deadline_on_same_poll() {
        let (sender, pending) = PendingAsset::channel();
        let mut load = TimedLoad::starting_at(pending, 0.0, 1.0);
        sender.complete(Ok("late but present"));
        assert!(matches!(load.poll(2.0), Some(Ok("late but present"))));
    }

    #[test]
    fn test_dropped_sender_reports_disconnect() {
        let (sender, pending) = PendingAsset::<u8>::channel();
        drop(sender);
        assert!(matches!(pending.try_take(), Some(Err(AssetError::Disconnected))));
    }

    #[test]
    fn test_ready_signal_fires_once() {
        let mut signal = ReadySignal::new();
        assert!(!signal.is_fired());
        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[test]
    fn test_missing_font_file_fails() {
        let mut loader = FileFontLoader::new();
        let pending = loader.load_font("definitely/not/here.ttf");
        let mut load = TimedLoad::new(pending, f32::MAX);
        let outcome = loop {
            if let Some(outcome) = load.poll(0.0) {
                break outcome;
            }
            std::thread::yield_now();
        };
        assert!(matches!(outcome, Err(AssetError::Io(_))));
    }
}
