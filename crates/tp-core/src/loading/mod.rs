//! Asynchronous asset loading
//!
//! Every load runs on its own worker thread and completes a [`LoadHandle`].
//! The frame loop polls a [`LoadingManager`] once per frame; that poll is the
//! only place finished assets enter the session.

mod assets;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

pub use assets::{
    AssetError, ImageData, LoadedAsset, ModelData, ModelPart, Pixels, TextureSlot, VideoFrames,
    load_environment, load_model, load_texture, load_video, rasterize_title,
};

type Slot<T> = Arc<Mutex<Option<Result<T, AssetError>>>>;

/// Completion handle for one asset load
#[derive(Debug)]
pub struct LoadHandle<T> {
    label: String,
    slot: Slot<T>,
    done: Arc<AtomicBool>,
}

/// Write side of a [`LoadHandle`]
#[derive(Debug)]
pub struct Completer<T> {
    slot: Slot<T>,
    done: Arc<AtomicBool>,
}

impl<T> Completer<T> {
    pub fn complete(self, result: Result<T, AssetError>) {
        *self.slot.lock() = Some(result);
        self.done.store(true, Ordering::Release);
    }
}

impl<T> LoadHandle<T> {
    /// Handle plus the completer that resolves it
    pub fn pending(label: impl Into<String>) -> (Self, Completer<T>) {
        let slot: Slot<T> = Arc::new(Mutex::new(None));
        let done = Arc::new(AtomicBool::new(false));
        let handle = Self {
            label: label.into(),
            slot: slot.clone(),
            done: done.clone(),
        };
        (handle, Completer { slot, done })
    }

    /// Already-resolved handle
    pub fn ready(label: impl Into<String>, result: Result<T, AssetError>) -> Self {
        let (handle, completer) = Self::pending(label);
        completer.complete(result);
        handle
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_complete(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Take the result once it is available
    pub fn take(&mut self) -> Option<Result<T, AssetError>> {
        if !self.is_complete() {
            return None;
        }
        self.slot.lock().take()
    }
}

impl<T: Send + 'static> LoadHandle<T> {
    /// Run `load` on a worker thread
    pub fn spawn<F>(label: impl Into<String>, load: F) -> Self
    where
        F: FnOnce() -> Result<T, AssetError> + Send + 'static,
    {
        let (handle, completer) = Self::pending(label);
        let thread_name = format!("load:{}", handle.label);
        let slot = handle.slot.clone();
        let done = handle.done.clone();

        let spawned = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || completer.complete(load()));

        if let Err(e) = spawned {
            *slot.lock() = Some(Err(AssetError::Worker(e.to_string())));
            done.store(true, Ordering::Release);
        }
        handle
    }
}

/// Result of one [`LoadingManager::poll`]
#[derive(Debug, Default)]
pub struct LoadingPoll {
    /// Assets that finished successfully since the last poll
    pub loaded: Vec<LoadedAsset>,
    /// True on exactly one poll: the one that observed the last completion
    pub all_complete: bool,
}

/// Aggregates asset handles into a progress ratio and one completion signal
#[derive(Debug, Default)]
pub struct LoadingManager {
    pending: Vec<LoadHandle<LoadedAsset>>,
    total: usize,
    finished: usize,
    failed: usize,
    completion_fired: bool,
}

impl LoadingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, handle: LoadHandle<LoadedAsset>) {
        tracing::debug!("Tracking load '{}'", handle.label());
        self.total += 1;
        self.pending.push(handle);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn finished(&self) -> usize {
        self.finished
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Finished / total in [0, 1]; 1 when nothing is tracked
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.finished as f32 / self.total as f32
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completion_fired
    }

    /// Collect finished handles. Failures are logged and counted as finished.
    pub fn poll(&mut self) -> LoadingPoll {
        let mut result = LoadingPoll::default();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut handle in self.pending.drain(..) {
            match handle.take() {
                None => still_pending.push(handle),
                Some(Ok(asset)) => {
                    tracing::debug!("Loaded '{}'", handle.label());
                    self.finished += 1;
                    result.loaded.push(asset);
                }
                Some(Err(e)) => {
                    tracing::warn!("Failed to load '{}': {}", handle.label(), e);
                    self.finished += 1;
                    self.failed += 1;
                }
            }
        }
        self.pending = still_pending;

        if !self.completion_fired && self.pending.is_empty() && self.finished == self.total {
            self.completion_fired = true;
            result.all_complete = true;
            tracing::info!(
                "All assets loaded ({} total, {} failed)",
                self.total,
                self.failed
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn texture() -> LoadedAsset {
        LoadedAsset::Texture(TextureSlot::Baked, ImageData::solid([255, 255, 255, 255]))
    }

    #[test]
    fn test_progress_counts_failures() {
        let mut manager = LoadingManager::new();
        let (pending, completer) = LoadHandle::pending("model");
        manager.track(LoadHandle::ready("baked", Ok(texture())));
        manager.track(LoadHandle::ready(
            "hdr",
            Err(AssetError::Io("missing".to_string())),
        ));
        manager.track(pending);

        let first = manager.poll();
        assert_eq!(first.loaded.len(), 1);
        assert!(!first.all_complete);
        assert!((manager.progress() - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(manager.failed(), 1);

        completer.complete(Ok(texture()));
        let second = manager.poll();
        assert!(second.all_complete);
        assert_eq!(manager.progress(), 1.0);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut manager = LoadingManager::new();
        manager.track(LoadHandle::ready("baked", Ok(texture())));
        assert!(manager.poll().all_complete);
        assert!(!manager.poll().all_complete);
        assert!(manager.is_complete());
    }

    #[test]
    fn test_empty_manager_completes_on_first_poll() {
        let mut manager = LoadingManager::new();
        assert_eq!(manager.progress(), 1.0);
        assert!(manager.poll().all_complete);
    }

    #[test]
    fn test_spawned_handle_completes() {
        let mut handle = LoadHandle::spawn("answer", || Ok(42));
        let deadline = Instant::now() + Duration::from_secs(5);
        while !handle.is_complete() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(handle.take().unwrap().unwrap(), 42);
        assert!(handle.take().is_none());
    }
}
