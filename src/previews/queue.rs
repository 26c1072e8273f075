//! Preview worker queue.
//!
//! A small pool of threads pulls requests from a bounded flume queue, decodes
//! them, stores them in the shared cache and hands the result to the main
//! loop through an async channel.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use super::cache::{Preview, PreviewCache, PreviewKey};
use super::decode::decode_preview;

/// Maximum number of worker threads.
const MAX_WORKERS: usize = 4;

/// Maximum number of pending requests in the queue.
const MAX_QUEUE_SIZE: usize = 64;

/// How often idle workers check the shutdown flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub path: PathBuf,
    pub max_edge: u32,
}

impl PreviewRequest {
    pub fn new(path: impl Into<PathBuf>, max_edge: u32) -> Self {
        Self {
            path: path.into(),
            max_edge,
        }
    }

    pub fn key(&self) -> PreviewKey {
        PreviewKey::new(&self.path, self.max_edge)
    }
}

/// Outcome of one request, delivered on the results channel.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub key: PreviewKey,
    pub preview: Option<Arc<Preview>>,
    pub error: Option<String>,
}

pub struct PreviewQueue {
    request_tx: Option<Sender<PreviewRequest>>,
    result_rx: async_channel::Receiver<PreviewResult>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    /// Keys queued or being decoded
    pending: Arc<RwLock<HashSet<PreviewKey>>>,
    cache: PreviewCache,
}

impl PreviewQueue {
    pub fn new(workers: usize, cache: PreviewCache) -> Result<Self> {
        let num_workers = workers.clamp(1, MAX_WORKERS);

        let (request_tx, request_rx) = flume::bounded(MAX_QUEUE_SIZE);
        let (result_tx, result_rx) = async_channel::unbounded();

        let shutdown = Arc::new(AtomicBool::new(false));
        let pending = Arc::new(RwLock::new(HashSet::new()));

        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let shutdown = Arc::clone(&shutdown);
            let pending = Arc::clone(&pending);
            let cache = cache.clone();

            let handle = thread::Builder::new()
                .name(format!("preview-worker-{}", worker_id))
                .spawn(move || worker_loop(worker_id, rx, tx, shutdown, pending, cache))
                .context("Failed to spawn preview worker")?;
            handles.push(handle);
        }

        debug!(num_workers, "Started preview worker queue");

        Ok(Self {
            request_tx: Some(request_tx),
            result_rx,
            workers: handles,
            shutdown,
            pending,
            cache,
        })
    }

    /// Submits a decode request.
    ///
    /// Returns false if the preview is already cached or pending, or the
    /// queue is full.
    pub fn request(&self, req: PreviewRequest) -> bool {
        let key = req.key();
        if self.cache.contains(&key) {
            trace!(?key.path, "Preview already cached");
            return false;
        }
        if !self.pending.write().insert(key.clone()) {
            trace!(?key.path, "Preview already pending");
            return false;
        }

        let Some(tx) = &self.request_tx else {
            self.pending.write().remove(&key);
            return false;
        };
        match tx.try_send(req) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(_)) => {
                warn!("Preview queue full, dropping request");
                self.pending.write().remove(&key);
                false
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                error!("Preview queue disconnected");
                self.pending.write().remove(&key);
                false
            }
        }
    }

    /// Receiver for completed previews, to be drained on the main loop.
    pub fn results(&self) -> async_channel::Receiver<PreviewResult> {
        self.result_rx.clone()
    }

    pub fn cache(&self) -> &PreviewCache {
        &self.cache
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn shutdown(&mut self) {
        debug!("Shutting down preview queue");
        self.shutdown.store(true, Ordering::SeqCst);
        self.request_tx = None;

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        self.pending.write().clear();
        debug!("Preview queue shutdown complete");
    }
}

impl Drop for PreviewQueue {
    fn drop(&mut self) {
        if !self.shutdown.load(Ordering::Relaxed) {
            self.shutdown();
        }
    }
}

fn worker_loop(
    worker_id: usize,
    rx: Receiver<PreviewRequest>,
    tx: async_channel::Sender<PreviewResult>,
    shutdown: Arc<AtomicBool>,
    pending: Arc<RwLock<HashSet<PreviewKey>>>,
    cache: PreviewCache,
) {
    debug!(worker_id, "Preview worker started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(req) => {
                let result = process_request(&req, &cache);
                pending.write().remove(&result.key);

                if let Err(e) = tx.send_blocking(result) {
                    warn!(worker_id, error = ?e, "Failed to send preview result");
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker_id, "Preview worker stopped");
}

fn process_request(req: &PreviewRequest, cache: &PreviewCache) -> PreviewResult {
    let key = req.key();
    trace!(?key.path, "Processing preview request");

    match decode_preview(&req.path, req.max_edge) {
        Ok(preview) => {
            let preview = Arc::new(preview);
            cache.insert(key.clone(), Arc::clone(&preview));
            PreviewResult {
                key,
                preview: Some(preview),
                error: None,
            }
        }
        Err(e) => {
            warn!(path = ?req.path, error = ?e, "Failed to decode preview");
            PreviewResult {
                key,
                preview: None,
                error: Some(format!("{:#}", e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn queue() -> PreviewQueue {
        PreviewQueue::new(2, PreviewCache::new(16)).unwrap()
    }

    #[test]
    fn test_decodes_and_caches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tile.png");
        RgbImage::from_pixel(40, 20, Rgb([1, 2, 3])).save(&path).unwrap();

        let queue = queue();
        let results = queue.results();
        assert!(queue.request(PreviewRequest::new(&path, 20)));

        let result = results.recv_blocking().unwrap();
        let preview = result.preview.unwrap();
        assert_eq!((preview.width, preview.height), (20, 10));
        assert!(queue.cache().contains(&PreviewKey::new(&path, 20)));

        // Cached now, so a second request is not queued
        assert!(!queue.request(PreviewRequest::new(&path, 20)));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let queue = queue();
        let results = queue.results();
        assert!(queue.request(PreviewRequest::new("/nonexistent/x.png", 64)));

        let result = results.recv_blocking().unwrap();
        assert!(result.preview.is_none());
        assert!(result.error.is_some());
        assert!(queue.cache().is_empty());
    }

    #[test]
    fn test_shutdown_stops_workers() {
        let mut queue = queue();
        assert_eq!(queue.worker_count(), 2);
        queue.shutdown();
        assert_eq!(queue.worker_count(), 0);
        assert!(!queue.request(PreviewRequest::new("/tmp/a.png", 64)));
    }
}
