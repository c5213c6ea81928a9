//! Asynchronous frame image loading with supersession.
//!
//! Every [`ImageLoader::request`] bumps a generation counter. Worker threads fetch and decode
//! off the owner's thread and report back over a channel; the owner drains results with
//! [`ImageLoader::poll`] or [`ImageLoader::wait`]. Only a result whose generation matches the
//! most recent request is ever surfaced. Earlier results are dropped silently.

use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::source::ImageSource;
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Handle identifying one load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// A decoded frame image ready to be applied to the canvas.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// Ticket of the request that produced this image.
    pub ticket: LoadTicket,
    /// Frame the image was requested for.
    pub frame_id: String,
    /// Decoded pixels and natural dimensions.
    pub image: PreparedImage,
}

/// Outcome of the most recent load request.
#[derive(Debug)]
pub enum LoadEvent {
    /// The latest request finished decoding.
    Ready(LoadedImage),
    /// The latest request failed; the caller keeps whatever it had before.
    Failed {
        /// Ticket of the failed request.
        ticket: LoadTicket,
        /// Frame the request was for.
        frame_id: String,
        /// Cause of the failure.
        error: FramesmithError,
    },
}

/// Loader counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderStats {
    /// Requests issued.
    pub requested: u64,
    /// Latest-generation results delivered as [`LoadEvent::Ready`].
    pub ready: u64,
    /// Latest-generation results delivered as [`LoadEvent::Failed`].
    pub failed: u64,
    /// Results discarded because a newer request had been issued.
    pub superseded: u64,
}

/// Loader configuration.
#[derive(Clone, Copy, Debug)]
pub struct LoaderOpts {
    /// Worker threads decoding images. Must be >= 1.
    pub threads: usize,
}

impl Default for LoaderOpts {
    fn default() -> Self {
        Self { threads: 2 }
    }
}

struct Completed {
    ticket: LoadTicket,
    frame_id: String,
    result: FramesmithResult<PreparedImage>,
}

/// Background image loader owned by a single writer.
pub struct ImageLoader {
    pool: rayon::ThreadPool,
    source: Arc<dyn ImageSource>,
    tx: mpsc::Sender<Completed>,
    rx: mpsc::Receiver<Completed>,
    next_generation: u64,
    latest: Option<LoadTicket>,
    pending: bool,
    stats: LoaderStats,
}

impl ImageLoader {
    /// Create a loader fetching bytes from `source`.
    pub fn new(source: Arc<dyn ImageSource>, opts: LoaderOpts) -> FramesmithResult<Self> {
        let pool = build_thread_pool(opts.threads)?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            pool,
            source,
            tx,
            rx,
            next_generation: 0,
            latest: None,
            pending: false,
            stats: LoaderStats::default(),
        })
    }

    /// Start loading `image_ref` for `frame_id`, superseding any earlier request.
    #[tracing::instrument(skip(self))]
    pub fn request(&mut self, frame_id: &str, image_ref: &str) -> LoadTicket {
        self.next_generation += 1;
        let ticket = LoadTicket(self.next_generation);
        if self.pending {
            tracing::debug!(?ticket, "superseding in-flight load");
        }
        self.latest = Some(ticket);
        self.pending = true;
        self.stats.requested += 1;

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let frame_id = frame_id.to_owned();
        let image_ref = image_ref.to_owned();
        self.pool.spawn(move || {
            let result = source
                .fetch(&image_ref)
                .and_then(|bytes| decode_image(&bytes))
                .map_err(|e| match e {
                    FramesmithError::ResourceLoad(_) => e,
                    other => FramesmithError::resource_load(format!(
                        "load '{image_ref}': {other}"
                    )),
                });
            // Receiver gone means the loader was dropped; nothing to report to.
            let _ = tx.send(Completed {
                ticket,
                frame_id,
                result,
            });
        });

        ticket
    }

    /// Ticket of the most recent request.
    pub fn latest(&self) -> Option<LoadTicket> {
        self.latest
    }

    /// Whether the most recent request has not resolved yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Counters since construction.
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Drain finished work without blocking.
    ///
    /// Returns the latest request's outcome if it has arrived; superseded results are
    /// discarded along the way.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        let mut out = None;
        while let Ok(done) = self.rx.try_recv() {
            if let Some(ev) = self.accept(done) {
                out = Some(ev);
            }
        }
        out
    }

    /// Block until the latest request resolves or `timeout` elapses.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        if let Some(ev) = self.poll() {
            return Some(ev);
        }
        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    if let Some(ev) = self.accept(done) {
                        return Some(ev);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    }

    fn accept(&mut self, done: Completed) -> Option<LoadEvent> {
        if !self.pending || Some(done.ticket) != self.latest {
            self.stats.superseded += 1;
            tracing::debug!(
                ticket = ?done.ticket,
                frame = %done.frame_id,
                "discarding superseded load"
            );
            return None;
        }

        self.pending = false;
        match done.result {
            Ok(image) => {
                self.stats.ready += 1;
                tracing::debug!(
                    ticket = ?done.ticket,
                    frame = %done.frame_id,
                    width = image.dims.width,
                    height = image.dims.height,
                    "frame image ready"
                );
                Some(LoadEvent::Ready(LoadedImage {
                    ticket: done.ticket,
                    frame_id: done.frame_id,
                    image,
                }))
            }
            Err(error) => {
                self.stats.failed += 1;
                Some(LoadEvent::Failed {
                    ticket: done.ticket,
                    frame_id: done.frame_id,
                    error,
                })
            }
        }
    }
}

fn build_thread_pool(threads: usize) -> FramesmithResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(FramesmithError::validation(
            "loader 'threads' must be >= 1",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("framesmith-loader-{i}"))
        .build()
        .map_err(|e| FramesmithError::validation(format!("failed to build loader thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
