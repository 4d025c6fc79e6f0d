//! Per-product generation job tracking.
//!
//! The tracker exclusively owns the status map. Each `generate` call runs
//! one attempt: an immediate `generating` write, the remote job creation,
//! a poll loop with synthetic progress, the secondary byte fetch, and a
//! terminal `completed`/`error` write. Presentation layers read snapshots
//! or subscribe to [`StatusEvent`]s; they never mutate status directly.
//!
//! At most one attempt per product is live at a time: every attempt claims
//! a fresh epoch, and a status write from an attempt whose epoch is no
//! longer current is dropped, at which point that attempt's loop exits.
//! The superseded remote job is abandoned, not cancelled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use tvision_genai::{ad_prompt, GenAiError, GenAiResult, VideoClient};
use tvision_models::{
    ad_file_name, simulated_progress, GenerationStatus, ProductId, StatusEvent, TrendingProduct,
    VideoHandle, INITIAL_PROGRESS,
};

use crate::config::EngineConfig;
use crate::error::{
    classify_failure, EngineError, EngineResult, FailureKind, PERMISSION_DENIED_MESSAGE,
};
use crate::keys::KeyStore;
use crate::logging::GenerationLogger;

/// One tracked product: its status plus the epoch of the attempt that is
/// currently allowed to write it.
struct JobSlot {
    status: GenerationStatus,
    epoch: u64,
}

/// Outcome of one remote attempt's happy path.
enum Attempt {
    Finished(VideoHandle),
    Superseded,
}

/// Tracks generation status for every product on the current board.
pub struct JobTracker {
    config: EngineConfig,
    video: Arc<VideoClient>,
    keys: Arc<KeyStore>,
    slots: RwLock<HashMap<ProductId, JobSlot>>,
    epochs: AtomicU64,
    events: broadcast::Sender<StatusEvent>,
}

impl JobTracker {
    /// Create a new tracker.
    pub fn new(config: EngineConfig, video: Arc<VideoClient>, keys: Arc<KeyStore>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            config,
            video,
            keys,
            slots: RwLock::new(HashMap::new()),
            epochs: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribe to status events.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Replace all tracked statuses with fresh idle entries for `products`.
    ///
    /// Called when a discovery pass completes; the tracked-id set becomes
    /// exactly the discovered-id set. Every in-flight attempt from the
    /// previous board is superseded.
    pub fn reset(&self, products: &[TrendingProduct]) {
        let mut slots = self.slots.write().unwrap();
        slots.clear();
        for product in products {
            slots.insert(
                product.id.clone(),
                JobSlot {
                    status: GenerationStatus::idle(product.id.clone()),
                    epoch: self.next_epoch(),
                },
            );
        }
    }

    /// Current status snapshot for every tracked product.
    pub fn snapshot(&self) -> HashMap<ProductId, GenerationStatus> {
        self.slots
            .read()
            .unwrap()
            .iter()
            .map(|(id, slot)| (id.clone(), slot.status.clone()))
            .collect()
    }

    /// Current status of one product.
    pub fn status(&self, product_id: &ProductId) -> Option<GenerationStatus> {
        self.slots
            .read()
            .unwrap()
            .get(product_id)
            .map(|slot| slot.status.clone())
    }

    /// Start (or restart) generation for `product` and drive it to a
    /// terminal state.
    ///
    /// Calling this while the product is already generating restarts the
    /// attempt: progress resets and the superseded poll loop exits on its
    /// next write. No cancellation signal reaches the abandoned remote job.
    pub async fn generate(&self, product: &TrendingProduct) {
        let logger = GenerationLogger::new(&product.id, "ad_generation");
        let Some(epoch) = self.begin_attempt(&product.id) else {
            logger.log_warning("product is not tracked, ignoring generate request");
            return;
        };
        logger.log_start(&product.name);

        match self.run_attempt(product, epoch, &logger).await {
            Ok(Attempt::Finished(video)) => {
                let file_name = video.file_name.clone();
                if self.store(&product.id, epoch, |status| status.complete(video)) {
                    self.publish(StatusEvent::Completed {
                        product_id: product.id.clone(),
                        file_name,
                    });
                    logger.log_completion("video ready");
                } else {
                    logger.log_progress("attempt superseded at completion, dropping result");
                }
            }
            Ok(Attempt::Superseded) => {
                logger.log_progress("attempt superseded, abandoning poll loop");
            }
            Err(err) => {
                let raw = err.to_string();
                let detail = match classify_failure(&raw) {
                    FailureKind::Permission => {
                        self.keys.revoke();
                        PERMISSION_DENIED_MESSAGE.to_string()
                    }
                    FailureKind::Generation => raw,
                };
                logger.log_error(&detail);
                let message = detail.clone();
                if self.store(&product.id, epoch, |status| status.fail(detail)) {
                    self.publish(StatusEvent::Error {
                        product_id: product.id.clone(),
                        message,
                        timestamp: Utc::now(),
                    });
                }
            }
        }
    }

    /// Retry a failed product. Identical to [`JobTracker::generate`]: the
    /// fresh attempt clears the previous error detail on its first write.
    pub async fn retry(&self, product: &TrendingProduct) {
        self.generate(product).await;
    }

    /// Fire-and-forget generation on its own task.
    ///
    /// Every call spawns an independent poll loop; there is no global
    /// concurrency cap and no queueing across products.
    pub fn spawn_generation(self: &Arc<Self>, product: TrendingProduct) -> JoinHandle<()> {
        let tracker = Arc::clone(self);
        tokio::spawn(async move { tracker.generate(&product).await })
    }

    /// Write a completed product's video into `dir` under its download name.
    ///
    /// This is the download surface: the handle's bytes land in
    /// `dir/<sanitized-name>_tiktok_ad.mp4` and the full path is returned.
    pub async fn save_video(&self, product_id: &ProductId, dir: &Path) -> EngineResult<PathBuf> {
        let video = self
            .status(product_id)
            .and_then(|status| status.video)
            .ok_or_else(|| EngineError::VideoNotReady(product_id.clone()))?;

        let path = dir.join(&video.file_name);
        tokio::fs::write(&path, &video.data).await?;
        Ok(path)
    }

    /// One remote attempt: create the job, poll it with synthetic
    /// progress, then fetch the finished bytes.
    async fn run_attempt(
        &self,
        product: &TrendingProduct,
        epoch: u64,
        logger: &GenerationLogger,
    ) -> GenAiResult<Attempt> {
        let prompt = ad_prompt(product);
        let mut operation = self.video.start_generation(&prompt).await?;

        let mut poll_count: u32 = 0;
        while !operation.done {
            poll_count += 1;
            if let Some(cap) = self.config.max_polls {
                if poll_count > cap {
                    return Err(GenAiError::Timeout(cap));
                }
            }

            let progress = simulated_progress(poll_count);
            if !self.store(&product.id, epoch, |status| status.set_progress(progress)) {
                return Ok(Attempt::Superseded);
            }
            self.publish(StatusEvent::Progress {
                product_id: product.id.clone(),
                value: progress,
            });
            logger.log_progress(&format!("poll {} -> {}%", poll_count, progress));

            tokio::time::sleep(self.config.poll_interval).await;
            operation = self.video.poll_operation(&operation).await?;
        }

        let uri = operation.video_uri().ok_or(GenAiError::MissingVideoUri)?;
        let data = self.video.fetch_video(uri).await?;

        Ok(Attempt::Finished(VideoHandle::new(
            data,
            ad_file_name(&product.name),
        )))
    }

    /// Claim a fresh attempt epoch and write the initial generating state.
    ///
    /// Returns `None` for products not on the current board.
    fn begin_attempt(&self, product_id: &ProductId) -> Option<u64> {
        let epoch = self.next_epoch();
        {
            let mut slots = self.slots.write().unwrap();
            let slot = slots.get_mut(product_id)?;
            slot.epoch = epoch;
            slot.status.begin();
        }
        self.publish(StatusEvent::Progress {
            product_id: product_id.clone(),
            value: INITIAL_PROGRESS,
        });
        Some(epoch)
    }

    /// Apply a status mutation if `epoch` is still the current attempt.
    fn store(
        &self,
        product_id: &ProductId,
        epoch: u64,
        mutate: impl FnOnce(&mut GenerationStatus),
    ) -> bool {
        let mut slots = self.slots.write().unwrap();
        match slots.get_mut(product_id) {
            Some(slot) if slot.epoch == epoch => {
                mutate(&mut slot.status);
                true
            }
            _ => false,
        }
    }

    fn next_epoch(&self) -> u64 {
        self.epochs.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, event: StatusEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
