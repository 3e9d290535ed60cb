//! Dashboard counters with a simulated realtime feed.
//!
//! A background task nudges the counters on a fixed period: each tick adds 0 to 2 views
//! and, one time in five, a download. The task stops when the ticker is stopped or
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

const DOWNLOAD_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_resumes: u32,
    pub remaining_resumes: u32,
    pub total_views: u64,
    pub views_growth: String,
    pub downloads: u64,
    pub downloads_growth: String,
    /// Percent.
    pub success_rate: u32,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_resumes: 3,
            remaining_resumes: 2,
            total_views: 44,
            views_growth: "+12%".to_string(),
            downloads: 8,
            downloads_growth: "+2".to_string(),
            success_rate: 18,
        }
    }
}

impl DashboardStats {
    pub fn tick(&mut self, rng: &mut impl Rng) {
        self.total_views += rng.gen_range(0..=2);
        if rng.gen_bool(DOWNLOAD_PROBABILITY) {
            self.downloads += 1;
        }
    }

    /// A resume was created or duplicated; uses one credit.
    pub fn record_created(&mut self) {
        self.total_resumes += 1;
        self.remaining_resumes = self.remaining_resumes.saturating_sub(1);
    }

    /// A resume was deleted; frees one credit.
    pub fn record_deleted(&mut self) {
        self.total_resumes = self.total_resumes.saturating_sub(1);
        self.remaining_resumes += 1;
    }
}

pub struct StatsTicker {
    stats: Arc<RwLock<DashboardStats>>,
    ticks: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl StatsTicker {
    /// Spawns the ticker. Must be called inside a tokio runtime.
    pub fn start(period: Duration) -> Self {
        Self::start_with_rng(period, StdRng::from_entropy())
    }

    pub fn start_with_rng(period: Duration, mut rng: StdRng) -> Self {
        let stats = Arc::new(RwLock::new(DashboardStats::default()));
        let ticks = Arc::new(AtomicU64::new(0));

        let handle = {
            let stats = Arc::clone(&stats);
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // First tick completes immediately.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    stats
                        .write()
                        .unwrap_or_else(|e| e.into_inner())
                        .tick(&mut rng);
                    let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(tick = n, "Dashboard stats updated");
                }
            })
        };

        Self {
            stats,
            ticks,
            handle,
        }
    }

    pub fn snapshot(&self) -> DashboardStats {
        self.stats.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut DashboardStats)) {
        f(&mut *self.stats.write().unwrap_or_else(|e| e.into_inner()));
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for StatsTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
