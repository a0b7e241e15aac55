//! Shared types for the API layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ai::AiAssistant;
use crate::facilities::{LocationSearch, PlaceSource};
use crate::shortage::DrugCatalog;
use crate::store::HealthStore;
use crate::symptoms::SymptomPredictor;

/// Tracked clients before idle windows are swept.
const RATE_SWEEP_THRESHOLD: usize = 1000;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
/// Handlers get it through `State`, middleware through `Extension`.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<HealthStore>,
    pub catalog: Arc<DrugCatalog>,
    pub assistant: AiAssistant,
    pub symptoms: Arc<dyn SymptomPredictor>,
    pub places: Arc<dyn PlaceSource>,
    pub search: Arc<dyn LocationSearch>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
}

// ═══════════════════════════════════════════════════════════
// Rate limiter: sliding window per client
// ═══════════════════════════════════════════════════════════

/// Sliding-window rate limiter keyed by client.
pub struct RateLimiter {
    windows: HashMap<String, Vec<Instant>>,
    per_minute: u32,
    per_hour: u32,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            windows: HashMap::new(),
            per_minute,
            per_hour,
        }
    }

    /// Check if a client is within rate limits. Returns `Ok(())` or
    /// `Err(retry_after_secs)` if exceeded.
    pub fn check(&mut self, client: &str) -> Result<(), u64> {
        let now = Instant::now();
        if self.windows.len() > RATE_SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let entries = self.windows.entry(client.to_string()).or_default();

        // Clean entries older than 1 hour
        entries.retain(|ts| now.duration_since(*ts) < Duration::from_secs(3600));

        let last_minute = entries
            .iter()
            .filter(|ts| now.duration_since(**ts) < Duration::from_secs(60))
            .count() as u32;
        if last_minute >= self.per_minute {
            return Err(60);
        }

        if entries.len() as u32 >= self.per_hour {
            return Err(3600);
        }

        entries.push(now);
        Ok(())
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Drop clients with no request in the last hour.
    fn sweep(&mut self, now: Instant) {
        self.windows.retain(|_, entries| {
            entries
                .last()
                .is_some_and(|ts| now.duration_since(*ts) < Duration::from_secs(3600))
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, 1000)
    }
}
