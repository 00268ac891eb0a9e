use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{
    CacheStats, CachedLayout, CalendarAppointment, LayoutAssignment, LayoutCacheKey,
};

/// Order-independent digest of the `(id, start, end)` triples a layout is
/// computed from.
pub fn layout_fingerprint(appointments: &[CalendarAppointment]) -> u64 {
    let mut intervals: Vec<_> = appointments
        .iter()
        .map(|a| (a.id.as_str(), a.start_time, a.end_time))
        .collect();
    intervals.sort();

    let mut hasher = DefaultHasher::new();
    intervals.hash(&mut hasher);
    hasher.finish()
}

/// Layouts keyed by calendar and day. Owned by whoever renders calendars.
/// An entry only answers a lookup for the same appointment set it was built
/// from; otherwise it is dropped and the caller recomputes.
pub struct LayoutCache {
    ttl: Duration,
    entries: RwLock<HashMap<LayoutCacheKey, CachedLayout>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LayoutCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(
        &self,
        key: &LayoutCacheKey,
        fingerprint: u64,
    ) -> Option<Vec<LayoutAssignment>> {
        let now = Utc::now();
        let usable = |cached: &CachedLayout| {
            cached.fingerprint == fingerprint && now - cached.cached_at < self.ttl
        };

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(cached) if usable(cached) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!("Layout cache hit for {} on {}", key.calendar_id, key.date);
                    return Some(cached.assignments.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired or built from other appointments: drop it unless someone
        // refreshed it in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|cached| !usable(cached)) {
            entries.remove(key);
            debug!("Evicted stale layout for {} on {}", key.calendar_id, key.date);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub async fn insert(
        &self,
        key: LayoutCacheKey,
        fingerprint: u64,
        assignments: Vec<LayoutAssignment>,
    ) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CachedLayout {
                fingerprint,
                assignments,
                cached_at: Utc::now(),
            },
        );
    }

    /// Drop every cached day for one calendar. Returns the number removed.
    pub async fn invalidate_calendar(&self, calendar_id: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key.calendar_id != calendar_id);
        let removed = before - entries.len();
        info!("Invalidated {} cached layouts for calendar {}", removed, calendar_id);
        removed
    }

    pub async fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        info!("Invalidated all {} cached layouts", removed);
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().await.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    const FP: u64 = 7;

    fn key(calendar_id: &str, day: u32) -> LayoutCacheKey {
        LayoutCacheKey::new(calendar_id, NaiveDate::from_ymd_opt(2025, 6, day).unwrap())
    }

    fn assignment(id: &str) -> LayoutAssignment {
        LayoutAssignment {
            appointment_id: id.to_string(),
            column_index: 0,
            column_width: 99.5,
            column_left: 0.0,
            max_concurrent: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get_hits() {
        let cache = LayoutCache::new(Duration::minutes(5));
        cache.insert(key("dr-1", 20), FP, vec![assignment("a")]).await;

        let cached = cache.get(&key("dr-1", 20), FP).await.unwrap();
        assert_eq!(cached, vec![assignment("a")]);

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_unknown_key_misses() {
        let cache = LayoutCache::new(Duration::minutes(5));
        assert!(cache.get(&key("dr-1", 20), FP).await.is_none());
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = LayoutCache::new(Duration::zero());
        cache.insert(key("dr-1", 20), FP, vec![assignment("a")]).await;

        assert!(cache.get(&key("dr-1", 20), FP).await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_invalidate_calendar_leaves_other_calendars() {
        let cache = LayoutCache::new(Duration::minutes(5));
        cache.insert(key("dr-1", 20), FP, vec![assignment("a")]).await;
        cache.insert(key("dr-1", 21), FP, vec![assignment("b")]).await;
        cache.insert(key("dr-2", 20), FP, vec![assignment("c")]).await;

        assert_eq!(cache.invalidate_calendar("dr-1").await, 2);
        assert!(cache.get(&key("dr-1", 20), FP).await.is_none());
        assert!(cache.get(&key("dr-2", 20), FP).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = LayoutCache::new(Duration::minutes(5));
        cache.insert(key("dr-1", 20), FP, vec![assignment("a")]).await;
        cache.insert(key("dr-2", 20), FP, vec![assignment("b")]).await;

        assert_eq!(cache.invalidate_all().await, 2);
        assert_eq!(cache.stats().await.entries, 0);
    }

    #[tokio::test]
    async fn test_insert_replaces_existing_layout() {
        let cache = LayoutCache::new(Duration::minutes(5));
        cache.insert(key("dr-1", 20), FP, vec![assignment("old")]).await;
        cache.insert(key("dr-1", 20), FP, vec![assignment("new")]).await;

        assert_eq!(cache.get(&key("dr-1", 20), FP).await.unwrap(), vec![assignment("new")]);
        assert_eq!(cache.stats().await.entries, 1);
    }

    #[tokio::test]
    async fn test_entry_for_other_appointments_is_not_served() {
        let cache = LayoutCache::new(Duration::minutes(5));
        cache.insert(key("dr-1", 20), FP, vec![assignment("old")]).await;

        assert!(cache.get(&key("dr-1", 20), FP + 1).await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_fingerprint_ignores_order_but_not_intervals() {
        let at = |h| Utc.with_ymd_and_hms(2025, 6, 20, h, 0, 0).unwrap();
        let a = CalendarAppointment::new("a", at(9), at(10));
        let b = CalendarAppointment::new("b", at(9), at(11));
        let moved = CalendarAppointment::new("b", at(10), at(11));

        assert_eq!(
            layout_fingerprint(&[a.clone(), b.clone()]),
            layout_fingerprint(&[b.clone(), a.clone()])
        );
        assert_ne!(layout_fingerprint(&[a.clone(), b]), layout_fingerprint(&[a.clone(), moved]));
        assert_ne!(layout_fingerprint(&[a.clone()]), layout_fingerprint(&[]));
    }
}
