use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::config::CacheConfig;
use crate::db;
use crate::models::{PaymentRecord, StudentWithGuardian};

/// One cached collection with a staleness window.
pub struct CachedQuery<T> {
    name: &'static str,
    ttl: Duration,
    slot: RwLock<Slot<T>>,
}

struct Slot<T> {
    /// Bumped by every invalidation; a fetch only stores its result if the
    /// generation it started under is still current.
    generation: u64,
    entry: Option<(Instant, Arc<T>)>,
}

impl<T> CachedQuery<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slot: RwLock::new(Slot {
                generation: 0,
                entry: None,
            }),
        }
    }

    /// Return the cached value while it is fresh, otherwise run `fetch`
    /// (retrying up to `retries` extra times) and store the result.
    pub async fn get_or_fetch<F, Fut, E>(&self, retries: u32, fetch: F) -> Result<Arc<T>, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let (fresh, generation) = {
            let slot = self.slot.read().await;
            let fresh = slot
                .entry
                .as_ref()
                .filter(|(fetched_at, _)| fetched_at.elapsed() < self.ttl)
                .map(|(_, value)| Arc::clone(value));
            (fresh, slot.generation)
        };
        if let Some(value) = fresh {
            tracing::trace!(query = self.name, "cache hit");
            return Ok(value);
        }

        let value = Arc::new(with_retries(self.name, retries, fetch).await?);
        let mut slot = self.slot.write().await;
        if slot.generation == generation {
            slot.entry = Some((Instant::now(), Arc::clone(&value)));
            tracing::debug!(query = self.name, "cache refreshed");
        } else {
            tracing::debug!(query = self.name, "invalidated during fetch, result not cached");
        }
        Ok(value)
    }

    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        slot.generation = slot.generation.wrapping_add(1);
        slot.entry = None;
        tracing::debug!(query = self.name, "cache invalidated");
    }
}

/// Run `fetch` once, then again on failure up to `retries` more times.
pub async fn with_retries<T, E, F, Fut>(name: &str, retries: u32, fetch: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < retries => {
                attempt += 1;
                tracing::warn!(query = name, attempt, "fetch failed, retrying: {e}");
            }
            Err(e) => {
                tracing::error!(query = name, "fetch failed after {} attempts: {e}", attempt + 1);
                return Err(e);
            }
        }
    }
}

/// Dashboard read cache, passed around inside `AppState`.
pub struct QueryCache {
    pub students: CachedQuery<Vec<StudentWithGuardian>>,
    pub payments: CachedQuery<Vec<PaymentRecord>>,
    pub retries: u32,
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            students: CachedQuery::new("students", config.students_ttl),
            payments: CachedQuery::new("payments", config.payments_ttl),
            retries: config.fetch_retries,
        }
    }

    pub async fn load_students(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<StudentWithGuardian>>, sqlx::Error> {
        self.students
            .get_or_fetch(self.retries, || db::students::list(pool))
            .await
    }

    pub async fn load_payments(
        &self,
        pool: &PgPool,
    ) -> Result<Arc<Vec<PaymentRecord>>, sqlx::Error> {
        self.payments
            .get_or_fetch(self.retries, || db::payments::list(pool))
            .await
    }
}
