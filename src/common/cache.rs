// src/common/cache.rs

use std::{
    collections::HashMap,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Cache chave/valor com TTL, explícito e injetado no serviço que o usa.
/// Só guarda dados de referência; nunca o estado de leads ou itens.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.write().await;
        // Aproveita a escrita para descartar o que já venceu
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key, CacheEntry { value, expires_at });
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_value_until_it_expires() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("nops", vec![27]).await;
        assert_eq!(cache.get(&"nops").await, Some(vec![27]));

        let expired: TtlCache<&str, i32> = TtlCache::new(Duration::ZERO);
        expired.insert("nops", 1).await;
        assert_eq!(expired.get(&"nops").await, None);
    }

    #[tokio::test]
    async fn invalidate_and_clear_drop_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1_i64, "a").await;
        cache.insert(2_i64, "b").await;

        cache.invalidate(&1).await;
        assert_eq!(cache.get(&1).await, None);
        assert_eq!(cache.get(&2).await, Some("b"));

        cache.clear().await;
        assert_eq!(cache.get(&2).await, None);
    }

    #[tokio::test]
    async fn clones_share_the_same_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();
        cache.insert("k", 10).await;
        assert_eq!(other.get(&"k").await, Some(10));
    }
}
