use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Key/value store used by the auth manager to keep issued tokens.
///
/// Implementations hold no expiry logic: `get` answers with whatever was last
/// `set` for the key, or `None` when nothing is stored.
pub trait CredentialCache<V>: Send + Sync {
    fn set(&self, key: &str, value: V) -> impl Future<Output = ()> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Option<V>> + Send;

    /// No-op when the key is absent.
    fn remove(&self, key: &str) -> impl Future<Output = ()> + Send;

    fn remove_all(&self) -> impl Future<Output = ()> + Send;
}

/// Unbounded in-process cache, lives as long as its owner.
#[derive(Debug, Clone)]
pub struct InMemoryCache<V> {
    inner: Arc<RwLock<HashMap<String, V>>>,
}

impl<V> InMemoryCache<V> {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl<V> Default for InMemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CredentialCache<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync,
{
    async fn set(&self, key: &str, value: V) {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), value);
    }

    async fn get(&self, key: &str) -> Option<V> {
        self.inner.read().await.get(key).cloned()
    }

    async fn remove(&self, key: &str) {
        self.inner.write().await.remove(key);
    }

    async fn remove_all(&self) {
        self.inner.write().await.clear();
    }
}
