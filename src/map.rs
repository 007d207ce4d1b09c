use crate::error::Result;

/// A map from unique keys to values.
///
/// Inserting a key that is already present is an error rather than an update.
pub trait MapAdt<K, V> {
    fn put(&mut self, key: K, value: V) -> Result<()>;

    fn contains_key(&self, key: &K) -> bool;

    fn get(&self, key: &K) -> Result<&V>;

    fn remove(&mut self, key: &K) -> Result<V>;

    fn clear(&mut self);

    /// Number of keys currently stored.
    fn size(&self) -> usize;

    /// Length of the backing slot array.
    fn capacity(&self) -> usize;
}
