use std::hash::{BuildHasher, Hash};
use std::mem;
use std::time::Instant;

use log::{debug, trace};

use crate::error::{HashTableError, Result};
use crate::hasher::IdentityState;
use crate::map::MapAdt;

/// One position in the backing array.
///
/// A `Tombstone` is left behind by `remove` so that probes for keys stored
/// further along the same run keep going. Insertion may reuse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(K, V),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied(key, _) => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied(_, value) => Some(value),
            _ => None,
        }
    }
}

/// An open addressing hash table with linear probing and tombstone deletion.
///
/// Keys are unique: `put` on a key that is already stored fails instead of
/// replacing the value. The slot array doubles whenever the load factor
/// reaches [`HashTable::OVERLOAD_FACTOR`].
#[derive(Debug, Clone)]
pub struct HashTable<K, V, S = IdentityState> {
    size: usize,
    load_factor: f64,
    slots: Vec<Slot<K, V>>,
    hash_builder: S,
}

impl<K, V> HashTable<K, V, IdentityState> {
    /// Creates a table with `capacity` empty slots.
    ///
    /// Fails with `InvalidArgument` when `capacity` is zero or negative.
    pub fn new(capacity: isize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, IdentityState::default())
    }
}

impl<K, V, S> Default for HashTable<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub const DEFAULT_CAPACITY: usize = 8;
    pub const OVERLOAD_FACTOR: f64 = 0.7;

    pub fn with_hasher(hash_builder: S) -> Self {
        HashTable {
            size: 0,
            load_factor: 0.0,
            slots: Self::empty_slots(Self::DEFAULT_CAPACITY),
            hash_builder,
        }
    }

    pub fn with_capacity_and_hasher(capacity: isize, hash_builder: S) -> Result<Self> {
        if capacity <= 0 {
            return Err(HashTableError::InvalidArgument(format!(
                "capacity must be more than 0, got {}",
                capacity
            )));
        }
        Ok(HashTable {
            size: 0,
            load_factor: 0.0,
            slots: Self::empty_slots(capacity as usize),
            hash_builder,
        })
    }

    fn empty_slots(capacity: usize) -> Vec<Slot<K, V>> {
        let mut slots: Vec<Slot<K, V>> = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        slots
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Read-only view of the slot at `index`, or `None` past the end of the array.
    pub fn slot(&self, index: usize) -> Option<&Slot<K, V>> {
        self.slots.get(index)
    }

    /// Drops every entry and tombstone. The capacity is kept.
    pub fn clear(&mut self) {
        let dropped: usize = self.size;
        self.slots = Self::empty_slots(self.capacity());
        self.size = 0;
        self.load_factor = 0.0;
        debug!(
            "cleared {} entries, capacity stays at {}",
            dropped,
            self.capacity()
        );
    }

    #[inline]
    fn refresh_load_factor(&mut self) {
        self.load_factor = self.size as f64 / self.capacity() as f64;
    }

    /// Is the load factor greater than or equal to 0.7?
    #[inline]
    fn should_grow(&self) -> bool {
        self.load_factor >= Self::OVERLOAD_FACTOR
    }

    /// First slot at or after `home` (wrapping) that is not occupied.
    fn first_vacant(slots: &[Slot<K, V>], home: usize) -> Option<usize> {
        let capacity: usize = slots.len();
        (0..capacity)
            .map(|step| (home + step) % capacity)
            .find(|&i| !slots[i].is_occupied())
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// `|hash(key)| mod capacity`, reading the 64-bit hash as signed.
    #[inline]
    fn home_index_in(hash_builder: &S, key: &K, capacity: usize) -> usize {
        let hash: i64 = hash_builder.hash_one(key) as i64;
        (hash.unsigned_abs() % capacity as u64) as usize
    }

    #[inline]
    fn home_index(&self, key: &K) -> usize {
        Self::home_index_in(&self.hash_builder, key, self.capacity())
    }

    /// Walks the probe run from the key's home slot. Tombstones are skipped,
    /// an empty slot ends the run. At most `capacity` slots are visited.
    fn find_index(&self, key: &K) -> Option<usize> {
        let capacity: usize = self.capacity();
        let home: usize = self.home_index(key);
        for step in 0..capacity {
            let i: usize = (home + step) % capacity;
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Tombstone => continue,
                Slot::Occupied(k, _) if k == key => return Some(i),
                Slot::Occupied(..) => {}
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_index(key).is_some()
    }

    pub fn get(&self, key: &K) -> Result<&V> {
        self.find_index(key)
            .and_then(|i| self.slots[i].value())
            .ok_or(HashTableError::NotFound)
    }

    /// Inserts a new mapping.
    ///
    /// Fails with `InvalidArgument` if `key` is already stored; the table is
    /// left untouched in that case. The entry goes into the first slot of its
    /// probe run that is empty or a tombstone.
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        if self.contains_key(&key) {
            return Err(HashTableError::InvalidArgument(String::from(
                "key already exists",
            )));
        }

        let index: usize = loop {
            match Self::first_vacant(&self.slots, self.home_index(&key)) {
                Some(i) => break i,
                None => self.grow(),
            }
        };

        self.slots[index] = Slot::Occupied(key, value);
        self.size += 1;
        self.refresh_load_factor();
        trace!(
            "put into slot {} (size {}, capacity {})",
            index,
            self.size,
            self.capacity()
        );

        if self.should_grow() {
            self.grow();
        }
        Ok(())
    }

    /// Same as [`put`](Self::put) for callers holding an optional key.
    /// `None` is rejected with `InvalidArgument`.
    pub fn put_nullable(&mut self, key: Option<K>, value: V) -> Result<()> {
        match key {
            Some(key) => self.put(key, value),
            None => Err(HashTableError::InvalidArgument(String::from(
                "key must not be null",
            ))),
        }
    }

    /// Removes the mapping for `key` and returns its value, leaving a
    /// tombstone in the slot.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let index: usize = self.find_index(key).ok_or(HashTableError::NotFound)?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(_, value) => {
                self.size -= 1;
                self.refresh_load_factor();
                trace!(
                    "removed from slot {} (size {}, capacity {})",
                    index,
                    self.size,
                    self.capacity()
                );
                Ok(value)
            }
            other => {
                self.slots[index] = other;
                Err(HashTableError::NotFound)
            }
        }
    }

    /// Doubles the capacity and re-places every live entry along its probe
    /// run in the new array. Tombstones are not carried over.
    fn grow(&mut self) {
        let now: Instant = Instant::now();
        let old_capacity: usize = self.capacity();
        let new_capacity: usize = old_capacity * 2;
        let old_slots: Vec<Slot<K, V>> =
            mem::replace(&mut self.slots, Self::empty_slots(new_capacity));
        self.size = 0;

        for slot in old_slots {
            if let Slot::Occupied(key, value) = slot {
                let home: usize = Self::home_index_in(&self.hash_builder, &key, new_capacity);
                match Self::first_vacant(&self.slots, home) {
                    Some(i) => {
                        self.slots[i] = Slot::Occupied(key, value);
                        self.size += 1;
                    }
                    // the new array is twice as long as the number of live entries
                    None => unreachable!("no vacant slot after doubling"),
                }
            }
        }

        self.refresh_load_factor();
        debug!(
            "grew from {} to {} slots, {} entries rehashed in {:?}",
            old_capacity,
            new_capacity,
            self.size,
            now.elapsed()
        );
    }
}

impl<K, V, S> MapAdt<K, V> for HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn put(&mut self, key: K, value: V) -> Result<()> {
        HashTable::put(self, key, value)
    }

    fn contains_key(&self, key: &K) -> bool {
        HashTable::contains_key(self, key)
    }

    fn get(&self, key: &K) -> Result<&V> {
        HashTable::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Result<V> {
        HashTable::remove(self, key)
    }

    fn clear(&mut self) {
        HashTable::clear(self)
    }

    fn size(&self) -> usize {
        HashTable::size(self)
    }

    fn capacity(&self) -> usize {
        HashTable::capacity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::initialize_logger;

    fn value_at<'a>(table: &'a HashTable<i32, &'static str>, index: usize) -> Option<&'a str> {
        table.slot(index).and_then(|slot| slot.value()).copied()
    }

    #[test]
    fn places_at_home_index_without_collision() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        table.put(1, "one").unwrap();
        table.put(2, "two").unwrap();
        assert_eq!(value_at(&table, 1), Some("one"));
        assert_eq!(value_at(&table, 2), Some("two"));
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn collision_probes_to_next_free_slot() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        table.put(1, "one").unwrap();
        table.put(2, "two").unwrap();
        table.put(3, "three").unwrap();
        table.put(11, "eleven").unwrap();
        assert_eq!(value_at(&table, 1), Some("one"));
        assert_eq!(value_at(&table, 4), Some("eleven"));
        assert_eq!(table.size(), 4);
    }

    #[test]
    fn negative_keys_use_absolute_hash() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        table.put(-3, "minus three").unwrap();
        assert_eq!(value_at(&table, 3), Some("minus three"));
    }

    #[test]
    fn growth_rehashes_to_new_home_indices() {
        initialize_logger();
        let mut table: HashTable<i32, &str> = HashTable::new(5).unwrap();
        table.put(1, "one").unwrap();
        assert!((table.load_factor() - 0.2).abs() < 1e-9);
        table.put(2, "two").unwrap();
        assert!((table.load_factor() - 0.4).abs() < 1e-9);
        table.put(18, "eighteen").unwrap();
        assert!((table.load_factor() - 0.6).abs() < 1e-9);
        assert_eq!(table.capacity(), 5);
        assert_eq!(value_at(&table, 3), Some("eighteen"));

        table.put(29, "twenty nine").unwrap();
        assert_eq!(table.capacity(), 10);
        assert_eq!(table.size(), 4);
        assert!((table.load_factor() - 0.4).abs() < 1e-9);
        assert_eq!(value_at(&table, 1), Some("one"));
        assert_eq!(value_at(&table, 2), Some("two"));
        assert_eq!(value_at(&table, 8), Some("eighteen"));
        assert_eq!(value_at(&table, 9), Some("twenty nine"));
    }

    #[test]
    fn growth_drops_tombstones() {
        let mut table: HashTable<i32, &str> = HashTable::new(5).unwrap();
        table.put(0, "zero").unwrap();
        table.remove(&0).unwrap();
        assert_eq!(table.slot(0), Some(&Slot::Tombstone));
        table.put(1, "one").unwrap();
        table.put(2, "two").unwrap();
        table.put(3, "three").unwrap();
        table.put(4, "four").unwrap();
        assert_eq!(table.capacity(), 10);
        assert!((0..table.capacity()).all(|i| table.slot(i) != Some(&Slot::Tombstone)));
    }

    #[test]
    fn growth_keeps_entries_that_collide_after_rehash() {
        let mut table: HashTable<i32, &str> = HashTable::new(5).unwrap();
        // 3, 13 and 23 share home slot 3 at capacity 5 and at capacity 10.
        table.put(3, "three").unwrap();
        table.put(13, "thirteen").unwrap();
        table.put(23, "twenty three").unwrap();
        table.put(4, "four").unwrap();
        assert_eq!(table.capacity(), 10);
        assert_eq!(table.size(), 4);
        assert_eq!(table.get(&3), Ok(&"three"));
        assert_eq!(table.get(&13), Ok(&"thirteen"));
        assert_eq!(table.get(&23), Ok(&"twenty three"));
        assert_eq!(table.get(&4), Ok(&"four"));
        let occupied: usize = (0..table.capacity())
            .filter(|&i| table.slot(i).map_or(false, Slot::is_occupied))
            .count();
        assert_eq!(occupied, table.size());
    }

    #[test]
    fn remove_leaves_tombstone() {
        let mut table: HashTable<i32, &str> = HashTable::new(5).unwrap();
        table.put(1, "one").unwrap();
        table.put(4, "four").unwrap();
        assert_eq!(table.remove(&1), Ok("one"));
        assert_eq!(table.slot(1), Some(&Slot::Tombstone));
        assert_eq!(value_at(&table, 1), None);
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn put_reuses_tombstone() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        table.put(1, "one").unwrap();
        table.put(11, "eleven").unwrap();
        table.remove(&1).unwrap();
        table.put(21, "twenty one").unwrap();
        assert_eq!(value_at(&table, 1), Some("twenty one"));
        assert_eq!(value_at(&table, 2), Some("eleven"));
        assert_eq!(table.get(&11), Ok(&"eleven"));
    }

    #[test]
    fn lookups_terminate_when_every_slot_is_a_tombstone() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        for key in 0..10 {
            table.put(key, "transient").unwrap();
            table.remove(&key).unwrap();
        }
        assert!((0..10).all(|i| table.slot(i) == Some(&Slot::Tombstone)));
        assert!(!table.contains_key(&10));
        assert_eq!(table.get(&10), Err(HashTableError::NotFound));
        table.put(10, "ten").unwrap();
        assert_eq!(value_at(&table, 0), Some("ten"));
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn capacity_one_grows_on_first_put() {
        let mut table: HashTable<i32, &str> = HashTable::new(1).unwrap();
        table.put(7, "seven").unwrap();
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.get(&7), Ok(&"seven"));
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut table: HashTable<i32, &str> = HashTable::new(5).unwrap();
        table.put(1, "one").unwrap();
        table.put(4, "four").unwrap();
        table.remove(&4).unwrap();
        table.clear();
        assert_eq!(table.size(), 0);
        assert_eq!(table.load_factor(), 0.0);
        assert_eq!(table.capacity(), 5);
        assert!((0..5).all(|i| table.slot(i) == Some(&Slot::Empty)));
        assert_eq!(table.slot(5), None);
    }

    #[test]
    fn failed_put_leaves_table_untouched() {
        let mut table: HashTable<i32, &str> = HashTable::new(10).unwrap();
        table.put(1, "one").unwrap();
        let before: Vec<Slot<i32, &str>> = table.slots.clone();
        assert!(matches!(
            table.put(1, "another one"),
            Err(HashTableError::InvalidArgument(_))
        ));
        assert!(matches!(
            table.put_nullable(None, "null"),
            Err(HashTableError::InvalidArgument(_))
        ));
        assert_eq!(table.slots, before);
        assert_eq!(table.size(), 1);
        assert!((table.load_factor() - 0.1).abs() < 1e-9);
    }
}
