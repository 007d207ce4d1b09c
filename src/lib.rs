//! A resizable hash table with open addressing, linear probing and
//! tombstone deletion.

pub mod error;
pub mod hash_table;
pub mod hasher;
pub mod logger;
pub mod map;

pub use error::{HashTableError, Result};
pub use hash_table::{HashTable, Slot};
pub use hasher::{IdentityHasher, IdentityState};
pub use map::MapAdt;
