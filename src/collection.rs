//! 1-based ordered collections with a COM-style enumerator.
//!
//! Facade members that hand back a set of capabilities (supported tracking
//! rates, axis rate ranges) return an [`OrdinalCollection`]. Internally this is
//! a plain 0-based buffer; the 1-based indexing and the cursor live in adapters
//! on top of it.

use crate::errors::{Error, ErrorKind, ErrorOrigin};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by [`OrdinalCollection`] and [`Enumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Index was 0 or greater than the item count.
    #[error("index {index} is out of range 1..={count}")]
    IndexOutOfRange {
        /// Requested 1-based index.
        index: usize,
        /// Number of items in the collection.
        count: usize,
    },
    /// The collection was already handed out for enumeration.
    #[error("collection is read-only once enumeration has started")]
    Sealed,
}

impl From<CollectionError> for Error {
    fn from(err: CollectionError) -> Self {
        let kind = match err {
            CollectionError::IndexOutOfRange { .. } => ErrorKind::InvalidArgument,
            CollectionError::Sealed => ErrorKind::InvalidState,
        };
        Self::new(kind, ErrorOrigin::Client, err)
    }
}

#[derive(Clone)]
enum Storage<T> {
    Building(Vec<T>),
    Sealed(Arc<[T]>),
}

/// Ordered, append-built, 1-based sequence.
///
/// Items can be added only while the collection is being populated. Calling
/// [`get_enumerator`](Self::get_enumerator) seals it: the items move into
/// shared storage, and every clone and enumerator reads the same buffer from
/// then on. Dropping one holder never affects the others.
///
/// Collections returned by facade members are sealed already.
#[derive(Clone)]
pub struct OrdinalCollection<T> {
    storage: Storage<T>,
}

impl<T> Default for OrdinalCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrdinalCollection<T> {
    /// Create an empty collection open for population.
    pub const fn new() -> Self {
        Self {
            storage: Storage::Building(Vec::new()),
        }
    }

    /// Append an item.
    pub fn add(&mut self, item: T) -> Result<(), CollectionError> {
        match &mut self.storage {
            Storage::Building(items) => {
                items.push(item);
                Ok(())
            }
            Storage::Sealed(_) => Err(CollectionError::Sealed),
        }
    }

    fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Building(items) => items,
            Storage::Sealed(items) => items,
        }
    }

    /// Number of items.
    pub fn count(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Item at the given 1-based index.
    pub fn item(&self, index: usize) -> Result<&T, CollectionError> {
        let items = self.as_slice();

        index
            .checked_sub(1)
            .and_then(|i| items.get(i))
            .ok_or(CollectionError::IndexOutOfRange {
                index,
                count: items.len(),
            })
    }

    fn seal(&mut self) -> Arc<[T]> {
        let items = match std::mem::replace(&mut self.storage, Storage::Sealed(Arc::new([]))) {
            Storage::Building(items) => items.into(),
            Storage::Sealed(items) => items,
        };
        self.storage = Storage::Sealed(Arc::clone(&items));
        items
    }

    /// Seal the collection and return a fresh enumerator positioned before the first item.
    ///
    /// Each enumerator owns its own cursor, so several of them can walk the
    /// same collection independently.
    pub fn get_enumerator(&mut self) -> Enumerator<T> {
        Enumerator {
            items: self.seal(),
            cursor: None,
        }
    }

    /// Whether [`add`](Self::add) is still accepted.
    pub const fn is_sealed(&self) -> bool {
        matches!(self.storage, Storage::Sealed(_))
    }

    /// Iterate over items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for OrdinalCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for OrdinalCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T> From<Vec<T>> for OrdinalCollection<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            storage: Storage::Sealed(items.into()),
        }
    }
}

impl<T> FromIterator<T> for OrdinalCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<'a, T> IntoIterator for &'a OrdinalCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Serialize> Serialize for OrdinalCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrdinalCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::deserialize(deserializer).map(Self::from)
    }
}

/// COM-style cursor over a sealed [`OrdinalCollection`].
#[derive(Debug, Clone)]
pub struct Enumerator<T> {
    items: Arc<[T]>,
    // `None` means "before first".
    cursor: Option<usize>,
}

impl<T> Enumerator<T> {
    /// Advance to the next item. Returns `false` once the end is reached.
    pub fn move_next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |i| i.saturating_add(1).min(self.items.len()));
        self.cursor = Some(next);
        next < self.items.len()
    }

    /// Item under the cursor.
    ///
    /// `None` before the first [`move_next`](Self::move_next) and after the end.
    pub fn current(&self) -> Option<&T> {
        self.items.get(self.cursor?)
    }

    /// Rewind to "before first".
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Number of items being enumerated.
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

impl<T: Clone> Iterator for Enumerator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.move_next() {
            self.current().cloned()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated(count: usize) -> OrdinalCollection<usize> {
        let mut collection = OrdinalCollection::new();
        for i in 0..count {
            collection.add(i * 10).expect("fresh collection accepts items");
        }
        collection
    }

    #[test]
    fn indexing_is_one_based_and_inclusive() {
        for count in 1..=5 {
            let collection = populated(count);
            assert_eq!(collection.count(), count);
            assert_eq!(
                collection.item(0),
                Err(CollectionError::IndexOutOfRange { index: 0, count })
            );
            assert_eq!(
                collection.item(count + 1),
                Err(CollectionError::IndexOutOfRange {
                    index: count + 1,
                    count
                })
            );
            assert_eq!(collection.item(1), Ok(&0));
            assert_eq!(collection.item(count), Ok(&((count - 1) * 10)));
        }
    }

    #[test]
    fn enumeration_visits_every_item_in_order() {
        let mut collection = populated(4);
        let mut enumerator = collection.get_enumerator();

        for _ in 0..2 {
            enumerator.reset();
            assert_eq!(enumerator.current(), None);

            let mut seen = Vec::new();
            while enumerator.move_next() {
                seen.push(*enumerator.current().expect("cursor is on an item"));
            }
            assert_eq!(seen, [0, 10, 20, 30]);
            assert!(!enumerator.move_next());
            assert_eq!(enumerator.current(), None);
        }
    }

    #[test]
    fn add_is_rejected_after_enumeration() {
        let mut collection = populated(2);
        assert!(!collection.is_sealed());
        let _ = collection.get_enumerator();
        assert_eq!(collection.add(99), Err(CollectionError::Sealed));
        assert_eq!(collection.count(), 2);
    }

    #[test]
    fn dropping_one_holder_keeps_storage_for_others() {
        let mut collection = populated(3);
        let mut enumerator = collection.get_enumerator();
        let copy = collection.clone();
        drop(collection);

        assert_eq!(copy.item(3), Ok(&20));
        assert!(enumerator.move_next());
        assert_eq!(enumerator.current(), Some(&0));
    }

    #[test]
    fn enumerators_have_independent_cursors() {
        let mut collection = populated(3);
        let mut first = collection.get_enumerator();
        let mut second = collection.get_enumerator();

        assert!(first.move_next());
        assert!(first.move_next());
        assert!(second.move_next());
        assert_eq!(first.current(), Some(&10));
        assert_eq!(second.current(), Some(&0));
    }

    #[test]
    fn out_of_range_translates_to_invalid_argument() {
        let err = Error::from(CollectionError::IndexOutOfRange { index: 0, count: 1 });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
