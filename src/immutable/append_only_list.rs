//! An immutable list optimized for appending.
//!
//! Query values accumulate filters and orderings one at a time, and every step
//! produces a new value while the previous one stays valid. `AppendOnlyList`
//! lets that whole chain of values share a single backing store: each list
//! sees a prefix of the store, and appending to the list that ends the chain
//! fills the next slot in place instead of copying.
//!
//! The store is a linked sequence of chunks whose slots are written at most
//! once, so elements never move and readers need no lock. Appending to a list
//! that is not the end of its chain (its next slot is already taken) copies
//! the prefix into a fresh store.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::ops::Index;
use std::sync::{Arc, OnceLock};

const MIN_CHUNK_CAPACITY: usize = 4;

struct Chunk<T> {
    slots: Box<[OnceLock<T>]>,
    next: OnceLock<Arc<Chunk<T>>>,
}

impl<T> Chunk<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity.max(MIN_CHUNK_CAPACITY))
                .map(|_| OnceLock::new())
                .collect(),
            next: OnceLock::new(),
        }
    }

    /// The slot at `index`, growing the chain of chunks to reach it.
    fn slot_for_append(&self, mut index: usize) -> &OnceLock<T> {
        let mut chunk = self;
        while index >= chunk.slots.len() {
            index -= chunk.slots.len();
            let capacity = chunk.slots.len() * 2;
            chunk = &**chunk
                .next
                .get_or_init(|| Arc::new(Chunk::with_capacity(capacity)));
        }
        &chunk.slots[index]
    }

    /// The slot at `index`, if the chunk holding it exists.
    fn slot(&self, mut index: usize) -> Option<&OnceLock<T>> {
        let mut chunk = self;
        while index >= chunk.slots.len() {
            index -= chunk.slots.len();
            chunk = &**chunk.next.get()?;
        }
        Some(&chunk.slots[index])
    }
}

/// An immutable, structurally shared list.
///
/// `push_back` takes `self` by value and returns the longer list. Called on
/// the last list of a chain, the result shares storage with every list before
/// it, so a chain of `list = list.clone().push_back(x)` calls is amortized
/// O(1) per step with no copying. Called on a list in the middle of a chain
/// (after `pop_back`, or on a second branch from the same list) it copies.
/// Either way, no other list observes the change.
pub struct AppendOnlyList<T> {
    // Slots past `size` may be filled by longer lists sharing the store.
    head: Option<Arc<Chunk<T>>>,
    size: usize,
}

impl<T> AppendOnlyList<T> {
    /// Creates an empty list without allocating.
    pub const fn new() -> Self {
        Self { head: None, size: 0 }
    }

    /// Number of elements in the list.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The element at `index`, if it is within the list.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.size {
            return None;
        }
        self.head.as_deref()?.slot(index)?.get()
    }

    /// The first element.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// The last element.
    pub fn last(&self) -> Option<&T> {
        self.size.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            chunk: self.head.as_deref(),
            offset: 0,
            remaining: self.size,
        }
    }

    /// Whether the list holds an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|element| element == value)
    }

    /// Returns a new list with the final element removed.
    ///
    /// The result shares storage with `self`, so appending to it will copy.
    #[must_use]
    pub fn pop_back(&self) -> Self {
        if self.size <= 1 {
            return Self::new();
        }
        Self {
            head: self.head.clone(),
            size: self.size - 1,
        }
    }

    /// Returns an empty list.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Whether two lists point at the same backing storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn is_end_of_chain(&self) -> bool {
        match &self.head {
            Some(head) => head.slot(self.size).map_or(true, |slot| slot.get().is_none()),
            None => true,
        }
    }
}

impl<T: Clone> AppendOnlyList<T> {
    /// Returns a new list with `value` appended to the end.
    #[must_use]
    pub fn push_back(self, value: T) -> Self {
        let Self { head, size } = self;
        let head = match head {
            Some(head) => head,
            None => Arc::new(Chunk::with_capacity(MIN_CHUNK_CAPACITY)),
        };
        match head.slot_for_append(size).set(value) {
            Ok(()) => Self {
                head: Some(head),
                size: size + 1,
            },
            Err(value) => {
                let copy = Self {
                    head: Some(head),
                    size,
                }
                .copy_with_capacity(size + 1);
                copy.push_back(value)
            }
        }
    }

    /// Returns a list whose storage can take `capacity` elements without
    /// allocating on append.
    ///
    /// The length does not change. Forces a copy if this list is not the end
    /// of its chain.
    #[must_use]
    pub fn reserve(self, capacity: usize) -> Self {
        if capacity <= self.size {
            return self;
        }
        if !self.is_end_of_chain() {
            return self.copy_with_capacity(capacity);
        }
        let Some(head) = &self.head else {
            return Self {
                head: Some(Arc::new(Chunk::with_capacity(capacity))),
                size: 0,
            };
        };
        let _ = head.slot_for_append(capacity - 1);
        self
    }

    fn copy_with_capacity(&self, capacity: usize) -> Self {
        let head = Arc::new(Chunk::with_capacity(capacity));
        for (index, value) in self.iter().enumerate() {
            // Fresh storage, so every slot is still empty.
            let _ = head.slot_for_append(index).set(value.clone());
        }
        Self {
            head: Some(head),
            size: self.size,
        }
    }
}

/// Iterator over the elements of an [`AppendOnlyList`].
pub struct Iter<'a, T> {
    chunk: Option<&'a Chunk<T>>,
    offset: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let mut chunk = self.chunk?;
        if self.offset == chunk.slots.len() {
            chunk = &**chunk.next.get()?;
            self.chunk = Some(chunk);
            self.offset = 0;
        }
        let value = chunk.slots[self.offset].get()?;
        self.offset += 1;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Default for AppendOnlyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for AppendOnlyList<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            size: self.size,
        }
    }
}

impl<T> Index<usize> for AppendOnlyList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.size
            ),
        }
    }
}

impl<T: PartialEq> PartialEq for AppendOnlyList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AppendOnlyList<T> {}

impl<T: Hash> Hash for AppendOnlyList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AppendOnlyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> FromIterator<T> for AppendOnlyList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |list, value| list.push_back(value))
    }
}

impl<'a, T> IntoIterator for &'a AppendOnlyList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
