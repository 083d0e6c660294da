//! Ordered composite shared by procedures and responses.
//!
//! A value that is not a batch behaves as a batch of one: `count()` is 1 and
//! iterating yields the value itself, so callers can loop without caring
//! whether they hold a single message or a batch.

use std::fmt;
use std::slice;
use std::sync::Arc;

/// Ordered, persistent sequence of like-typed children.
///
/// Children are reference counted, so replacing one slot copies the slot
/// table but shares every untouched child.
pub struct Batch<T> {
    elements: Vec<Arc<T>>,
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter().map(Arc::as_ref)
    }

    /// Index of the first child matching `predicate`.
    pub fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.elements.iter().position(|element| predicate(element))
    }

    /// A copy with the child at `index` replaced; `None` if out of bounds.
    pub fn with_replaced(&self, index: usize, element: T) -> Option<Self> {
        if index >= self.elements.len() {
            return None;
        }
        let mut elements = self.elements.clone();
        elements[index] = Arc::new(element);
        Some(Self { elements })
    }
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Batch<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Batch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Index-aligned comparison.
impl<T: PartialEq> PartialEq for Batch<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T> FromIterator<T> for Batch<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Implemented by every type that may carry a batch of itself.
pub trait Batched: Sized {
    fn elements(&self) -> &Batch<Self>;

    fn is_batch(&self) -> bool {
        !self.elements().is_empty()
    }

    /// Number of members; 1 when this is not a batch.
    fn count(&self) -> usize {
        self.elements().len().max(1)
    }

    /// The batch children in stored order, or `self` alone.
    fn members(&self) -> Members<'_, Self> {
        if self.is_batch() {
            Members::Many(self.elements().elements.iter())
        } else {
            Members::One(Some(self))
        }
    }
}

/// Iterator returned by [`Batched::members`].
pub enum Members<'a, T> {
    One(Option<&'a T>),
    Many(slice::Iter<'a, Arc<T>>),
}

impl<'a, T> Iterator for Members<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Members::One(single) => single.take(),
            Members::Many(elements) => elements.next().map(Arc::as_ref),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self {
            Members::One(single) => usize::from(single.is_some()),
            Members::Many(elements) => elements.len(),
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Members<'_, T> {}
