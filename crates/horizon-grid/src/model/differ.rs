//! Identity-based reconciliation of ordered collections.
//!
//! [`IterableDiffer`] remembers the last collection it saw and, given the
//! next one, reports which items were added and which were removed. Items
//! are matched by a tracking key, object identity unless a track-by function
//! is supplied. Moves are not reported: an item present in both snapshots
//! is never added or removed, whatever its position.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Result};

use super::column::Column;

/// Types with a stable identity, used as the default tracking key.
pub trait Identity {
    fn identity(&self) -> usize;
}

impl Identity for Column {
    fn identity(&self) -> usize {
        Column::identity(self)
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn identity(&self) -> usize {
        Rc::as_ptr(self) as *const () as usize
    }
}

/// An item present in the new snapshot but not the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedRecord<T> {
    pub item: T,
    pub current_index: usize,
}

/// An item present in the old snapshot but not the new one.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedRecord<T> {
    pub item: T,
    pub previous_index: usize,
}

/// The difference between two snapshots.
///
/// Apply it to a positional container by performing every removal in
/// descending `previous_index` order first, then every addition in ascending
/// `current_index` order. [`removals`](Self::removals) and
/// [`additions`](Self::additions) iterate in exactly that order.
#[derive(Debug, Clone)]
pub struct ChangeSet<T> {
    added: Vec<AddedRecord<T>>,
    removed: Vec<RemovedRecord<T>>,
}

impl<T> ChangeSet<T> {
    /// Added items, ascending by `current_index`.
    pub fn added(&self) -> &[AddedRecord<T>] {
        &self.added
    }

    /// Removed items, ascending by `previous_index`.
    pub fn removed(&self) -> &[RemovedRecord<T>] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Removals in application order (descending `previous_index`).
    pub fn removals(&self) -> impl Iterator<Item = &RemovedRecord<T>> {
        self.removed.iter().rev()
    }

    /// Additions in application order (ascending `current_index`).
    pub fn additions(&self) -> impl Iterator<Item = &AddedRecord<T>> {
        self.added.iter()
    }

    /// Apply the change set to a vector mirroring the old snapshot.
    ///
    /// `make` builds the element for each added item.
    pub fn apply_to<V>(&self, target: &mut Vec<V>, mut make: impl FnMut(&T) -> V) -> Result<()> {
        for record in self.removals() {
            if record.previous_index >= target.len() {
                return Err(GridError::index_out_of_range(
                    record.previous_index,
                    target.len(),
                ));
            }
            target.remove(record.previous_index);
        }
        for record in self.additions() {
            if record.current_index > target.len() {
                return Err(GridError::index_out_of_range(
                    record.current_index,
                    target.len(),
                ));
            }
            target.insert(record.current_index, make(&record.item));
        }
        Ok(())
    }
}

type TrackByFn<T, K> = Box<dyn Fn(usize, &T) -> K>;

struct Tracked<T, K> {
    key: K,
    item: T,
}

/// Stateful differ over successive snapshots of a collection.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use horizon_grid::model::IterableDiffer;
///
/// let (a, b, c) = (Rc::new("A"), Rc::new("B"), Rc::new("C"));
/// let mut differ = IterableDiffer::new();
///
/// let first = differ.diff(&[a.clone(), b.clone()]).unwrap();
/// assert_eq!(first.added().len(), 2);
///
/// let second = differ.diff(&[a.clone(), c.clone()]).unwrap();
/// assert!(Rc::ptr_eq(&second.removed()[0].item, &b));
/// assert_eq!(second.removed()[0].previous_index, 1);
/// assert!(Rc::ptr_eq(&second.added()[0].item, &c));
/// assert_eq!(second.added()[0].current_index, 1);
///
/// assert!(differ.diff(&[a, c]).is_none());
/// ```
pub struct IterableDiffer<T, K = usize> {
    track_by: TrackByFn<T, K>,
    previous: Option<Vec<Tracked<T, K>>>,
}

impl<T: Identity + Clone + 'static> IterableDiffer<T, usize> {
    /// A differ that tracks items by identity.
    pub fn new() -> Self {
        Self::with_track_by(|_, item: &T| item.identity())
    }
}

impl<T: Identity + Clone + 'static> Default for IterableDiffer<T, usize> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, K: Hash + Eq + 'static> IterableDiffer<T, K> {
    /// A differ that tracks items by the key `track_by` derives from each
    /// item and its position.
    pub fn with_track_by<F>(track_by: F) -> Self
    where
        F: Fn(usize, &T) -> K + 'static,
    {
        Self {
            track_by: Box::new(track_by),
            previous: None,
        }
    }

    /// Whether a snapshot has been recorded since creation or the last reset.
    pub fn has_snapshot(&self) -> bool {
        self.previous.is_some()
    }

    /// Forget the recorded snapshot. The next diff reports everything as added.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Compare `next` against the recorded snapshot, then record `next`.
    ///
    /// Returns `None` when nothing was added or removed. The first call
    /// compares against an empty collection. Duplicates are matched as a
    /// multiset: two occurrences of one item against one occurrence yield
    /// one addition or removal.
    pub fn diff(&mut self, next: &[T]) -> Option<ChangeSet<T>> {
        let next: Vec<Tracked<T, K>> = next
            .iter()
            .enumerate()
            .map(|(index, item)| Tracked {
                key: (self.track_by)(index, item),
                item: item.clone(),
            })
            .collect();
        let previous = self.previous.take().unwrap_or_default();

        let unchanged = previous.len() == next.len()
            && previous.iter().zip(&next).all(|(p, n)| p.key == n.key);
        if unchanged {
            self.previous = Some(next);
            return None;
        }

        let added = unmatched(&next, &previous)
            .map(|(current_index, tracked)| AddedRecord {
                item: tracked.item.clone(),
                current_index,
            })
            .collect::<Vec<_>>();
        let removed = unmatched(&previous, &next)
            .map(|(previous_index, tracked)| RemovedRecord {
                item: tracked.item.clone(),
                previous_index,
            })
            .collect::<Vec<_>>();
        self.previous = Some(next);

        if added.is_empty() && removed.is_empty() {
            tracing::trace!(target: targets::DIFFER, "collection reordered");
            return None;
        }

        tracing::debug!(
            target: targets::DIFFER,
            added = added.len(),
            removed = removed.len(),
            "collection changed"
        );
        Some(ChangeSet { added, removed })
    }
}

/// Items of `left` (with their index) not matched by an occurrence in `right`.
fn unmatched<'a, T, K: Hash + Eq>(
    left: &'a [Tracked<T, K>],
    right: &'a [Tracked<T, K>],
) -> impl Iterator<Item = (usize, &'a Tracked<T, K>)> {
    let mut available: HashMap<&K, usize> = HashMap::new();
    for tracked in right {
        *available.entry(&tracked.key).or_default() += 1;
    }
    left.iter()
        .enumerate()
        .filter(move |(_, tracked)| match available.get_mut(&tracked.key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
}
