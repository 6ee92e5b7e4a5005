//! Positional containers for rendered views.

use horizon_grid_core::{GridError, Result};

/// An ordered container of rendered views that supports insertion and
/// removal at arbitrary positions.
///
/// Header rows hold their cells in an outlet, the grid holds its data rows
/// in one, and an expanded row renders its detail region into one.
#[derive(Debug, Clone)]
pub struct Outlet<V> {
    views: Vec<V>,
}

impl<V> Default for Outlet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Outlet<V> {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.views.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.views.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.views.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.views.iter_mut()
    }

    pub fn push(&mut self, view: V) {
        self.views.push(view);
    }

    /// Insert a view at `index`. An index equal to the length appends.
    pub fn insert(&mut self, index: usize, view: V) -> Result<()> {
        if index > self.views.len() {
            return Err(GridError::index_out_of_range(index, self.views.len()));
        }
        self.views.insert(index, view);
        Ok(())
    }

    /// Remove and return the view at `index`.
    pub fn remove(&mut self, index: usize) -> Result<V> {
        if index >= self.views.len() {
            return Err(GridError::index_out_of_range(index, self.views.len()));
        }
        Ok(self.views.remove(index))
    }

    pub fn clear(&mut self) {
        self.views.clear();
    }
}

impl<V> FromIterator<V> for Outlet<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            views: iter.into_iter().collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Outlet<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut outlet: Outlet<&str> = ["a", "c"].into_iter().collect();
        outlet.insert(1, "b").unwrap();
        outlet.insert(3, "d").unwrap();
        assert_eq!(outlet.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
        assert_eq!(outlet.remove(0).unwrap(), "a");
        assert_eq!(outlet.len(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let mut outlet = Outlet::new();
        assert_eq!(
            outlet.insert(1, 'x'),
            Err(GridError::IndexOutOfRange { index: 1, len: 0 })
        );
        assert!(outlet.remove(0).is_err());
        assert!(outlet.is_empty());
    }
}
