//! In-memory row source with optional pagination.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{
    ConnectionGuard, ConnectionId, GridError, Property, ReplayProperty, Result, Signal,
};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// A page request from a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageEvent {
    pub page_index: usize,
    pub page_size: usize,
}

/// Emits page requests, typically driven by pager controls.
#[derive(Debug)]
pub struct Paginator {
    current: Property<PageEvent>,
    page: Signal<PageEvent>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: Property::new(PageEvent {
                page_index: 0,
                page_size,
            }),
            page: Signal::new(),
        }
    }

    /// Emitted on every [`set_page`](Self::set_page).
    pub fn page(&self) -> &Signal<PageEvent> {
        &self.page
    }

    pub fn current(&self) -> PageEvent {
        self.current.get()
    }

    /// Request a page.
    pub fn set_page(&self, page_index: usize, page_size: usize) {
        let event = PageEvent {
            page_index,
            page_size,
        };
        // Repeating the current page still emits, so a pager can force a reload.
        self.current.set_silent(event);
        self.page.emit(event);
    }

    pub fn next_page(&self) {
        let current = self.current();
        self.set_page(current.page_index + 1, current.page_size);
    }

    pub fn previous_page(&self) {
        let current = self.current();
        self.set_page(current.page_index.saturating_sub(1), current.page_size);
    }
}

type Published<T> = ReplayProperty<Vec<Rc<T>>>;

struct SourceInner<T> {
    items: RefCell<Vec<Rc<T>>>,
    page_size: Cell<usize>,
    page_index: Cell<usize>,
    paginated: Cell<bool>,
    published: Rc<Published<T>>,
    paginator: RefCell<Option<ConnectionGuard<PageEvent>>>,
}

/// An array-backed source of rows.
///
/// Items are held as `Rc<T>` so that their identity survives republishing.
/// Every mutation republishes; [`reload`](Self::reload) republishes on
/// demand. Without a paginator the whole array is published; with one, only the
/// current page window.
///
/// `ArrayDataSource` is a shared handle; clones refer to the same source.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use horizon_grid::model::ArrayDataSource;
///
/// let source = ArrayDataSource::<String>::new();
/// source.add_item("Peter".to_string());
///
/// let seen = Rc::new(Cell::new(0));
/// let counter = seen.clone();
/// let connection = source.connect();
/// connection.subscribe(move |items| counter.set(items.len()));
/// assert_eq!(seen.get(), 1);
///
/// source.add_item("Bruce".to_string());
/// assert_eq!(seen.get(), 2);
/// ```
pub struct ArrayDataSource<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for ArrayDataSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Default for ArrayDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ArrayDataSource<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// A source holding `items`. Nothing is published until `reload`.
    pub fn with_items(items: Vec<Rc<T>>) -> Self {
        Self {
            inner: Rc::new(SourceInner {
                items: RefCell::new(items),
                page_size: Cell::new(DEFAULT_PAGE_SIZE),
                page_index: Cell::new(0),
                paginated: Cell::new(false),
                published: Rc::new(ReplayProperty::new(Vec::new())),
                paginator: RefCell::new(None),
            }),
        }
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Append an item, republish, and return its shared handle.
    pub fn add_item(&self, item: impl Into<Rc<T>>) -> Rc<T> {
        let item = item.into();
        self.inner.items.borrow_mut().push(item.clone());
        self.reload();
        item
    }

    /// Insert an item at `index`. An index equal to the length appends.
    pub fn insert_item(&self, item: impl Into<Rc<T>>, index: usize) -> Result<Rc<T>> {
        let item = item.into();
        {
            let mut items = self.inner.items.borrow_mut();
            if index > items.len() {
                return Err(GridError::index_out_of_range(index, items.len()));
            }
            items.insert(index, item.clone());
        }
        self.reload();
        Ok(item)
    }

    /// Remove every occurrence of `item`, by identity.
    ///
    /// Republishes even when nothing matched.
    pub fn remove_item(&self, item: &Rc<T>) -> usize {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            let before = items.len();
            items.retain(|existing| !Rc::ptr_eq(existing, item));
            before - items.len()
        };
        self.reload();
        removed
    }

    pub fn remove_item_by_index(&self, index: usize) -> Result<Rc<T>> {
        let item = {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                return Err(GridError::index_out_of_range(index, items.len()));
            }
            items.remove(index)
        };
        self.reload();
        Ok(item)
    }

    pub fn remove_all(&self) {
        self.inner.items.borrow_mut().clear();
        self.reload();
    }

    /// A snapshot of every item, ignoring pagination.
    pub fn items(&self) -> Vec<Rc<T>> {
        self.inner.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.inner.page_size.get()
    }

    pub fn page_index(&self) -> usize {
        self.inner.page_index.get()
    }

    /// Total number of items, for pager controls.
    pub fn total_size(&self) -> usize {
        self.len()
    }

    pub fn is_paginated(&self) -> bool {
        self.inner.paginated.get()
    }

    /// The items the next `reload` would publish.
    pub fn visible(&self) -> Vec<Rc<T>> {
        let items = self.inner.items.borrow();
        if !self.is_paginated() {
            return items.clone();
        }
        let start = self.page_index().saturating_mul(self.page_size());
        items
            .iter()
            .skip(start)
            .take(self.page_size())
            .cloned()
            .collect()
    }

    /// Publish the current window to every connection.
    pub fn reload(&self) {
        let visible = self.visible();
        tracing::debug!(
            target: targets::DATA_SOURCE,
            published = visible.len(),
            total = self.total_size(),
            page_index = self.page_index(),
            "data source reloaded"
        );
        self.inner.published.publish(visible);
    }

    /// Follow `paginator`: every page request updates the window and reloads.
    ///
    /// Replaces any paginator attached before.
    pub fn attach_paginator(&self, paginator: &Paginator) {
        let current = paginator.current();
        self.inner.page_size.set(current.page_size);
        self.inner.page_index.set(current.page_index);
        self.inner.paginated.set(true);

        let weak: Weak<SourceInner<T>> = Rc::downgrade(&self.inner);
        let guard = paginator.page().connect_scoped(move |event: &PageEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.page_size.set(event.page_size);
            inner.page_index.set(event.page_index);
            ArrayDataSource { inner }.reload();
        });
        *self.inner.paginator.borrow_mut() = Some(guard);
    }

    /// Builder form of [`attach_paginator`](Self::attach_paginator).
    pub fn with_paginator(self, paginator: &Paginator) -> Self {
        self.attach_paginator(paginator);
        self
    }

    /// Stop following the paginator and publish whole arrays again.
    pub fn detach_paginator(&self) {
        self.inner.paginator.borrow_mut().take();
        self.inner.paginated.set(false);
    }

    /// Open a connection to the published rows.
    pub fn connect(&self) -> DataConnection<T> {
        DataConnection {
            published: self.inner.published.clone(),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Drop every subscriber of every connection.
    pub fn disconnect(&self) {
        self.inner.published.unsubscribe_all();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.published.subscriber_count()
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayDataSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayDataSource")
            .field("items", &*self.inner.items.borrow())
            .field("page_size", &self.inner.page_size.get())
            .field("page_index", &self.inner.page_index.get())
            .field("paginated", &self.inner.paginated.get())
            .finish()
    }
}

/// A consumer's connection to an [`ArrayDataSource`].
///
/// Subscribing replays the latest published rows, then delivers every later
/// publish. Dropping the connection disconnects it.
pub struct DataConnection<T: 'static> {
    published: Rc<Published<T>>,
    subscriptions: RefCell<Vec<ConnectionId>>,
}

impl<T: 'static> DataConnection<T> {
    pub fn subscribe<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&[Rc<T>]) + 'static,
    {
        let id = self
            .published
            .subscribe(move |items: &Vec<Rc<T>>| slot(items));
        self.subscriptions.borrow_mut().push(id);
        id
    }

    /// The most recently published rows.
    pub fn latest(&self) -> Vec<Rc<T>> {
        self.published.get()
    }

    pub fn is_connected(&self) -> bool {
        self.subscriptions
            .borrow()
            .iter()
            .any(|id| self.published.is_subscribed(*id))
    }

    /// Stop deliveries to this connection's subscribers. Safe to call twice.
    pub fn disconnect(&self) {
        for id in self.subscriptions.borrow_mut().drain(..) {
            self.published.unsubscribe(id);
        }
    }
}

impl<T: 'static> Drop for DataConnection<T> {
    fn drop(&mut self) {
        for id in self.subscriptions.get_mut().drain(..) {
            self.published.unsubscribe(id);
        }
    }
}

impl<T: 'static> fmt::Debug for DataConnection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataConnection")
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(connection: &DataConnection<u32>) -> Rc<RefCell<Vec<Vec<u32>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        connection.subscribe(move |items| {
            sink.borrow_mut()
                .push(items.iter().map(|item| **item).collect())
        });
        seen
    }

    fn source_of(count: u32) -> ArrayDataSource<u32> {
        let source = ArrayDataSource::new();
        for n in 1..=count {
            source.add_item(n);
        }
        source
    }

    #[test]
    fn test_defaults() {
        let source = ArrayDataSource::<u32>::new();
        assert_eq!(source.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(source.page_index(), 0);
        assert_eq!(source.total_size(), 0);
        assert!(!source.is_paginated());
    }

    #[test]
    fn test_subscribe_replays_latest() {
        let source = source_of(2);
        source.reload();
        let connection = source.connect();
        let seen = collect(&connection);
        assert_eq!(*seen.borrow(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_every_mutation_republishes() {
        let source = source_of(1);
        let connection = source.connect();
        let seen = collect(&connection);
        source.add_item(2_u32);
        source.insert_item(3_u32, 0).unwrap();
        source.remove_item_by_index(1).unwrap();
        assert!(source.insert_item(4_u32, 9).is_err());
        assert_eq!(
            *seen.borrow(),
            vec![vec![1], vec![1, 2], vec![3, 1, 2], vec![3, 2]]
        );
        source.remove_all();
        assert!(seen.borrow().last().unwrap().is_empty());
        assert_eq!(source.total_size(), 0);
    }

    #[test]
    fn test_unpaginated_publishes_everything() {
        let source = source_of(12);
        let connection = source.connect();
        source.reload();
        assert_eq!(connection.latest().len(), 12);
    }

    #[test]
    fn test_paginator_window() {
        let source = source_of(12);
        let paginator = Paginator::default();
        source.attach_paginator(&paginator);
        let connection = source.connect();
        let seen = collect(&connection);

        source.reload();
        assert_eq!(seen.borrow().last().unwrap(), &vec![1, 2, 3, 4, 5]);

        paginator.set_page(2, 5);
        assert_eq!(source.page_index(), 2);
        assert_eq!(seen.borrow().last().unwrap(), &vec![11, 12]);

        paginator.previous_page();
        assert_eq!(seen.borrow().last().unwrap(), &vec![6, 7, 8, 9, 10]);

        paginator.set_page(9, 5);
        assert!(seen.borrow().last().unwrap().is_empty());

        source.detach_paginator();
        source.reload();
        assert_eq!(seen.borrow().last().unwrap().len(), 12);
    }

    #[test]
    fn test_identity_survives_reload() {
        let source = source_of(1);
        let connection = source.connect();
        source.reload();
        let first = connection.latest();
        source.reload();
        assert!(Rc::ptr_eq(&first[0], &connection.latest()[0]));
    }

    #[test]
    fn test_remove_operations() {
        let source = source_of(3);
        let first = source.items()[0].clone();
        assert_eq!(source.remove_item(&first), 1);
        assert_eq!(source.remove_item(&first), 0);
        assert_eq!(*source.remove_item_by_index(1).unwrap(), 3);
        assert!(source.remove_item_by_index(1).is_err());
        assert!(source.insert_item(9_u32, 5).is_err());
        source.insert_item(9_u32, 0).unwrap();
        assert_eq!(source.items().iter().map(|i| **i).collect::<Vec<_>>(), vec![9, 2]);
        source.remove_all();
        assert!(source.is_empty());
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let source = source_of(1);
        let connection = source.connect();
        let seen = collect(&connection);
        assert!(connection.is_connected());
        connection.disconnect();
        connection.disconnect();
        assert!(!connection.is_connected());
        source.reload();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_dropping_connection_unsubscribes() {
        let source = source_of(1);
        {
            let connection = source.connect();
            let _seen = collect(&connection);
            assert_eq!(source.subscriber_count(), 1);
        }
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_source_disconnect_drops_all_subscribers() {
        let source = source_of(1);
        let a = source.connect();
        let b = source.connect();
        let _ = (collect(&a), collect(&b));
        source.disconnect();
        assert_eq!(source.subscriber_count(), 0);
        assert!(!a.is_connected());
    }
}
