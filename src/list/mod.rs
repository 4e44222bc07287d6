use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::mem::align_of;
use std::ptr::NonNull;

use crate::error::{QueueError, Result};
use crate::list::cursor::CursorMut;
use crate::{Iter, IterMut};

pub mod cursor;
pub mod iterator;

mod algorithms;

/// A cyclic doubly-linked list with owned nodes, anchored by a ghost node.
///
/// The ghost node carries no payload. It sits between the last and the first
/// element, so an empty list is a ghost linked to itself, and every insertion
/// or removal is a rewrite of the links around one position, without special
/// cases for the ends.
///
/// The element count is not stored unless the `length` feature is enabled;
/// [`List::count`] walks the list.
///
/// Node ranges in this crate are written `front..=back` when both ends are
/// elements, and `start..end` when `end` is excluded (often the ghost node).
pub struct List<T> {
    ghost: NonNull<Node<Erased>>,
    #[cfg(feature = "length")]
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

/// A link pair plus its payload.
///
/// `#[repr(C)]` keeps `next` and `prev` at the same offsets for every `T`,
/// so the ghost node can be addressed as a `Node<T>` as long as its
/// `element` is never touched.
#[repr(C)]
pub(crate) struct Node<T> {
    pub(crate) next: NonNull<Node<T>>,
    pub(crate) prev: NonNull<Node<T>>,
    pub(crate) element: T,
}

struct Erased;

/// A run of nodes unlinked from a list but not freed.
///
/// `front.prev` and `back.next` are stale until the run is attached again.
pub(crate) struct DetachedNodes<T> {
    pub(crate) front: NonNull<Node<T>>,
    pub(crate) back: NonNull<Node<T>>,
    #[cfg(feature = "length")]
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

/// Link `prev -> next` and `prev <- next`.
///
/// Only the two link fields are written, so it is fine for either side to
/// be a ghost node.
pub(crate) unsafe fn connect<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

pub(crate) unsafe fn next_of<T>(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    (*node.as_ptr()).next
}

pub(crate) unsafe fn prev_of<T>(node: NonNull<Node<T>>) -> NonNull<Node<T>> {
    (*node.as_ptr()).prev
}

/// Move the node range `from_front..=from_back` to the place right before `to`.
///
/// With `to` being a ghost node, this moves the range to the tail of that list.
/// `to` must not be inside the moved range.
pub(crate) unsafe fn move_nodes<T>(
    from_front: NonNull<Node<T>>,
    from_back: NonNull<Node<T>>,
    to: NonNull<Node<T>>,
) {
    connect(prev_of(from_front), next_of(from_back));
    connect(prev_of(to), from_front);
    connect(from_back, to);
}

pub(crate) unsafe fn move_node<T>(from: NonNull<Node<T>>, to: NonNull<Node<T>>) {
    move_nodes(from, from, to);
}

// Link surgery shared by the cursor and the algorithms.
impl<T> List<T> {
    pub(crate) fn ghost_node(&self) -> NonNull<Node<T>> {
        self.ghost.cast()
    }
    pub(crate) fn front_node(&self) -> NonNull<Node<T>> {
        // SAFETY: the ghost node is always linked, to itself at least.
        unsafe { next_of(self.ghost_node()) }
    }
    pub(crate) fn back_node(&self) -> NonNull<Node<T>> {
        // SAFETY: as above.
        unsafe { prev_of(self.ghost_node()) }
    }

    /// Unlink `node` and take back ownership of its allocation.
    ///
    /// `node` must be a non-ghost node of this list.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Node<T>>) -> Box<Node<T>> {
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        connect(prev_of(node), next_of(node));
        Box::from_raw(node.as_ptr())
    }

    /// Link the detached `node` in between the adjacent nodes `prev` and `next`.
    ///
    /// Adjacency is only checked with `debug_assertions`.
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        node: NonNull<Node<T>>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        #[cfg(feature = "length")]
        {
            self.len += 1;
        }
    }

    /// Unlink the run `front..=back`, which must hold `len` nodes of this list
    /// in order, and hand it out still linked internally.
    pub(crate) unsafe fn detach_nodes(
        &mut self,
        front: NonNull<Node<T>>,
        back: NonNull<Node<T>>,
        #[cfg(feature = "length")] len: usize,
    ) -> DetachedNodes<T> {
        #[cfg(feature = "length")]
        {
            self.len -= len;
        }
        connect(prev_of(front), next_of(back));
        DetachedNodes {
            front,
            back,
            #[cfg(feature = "length")]
            len,
            _marker: PhantomData,
        }
    }

    /// Link a detached run in between the adjacent nodes `prev` and `next`.
    ///
    /// Only the four boundary links are rewritten.
    pub(crate) unsafe fn attach_nodes(
        &mut self,
        prev: NonNull<Node<T>>,
        next: NonNull<Node<T>>,
        detached: DetachedNodes<T>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, detached.front);
        connect(detached.back, next);
        #[cfg(feature = "length")]
        {
            self.len += detached.len;
        }
    }

    /// Unlink every element as one run, or return `None` for an empty list.
    pub(crate) fn detach_all_nodes(&mut self) -> Option<DetachedNodes<T>> {
        if self.is_empty() {
            return None;
        }
        #[cfg(feature = "length")]
        let len = self.len;
        // SAFETY: `front..=back` is the whole, non-empty list.
        unsafe {
            Some(self.detach_nodes(
                self.front_node(),
                self.back_node(),
                #[cfg(feature = "length")]
                len,
            ))
        }
    }

    /// Move `front..=back` (`len` nodes) out into a list with a ghost of its own.
    ///
    /// Same contract as [`List::detach_nodes`].
    pub(crate) unsafe fn cut(
        &mut self,
        front: NonNull<Node<T>>,
        back: NonNull<Node<T>>,
        #[cfg(feature = "length")] len: usize,
    ) -> List<T> {
        let detached = self.detach_nodes(
            front,
            back,
            #[cfg(feature = "length")]
            len,
        );
        let mut list = List::new();
        let ghost = list.ghost_node();
        list.attach_nodes(ghost, ghost, detached);
        list
    }

    /// Unlink the first node and hand it out without dropping its element.
    pub(crate) fn unlink_front(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the front node is a non-ghost node of it.
        Some(unsafe { self.detach_node(self.front_node()) })
    }

    /// Unlink the last node and hand it out without dropping its element.
    pub(crate) fn unlink_back(&mut self) -> Option<Box<Node<T>>> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is not empty, so the back node is a non-ghost node of it.
        Some(unsafe { self.detach_node(self.back_node()) })
    }
}

impl<T> List<T> {
    /// Create an empty `List`, aborting through [`handle_alloc_error`] if the
    /// ghost node cannot be allocated. See [`List::try_new`].
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|_| handle_alloc_error(ghost_layout::<T>()))
    }

    /// Create an empty `List`, or fail with [`QueueError::AllocationFailed`].
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::List;
    /// let list = List::<u32>::try_new().unwrap();
    /// assert!(list.is_empty());
    /// assert_eq!(list.count(), 0);
    /// ```
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            ghost: new_ghost::<T>()?,
            #[cfg(feature = "length")]
            len: 0,
            _marker: PhantomData,
        })
    }

    /// `true` if the ghost node is linked to itself.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// `true` if the list holds exactly one element.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    ///
    /// let mut list = List::new();
    /// assert!(!list.is_singular());
    /// list.push_back(1);
    /// assert!(list.is_singular());
    /// list.push_back(2);
    /// assert!(!list.is_singular());
    /// ```
    #[inline]
    pub fn is_singular(&self) -> bool {
        !self.is_empty() && self.front_node() == self.back_node()
    }

    /// The cached element count. Enabled by `feature = "length"`.
    #[cfg(feature = "length")]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Count the elements by walking from the ghost node back to itself, in
    /// *O*(*n*) time.
    pub fn count(&self) -> usize {
        let ghost = self.ghost_node();
        let mut node = self.front_node();
        let mut count = 0;
        while node != ghost {
            count += 1;
            // SAFETY: every node reachable from the ghost node is valid.
            node = unsafe { next_of(node) };
        }
        #[cfg(feature = "length")]
        debug_assert_eq!(count, self.len, "cached length out of sync with the links");
        count
    }

    /// Drop every element, keeping the ghost node.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    pub fn front(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn back(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Link `elt` in as the new first element.
    pub fn push_front(&mut self, elt: T) {
        self.cursor_start_mut().insert(elt);
    }

    /// Like [`List::push_front`], but the list is left untouched and an error
    /// returned if the node cannot be allocated.
    pub fn try_push_front(&mut self, elt: T) -> Result<()> {
        self.cursor_start_mut().try_insert(elt)
    }

    /// Link `elt` in as the new last element.
    pub fn push_back(&mut self, elt: T) {
        self.cursor_end_mut().insert(elt);
    }

    /// Like [`List::push_back`], but the list is left untouched and an error
    /// returned if the node cannot be allocated.
    pub fn try_push_back(&mut self, elt: T) -> Result<()> {
        self.cursor_end_mut().try_insert(elt)
    }

    /// Unlink the first element and return it.
    pub fn pop_front(&mut self) -> Option<T> {
        self.unlink_front().map(Node::into_element)
    }

    /// A cursor at the first element, or at the ghost node if the list is
    /// empty.
    pub fn cursor_start_mut(&mut self) -> CursorMut<'_, T> {
        let front = self.front_node();
        CursorMut::new(self, front)
    }

    /// A cursor at the ghost node, where inserting appends.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T> {
        let ghost = self.ghost_node();
        CursorMut::new(self, ghost)
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Splice every node of `other` onto the tail of this list in *O*(1),
    /// leaving `other` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut head = List::from_iter(['a']);
    /// let mut tail = List::from_iter(['b', 'c']);
    /// head.append(&mut tail);
    ///
    /// assert_eq!(head, List::from_iter(['a', 'b', 'c']));
    /// assert!(tail.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if let Some(detached) = other.detach_all_nodes() {
            // SAFETY: the back node and the ghost node are adjacent.
            unsafe { self.attach_nodes(self.back_node(), self.ghost_node(), detached) }
        }
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Node<T> {
    /// Allocate a detached node holding `element`, or return an error if the
    /// allocator is out of memory. On error `element` is dropped.
    ///
    /// The links of the new node are dangling until it is attached.
    pub(crate) fn try_new_detached(element: T) -> Result<NonNull<Node<T>>> {
        let layout = Layout::new::<Node<T>>();
        // SAFETY: `Node<T>` holds two pointers, so `layout` has a non-zero size.
        let ptr = unsafe { alloc(layout) }.cast::<Node<T>>();
        let node = NonNull::new(ptr).ok_or_else(|| QueueError::alloc("a list node"))?;
        // SAFETY: `node` is freshly allocated with the layout of `Node<T>`, the same
        // one `Box<Node<T>>` frees it with.
        unsafe {
            node.as_ptr().write(Node {
                next: NonNull::dangling(),
                prev: NonNull::dangling(),
                element,
            });
        }
        Ok(node)
    }

    pub(crate) fn into_element(self: Box<Self>) -> T {
        self.element
    }
}

/// The ghost node only has links, but it is addressed as a `Node<T>`, so it
/// must be aligned like one.
fn ghost_layout<T>() -> Layout {
    let layout = Layout::new::<Node<Erased>>();
    layout
        .align_to(align_of::<Node<T>>())
        .unwrap_or(layout)
}

fn new_ghost<T>() -> Result<NonNull<Node<Erased>>> {
    // SAFETY: the layout holds two pointers, so it has a non-zero size.
    let ptr = unsafe { alloc(ghost_layout::<T>()) }.cast::<Node<Erased>>();
    let ghost = NonNull::new(ptr).ok_or_else(|| QueueError::alloc("a ghost node"))?;
    // SAFETY: `ghost` is freshly allocated and aligned for `Node<Erased>`. Linking
    // it to itself makes an empty cyclic list.
    unsafe {
        ghost.as_ptr().write(Node {
            next: ghost,
            prev: ghost,
            element: Erased,
        });
    }
    Ok(ghost)
}

#[cfg(debug_assertions)]
fn assert_adjacent<T>(prev: NonNull<Node<T>>, next: NonNull<Node<T>>) {
    unsafe {
        assert_eq!(next_of(prev), next);
        assert_eq!(prev_of(next), prev);
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was allocated in `new_ghost::<T>` with this very
        // layout, and `Erased` needs no drop.
        unsafe { dealloc(self.ghost.as_ptr().cast(), ghost_layout::<T>()) };
    }
}

unsafe impl<T: Send> Send for List<T> {}

unsafe impl<T: Sync> Sync for List<T> {}

// `List` and `Iter` stay covariant in `T`.
#[allow(dead_code)]
fn assert_covariance() {
    fn a<'a>(x: List<&'static str>) -> List<&'a str> {
        x
    }
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
}

#[cfg(test)]
mod tests {
    use crate::list::{move_node, next_of, List};
    use std::iter::FromIterator;
    use std::rc::Rc;

    fn items<T: Clone>(list: &List<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn empty_and_singular() {
        let mut list = List::<i32>::new();
        assert!(list.is_empty());
        assert!(!list.is_singular());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.pop_front(), None);
        assert!(list.unlink_back().is_none());

        list.push_back(1);
        assert!(list.is_singular());
        assert_eq!(list.front(), list.back());
        assert_eq!(list.pop_front(), Some(1));
        assert!(list.is_empty());
    }

    #[test]
    fn push_at_both_ends() {
        let mut list = List::new();
        list.push_back(2);
        list.push_front(1);
        list.try_push_back(3).unwrap();
        list.try_push_front(0).unwrap();
        assert_eq!(items(&list), [0, 1, 2, 3]);
        assert_eq!(list.count(), 4);
        assert_eq!(list.unlink_back().map(|node| node.into_element()), Some(3));
        assert_eq!(list.unlink_front().map(|node| node.into_element()), Some(0));
        assert_eq!(items(&list), [1, 2]);
    }

    #[test]
    fn drop_and_clear_release_elements() {
        let tracker = Rc::new(());
        let mut list = List::new();
        for _ in 0..4 {
            list.push_back(Rc::clone(&tracker));
        }
        assert_eq!(Rc::strong_count(&tracker), 5);
        list.clear();
        assert_eq!(Rc::strong_count(&tracker), 1);
        list.push_back(Rc::clone(&tracker));
        drop(list);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn append_splices_whole_list() {
        let mut list = List::from_iter(0..3);
        let mut other = List::from_iter(3..5);
        list.append(&mut other);
        assert!(other.is_empty());
        assert_eq!(items(&list), [0, 1, 2, 3, 4]);

        list.append(&mut other);
        assert_eq!(list.count(), 5);
        other.append(&mut list);
        assert_eq!(items(&other), [0, 1, 2, 3, 4]);
        assert!(list.is_empty());
    }

    #[test]
    fn cut_leaves_both_lists_linked() {
        let mut list = List::from_iter(0..6);
        // SAFETY: nodes 1..=3 are in the list, in order.
        let cut = unsafe {
            let front = next_of(list.front_node());
            let back = next_of(next_of(front));
            list.cut(
                front,
                back,
                #[cfg(feature = "length")]
                3,
            )
        };
        assert_eq!(items(&cut), [1, 2, 3]);
        assert_eq!(items(&list), [0, 4, 5]);
        assert_eq!(cut.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
        assert_eq!(list.count(), 3);
    }

    #[test]
    fn move_node_before_ghost_is_move_to_tail() {
        let mut list = List::from_iter(['a', 'b', 'c']);
        unsafe { move_node(list.front_node(), list.ghost_node()) };
        assert_eq!(items(&list), ['b', 'c', 'a']);
        unsafe { move_node(list.back_node(), list.front_node()) };
        assert_eq!(items(&list), ['a', 'b', 'c']);
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), ['c', 'b', 'a']);
    }

    #[test]
    fn over_aligned_elements() {
        #[repr(align(64))]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
        struct Wide(u8);

        let mut list = List::from_iter([Wide(3), Wide(1), Wide(2)]);
        assert_eq!(list.ghost_node().as_ptr() as usize % 64, 0);
        list.reverse();
        assert_eq!(items(&list), [Wide(2), Wide(1), Wide(3)]);
        list.sort();
        list.swap_pairs();
        assert_eq!(items(&list), [Wide(2), Wide(1), Wide(3)]);
        assert_eq!(list.reverse_groups(2), 1);
        assert_eq!(list.back(), Some(&Wide(3)));
        drop(list);

        let empty = List::<Wide>::new();
        assert_eq!(empty.ghost_node().as_ptr() as usize % 64, 0);
    }

    #[cfg(feature = "length")]
    #[test]
    fn cached_len_follows_links() {
        let mut list = List::new();
        assert_eq!(list.len(), 0);
        list.push_back(1);
        list.push_front(0);
        assert_eq!(list.len(), 2);
        list.append(&mut List::from_iter(2..7));
        assert_eq!(list.len(), 7);
        list.reverse_groups(3);
        list.remove_middle();
        list.dedup_runs_by(|a, b| a == b);
        assert_eq!(list.len(), list.count());
        list.clear();
        assert_eq!(list.len(), 0);
    }
}
