use crate::error::Result;
use crate::list::{next_of, prev_of, List, Node};
use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::fmt::Formatter;
use std::ptr::NonNull;

/// A position in a `List` that can insert and remove around itself.
///
/// The cursor sits either on an element or on the ghost node, so a list of
/// *n* elements has *n* + 1 positions. Moving forward past the last element
/// lands on the ghost node, and one more step wraps to the first element.
///
/// Removing the element under the cursor leaves the cursor on the element
/// that followed it, which lets a single forward pass drop elements.
///
/// # Examples
///
/// ```
/// use cyclic_queue::List;
/// use std::iter::FromIterator;
///
/// let mut list = List::from_iter([1, 2, 3, 4]);
/// let mut cursor = list.cursor_start_mut();
///
/// // Drop every even element while walking forward.
/// while let Some(&x) = cursor.current() {
///     if x % 2 == 0 {
///         cursor.remove();
///     } else {
///         cursor.move_next_cyclic();
///     }
/// }
/// assert_eq!(list, List::from_iter([1, 3]));
/// ```
pub struct CursorMut<'a, T: 'a> {
    current: NonNull<Node<T>>,
    list: &'a mut List<T>,
}

impl<'a, T: 'a> CursorMut<'a, T> {
    pub(crate) fn new(list: &'a mut List<T>, current: NonNull<Node<T>>) -> Self {
        Self { current, list }
    }
    fn is_ghost_node(&self) -> bool {
        self.current == self.list.ghost_node()
    }
    fn next_node(&self) -> NonNull<Node<T>> {
        // SAFETY: every node of a cyclic list has a successor.
        unsafe { next_of(self.current) }
    }
    fn prev_node(&self) -> NonNull<Node<T>> {
        // SAFETY: every node of a cyclic list has a predecessor.
        unsafe { prev_of(self.current) }
    }

    /// See [`List::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Step to the following position, wrapping through the ghost node.
    /// Does nothing on an empty list.
    pub fn move_next_cyclic(&mut self) {
        if self.is_empty() {
            return;
        }
        self.current = self.next_node();
    }

    /// The element under the cursor, `None` on the ghost node.
    pub fn current(&self) -> Option<&T> {
        if self.is_ghost_node() {
            return None;
        }
        // SAFETY: non-ghost nodes hold an initialised element.
        unsafe { Some(&(*self.current.as_ptr()).element) }
    }

    /// The element right after the cursor, `None` if the cursor or its
    /// successor is the ghost node.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2]);
    /// let mut cursor = list.cursor_start_mut();
    /// assert_eq!(cursor.peek_next(), Some(&2));
    /// cursor.move_next_cyclic();
    /// assert_eq!(cursor.peek_next(), None);
    /// ```
    pub fn peek_next(&self) -> Option<&T> {
        if self.is_ghost_node() {
            return None;
        }
        let next = self.next_node();
        if next == self.list.ghost_node() {
            return None;
        }
        // SAFETY: `next` is a non-ghost node.
        unsafe { Some(&(*next.as_ptr()).element) }
    }

    /// Link `item` in right before the cursor, which keeps pointing at the
    /// same node. On the ghost node this appends.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// let mut cursor = list.cursor_start_mut();
    /// cursor.move_next_cyclic();
    ///
    /// cursor.insert(4);
    /// assert_eq!(cursor.current(), Some(&2));
    ///
    /// let mut cursor = list.cursor_end_mut();
    /// cursor.insert(5);
    /// assert_eq!(cursor.current(), None);
    ///
    /// assert_eq!(list, List::from_iter([1, 4, 2, 3, 5]));
    /// ```
    pub fn insert(&mut self, item: T) {
        let node = Node::try_new_detached(item)
            .unwrap_or_else(|_| handle_alloc_error(Layout::new::<Node<T>>()));
        self.link_before_current(node);
    }

    /// Like [`CursorMut::insert`], but an allocation failure is returned and
    /// the list is left as it was.
    pub fn try_insert(&mut self, item: T) -> Result<()> {
        let node = Node::try_new_detached(item)?;
        self.link_before_current(node);
        Ok(())
    }

    fn link_before_current(&mut self, node: NonNull<Node<T>>) {
        // SAFETY: `current.prev` and `current` are adjacent, and `node` is detached.
        unsafe { self.list.attach_node(self.prev_node(), self.current, node) };
    }

    /// Unlink the element under the cursor and return it. The cursor moves
    /// on to the following node. `None` on the ghost node.
    pub fn remove(&mut self) -> Option<T> {
        if self.is_ghost_node() {
            return None;
        }
        let next = self.next_node();
        // SAFETY: `current` is a non-ghost node of the list.
        let node = unsafe { self.list.detach_node(self.current) };
        self.current = next;
        Some(Node::into_element(node))
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for CursorMut<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("list", &self.list)
            .field("current", &self.current())
            .finish()
    }
}

unsafe impl<T: Send> Send for CursorMut<'_, T> {}

unsafe impl<T: Sync> Sync for CursorMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::List;
    use std::iter::FromIterator;

    #[test]
    fn remove_moves_to_successor() {
        let mut list = List::from_iter(0..6);
        let mut cursor = list.cursor_start_mut();
        assert_eq!(cursor.remove(), Some(0));
        assert_eq!(cursor.current(), Some(&1));
        cursor.move_next_cyclic();
        assert_eq!(cursor.remove(), Some(2));
        assert_eq!(cursor.current(), Some(&3));
        cursor.move_next_cyclic();
        cursor.move_next_cyclic();
        assert_eq!(cursor.remove(), Some(5));
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.remove(), None);
        assert_eq!(list, List::from_iter([1, 3, 4]));
    }

    #[test]
    fn walk_wraps_through_ghost() {
        let mut list = List::from_iter(['x', 'y']);
        let mut cursor = list.cursor_start_mut();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(cursor.current().copied());
            cursor.move_next_cyclic();
        }
        assert_eq!(
            seen,
            [Some('x'), Some('y'), None, Some('x'), Some('y'), None]
        );
    }

    #[test]
    fn insert_before_cursor() {
        let mut list = List::new();
        let mut cursor = list.cursor_end_mut();
        assert!(cursor.is_empty());
        cursor.try_insert(1).unwrap();
        cursor.insert(2);
        assert!(!cursor.is_empty());
        assert_eq!(cursor.current(), None);
        cursor.move_next_cyclic();
        assert_eq!(cursor.current(), Some(&1));
        assert_eq!(cursor.peek_next(), Some(&2));
        cursor.insert(0);
        assert_eq!(format!("{:?}", cursor), "CursorMut { list: [0, 1, 2], current: Some(1) }");
    }

    #[test]
    fn empty_list() {
        let mut list = List::<u8>::new();
        let mut cursor = list.cursor_start_mut();
        cursor.move_next_cyclic();
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.remove(), None);
        assert!(list.is_empty());
    }
}
