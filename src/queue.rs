//! A queue of owned strings on top of [`List`].

use crate::error::{QueueError, Result};
use crate::list::{List, Node};
use std::fmt;
use std::iter::FromIterator;

/// A queue of strings, backed by a cyclic doubly-linked [`List`].
///
/// Every element owns a copy of the text it was inserted with. Structural
/// operations (`swap`, `reverse`, `reverse_k`, `sort`, ...) only relink
/// nodes, the text buffers never move.
///
/// # Examples
///
/// ```
/// use cyclic_queue::Queue;
///
/// let mut queue = Queue::new().unwrap();
/// queue.insert_tail("b").unwrap();
/// queue.insert_head("a").unwrap();
/// queue.insert_tail("c").unwrap();
/// assert_eq!(queue.size(), 3);
///
/// let mut buf = [0xff_u8; 4];
/// let removed = queue.remove_head(Some(&mut buf)).unwrap();
/// assert_eq!(removed.value(), "a");
/// assert_eq!(&buf, b"a\0\0\0");
/// ```
#[derive(PartialEq, Eq, Default)]
pub struct Queue {
    list: List<String>,
}

/// An element that has been removed from a [`Queue`].
///
/// It still owns its list node; dropping it releases the text and then the
/// node.
pub struct Element {
    node: Box<Node<String>>,
}

impl Element {
    /// The text of the element.
    pub fn value(&self) -> &str {
        &self.node.element
    }

    /// Take the text out of the element, releasing the node.
    pub fn into_value(self) -> String {
        self.node.into_element()
    }

    /// Copy the text into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` bytes are copied and the rest of `buf` is
    /// filled with NUL. Longer text is truncated silently. An empty `buf` is
    /// left alone.
    pub fn copy_to(&self, buf: &mut [u8]) {
        let Some(room) = buf.len().checked_sub(1) else {
            return;
        };
        let bytes = self.value().as_bytes();
        let n = bytes.len().min(room);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n..].fill(0);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

/// Copy `value` into a freshly allocated `String`, reporting allocation
/// failure instead of aborting.
fn copy_text(value: &str) -> Result<String> {
    let mut text = String::new();
    text.try_reserve_exact(value.len())
        .map_err(|_| QueueError::alloc("element text"))?;
    text.push_str(value);
    Ok(text)
}

impl Queue {
    /// Create an empty queue, or return [`QueueError::AllocationFailed`] if
    /// its ghost node cannot be allocated.
    pub fn new() -> Result<Self> {
        Ok(Self {
            list: List::try_new()?,
        })
    }

    /// Insert a copy of `value` at the head of the queue.
    ///
    /// On error the queue is left as it was.
    pub fn insert_head(&mut self, value: &str) -> Result<()> {
        let text = copy_text(value)?;
        self.list.try_push_front(text)
    }

    /// Insert a copy of `value` at the tail of the queue.
    ///
    /// On error the queue is left as it was.
    pub fn insert_tail(&mut self, value: &str) -> Result<()> {
        let text = copy_text(value)?;
        self.list.try_push_back(text)
    }

    /// Unlink the head element and hand it to the caller, copying its text
    /// into `buf` if one is given (see [`Element::copy_to`]).
    ///
    /// Returns `None`, leaving `buf` untouched, if the queue is empty.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let element = Element {
            node: self.list.unlink_front()?,
        };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Unlink the tail element and hand it to the caller, copying its text
    /// into `buf` if one is given (see [`Element::copy_to`]).
    ///
    /// Returns `None`, leaving `buf` untouched, if the queue is empty.
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        let element = Element {
            node: self.list.unlink_back()?,
        };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Number of elements, counted by walking the queue.
    pub fn size(&self) -> usize {
        self.list.count()
    }

    /// Number of elements from the cached counter. Enabled by
    /// `feature = "length"`.
    #[cfg(feature = "length")]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// `true` if the queue holds no element.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// `true` if the queue holds exactly one element.
    pub fn is_singular(&self) -> bool {
        self.list.is_singular()
    }

    /// The head text, `None` if the queue is empty.
    pub fn front(&self) -> Option<&str> {
        self.list.front().map(String::as_str)
    }

    /// The tail text, `None` if the queue is empty.
    pub fn back(&self) -> Option<&str> {
        self.list.back().map(String::as_str)
    }

    /// Iterate over the texts from head to tail.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.list.iter().map(String::as_str)
    }

    /// Delete the element at index `size() / 2`. For an even size that is
    /// the later of the two middle elements.
    ///
    /// Returns `false` if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d", "e"]);
    /// assert!(queue.delete_mid());
    /// assert_eq!(queue, Queue::from_iter(["a", "b", "d", "e"]));
    /// ```
    pub fn delete_mid(&mut self) -> bool {
        self.list.remove_middle().is_some()
    }

    /// Delete every element that has an equal neighbour, so that each run of
    /// equal consecutive texts disappears entirely.
    ///
    /// Returns `false` if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "a", "b", "c", "c"]);
    /// assert!(queue.delete_dup());
    /// assert_eq!(queue, Queue::from_iter(["b"]));
    /// ```
    pub fn delete_dup(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let removed = self.list.dedup_runs_by(|a, b| a == b);
        tracing::trace!(removed, "deleted duplicates");
        true
    }

    /// Swap every two neighbouring elements.
    pub fn swap(&mut self) {
        self.list.swap_pairs();
    }

    /// Reverse the order of the elements.
    pub fn reverse(&mut self) {
        self.list.reverse();
    }

    /// Reverse the elements in groups of `k`. A trailing group with fewer
    /// than `k` elements keeps its order; `k <= 1` does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.reverse_k(2);
    /// assert_eq!(queue, Queue::from_iter(["2", "1", "4", "3", "5"]));
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        let groups = self.list.reverse_groups(k);
        tracing::trace!(k, groups, "reversed groups");
    }

    /// Sort the elements by their text, ascending or descending.
    ///
    /// The ascending sort is stable. A descending sort is the ascending one
    /// followed by a reversal, so equal texts come out in reverse order.
    pub fn sort(&mut self, descend: bool) {
        self.list.sort();
        if descend {
            self.list.reverse();
        }
    }

    /// Delete every element that has a strictly smaller element anywhere
    /// after it. Returns the number of elements left.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["5", "1", "4", "2", "2"]);
    /// assert_eq!(queue.ascend(), 3);
    /// assert_eq!(queue, Queue::from_iter(["1", "2", "2"]));
    /// ```
    pub fn ascend(&mut self) -> usize {
        let removed = self.list.retain_undominated_by(|later, x| later < x);
        tracing::trace!(removed, "ascend filter");
        self.size()
    }

    /// Delete every element that has a strictly greater element anywhere
    /// after it. Returns the number of elements left.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["5", "1", "4", "2", "2"]);
    /// assert_eq!(queue.descend(), 4);
    /// assert_eq!(queue, Queue::from_iter(["5", "4", "2", "2"]));
    /// ```
    pub fn descend(&mut self) -> usize {
        let removed = self.list.retain_undominated_by(|later, x| later > x);
        tracing::trace!(removed, "descend filter");
        self.size()
    }

    /// Move all elements of `other` to the tail of this queue, leaving
    /// `other` empty.
    pub(crate) fn append(&mut self, other: &mut Queue) {
        self.list.append(&mut other.list);
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> FromIterator<&'a str> for Queue {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().map(String::from).collect(),
        }
    }
}
