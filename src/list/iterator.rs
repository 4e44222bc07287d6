use crate::list::{next_of, prev_of, List, Node};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// The not-yet-visited nodes of a list, as the half-open range `start..end`.
///
/// Both ends can be consumed; the range is exhausted once they meet.
struct Links<T> {
    start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    #[cfg(feature = "length")]
    len: usize,
}

impl<T> Links<T> {
    fn new(list: &List<T>) -> Self {
        Self {
            start: list.front_node(),
            end: list.ghost_node(),
            #[cfg(feature = "length")]
            len: list.len,
        }
    }

    fn pop_front(&mut self) -> Option<NonNull<Node<T>>> {
        if self.start == self.end {
            return None;
        }
        let node = self.start;
        // SAFETY: `node` lies inside the list the range was taken from.
        self.start = unsafe { next_of(node) };
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        Some(node)
    }

    fn pop_back(&mut self) -> Option<NonNull<Node<T>>> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: the range is not empty, so `end.prev` is one of its nodes.
        self.end = unsafe { prev_of(self.end) };
        #[cfg(feature = "length")]
        {
            self.len -= 1;
        }
        Some(self.end)
    }

    #[cfg(feature = "length")]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    #[cfg(not(feature = "length"))]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.start == self.end {
            (0, Some(0))
        } else {
            (1, None)
        }
    }
}

impl<T> Clone for Links<T> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
            #[cfg(feature = "length")]
            len: self.len,
        }
    }
}

/// Shared references to the elements of a `List`, front to back.
///
/// The iterator holds raw links only, so the borrow of the list is carried by
/// its lifetime:
///
/// ```compile_fail
/// use cyclic_queue::List;
/// use std::iter::FromIterator;
///
/// let mut list = List::from_iter([1, 2, 3]);
/// let mut iter = list.iter();
/// list.push_back(4);
/// println!("{:?}", iter.next());
/// ```
pub struct Iter<'a, T: 'a> {
    links: Links<T>,
    _marker: PhantomData<&'a List<T>>,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(list: &'a List<T>) -> Self {
        Self {
            links: Links::new(list),
            _marker: PhantomData,
        }
    }
}

// A derive would demand `T: Clone`.
impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: fmt::Debug + 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: a node handed out by the range is a non-ghost node, alive
        // for as long as the list is borrowed.
        self.links
            .pop_front()
            .map(|node| unsafe { &(*node.as_ptr()).element })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.links.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // SAFETY: as in `next`.
        self.links
            .pop_back()
            .map(|node| unsafe { &(*node.as_ptr()).element })
    }
}

#[cfg(feature = "length")]
impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}

/// Mutable references to the elements of a `List`. The links are never
/// touched, only the elements.
pub struct IterMut<'a, T: 'a> {
    links: Links<T>,
    _marker: PhantomData<&'a mut List<T>>,
}

impl<'a, T: 'a> IterMut<'a, T> {
    pub(crate) fn new(list: &'a mut List<T>) -> Self {
        Self {
            links: Links::new(list),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: each node leaves the range once, so no element is handed
        // out twice, and the list is borrowed mutably for `'a`.
        self.links
            .pop_front()
            .map(|node| unsafe { &mut (*node.as_ptr()).element })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.links.size_hint()
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        // SAFETY: as in `next`.
        self.links
            .pop_back()
            .map(|node| unsafe { &mut (*node.as_ptr()).element })
    }
}

#[cfg(feature = "length")]
impl<'a, T: 'a> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T: 'a> FusedIterator for IterMut<'a, T> {}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut List<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for item in iter {
            list.push_back(item);
        }
        list
    }
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}

unsafe impl<T: Sync> Sync for Iter<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::List;
    use std::iter::FromIterator;

    #[test]
    fn iter_meets_in_the_middle() {
        for len in 0..6 {
            let expected: Vec<usize> = (0..len).collect();
            let list = List::from_iter(0..len);
            for front in 0..=len {
                let mut iter = list.iter();
                let mut got = Vec::new();
                for _ in 0..front {
                    got.push(*iter.next().unwrap());
                }
                let mut tail: Vec<usize> = iter.by_ref().rev().copied().collect();
                tail.reverse();
                got.extend(tail);
                assert_eq!(got, expected);
                assert_eq!(iter.next(), None);
                assert_eq!(iter.next_back(), None);
            }
        }
    }

    #[test]
    fn clone_and_debug_need_no_clone_bound() {
        #[derive(Debug, PartialEq)]
        struct Opaque(u8);

        let list = List::from_iter([Opaque(1), Opaque(2), Opaque(3)]);
        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&Opaque(1)));
        let copy = iter.clone();
        assert_eq!(format!("{:?}", iter), "[Opaque(2), Opaque(3)]");
        assert_eq!(copy.last(), Some(&Opaque(3)));
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn iter_mut_from_both_ends() {
        let mut list = List::from_iter(0..4);
        for x in &mut list {
            *x += 10;
        }
        let mut iter = list.iter_mut();
        *iter.next_back().unwrap() = 0;
        *iter.next().unwrap() = 1;
        assert_eq!(iter.count(), 2);
        assert_eq!(list, List::from_iter([1, 11, 12, 0]));
        assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [0, 12, 11, 1]);
    }

    #[test]
    fn size_hint_bounds() {
        let list = List::from_iter(0..3);
        let (low, high) = list.iter().size_hint();
        assert!(low >= 1 && high.map_or(true, |high| high >= 3));
        let empty = List::<u8>::new();
        assert_eq!(empty.iter().size_hint(), (0, Some(0)));
    }

    #[cfg(feature = "length")]
    #[test]
    fn exact_size() {
        let list = List::from_iter(0..5);
        let mut iter = list.iter();
        assert_eq!(iter.len(), 5);
        iter.next();
        iter.next_back();
        assert_eq!(iter.len(), 3);
    }
}
