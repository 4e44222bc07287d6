use crate::list::{move_node, next_of, prev_of, List};

mod sort;

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> List<T> {
    /// Reverse the list in place.
    ///
    /// Every node, the ghost node included, has its `next` and `prev` links
    /// exchanged. No element is moved.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// list.reverse();
    /// assert_eq!(list, List::from_iter([3, 2, 1]));
    /// ```
    pub fn reverse(&mut self) {
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: every node reachable from the ghost node is valid. Only the
            // link fields are touched, so the ghost node is handled like the rest.
            unsafe {
                let next = next_of(node);
                (*node.as_ptr()).next = prev_of(node);
                (*node.as_ptr()).prev = next;
                node = next;
            }
            if node == ghost {
                break;
            }
        }
    }

    /// Reverse every consecutive group of `k` elements, leaving a trailing
    /// group shorter than `k` in its original order. Returns the number of
    /// groups reversed.
    ///
    /// Each group is cut into a list of its own, reversed there, and spliced
    /// back into the gap it came from.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(1..=7);
    /// assert_eq!(list.reverse_groups(3), 2);
    /// assert_eq!(list, List::from_iter([3, 2, 1, 6, 5, 4, 7]));
    /// ```
    pub fn reverse_groups(&mut self, k: usize) -> usize {
        if k <= 1 || self.is_empty() {
            return 0;
        }
        let groups = self.count() / k;
        let mut anchor = self.ghost_node();
        for _ in 0..groups {
            // SAFETY: at least `k` nodes follow `anchor` before the ghost node, so
            // `front..=back` is a valid range of `k` nodes.
            unsafe {
                let front = next_of(anchor);
                let mut back = front;
                (1..k).for_each(|_| back = next_of(back));
                let mut group = self.cut(
                    front,
                    back,
                    #[cfg(feature = "length")]
                    k,
                );
                group.reverse();
                if let Some(detached) = group.detach_all_nodes() {
                    self.attach_nodes(anchor, next_of(anchor), detached);
                }
                // The old front is now the back of the reversed group.
                anchor = front;
            }
        }
        groups
    }

    /// Exchange every pair of neighbouring elements by relinking their nodes.
    /// A trailing odd element stays where it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(1..=5);
    /// list.swap_pairs();
    /// assert_eq!(list, List::from_iter([2, 1, 4, 3, 5]));
    /// ```
    pub fn swap_pairs(&mut self) {
        let ghost = self.ghost_node();
        let mut first = self.front_node();
        // SAFETY: `first` and its successor are checked to be non-ghost nodes
        // before the successor is moved in front of `first`.
        unsafe {
            while first != ghost && next_of(first) != ghost {
                move_node(next_of(first), first);
                first = next_of(first);
            }
        }
    }

    /// Remove the element at index `count() / 2` and return it, or return
    /// `None` if the list is empty.
    ///
    /// The middle is found with a slow and a fast pointer, so for an even
    /// length the later of the two middle elements is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(['a', 'b', 'c', 'd']);
    /// assert_eq!(list.remove_middle(), Some('c'));
    /// assert_eq!(list, List::from_iter(['a', 'b', 'd']));
    /// ```
    pub fn remove_middle(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let ghost = self.ghost_node();
        let (mut slow, mut fast) = (self.front_node(), self.front_node());
        // SAFETY: `fast` stops at the ghost node or right before it, and `slow`
        // moves half as far, so it is always a non-ghost node.
        unsafe {
            while fast != ghost && next_of(fast) != ghost {
                slow = next_of(slow);
                fast = next_of(next_of(fast));
            }
            Some(self.detach_node(slow).into_element())
        }
    }

    /// Remove every element that belongs to a run of two or more consecutive
    /// elements considered the same by `same`, the last one of each run
    /// included. Returns the number of removed elements.
    ///
    /// Only neighbours are compared, so on an unsorted list equal elements
    /// that are not adjacent survive.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter([1, 1, 2, 3, 3, 3, 4, 1]);
    /// assert_eq!(list.dedup_runs_by(|a, b| a == b), 5);
    /// assert_eq!(list, List::from_iter([2, 4, 1]));
    /// ```
    pub fn dedup_runs_by<F>(&mut self, mut same: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut removed = 0;
        let mut in_run = false;
        let mut cursor = self.cursor_start_mut();
        while let Some(current) = cursor.current() {
            let dup = cursor.peek_next().map_or(false, |next| same(current, next));
            if dup || in_run {
                in_run = dup;
                cursor.remove();
                removed += 1;
            } else {
                cursor.move_next_cyclic();
            }
        }
        removed
    }

    /// Remove every element for which some later element `later` satisfies
    /// `dominates(later, element)`. Returns the number of removed elements.
    ///
    /// The list is walked once from the back, carrying the last element kept
    /// so far, so `dominates` has to be a strict order for the result to be
    /// the same as checking every later element.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// // Keep the elements with nothing smaller after them.
    /// let mut list = List::from_iter([5, 1, 4, 2, 2]);
    /// assert_eq!(list.retain_undominated_by(|later, x| later < x), 2);
    /// assert_eq!(list, List::from_iter([1, 2, 2]));
    /// ```
    pub fn retain_undominated_by<F>(&mut self, mut dominates: F) -> usize
    where
        F: FnMut(&T, &T) -> bool,
    {
        if self.is_empty() {
            return 0;
        }
        let ghost = self.ghost_node();
        let mut removed = 0;
        let mut best = self.back_node();
        // SAFETY: `best` is always a kept non-ghost node and `node` walks the
        // non-ghost nodes before it. `prev` is read before `node` is detached.
        unsafe {
            let mut node = prev_of(best);
            while node != ghost {
                let prev = prev_of(node);
                if dominates(&(*best.as_ptr()).element, &(*node.as_ptr()).element) {
                    drop(self.detach_node(node));
                    removed += 1;
                } else {
                    best = node;
                }
                node = prev;
            }
        }
        removed
    }

    /// Stable ascending sort that relinks nodes and allocates nothing.
    ///
    /// A top-down merge sort halving by element count, so it runs in
    /// *O*(*n* log *n*) comparisons with recursion *O*(log *n*) deep.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::List;
    /// use std::iter::FromIterator;
    ///
    /// let mut list = List::from_iter(["pear", "fig", "apple", "fig"]);
    /// list.sort();
    /// assert_eq!(list, List::from_iter(["apple", "fig", "fig", "pear"]));
    /// ```
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        sort::merge_sort(self, |a, b| a < b);
    }
}
