use crate::list::{move_nodes, next_of, prev_of, List, Node};
use std::ptr::NonNull;

/// Stable merge sort over the whole list.
///
/// The list is halved by counting nodes rather than by racing two pointers,
/// so the recursion is exactly `ceil(log2(n))` deep and every split is
/// deterministic. Nothing is allocated: merging only relinks nodes.
pub(crate) fn merge_sort<T, F>(list: &mut List<T>, mut less: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = list.count();
    tracing::trace!(len, "merge sort");
    if len < 2 {
        return;
    }
    // SAFETY: `front..ghost` covers the whole list, which holds `len` nodes.
    unsafe { merge_sort_range(list.front_node(), list.ghost_node(), len, &mut less) };
}

unsafe fn element<'a, T>(node: NonNull<Node<T>>) -> &'a T {
    &(*node.as_ptr()).element
}

unsafe fn nth_node<T>(mut node: NonNull<Node<T>>, n: usize) -> NonNull<Node<T>> {
    (0..n).for_each(|_| node = next_of(node));
    node
}

/// Sort the `len` nodes of `start..end` and return the new first node of the
/// range. `end` itself is never moved.
unsafe fn merge_sort_range<T, F>(
    start: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    len: usize,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    if len < 2 {
        return start;
    }
    let half = len / 2;
    let mid = nth_node(start, half);
    // Sorting `start..mid` only shuffles nodes inside it, so `mid` still
    // bounds the left half afterwards.
    let start = merge_sort_range(start, mid, half, less);
    let mid = merge_sort_range(mid, end, len - half, less);
    merge_range(start, mid, end, less)
}

/// Merge the sorted runs `start..mid` and `mid..end` in place and return
/// the new first node.
///
/// The right run is consumed in blocks: every maximal block of right nodes
/// strictly less than some left node is spliced in front of that node with
/// one `move_nodes`. Ties never move a right node ahead of a left one.
unsafe fn merge_range<T, F>(
    mut start: NonNull<Node<T>>,
    mid: NonNull<Node<T>>,
    end: NonNull<Node<T>>,
    less: &mut F,
) -> NonNull<Node<T>>
where
    F: FnMut(&T, &T) -> bool,
{
    let left_back = prev_of(mid);
    let (mut left, mut right) = (start, mid);
    // Once the right front is not below the largest left element, the rest
    // of the right run is already in place.
    while right != end && less(element(right), element(left_back)) {
        while left != right && !less(element(right), element(left)) {
            left = next_of(left);
        }
        if left == right {
            break;
        }
        let mut block_end = next_of(right);
        while block_end != end && less(element(block_end), element(left)) {
            block_end = next_of(block_end);
        }
        if left == start {
            start = right;
        }
        move_nodes(right, prev_of(block_end), left);
        right = block_end;
    }
    start
}
