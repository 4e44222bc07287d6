//! A chain of queues that can be merged into one sorted queue.

use crate::error::{QueueError, Result};
use crate::list::List;
use crate::queue::Queue;
use crate::Iter;

/// Whether a queue in a [`QueueGroup`] still owns its elements.
#[derive(Debug)]
pub enum QueueState {
    Active(Queue),
    /// The elements were moved into another queue by [`QueueGroup::merge`].
    /// Only the empty queue is left, until [`QueueGroup::release_absorbed`].
    Absorbed(Queue),
}

/// One entry of a [`QueueGroup`]: a queue, its id, and its cached size.
#[derive(Debug)]
pub struct QueueContext {
    id: usize,
    state: QueueState,
    size: usize,
}

impl QueueContext {
    /// The id handed out when the queue joined the group.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The cached element count. It is `0` for an absorbed queue.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The queue, or `None` if it has been absorbed.
    pub fn queue(&self) -> Option<&Queue> {
        match &self.state {
            QueueState::Active(queue) => Some(queue),
            QueueState::Absorbed(_) => None,
        }
    }

    /// `true` once a merge has moved this queue's elements elsewhere.
    pub fn is_absorbed(&self) -> bool {
        matches!(self.state, QueueState::Absorbed(_))
    }

    /// Move the elements of `other` to the tail of this queue, and return
    /// `other` marked as absorbed. An already absorbed `other` is returned
    /// as it is.
    fn absorb(&mut self, other: QueueContext) -> QueueContext {
        let QueueContext { id, state, size } = other;
        match (&mut self.state, state) {
            (QueueState::Active(into), QueueState::Active(mut queue)) => {
                into.append(&mut queue);
                self.size += size;
                QueueContext {
                    id,
                    state: QueueState::Absorbed(queue),
                    size: 0,
                }
            }
            (_, state) => QueueContext { id, state, size },
        }
    }
}

/// An ordered chain of queues.
///
/// The chain is itself a [`List`] of [`QueueContext`]s. Every context caches
/// the element count of its queue, and the cache is kept up to date by every
/// method of the group.
///
/// # Examples
///
/// ```
/// use cyclic_queue::{Queue, QueueGroup};
/// use std::iter::FromIterator;
///
/// let mut group = QueueGroup::new();
/// let first = group.push(Queue::from_iter(["b", "a"]));
/// let second = group.push(Queue::from_iter(["d", "c"]));
///
/// assert_eq!(group.merge(false), 4);
/// assert_eq!(group.get(first).unwrap(), &Queue::from_iter(["a", "b", "c", "d"]));
/// assert!(group.get(second).is_err());
/// assert_eq!(group.release_absorbed(), 1);
/// ```
#[derive(Debug, Default)]
pub struct QueueGroup {
    chain: List<QueueContext>,
    next_id: usize,
}

impl QueueGroup {
    /// An empty group. Ids start at `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queues in the chain, absorbed ones included.
    pub fn len(&self) -> usize {
        self.chain.count()
    }

    /// `true` if the chain holds no queue.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Add `queue` to the end of the chain and return its id.
    pub fn push(&mut self, queue: Queue) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let size = queue.size();
        self.chain.push_back(QueueContext {
            id,
            state: QueueState::Active(queue),
            size,
        });
        tracing::trace!(id, size, "queue added to group");
        id
    }

    /// Add a new empty queue to the end of the chain and return its id.
    pub fn new_queue(&mut self) -> Result<usize> {
        let id = self.next_id;
        self.chain.try_push_back(QueueContext {
            id,
            state: QueueState::Active(Queue::new()?),
            size: 0,
        })?;
        self.next_id += 1;
        Ok(id)
    }

    fn find(&self, id: usize) -> Result<&QueueContext> {
        self.chain
            .iter()
            .find(|ctx| ctx.id == id)
            .ok_or(QueueError::NotFound(id))
    }

    /// The queue with the given id.
    pub fn get(&self, id: usize) -> Result<&Queue> {
        self.find(id)?.queue().ok_or(QueueError::Absorbed(id))
    }

    /// The cached size of the queue with the given id.
    pub fn size_of(&self, id: usize) -> Result<usize> {
        Ok(self.find(id)?.size)
    }

    /// Run `f` on the queue with the given id, then refresh its cached size.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::QueueGroup;
    ///
    /// let mut group = QueueGroup::new();
    /// let id = group.new_queue().unwrap();
    /// group.update(id, |q| q.insert_tail("x")).unwrap().unwrap();
    /// assert_eq!(group.size_of(id), Ok(1));
    /// ```
    pub fn update<R, F>(&mut self, id: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Queue) -> R,
    {
        let ctx = self
            .chain
            .iter_mut()
            .find(|ctx| ctx.id == id)
            .ok_or(QueueError::NotFound(id))?;
        match &mut ctx.state {
            QueueState::Active(queue) => {
                let result = f(queue);
                ctx.size = queue.size();
                Ok(result)
            }
            QueueState::Absorbed(_) => Err(QueueError::Absorbed(id)),
        }
    }

    /// Every context in chain order, absorbed ones included.
    pub fn contexts(&self) -> Iter<'_, QueueContext> {
        self.chain.iter()
    }

    /// The first context of the chain, which is the one `merge` collects
    /// every other queue into.
    pub fn first(&self) -> Option<&QueueContext> {
        self.chain.front()
    }

    /// Remove the absorbed contexts from the chain, releasing their empty
    /// queues. Returns how many were removed.
    pub fn release_absorbed(&mut self) -> usize {
        let mut released = 0;
        let mut cursor = self.chain.cursor_start_mut();
        while let Some(ctx) = cursor.current() {
            if ctx.is_absorbed() {
                cursor.remove();
                released += 1;
            } else {
                cursor.move_next_cyclic();
            }
        }
        tracing::trace!(released, "released absorbed queues");
        released
    }

    /// Move the elements of every queue into the first active queue of the
    /// chain and sort it, ascending or descending. Returns the number of
    /// elements in the merged queue.
    ///
    /// The other queues stay in the chain as absorbed. The queues do not
    /// have to be sorted beforehand. An empty group gives `0`, and a group
    /// of a single queue gives its size without sorting it.
    pub fn merge(&mut self, descend: bool) -> usize {
        if self.chain.is_singular() {
            return self.chain.front().map_or(0, |ctx| ctx.size);
        }
        let mut rest = std::mem::take(&mut self.chain);
        let mut first: Option<QueueContext> = None;
        let mut absorbed = 0;
        while let Some(ctx) = rest.pop_front() {
            match &mut first {
                Some(into) => {
                    if !ctx.is_absorbed() {
                        absorbed += 1;
                    }
                    self.chain.push_back(into.absorb(ctx));
                }
                None if ctx.is_absorbed() => self.chain.push_back(ctx),
                None => first = Some(ctx),
            }
        }
        let Some(mut first) = first else {
            return 0;
        };
        if let QueueState::Active(queue) = &mut first.state {
            queue.sort(descend);
            debug_assert_eq!(queue.size(), first.size);
        }
        let total = first.size;
        tracing::debug!(id = first.id, absorbed, total, descend, "merged queues");
        self.chain.push_front(first);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::iter::FromIterator;

    fn texts(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    #[test]
    fn merge_two_unsorted_queues() {
        let mut group = QueueGroup::new();
        let a = group.push(Queue::from_iter(["b", "a"]));
        let b = group.push(Queue::from_iter(["d", "c"]));
        assert_eq!(group.merge(false), 4);

        assert_eq!(texts(group.get(a).unwrap()), ["a", "b", "c", "d"]);
        assert_eq!(group.size_of(a), Ok(4));
        assert_eq!(group.size_of(b), Ok(0));
        assert_eq!(group.get(b), Err(QueueError::Absorbed(b)));
        assert_eq!(group.first().map(QueueContext::id), Some(a));
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn merge_descending() {
        let mut group = QueueGroup::new();
        let a = group.push(Queue::from_iter(["x", "b"]));
        group.push(Queue::new().unwrap());
        group.push(Queue::from_iter(["c", "y", "a"]));
        assert_eq!(group.merge(true), 5);
        assert_eq!(texts(group.get(a).unwrap()), ["y", "x", "c", "b", "a"]);
        assert_eq!(group.contexts().filter(|ctx| ctx.is_absorbed()).count(), 2);
    }

    #[test]
    fn merge_empty_and_single() {
        let mut group = QueueGroup::new();
        assert_eq!(group.merge(false), 0);
        assert!(group.is_empty());

        let id = group.push(Queue::from_iter(["b", "a", "c"]));
        assert_eq!(group.merge(false), 3);
        // A single queue is not sorted.
        assert_eq!(texts(group.get(id).unwrap()), ["b", "a", "c"]);
        assert!(!group.first().unwrap().is_absorbed());
    }

    #[test]
    fn merge_again_after_absorbing() {
        let mut group = QueueGroup::new();
        let a = group.push(Queue::from_iter(["c"]));
        group.push(Queue::from_iter(["a"]));
        assert_eq!(group.merge(false), 2);

        let c = group.new_queue().unwrap();
        group.update(c, |q| q.insert_tail("b")).unwrap().unwrap();
        assert_eq!(group.merge(false), 3);
        assert_eq!(texts(group.get(a).unwrap()), ["a", "b", "c"]);

        assert_eq!(group.release_absorbed(), 2);
        assert_eq!(group.len(), 1);
        assert_eq!(group.release_absorbed(), 0);
        assert_eq!(group.merge(true), 3);
    }

    #[test]
    fn unknown_and_absorbed_ids() {
        let mut group = QueueGroup::new();
        assert_eq!(group.get(7), Err(QueueError::NotFound(7)));
        assert_eq!(group.size_of(7), Err(QueueError::NotFound(7)));
        assert_eq!(group.update(7, |q| q.size()), Err(QueueError::NotFound(7)));

        group.push(Queue::from_iter(["a"]));
        let b = group.push(Queue::from_iter(["b"]));
        group.merge(false);
        assert_eq!(group.update(b, |q| q.size()), Err(QueueError::Absorbed(b)));
        assert!(group.contexts().find(|ctx| ctx.id() == b).unwrap().queue().is_none());
    }

    #[test]
    fn update_refreshes_cached_size() {
        let mut group = QueueGroup::new();
        let id = group.push(Queue::from_iter(["a", "b", "c"]));
        assert_eq!(group.size_of(id), Ok(3));
        let removed = group
            .update(id, |q| q.remove_head(None).map(|e| e.into_value()))
            .unwrap();
        assert_eq!(removed.as_deref(), Some("a"));
        assert_eq!(group.size_of(id), Ok(2));
        group.update(id, |q| q.delete_mid()).unwrap();
        assert_eq!(group.size_of(id), Ok(1));
    }

    #[test]
    fn random_merge_matches_sorted_concat() {
        let mut rng = SmallRng::seed_from_u64(4242);
        for _ in 0..50 {
            let mut group = QueueGroup::new();
            let mut model = Vec::new();
            for _ in 0..rng.random_range(1..6) {
                let values: Vec<String> = (0..rng.random_range(0..8))
                    .map(|_| format!("{}", rng.random_range(0..20)))
                    .collect();
                group.push(Queue::from_iter(values.iter().map(String::as_str)));
                model.extend(values);
            }
            let descend = rng.random_bool(0.5);
            let total = group.merge(descend);
            assert_eq!(total, model.len());

            let first = group.first().unwrap();
            let merged = first.queue().unwrap();
            if group.len() > 1 {
                model.sort();
                if descend {
                    model.reverse();
                }
            }
            assert_eq!(texts(merged), model);
            assert_eq!(first.size(), merged.size());
            let others: usize = group.contexts().skip(1).map(QueueContext::size).sum();
            assert_eq!(others, 0);
        }
    }
}
