//! This crate provides a queue of owned strings built on a doubly-linked list
//! with owned nodes, implemented as a cyclic list.
//!
//! The [`Queue`] supports inserting and removing elements at both ends in
//! constant time, plus a family of in-place structural algorithms that only
//! relink nodes: deleting the middle element, dropping runs of duplicates,
//! swapping pairs, full and k-group reversal, a stable merge sort, and
//! monotonic filtering. A [`QueueGroup`] chains several queues and merges
//! them into one sorted queue.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//! use std::iter::FromIterator;
//!
//! let mut queue = Queue::from_iter(["d", "a", "c", "a", "b"]);
//!
//! queue.sort(false);
//! assert_eq!(queue, Queue::from_iter(["a", "a", "b", "c", "d"]));
//!
//! assert!(queue.delete_dup()); // every "a" is gone
//! assert!(queue.delete_mid()); // removes "c"
//! assert_eq!(queue, Queue::from_iter(["b", "d"]));
//!
//! queue.reverse();
//! let mut buf = [0u8; 8];
//! assert_eq!(queue.remove_head(Some(&mut buf)).unwrap().value(), "d");
//! assert_eq!(&buf[..2], b"d\0");
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Node N  │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        ├───────────┤
//! │  ║ payload T ║           ║ payload T ║                        ┊No payload ┊
//! │  ╚═══════════╝           ╚═══════════╝                        └╌╌╌╌╌╌╌╌╌╌╌┘
//! │      Node 0                  Node 1                               ↑   ↑
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╟───────────╢
//! ║   (len)   ║
//! ╚═══════════╝
//!     List
//! ```
//! The [`List`] contains:
//! - a pointer `ghost` that points to the ghost node;
//! - a length field `len` indicating the length of the list. It is only kept
//!   with the `length` feature enabled in your `Cargo.toml`:
//! ```text
//! [dependencies]
//! cyclic_queue = { features = ["length"] }
//! ```
//!
//! Initially, there is a ghost node in an empty list, of which the `next` and `prev`
//! pointer point to itself. As elements are inserted into the list, `ghost.next`
//! points to the first element, and `ghost.prev` points to the last element of
//! the list. The ghost node has *NO* payload.
//!
//! A [`Queue`] is a `List<String>`. Removing an element hands the whole node
//! to the caller as an [`Element`], so nothing is allocated or freed until the
//! caller drops it.
//!
//! # Cursor Mutations
//!
//! [`CursorMut`] walks a list and edits it in place. Removing the element at
//! the cursor moves the cursor to the following node, which is how the
//! filtering algorithms drop elements during a single pass.
//!
//! ```
//! use cyclic_queue::List;
//! use std::iter::FromIterator;
//!
//! let mut list = List::from_iter([1, 2, 3, 4]);
//!
//! let mut cursor = list.cursor_start_mut();
//!
//! cursor.insert(5); // becomes [5, 1, 2, 3, 4], points to 1
//! assert_eq!(cursor.current(), Some(&1));
//!
//! cursor.move_next_cyclic();
//! assert_eq!(cursor.remove(), Some(2)); // becomes [5, 1, 3, 4], points to 3
//! assert_eq!(cursor.current(), Some(&3));
//! assert_eq!(cursor.peek_next(), Some(&4));
//!
//! assert_eq!(list, List::from_iter([5, 1, 3, 4]));
//! ```
//!
//! # Errors and Logging
//!
//! Fallible operations return [`QueueError`]. Running out of memory while
//! creating a queue or an element is reported as
//! [`QueueError::AllocationFailed`] and leaves the queue untouched.
//!
//! The crate emits [`tracing`] events (allocation failures at `warn`, merge
//! summaries at `debug`, per-operation detail at `trace`) and never installs
//! a subscriber.
//!
//! [`CursorMut`]: crate::list::cursor::CursorMut

#[doc(inline)]
pub use error::{QueueError, Result};
#[doc(inline)]
pub use group::{QueueContext, QueueGroup, QueueState};
#[doc(inline)]
pub use list::iterator::{Iter, IterMut};
#[doc(inline)]
pub use list::List;
#[doc(inline)]
pub use queue::{Element, Queue};

pub mod error;
pub mod list;

mod group;
mod queue;
