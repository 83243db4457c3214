//! ## Introduction
//!
//! This crate implements ordered dictionaries based on two kinds of self-adjusting binary search
//! tree: the left-leaning red-black tree and the splay tree. Both store elements ordered by a
//! comparison supplied once, when the tree is constructed, and both offer the same small set of
//! operations: `insert`, `search`, `remove` and `clear`.
//!
//! - A left-leaning red-black tree keeps itself balanced with colours and rotations, and every
//!   operation is `O(log N)` in the worst case.
//! - A splay tree has no balance rule at all. Every access moves the accessed element to the root,
//!   so frequently used elements stay near the top. Operations are `O(log N)` amortized over a
//!   sequence, although a single one may be slower.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type              | Stores | Tree           | Iterator     |
//! |:------------------|:-------|:---------------|--------------|
//! | `LlrbTree`        | `T`    | Red-black      | `Iter`       |
//! | `SplayTree`       | `T`    | Splay          | `Iter`       |
//! | `StringLlrbTree`  | String | Red-black      | `StringIter` |
//! | `StringSplayTree` | String | Splay          | `StringIter` |
//!
//! </center>
//!
//! Elements that implement `Ord` can use `new()`. Otherwise a function can be supplied with
//! `new_by()`, or any `util::Compare` with `with_comparator()`.
//!
//! ## Storage
//!
//! Trees do not allocate one node at a time. The shape of a tree lives in `util::Arena`, a vector
//! of `usize` leaves, with elements held in a parallel vector. Removed leaves are recycled, and
//! clearing or dropping a tree never recurses, however deep the tree has grown. Inserting reserves
//! storage before the tree is touched, so an allocation failure is reported as `Error::Alloc`
//! with the tree unchanged.
//!
//! ## Example
//!
//! ```
//! use spinney::{LlrbTree, SplayTree};
//!
//! let mut llrb = LlrbTree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     llrb.insert(key).unwrap();
//! }
//! assert_eq!(llrb.remove(&5), Some(5));
//! assert_eq!(llrb.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
//!
//! let mut splay = SplayTree::new();
//! for key in 1..=5 {
//!     splay.insert(key).unwrap();
//! }
//! assert_eq!(splay.search(&1), Some(&1));
//! assert_eq!(splay.root(), Some(&1));
//! ```
//!
//! None of the types here are synchronised. A splay tree changes shape on every search, so even
//! reads need exclusive access.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod error;
mod llrb;
mod splay;
mod string;
pub mod util;

pub use error::*;
pub use llrb::*;
pub use splay::*;
pub use string::*;
pub use util::Iter;
