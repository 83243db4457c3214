//! Utility types to support the binary trees in this crate

#![warn(missing_docs)]

extern crate alloc;
use alloc::vec::Vec;

use core::{cmp::Ordering, fmt::Display, iter::FusedIterator};

use crate::error::Error;

//-----------------------------------------------------------------------------------------------//

/// A total order over elements of type `T`
///
/// Any closure or function of the form `Fn(&T, &T) -> Ordering` is a `Compare<T>`. The order must
/// be strict and must not change while a tree holds elements sorted by it.
pub trait Compare<T: ?Sized> {
    /// Compare two elements
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

//-----------------------------------------------------------------------------------------------//

// A leaf in a binary tree. A recycled leaf threads the recycle list through `left`.
#[derive(Clone)]
struct Leaf {
    left: usize,
    right: usize,
}

//-----------------------------------------------------------------------------------------------//

/// An arena of integer leaves linked into a binary tree
///
/// The arena stores only the shape of the tree. Each leaf is an index that the owning collection
/// uses to address its own element storage, and `usize::MAX` stands for "no leaf". Leaves that
/// are freed go to a recycle list and are handed out again before the arena grows.
#[derive(Clone)]
pub struct Arena {
    leaf: Vec<Leaf>,
    root: usize,
    recycle: usize,
    count: usize,
    rotations: u64,
}

impl Arena {
    /// Construct an empty arena
    pub fn new() -> Arena {
        Arena {
            leaf: Vec::new(),
            root: !0,
            recycle: !0,
            count: 0,
            rotations: 0,
        }
    }

    /// Construct an empty arena, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Arena {
        Arena {
            leaf: Vec::with_capacity(capacity),
            root: !0,
            recycle: !0,
            count: 0,
            rotations: 0,
        }
    }

    /// Get the number of live leaves
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if there are no live leaves
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the number of recycled leaves
    #[inline]
    pub fn recycle_count(&self) -> usize {
        self.leaf.len() - self.count
    }

    /// Get the number of leaves ever handed out and not yet cleared. This is the current `count`
    /// plus the `recycle_count`, and it is always the length the owner's element storage must have.
    #[inline]
    pub fn allocated_count(&self) -> usize {
        self.leaf.len()
    }

    /// Get the number of rotations performed since construction or the last `clear`
    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    /// Remove all leaves
    pub fn clear(&mut self) {
        log::debug!("clearing arena of {} leaves", self.count);
        self.leaf.truncate(0);
        self.root = !0;
        self.recycle = !0;
        self.count = 0;
        self.rotations = 0;
    }

    /// Reserves capacity for at least `additional` more leaves
    ///
    /// Recycled leaves count towards `additional`. The return value is the number of leaves by
    /// which the arena itself may grow, which is the amount the owner must reserve in any storage
    /// it keeps alongside the arena.
    pub fn reserve(&mut self, additional: usize) -> usize {
        let recycle_count = self.recycle_count();
        if additional > recycle_count {
            let required = additional - recycle_count;
            self.leaf.reserve(required);
            required
        } else {
            0
        }
    }

    /// Fallible version of `reserve`
    ///
    /// On failure nothing about the arena changes apart from, possibly, its capacity.
    pub fn try_reserve(&mut self, additional: usize) -> Result<usize, Error> {
        let recycle_count = self.recycle_count();
        if additional <= recycle_count {
            return Ok(0);
        }

        let required = additional - recycle_count;
        let capacity = self.leaf.capacity();
        if self.leaf.try_reserve(required).is_err() {
            log::warn!("failed to reserve {required} leaves beyond {capacity}");
            return Err(Error::Alloc {
                requested: required,
            });
        }

        if self.leaf.capacity() != capacity {
            log::debug!("arena capacity grew from {capacity} to {}", self.leaf.capacity());
        }

        Ok(required)
    }

    /// Get the root leaf, or `usize::MAX` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Replace the root leaf
    #[inline]
    pub fn set_root(&mut self, leaf: usize) {
        self.root = leaf;
    }

    /// Get the left child of a leaf
    #[inline]
    pub fn left(&self, leaf: usize) -> usize {
        self.leaf[leaf].left
    }

    /// Get the right child of a leaf
    #[inline]
    pub fn right(&self, leaf: usize) -> usize {
        self.leaf[leaf].right
    }

    /// Replace the left child of a leaf
    #[inline]
    pub fn set_left(&mut self, leaf: usize, child: usize) {
        self.leaf[leaf].left = child;
    }

    /// Replace the right child of a leaf
    #[inline]
    pub fn set_right(&mut self, leaf: usize, child: usize) {
        self.leaf[leaf].right = child;
    }

    /// Allocate a new, unlinked leaf
    ///
    /// A recycled leaf is preferred. Otherwise the new leaf is `allocated_count()` before the call,
    /// so the owner knows to push rather than overwrite its element storage. The arena grows
    /// infallibly here; callers that need to fail gracefully call `try_reserve` first.
    pub fn alloc(&mut self) -> usize {
        // Increase the leaf count
        self.count += 1;

        // Recycle an old leaf
        let leaf = self.recycle;
        if !leaf != 0 {
            let l = &mut self.leaf[leaf];
            self.recycle = l.left;
            l.left = !0;
            l.right = !0;

            return leaf;
        }

        // Initialise a new one
        let leaf = self.leaf.len();
        self.leaf.push(Leaf {
            left: !0,
            right: !0,
        });

        leaf
    }

    /// Free a leaf and add it to the recycle list
    ///
    /// The leaf must already be unlinked from the tree.
    pub fn free(&mut self, leaf: usize) {
        debug_assert!(self.count > 0);

        // Decrease the leaf count
        self.count -= 1;

        // Recycle the leaf
        let l = &mut self.leaf[leaf];
        l.left = self.recycle;
        l.right = !0;
        self.recycle = leaf;
    }

    /// Rotate the right child of `x` up into its place, returning the new subtree root
    ///
    /// The caller is responsible for storing the returned leaf in place of `x`.
    pub fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.leaf[x].right;
        debug_assert!(!y != 0);

        self.leaf[x].right = self.leaf[y].left;
        self.leaf[y].left = x;
        self.rotations += 1;
        y
    }

    /// Rotate the left child of `x` up into its place, returning the new subtree root
    ///
    /// The caller is responsible for storing the returned leaf in place of `x`.
    pub fn rotate_right(&mut self, x: usize) -> usize {
        let y = self.leaf[x].left;
        debug_assert!(!y != 0);

        self.leaf[x].left = self.leaf[y].right;
        self.leaf[y].right = x;
        self.rotations += 1;
        y
    }

    // Record a structural step that is not a plain rotation, such as a top-down splay link
    #[inline]
    pub(crate) fn note_rotation(&mut self) {
        self.rotations += 1;
    }

    /// Get the first leaf in the tree (the left-most)
    #[inline]
    pub fn first(&self) -> usize {
        self.min(self.root)
    }

    /// Get the last leaf in the tree (the right-most)
    #[inline]
    pub fn last(&self) -> usize {
        self.max(self.root)
    }

    /// Get the left-most leaf in the subtree below `x`
    pub fn min(&self, mut x: usize) -> usize {
        if !x == 0 {
            return !0;
        }

        loop {
            let y = self.leaf[x].left;
            if !y == 0 {
                return x;
            }
            x = y;
        }
    }

    /// Get the right-most leaf in the subtree below `x`
    pub fn max(&self, mut x: usize) -> usize {
        if !x == 0 {
            return !0;
        }

        loop {
            let y = self.leaf[x].right;
            if !y == 0 {
                return x;
            }
            x = y;
        }
    }

    /// Get the number of leaves on the longest path from the root
    ///
    /// The traversal uses an explicit stack, so a degenerate tree cannot overflow the call stack.
    pub fn height(&self) -> usize {
        if !self.root == 0 {
            return 0;
        }

        let mut height = 0;
        let mut stack = Vec::new();
        stack.push((self.root, 1));

        while let Some((x, depth)) = stack.pop() {
            height = height.max(depth);
            let l = &self.leaf[x];
            if !l.left != 0 {
                stack.push((l.left, depth + 1));
            }
            if !l.right != 0 {
                stack.push((l.right, depth + 1));
            }
        }

        height
    }

    /// Walk the leaves in order
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.leaf, self.root, self.count)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::new()
    }
}

impl Display for Arena {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        for leaf in self.walk() {
            write!(f, "{leaf} ")?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

/// In-order walk over the leaves of an `Arena`
///
/// Leaves carry no parent link, so the walk keeps the path back to the root on its own stack.
#[derive(Clone)]
pub struct Walk<'a> {
    leaf: &'a [Leaf],
    stack: Vec<usize>,
    count: usize,
}

impl<'a> Walk<'a> {
    fn new(leaf: &'a [Leaf], root: usize, count: usize) -> Walk<'a> {
        let mut walk = Walk {
            leaf,
            stack: Vec::new(),
            count,
        };
        walk.descend(root);
        walk
    }

    // Push `x` and its chain of left children
    fn descend(&mut self, mut x: usize) {
        while !x != 0 {
            self.stack.push(x);
            x = self.leaf[x].left;
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let x = self.stack.pop()?;
        self.descend(self.leaf[x].right);
        self.count = self.count.saturating_sub(1);
        Some(x)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl ExactSizeIterator for Walk<'_> {}

impl FusedIterator for Walk<'_> {}

//-----------------------------------------------------------------------------------------------//

/// In-order iterator over the elements of a tree
#[derive(Clone)]
pub struct Iter<'a, T> {
    walk: Walk<'a>,
    element: &'a [Option<T>],
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(walk: Walk<'a>, element: &'a [Option<T>]) -> Iter<'a, T> {
        Iter { walk, element }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let leaf = self.walk.next()?;
        match &self.element[leaf] {
            Some(element) => Some(element),
            None => unreachable!("leaf {leaf} is linked but holds no element"),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

//-----------------------------------------------------------------------------------------------//

#[test]
// Leaves are recycled before the arena grows
fn test_arena_0() {
    let mut arena = Arena::new();

    let a = arena.alloc();
    let b = arena.alloc();
    let c = arena.alloc();
    debug_assert_eq!((a, b, c), (0, 1, 2));
    debug_assert_eq!(arena.count(), 3);

    arena.free(b);
    debug_assert_eq!(arena.count(), 2);
    debug_assert_eq!(arena.recycle_count(), 1);

    debug_assert_eq!(arena.try_reserve(1), Ok(0));
    debug_assert_eq!(arena.alloc(), b);
    debug_assert_eq!(arena.allocated_count(), 3);
    debug_assert_eq!(arena.try_reserve(2), Ok(2));
}

#[test]
// Rotations preserve the in-order sequence
fn test_arena_1() {
    use alloc::vec;

    let mut arena = Arena::new();
    let a = arena.alloc();
    let b = arena.alloc();
    let c = arena.alloc();

    // b at the root, a on the left, c on the right
    arena.set_left(b, a);
    arena.set_right(b, c);
    arena.set_root(b);

    let order = vec![a, b, c];
    debug_assert_eq!(arena.walk().collect::<Vec<_>>(), order);

    let root = arena.rotate_left(b);
    arena.set_root(root);
    debug_assert_eq!(root, c);
    debug_assert_eq!(arena.walk().collect::<Vec<_>>(), order);
    debug_assert_eq!(arena.height(), 3);

    let root = arena.rotate_right(c);
    arena.set_root(root);
    debug_assert_eq!(root, b);
    debug_assert_eq!(arena.walk().collect::<Vec<_>>(), order);
    debug_assert_eq!(arena.height(), 2);
    debug_assert_eq!(arena.rotations(), 2);

    debug_assert_eq!(arena.first(), a);
    debug_assert_eq!(arena.last(), c);
}

#[test]
// Clearing forgets every leaf
fn test_arena_2() {
    use alloc::string::ToString;

    let mut arena = Arena::with_capacity(4);
    let a = arena.alloc();
    arena.set_root(a);
    debug_assert_eq!(arena.to_string(), "[ 0 ]");

    arena.clear();
    debug_assert!(arena.is_empty());
    debug_assert_eq!(arena.allocated_count(), 0);
    debug_assert_eq!(arena.first(), !0);
    debug_assert_eq!(arena.height(), 0);
    debug_assert_eq!(arena.to_string(), "[ ]");
}
