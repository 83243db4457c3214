//! Implementation of an ordered dictionary, backed by a left-leaning red-black tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use core::{cmp::Ordering, fmt};

use crate::error::{Error, Violation};
use crate::util::{Arena, Compare, Iter};

//-----------------------------------------------------------------------------------------------//

/// An ordered set of elements, implemented using a left-leaning red-black tree.
///
/// Every operation is `O(log N)` in the worst case. Red links only ever lean left, no path holds
/// two red links in a row, and every path from the root to a missing child passes through the
/// same number of black links. The root is black whenever the tree is non-empty.
///
/// Elements are ordered by the comparator captured at construction. The tree never inspects an
/// element other than through the comparator.
#[derive(Clone)]
pub struct LlrbTree<T, C = fn(&T, &T) -> Ordering> {
    arena: Arena,
    element: Vec<Option<T>>,
    red: Vec<bool>,
    compare: C,
}

impl<T> LlrbTree<T>
where
    T: Ord,
{
    /// Constructor
    pub fn new() -> LlrbTree<T> {
        Self::with_comparator(T::cmp)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> LlrbTree<T> {
        Self::with_capacity_and_comparator(capacity, T::cmp)
    }
}

impl<T, F> LlrbTree<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Constructor, ordering elements with a custom function
    pub fn new_by(compare: F) -> LlrbTree<T, F> {
        Self::with_comparator(compare)
    }

    /// Constructor, ordering elements with a custom function
    pub fn with_capacity_by(capacity: usize, compare: F) -> LlrbTree<T, F> {
        Self::with_capacity_and_comparator(capacity, compare)
    }
}

impl<T, C> LlrbTree<T, C>
where
    C: Compare<T>,
{
    /// Constructor, ordering elements with any `Compare` implementation
    pub fn with_comparator(compare: C) -> LlrbTree<T, C> {
        LlrbTree {
            arena: Arena::new(),
            element: Vec::new(),
            red: Vec::new(),
            compare,
        }
    }

    /// Constructor, ordering elements with any `Compare` implementation
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> LlrbTree<T, C> {
        LlrbTree {
            arena: Arena::with_capacity(capacity),
            element: Vec::with_capacity(capacity),
            red: Vec::with_capacity(capacity),
            compare,
        }
    }

    /// Get the number of elements in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.arena.count()
    }

    /// Check if there are any elements in the tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Get the number of rotations performed since construction or the last `clear`
    #[inline]
    pub fn rotations(&self) -> u64 {
        self.arena.rotations()
    }

    /// Get the number of leaves on the longest path from the root
    pub fn height(&self) -> usize {
        self.arena.height()
    }

    /// Remove all elements from the tree
    ///
    /// The elements are dropped. No recursion is involved, whatever the shape of the tree.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.element.truncate(0);
        self.red.truncate(0);
    }

    /// Reserves capacity for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.element.len(), self.arena.allocated_count());

        let required = self.arena.reserve(additional);
        if required > 0 {
            self.element.reserve(required);
            self.red.reserve(required);
        }
    }

    /// Fallible version of `reserve`
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        debug_assert_eq!(self.element.len(), self.arena.allocated_count());

        let required = self.arena.try_reserve(additional)?;
        if required > 0 {
            let element = self.element.try_reserve(required);
            let red = self.red.try_reserve(required);
            if element.is_err() || red.is_err() {
                log::warn!("failed to reserve storage for {required} elements");
                return Err(Error::Alloc {
                    requested: required,
                });
            }
        }
        Ok(())
    }

    /// Insert an element.
    ///
    /// Returns `Ok(true)` if the element was stored, or `Ok(false)` if an equal element is already
    /// present, in which case the offered element is dropped and the tree is unchanged. Duplicates
    /// are found before any storage is reserved, so they never fail. Storage for a new leaf is
    /// reserved before the tree is touched, so an `Err` leaves the tree as it was.
    pub fn insert(&mut self, element: T) -> Result<bool, Error> {
        if !self.locate(&element) != 0 {
            log::trace!("rejected duplicate insert");
            return Ok(false);
        }

        let n = self.store(element)?;

        let root = self.arena.root();
        let root = self.put(root, n);
        self.arena.set_root(root);
        self.red[root] = false;

        Ok(true)
    }

    /// Search for an element.
    ///
    /// Returns the stored element equal to `key`, or `None` if there is no such element.
    pub fn search(&self, key: &T) -> Option<&T> {
        let leaf = self.locate(key);
        if !leaf == 0 {
            return None;
        }
        Some(self.get(leaf))
    }

    /// Check if an element equal to `key` is present
    pub fn contains(&self, key: &T) -> bool {
        !self.locate(key) != 0
    }

    /// Remove an element.
    ///
    /// Returns the stored element equal to `key`, or `None` if there is no such element. A miss
    /// leaves the tree untouched.
    pub fn remove(&mut self, key: &T) -> Option<T> {
        if !self.locate(key) == 0 {
            log::trace!("remove found no matching element");
            return None;
        }

        let root = self.redden_root();
        let mut removed = !0;
        let root = self.delete(root, key, &mut removed);
        self.reroot(root);

        self.release(removed)
    }

    /// Get the first (least) element in the tree
    pub fn first(&self) -> Option<&T> {
        let leaf = self.arena.first();
        if !leaf == 0 {
            None
        } else {
            Some(self.get(leaf))
        }
    }

    /// Get the last (greatest) element in the tree
    pub fn last(&self) -> Option<&T> {
        let leaf = self.arena.last();
        if !leaf == 0 {
            None
        } else {
            Some(self.get(leaf))
        }
    }

    /// Remove the first (least) element from the tree
    pub fn pop_first(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let root = self.redden_root();
        let mut removed = !0;
        let root = self.delete_min(root, &mut removed);
        self.reroot(root);

        self.release(removed)
    }

    /// Remove the last (greatest) element from the tree
    pub fn pop_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let root = self.redden_root();
        let mut removed = !0;
        let root = self.delete_max(root, &mut removed);
        self.reroot(root);

        self.release(removed)
    }

    /// Get the element at the root of the tree
    pub fn root(&self) -> Option<&T> {
        let leaf = self.arena.root();
        if !leaf == 0 {
            None
        } else {
            Some(self.get(leaf))
        }
    }

    /// Iterate over the elements in ascending order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.arena.walk(), &self.element)
    }

    /// Check every structural invariant of the tree
    ///
    /// The elements must be strictly ascending in order, no red link may lean right, no two red
    /// links may follow one another, every path must hold the same number of black links, and the
    /// root must be black.
    pub fn verify(&self) -> Result<(), Violation> {
        let mut found = 0;
        let mut prev = !0;
        for leaf in self.arena.walk() {
            if !prev != 0 && self.compare.compare(self.get(prev), self.get(leaf)) != Ordering::Less
            {
                return Err(Violation::Unordered { leaf });
            }
            prev = leaf;
            found += 1;
        }

        if found != self.count() {
            return Err(Violation::CountMismatch {
                expected: self.count(),
                found,
            });
        }

        if self.is_red(self.arena.root()) {
            return Err(Violation::RedRoot);
        }

        self.black_height(self.arena.root()).map(|_| ())
    }

    //-------------------------------------------------------------------------------------------//

    // Get the element held by a live leaf
    #[inline]
    fn get(&self, leaf: usize) -> &T {
        match &self.element[leaf] {
            Some(element) => element,
            None => unreachable!("leaf {leaf} is linked but holds no element"),
        }
    }

    // Compare a key with the element held by a leaf
    #[inline]
    fn cmp(&self, key: &T, leaf: usize) -> Ordering {
        self.compare.compare(key, self.get(leaf))
    }

    #[inline]
    fn is_red(&self, x: usize) -> bool {
        !x != 0 && self.red[x]
    }

    // Is the left child of `x` red?
    #[inline]
    fn is_red_left(&self, x: usize) -> bool {
        !x != 0 && self.is_red(self.arena.left(x))
    }

    // Find the leaf equal to `key`, without altering the tree
    fn locate(&self, key: &T) -> usize {
        let mut x = self.arena.root();
        loop {
            if !x == 0 {
                return !0;
            }

            match self.cmp(key, x) {
                Ordering::Equal => return x,
                Ordering::Less => x = self.arena.left(x),
                Ordering::Greater => x = self.arena.right(x),
            }
        }
    }

    // Move an element into a fresh red leaf, reserving all storage before anything is linked
    fn store(&mut self, element: T) -> Result<usize, Error> {
        self.try_reserve(1)?;

        let leaf = self.arena.alloc();
        if leaf == self.element.len() {
            self.element.push(Some(element));
            self.red.push(true);
        } else {
            self.element[leaf] = Some(element);
            self.red[leaf] = true;
        }

        Ok(leaf)
    }

    // Recycle an unlinked leaf and hand back its element
    fn release(&mut self, leaf: usize) -> Option<T> {
        if !leaf == 0 {
            return None;
        }
        self.arena.free(leaf);
        self.element[leaf].take()
    }

    // Make the root red when both its children are black, ready for a deletion to descend
    fn redden_root(&mut self) -> usize {
        let root = self.arena.root();
        if !self.is_red(self.arena.left(root)) && !self.is_red(self.arena.right(root)) {
            self.red[root] = true;
        }
        root
    }

    // Store a new root and force it black
    fn reroot(&mut self, root: usize) {
        self.arena.set_root(root);
        if !root != 0 {
            self.red[root] = false;
        }
    }

    fn rotate_left(&mut self, h: usize) -> usize {
        let x = self.arena.rotate_left(h);
        self.red[x] = self.red[h];
        self.red[h] = true;
        x
    }

    fn rotate_right(&mut self, h: usize) -> usize {
        let x = self.arena.rotate_right(h);
        self.red[x] = self.red[h];
        self.red[h] = true;
        x
    }

    // Invert the colour of a leaf and of both its children
    fn flip(&mut self, h: usize) {
        self.red[h] = !self.red[h];

        let l = self.arena.left(h);
        if !l != 0 {
            self.red[l] = !self.red[l];
        }

        let r = self.arena.right(h);
        if !r != 0 {
            self.red[r] = !self.red[r];
        }
    }

    // Restore the left-leaning shape on the way back up. The order of the three cases matters.
    fn fix(&mut self, mut h: usize) -> usize {
        if self.is_red(self.arena.right(h)) {
            h = self.rotate_left(h);
        }

        if self.is_red(self.arena.left(h)) && self.is_red_left(self.arena.left(h)) {
            h = self.rotate_right(h);
        }

        if self.is_red(self.arena.left(h)) && self.is_red(self.arena.right(h)) {
            self.flip(h);
        }

        h
    }

    // Borrow a red link from the right so that the left child, or one of its children, is red
    fn move_red_left(&mut self, mut h: usize) -> usize {
        self.flip(h);

        let r = self.arena.right(h);
        if self.is_red_left(r) {
            let r = self.rotate_right(r);
            self.arena.set_right(h, r);
            h = self.rotate_left(h);
            self.flip(h);
        }

        h
    }

    // Borrow a red link from the left so that the right child, or one of its children, is red
    fn move_red_right(&mut self, mut h: usize) -> usize {
        self.flip(h);

        if self.is_red_left(self.arena.left(h)) {
            h = self.rotate_right(h);
            self.flip(h);
        }

        h
    }

    // Link leaf `n`, whose element is not yet in the tree, into the subtree below `h`, returning
    // the new subtree root
    fn put(&mut self, h: usize, n: usize) -> usize {
        if !h == 0 {
            return n;
        }

        let order = self.compare.compare(self.get(n), self.get(h));
        debug_assert_ne!(order, Ordering::Equal);

        if order == Ordering::Less {
            let l = self.arena.left(h);
            let l = self.put(l, n);
            self.arena.set_left(h, l);
        } else {
            let r = self.arena.right(h);
            let r = self.put(r, n);
            self.arena.set_right(h, r);
        }

        self.fix(h)
    }

    // Unlink the leaf equal to `key` from the subtree below `h`, which must contain it. The
    // unlinked leaf is written to `removed` and the new subtree root is returned.
    fn delete(&mut self, mut h: usize, key: &T, removed: &mut usize) -> usize {
        if self.cmp(key, h) == Ordering::Less {
            let l = self.arena.left(h);
            if !self.is_red(l) && !self.is_red_left(l) {
                h = self.move_red_left(h);
            }

            let l = self.arena.left(h);
            let l = self.delete(l, key, removed);
            self.arena.set_left(h, l);
        } else {
            if self.is_red(self.arena.left(h)) {
                h = self.rotate_right(h);
            }

            if self.cmp(key, h) == Ordering::Equal && !self.arena.right(h) == 0 {
                debug_assert_eq!(self.arena.left(h), !0);
                *removed = h;
                return !0;
            }

            let r = self.arena.right(h);
            if !self.is_red(r) && !self.is_red_left(r) {
                h = self.move_red_right(h);
            }

            let r = self.arena.right(h);
            let r = if self.cmp(key, h) == Ordering::Equal {
                // Swap in the successor so the physical deletion happens at the minimum of the
                // right subtree, which has no children
                let m = self.arena.min(r);
                self.element.swap(h, m);
                self.delete_min(r, removed)
            } else {
                self.delete(r, key, removed)
            };
            self.arena.set_right(h, r);
        }

        self.fix(h)
    }

    // Unlink the least leaf below `h`
    fn delete_min(&mut self, mut h: usize, removed: &mut usize) -> usize {
        if !self.arena.left(h) == 0 {
            debug_assert_eq!(self.arena.right(h), !0);
            *removed = h;
            return !0;
        }

        let l = self.arena.left(h);
        if !self.is_red(l) && !self.is_red_left(l) {
            h = self.move_red_left(h);
        }

        let l = self.arena.left(h);
        let l = self.delete_min(l, removed);
        self.arena.set_left(h, l);

        self.fix(h)
    }

    // Unlink the greatest leaf below `h`
    fn delete_max(&mut self, mut h: usize, removed: &mut usize) -> usize {
        if self.is_red(self.arena.left(h)) {
            h = self.rotate_right(h);
        }

        if !self.arena.right(h) == 0 {
            debug_assert_eq!(self.arena.left(h), !0);
            *removed = h;
            return !0;
        }

        let r = self.arena.right(h);
        if !self.is_red(r) && !self.is_red_left(r) {
            h = self.move_red_right(h);
        }

        let r = self.arena.right(h);
        let r = self.delete_max(r, removed);
        self.arena.set_right(h, r);

        self.fix(h)
    }

    // Count the black links below `x`, checking the colour rules on the way
    fn black_height(&self, x: usize) -> Result<usize, Violation> {
        if !x == 0 {
            return Ok(0);
        }

        let l = self.arena.left(x);
        let r = self.arena.right(x);

        if self.is_red(r) {
            return Err(Violation::RedRightLink { leaf: x });
        }

        if self.is_red(x) && self.is_red(l) {
            return Err(Violation::DoubleRed { leaf: x });
        }

        let left = self.black_height(l)?;
        let right = self.black_height(r)?;
        if left != right {
            return Err(Violation::BlackHeight { leaf: x });
        }

        Ok(left + usize::from(!self.red[x]))
    }
}

impl<T> Default for LlrbTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, C> IntoIterator for &'a LlrbTree<T, C>
where
    C: Compare<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Debug for LlrbTree<T, C>
where
    T: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> fmt::Display for LlrbTree<T, C>
where
    T: fmt::Display,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ")?;
        for element in self.iter() {
            write!(f, "{element} ")?;
        }
        write!(f, "]")
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Ascending in-order traversal, checking the colour rules after every insert
fn test_llrb_0() {
    use alloc::vec;

    let mut tree = LlrbTree::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        debug_assert_eq!(tree.insert(key), Ok(true));
        debug_assert_eq!(tree.verify(), Ok(()));
    }

    let v: Vec<i32> = tree.iter().cloned().collect();
    debug_assert_eq!(v, vec![1, 3, 4, 5, 7, 8, 9]);
    debug_assert_eq!(tree.count(), 7);
}

#[test]
// Removing an internal element keeps the tree balanced
fn test_llrb_1() {
    use alloc::vec;

    let mut tree = LlrbTree::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.remove(&5), Some(5));
    debug_assert_eq!(tree.verify(), Ok(()));

    let v: Vec<i32> = tree.iter().cloned().collect();
    debug_assert_eq!(v, vec![1, 3, 4, 7, 8, 9]);
    debug_assert_eq!(tree.search(&5), None);
}

#[test]
// Misses return `None` and leave the tree alone
fn test_llrb_2() {
    let mut tree = LlrbTree::new();
    debug_assert_eq!(tree.search(&100), None);
    debug_assert_eq!(tree.remove(&100), None);
    debug_assert_eq!(tree.pop_first(), None);
    debug_assert_eq!(tree.pop_last(), None);

    for key in 0..32 {
        let _ = tree.insert(key);
    }

    let rotations = tree.rotations();
    debug_assert_eq!(tree.search(&100), None);
    debug_assert_eq!(tree.remove(&100), None);
    debug_assert_eq!(tree.rotations(), rotations);
    debug_assert_eq!(tree.count(), 32);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Duplicates are stored once
fn test_llrb_3() {
    let mut tree = LlrbTree::new();
    debug_assert_eq!(tree.insert(3), Ok(true));
    debug_assert_eq!(tree.insert(3), Ok(false));

    debug_assert_eq!(tree.count(), 1);
    debug_assert_eq!(tree.iter().count(), 1);
    debug_assert_eq!(tree.verify(), Ok(()));

    // The duplicate never reached the arena
    debug_assert_eq!(tree.arena.allocated_count(), 1);
    debug_assert_eq!(tree.arena.recycle_count(), 0);
    debug_assert_eq!(tree.insert(4), Ok(true));
    debug_assert_eq!(tree.arena.allocated_count(), 2);
}

#[test]
// A custom comparator reverses the order and only compares part of the element
fn test_llrb_4() {
    use alloc::{
        string::{String, ToString},
        vec,
    };

    let mut tree = LlrbTree::new_by(|a: &(i32, String), b: &(i32, String)| b.0.cmp(&a.0));

    let _ = tree.insert((1, "One".to_string()));
    let _ = tree.insert((5, "Five".to_string()));
    let _ = tree.insert((9, "Nine".to_string()));
    debug_assert_eq!(tree.insert((5, "Cinq".to_string())), Ok(false));

    debug_assert_eq!(
        tree.search(&(5, String::new())),
        Some(&(5, "Five".to_string()))
    );

    let v: Vec<i32> = tree.iter().map(|e| e.0).collect();
    debug_assert_eq!(v, vec![9, 5, 1]);
    debug_assert_eq!(tree.first().map(|e| e.0), Some(9));
    debug_assert_eq!(tree.last().map(|e| e.0), Some(1));
}

#[test]
// Popping from both ends yields sorted runs
fn test_llrb_5() {
    let mut tree = LlrbTree::with_capacity(64);
    for key in (0..64).rev() {
        let _ = tree.insert(key);
    }

    for expected in 0..16 {
        debug_assert_eq!(tree.pop_first(), Some(expected));
        debug_assert_eq!(tree.verify(), Ok(()));
    }

    for expected in (48..64).rev() {
        debug_assert_eq!(tree.pop_last(), Some(expected));
        debug_assert_eq!(tree.verify(), Ok(()));
    }

    debug_assert_eq!(tree.count(), 32);
    debug_assert_eq!(tree.first(), Some(&16));
    debug_assert_eq!(tree.last(), Some(&47));

    tree.clear();
    debug_assert!(tree.is_empty());
    debug_assert_eq!(tree.root(), None);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Sequential inserts stay within the red-black height bound
fn test_llrb_6() {
    const COUNT: usize = 1 << 16;

    let mut tree = LlrbTree::new();
    for key in 0..COUNT {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.verify(), Ok(()));
    // 2 * log2(N + 1)
    debug_assert!(tree.height() <= 2 * 17);
}

#[test]
// A stress test with inserting and removing
fn test_llrb_7() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut tree = LlrbTree::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        debug_assert_eq!(tree.insert(key), Ok(true));
    }

    debug_assert_eq!(tree.count(), COUNT);
    debug_assert_eq!(tree.verify(), Ok(()));

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for i in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        debug_assert_eq!(tree.search(&key), Some(&key));
        debug_assert_eq!(tree.remove(&key), Some(key));

        if i % 10000 == 0 {
            debug_assert_eq!(tree.verify(), Ok(()));
        }
    }

    debug_assert_eq!(tree.count(), 0);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Formatting lists the elements in order
fn test_llrb_8() {
    use alloc::{format, string::ToString};

    let mut tree: LlrbTree<i32> = LlrbTree::default();
    for key in [2, 3, 1] {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.to_string(), "[ 1 2 3 ]");
    debug_assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
}

#[test]
// A failed reservation reports the request and leaves the tree as it was
fn test_llrb_9() {
    let mut tree = LlrbTree::new();
    for key in 0..10 {
        let _ = tree.insert(key);
    }

    let before: Vec<i32> = tree.iter().cloned().collect();
    let root = tree.root().copied();
    let rotations = tree.rotations();

    debug_assert_eq!(
        tree.try_reserve(usize::MAX),
        Err(Error::Alloc {
            requested: usize::MAX
        })
    );

    debug_assert_eq!(tree.count(), 10);
    debug_assert_eq!(tree.root().copied(), root);
    debug_assert_eq!(tree.rotations(), rotations);
    debug_assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), before);
    debug_assert_eq!(tree.verify(), Ok(()));

    debug_assert_eq!(tree.insert(10), Ok(true));
    debug_assert_eq!(tree.count(), 11);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Each broken rule is reported by `verify`
fn test_llrb_10() {
    // 2 at the root with black children 1 and 3
    fn build() -> LlrbTree<i32> {
        let mut tree = LlrbTree::new();
        for key in [2, 1, 3] {
            let _ = tree.insert(key);
        }
        debug_assert_eq!(tree.verify(), Ok(()));
        tree
    }

    let mut tree = build();
    let root = tree.arena.root();
    tree.red[root] = true;
    debug_assert_eq!(tree.verify(), Err(Violation::RedRoot));

    let mut tree = build();
    let root = tree.arena.root();
    let three = tree.locate(&3);
    tree.red[three] = true;
    debug_assert_eq!(tree.verify(), Err(Violation::RedRightLink { leaf: root }));

    let mut tree = build();
    let root = tree.arena.root();
    let one = tree.locate(&1);
    tree.red[one] = true;
    debug_assert_eq!(tree.verify(), Err(Violation::BlackHeight { leaf: root }));

    let mut tree = build();
    let _ = tree.insert(0);
    let one = tree.locate(&1);
    tree.red[one] = true;
    debug_assert_eq!(tree.verify(), Err(Violation::DoubleRed { leaf: one }));

    let mut tree = build();
    let root = tree.arena.root();
    let one = tree.locate(&1);
    let three = tree.locate(&3);
    tree.element.swap(one, three);
    debug_assert_eq!(tree.verify(), Err(Violation::Unordered { leaf: root }));

    let mut tree = build();
    let root = tree.arena.root();
    tree.arena.set_right(root, !0);
    debug_assert_eq!(
        tree.verify(),
        Err(Violation::CountMismatch {
            expected: 3,
            found: 2
        })
    );
}
