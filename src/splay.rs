//! Implementation of an ordered dictionary, backed by a splay tree
#![warn(missing_docs)]

extern crate alloc;

use alloc::vec::Vec;
use core::{cmp::Ordering, fmt};

use crate::error::{Error, Violation};
use crate::util::{Arena, Compare, Iter};

//-----------------------------------------------------------------------------------------------//

/// An ordered set of elements, implemented using a splay tree.
///
/// Every access moves the element it touched, or its nearest neighbour on a miss, to the root of
/// the tree. There is no balance invariant: a single operation may take `O(N)`, but any sequence
/// of operations takes `O(log N)` amortized time each. Because searching reshapes the tree,
/// `search` needs `&mut self`.
#[derive(Clone)]
pub struct SplayTree<T, C = fn(&T, &T) -> Ordering> {
    arena: Arena,
    element: Vec<Option<T>>,
    compare: C,
}

impl<T> SplayTree<T>
where
    T: Ord,
{
    /// Constructor
    pub fn new() -> SplayTree<T> {
        Self::with_comparator(T::cmp)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> SplayTree<T> {
        Self::with_capacity_and_comparator(capacity, T::cmp)
    }
}

impl<T, F> SplayTree<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Constructor, ordering elements with a custom function
    pub fn new_by(compare: F) -> SplayTree<T, F> {
        Self::with_comparator(compare)
    }

    /// Constructor, ordering elements with a custom function
    pub fn with_capacity_by(capacity: usize, compare: F) -> SplayTree<T, F> {
        Self::with_capacity_and_comparator(capacity, compare)
    }
}

impl<T, C> SplayTree<T, C>
where
    C: Compare<T>,
{
    /// Constructor, ordering elements with any `Compare` implementation
    pub fn with_comparator(compare: C) -> SplayTree<T, C> {
        SplayTree {
            arena: Arena::new(),
            element: Vec::new(),
            compare,
        }
    }

    /// Constructor, ordering elements with any `Compare` implementation
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> SplayTree<T, C> {
        SplayTree {
            arena: Arena::with_capacity(capacity),
            element: Vec::with_capacity(capacity),
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

    /// Get the number of splay steps (rotations and links) since construction or the last `clear`
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
    /// The elements are dropped. No recursion is involved, so even a tree that has degenerated
    /// into a long chain is cleared safely.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.element.truncate(0);
    }

    /// Reserves capacity for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) {
        debug_assert_eq!(self.element.len(), self.arena.allocated_count());

        let required = self.arena.reserve(additional);
        if required > 0 {
            self.element.reserve(required);
        }
    }

    /// Fallible version of `reserve`
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        debug_assert_eq!(self.element.len(), self.arena.allocated_count());

        let required = self.arena.try_reserve(additional)?;
        if required > 0 && self.element.try_reserve(required).is_err() {
            log::warn!("failed to reserve storage for {required} elements");
            return Err(Error::Alloc {
                requested: required,
            });
        }
        Ok(())
    }

    /// Insert an element.
    ///
    /// If an equal element is present it is splayed to the root, the offered element is dropped
    /// and `Ok(false)` is returned. Duplicates are found before any storage is reserved, so they
    /// never fail. Otherwise the tree is splayed on the element and the element becomes the new
    /// root, splitting the old tree either side of it. Storage is reserved before the tree is
    /// touched, so an `Err` leaves the tree as it was.
    pub fn insert(&mut self, element: T) -> Result<bool, Error> {
        let leaf = locate(&self.arena, &self.element, &self.compare, &element);
        if !leaf != 0 {
            log::trace!("rejected duplicate insert");
            self.promote(leaf);
            return Ok(false);
        }

        let n = self.store(element)?;

        let root = self.arena.root();
        if !root == 0 {
            self.arena.set_root(n);
            return Ok(true);
        }

        let key = get(&self.element, n);
        let root = splay(&mut self.arena, &self.element, &self.compare, root, key);

        let order = self.compare.compare(key, get(&self.element, root));
        debug_assert_ne!(order, Ordering::Equal);

        if order == Ordering::Less {
            let l = self.arena.left(root);
            self.arena.set_left(n, l);
            self.arena.set_right(n, root);
            self.arena.set_left(root, !0);
        } else {
            let r = self.arena.right(root);
            self.arena.set_right(n, r);
            self.arena.set_left(n, root);
            self.arena.set_right(root, !0);
        }

        self.arena.set_root(n);
        Ok(true)
    }

    /// Search for an element.
    ///
    /// Returns the stored element equal to `key`, or `None` if there is no such element. The tree
    /// is splayed on `key` whether or not it is found.
    pub fn search(&mut self, key: &T) -> Option<&T> {
        if self.splay(key) != Some(Ordering::Equal) {
            return None;
        }
        Some(get(&self.element, self.arena.root()))
    }

    /// Check if an element equal to `key` is present, splaying the tree on `key`
    pub fn contains(&mut self, key: &T) -> bool {
        self.splay(key) == Some(Ordering::Equal)
    }

    /// Remove an element.
    ///
    /// Returns the stored element equal to `key`, or `None` if there is no such element. The tree
    /// is splayed on `key` in either case.
    pub fn remove(&mut self, key: &T) -> Option<T> {
        if self.splay(key) != Some(Ordering::Equal) {
            log::trace!("remove found no matching element");
            return None;
        }

        let root = self.arena.root();
        let l = self.arena.left(root);
        let r = self.arena.right(root);

        if !l == 0 {
            self.arena.set_root(r);
        } else {
            // Every element on the left is less than `key`, so this brings the predecessor up,
            // and the predecessor has no right child
            let t = splay(&mut self.arena, &self.element, &self.compare, l, key);
            debug_assert_eq!(self.arena.right(t), !0);
            self.arena.set_right(t, r);
            self.arena.set_root(t);
        }

        self.release(root)
    }

    /// Get the first (least) element in the tree, splaying it to the root
    pub fn first(&mut self) -> Option<&T> {
        let leaf = self.arena.first();
        if !leaf == 0 {
            None
        } else {
            self.promote(leaf);
            Some(get(&self.element, leaf))
        }
    }

    /// Get the last (greatest) element in the tree, splaying it to the root
    pub fn last(&mut self) -> Option<&T> {
        let leaf = self.arena.last();
        if !leaf == 0 {
            None
        } else {
            self.promote(leaf);
            Some(get(&self.element, leaf))
        }
    }

    /// Remove the first (least) element from the tree
    pub fn pop_first(&mut self) -> Option<T> {
        let leaf = self.arena.first();
        if !leaf == 0 {
            return None;
        }

        self.promote(leaf);
        debug_assert_eq!(self.arena.left(leaf), !0);
        let r = self.arena.right(leaf);
        self.arena.set_root(r);
        self.release(leaf)
    }

    /// Remove the last (greatest) element from the tree
    pub fn pop_last(&mut self) -> Option<T> {
        let leaf = self.arena.last();
        if !leaf == 0 {
            return None;
        }

        self.promote(leaf);
        debug_assert_eq!(self.arena.right(leaf), !0);
        let l = self.arena.left(leaf);
        self.arena.set_root(l);
        self.release(leaf)
    }

    /// Get the element at the root of the tree, which is the most recently accessed one
    pub fn root(&self) -> Option<&T> {
        let leaf = self.arena.root();
        if !leaf == 0 {
            None
        } else {
            Some(get(&self.element, leaf))
        }
    }

    /// Iterate over the elements in ascending order
    ///
    /// Iteration does not splay.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.arena.walk(), &self.element)
    }

    /// Check that the elements are strictly ascending in order and that the count is right
    pub fn verify(&self) -> Result<(), Violation> {
        let mut found = 0;
        let mut prev = !0;
        for leaf in self.arena.walk() {
            if !prev != 0
                && self
                    .compare
                    .compare(get(&self.element, prev), get(&self.element, leaf))
                    != Ordering::Less
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

        Ok(())
    }

    //-------------------------------------------------------------------------------------------//

    // Splay on `key`, returning how `key` compares with the new root
    fn splay(&mut self, key: &T) -> Option<Ordering> {
        let root = self.arena.root();
        if !root == 0 {
            return None;
        }

        let root = splay(&mut self.arena, &self.element, &self.compare, root, key);
        self.arena.set_root(root);
        Some(self.compare.compare(key, get(&self.element, root)))
    }

    // Splay a leaf that is known to be in the tree up to the root
    fn promote(&mut self, leaf: usize) {
        let root = self.arena.root();
        let key = get(&self.element, leaf);
        let root = splay(&mut self.arena, &self.element, &self.compare, root, key);
        debug_assert_eq!(root, leaf);
        self.arena.set_root(root);
    }

    // Move an element into a fresh leaf, reserving all storage before anything is linked
    fn store(&mut self, element: T) -> Result<usize, Error> {
        self.try_reserve(1)?;

        let leaf = self.arena.alloc();
        if leaf == self.element.len() {
            self.element.push(Some(element));
        } else {
            self.element[leaf] = Some(element);
        }

        Ok(leaf)
    }

    // Recycle an unlinked leaf and hand back its element
    fn release(&mut self, leaf: usize) -> Option<T> {
        self.arena.free(leaf);
        self.element[leaf].take()
    }
}

impl<T> Default for SplayTree<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, C> IntoIterator for &'a SplayTree<T, C>
where
    C: Compare<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> fmt::Debug for SplayTree<T, C>
where
    T: fmt::Debug,
    C: Compare<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C> fmt::Display for SplayTree<T, C>
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

// IMPLEMENTATION NOTE
//
// The splay below is the top-down variant. Leaves passed on the way down are hung on two side
// trees, one holding everything known to be less than the key and one holding everything known
// to be greater, and the three pieces are reassembled around the final leaf.

// Get the element held by a live leaf
#[inline]
fn get<T>(element: &[Option<T>], leaf: usize) -> &T {
    match &element[leaf] {
        Some(element) => element,
        None => unreachable!("leaf {leaf} is linked but holds no element"),
    }
}

// Find the leaf equal to `key` without altering the tree, or `!0`
fn locate<T, C>(arena: &Arena, element: &[Option<T>], compare: &C, key: &T) -> usize
where
    C: Compare<T>,
{
    let mut x = arena.root();
    while !x != 0 {
        match compare.compare(key, get(element, x)) {
            Ordering::Equal => return x,
            Ordering::Less => x = arena.left(x),
            Ordering::Greater => x = arena.right(x),
        }
    }
    !0
}

// Splay the subtree rooted at `t` on `key`, returning the new subtree root. That root is the leaf
// equal to `key` if there is one, otherwise the last leaf visited, which is a neighbour of `key`.
fn splay<T, C>(
    arena: &mut Arena,
    element: &[Option<T>],
    compare: &C,
    mut t: usize,
    key: &T,
) -> usize
where
    C: Compare<T>,
{
    debug_assert!(!t != 0);

    // Side trees, with the open end where the next leaf is hung
    let mut lesser = !0;
    let mut lesser_max = !0;
    let mut greater = !0;
    let mut greater_min = !0;

    loop {
        match compare.compare(key, get(element, t)) {
            Ordering::Less => {
                let mut y = arena.left(t);
                if !y == 0 {
                    break;
                }

                // Zig-zig
                if compare.compare(key, get(element, y)) == Ordering::Less {
                    t = arena.rotate_right(t);
                    y = arena.left(t);
                    if !y == 0 {
                        break;
                    }
                }

                // Hang `t` on the greater side
                if !greater_min == 0 {
                    greater = t;
                } else {
                    arena.set_left(greater_min, t);
                }
                greater_min = t;
                arena.note_rotation();
                t = y;
            }
            Ordering::Greater => {
                let mut y = arena.right(t);
                if !y == 0 {
                    break;
                }

                // Zag-zag
                if compare.compare(key, get(element, y)) == Ordering::Greater {
                    t = arena.rotate_left(t);
                    y = arena.right(t);
                    if !y == 0 {
                        break;
                    }
                }

                // Hang `t` on the lesser side
                if !lesser_max == 0 {
                    lesser = t;
                } else {
                    arena.set_right(lesser_max, t);
                }
                lesser_max = t;
                arena.note_rotation();
                t = y;
            }
            Ordering::Equal => break,
        }
    }

    // Reassemble
    if !lesser_max != 0 {
        let a = arena.left(t);
        arena.set_right(lesser_max, a);
        arena.set_left(t, lesser);
    }

    if !greater_min != 0 {
        let b = arena.right(t);
        arena.set_left(greater_min, b);
        arena.set_right(t, greater);
    }

    t
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Searching an ascending chain brings the least element to the root
fn test_splay_0() {
    let mut tree = SplayTree::new();
    for key in [1, 2, 3, 4, 5] {
        debug_assert_eq!(tree.insert(key), Ok(true));
    }

    debug_assert_eq!(tree.root(), Some(&5));
    debug_assert_eq!(tree.search(&1), Some(&1));
    debug_assert_eq!(tree.root(), Some(&1));
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Removing an element hands it back and keeps the others in order
fn test_splay_1() {
    use alloc::vec;

    let mut tree = SplayTree::new();
    for key in [10, 20, 30] {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.remove(&20), Some(20));
    debug_assert_eq!(tree.verify(), Ok(()));

    let v: Vec<i32> = tree.iter().cloned().collect();
    debug_assert_eq!(v, vec![10, 30]);
}

#[test]
// Misses return `None` but still splay a neighbour to the root
fn test_splay_2() {
    let mut tree = SplayTree::new();
    debug_assert_eq!(tree.search(&100), None);
    debug_assert_eq!(tree.remove(&100), None);
    debug_assert_eq!(tree.pop_first(), None);
    debug_assert_eq!(tree.first(), None);

    for key in [50, 10, 90, 30, 70] {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.search(&100), None);
    debug_assert_eq!(tree.root(), Some(&90));
    debug_assert_eq!(tree.remove(&60), None);
    let root = tree.root().copied();
    debug_assert!(root == Some(50) || root == Some(70));
    debug_assert_eq!(tree.count(), 5);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Duplicates are stored once
fn test_splay_3() {
    let mut tree = SplayTree::new();
    debug_assert_eq!(tree.insert(3), Ok(true));
    debug_assert_eq!(tree.insert(1), Ok(true));
    debug_assert_eq!(tree.insert(3), Ok(false));

    debug_assert_eq!(tree.count(), 2);
    debug_assert_eq!(tree.iter().count(), 2);
    debug_assert_eq!(tree.root(), Some(&3));
    debug_assert_eq!(tree.verify(), Ok(()));

    // The duplicate never reached the arena
    debug_assert_eq!(tree.arena.allocated_count(), 2);
    debug_assert_eq!(tree.arena.recycle_count(), 0);
}

#[test]
// A custom comparator orders strings by length
fn test_splay_4() {
    use alloc::{string::String, vec};

    let mut tree = SplayTree::new_by(|a: &String, b: &String| a.len().cmp(&b.len()));

    for word in ["three", "a", "to", "four"] {
        let _ = tree.insert(String::from(word));
    }
    debug_assert_eq!(tree.insert(String::from("xx")), Ok(false));

    debug_assert_eq!(tree.search(&String::from("??")), Some(&String::from("to")));

    let v: Vec<&str> = tree.iter().map(String::as_str).collect();
    debug_assert_eq!(v, vec!["a", "to", "four", "three"]);
}

#[test]
// Popping from both ends yields sorted runs
fn test_splay_5() {
    let mut tree = SplayTree::with_capacity(64);
    for key in (0..64).rev() {
        let _ = tree.insert(key);
    }

    for expected in 0..16 {
        debug_assert_eq!(tree.pop_first(), Some(expected));
    }

    for expected in (48..64).rev() {
        debug_assert_eq!(tree.pop_last(), Some(expected));
    }

    debug_assert_eq!(tree.count(), 32);
    debug_assert_eq!(tree.first(), Some(&16));
    debug_assert_eq!(tree.root(), Some(&16));
    debug_assert_eq!(tree.last(), Some(&47));
    debug_assert_eq!(tree.root(), Some(&47));
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// A long chain is searched and cleared without deep recursion
fn test_splay_6() {
    const COUNT: usize = 200000;

    let mut tree = SplayTree::new();
    for key in 0..COUNT {
        let _ = tree.insert(key);
    }

    // Each insert became the root with the previous tree on its left
    debug_assert_eq!(tree.height(), COUNT);

    debug_assert_eq!(tree.search(&0), Some(&0));
    debug_assert!(tree.height() < COUNT);
    debug_assert_eq!(tree.verify(), Ok(()));

    tree.clear();
    debug_assert!(tree.is_empty());
    debug_assert_eq!(tree.root(), None);
}

#[test]
// A stress test with inserting and removing
fn test_splay_7() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(5678901234);

    let mut tree = SplayTree::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        debug_assert_eq!(tree.insert(key), Ok(true));
    }

    debug_assert_eq!(tree.count(), COUNT);
    debug_assert_eq!(tree.verify(), Ok(()));

    let mut rng = SmallRng::seed_from_u64(5678901234);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        debug_assert_eq!(tree.search(&key), Some(&key));
        debug_assert_eq!(tree.root(), Some(&key));
        debug_assert_eq!(tree.remove(&key), Some(key));
    }

    debug_assert_eq!(tree.count(), 0);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Formatting lists the elements in order
fn test_splay_8() {
    use alloc::{format, string::ToString};

    let mut tree: SplayTree<i32> = SplayTree::default();
    for key in [2, 3, 1] {
        let _ = tree.insert(key);
    }

    debug_assert_eq!(tree.to_string(), "[ 1 2 3 ]");
    debug_assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
}

#[test]
// A failed reservation reports the request and leaves the tree as it was
fn test_splay_9() {
    let mut tree = SplayTree::new();
    for key in 0..10 {
        let _ = tree.insert(key);
    }
    let _ = tree.remove(&4);

    let before: Vec<i32> = tree.iter().cloned().collect();
    let root = tree.root().copied();
    let rotations = tree.rotations();
    let height = tree.height();

    // The leaf recycled by the removal counts towards the request
    debug_assert_eq!(
        tree.try_reserve(usize::MAX),
        Err(Error::Alloc {
            requested: usize::MAX - 1
        })
    );

    debug_assert_eq!(tree.count(), 9);
    debug_assert_eq!(tree.root().copied(), root);
    debug_assert_eq!(tree.rotations(), rotations);
    debug_assert_eq!(tree.height(), height);
    debug_assert_eq!(tree.iter().cloned().collect::<Vec<_>>(), before);
    debug_assert_eq!(tree.verify(), Ok(()));

    debug_assert_eq!(tree.insert(4), Ok(true));
    debug_assert_eq!(tree.root(), Some(&4));
    debug_assert_eq!(tree.count(), 10);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// Disorder and lost leaves are reported by `verify`
fn test_splay_10() {
    fn build() -> SplayTree<i32> {
        let mut tree = SplayTree::new();
        for key in [1, 3, 2] {
            let _ = tree.insert(key);
        }
        debug_assert_eq!(tree.verify(), Ok(()));
        tree
    }

    // 2 at the root with 1 on the left and 3 on the right
    let mut tree = build();
    let root = tree.arena.root();
    let one = tree.arena.left(root);
    let three = tree.arena.right(root);
    debug_assert_eq!(tree.root(), Some(&2));
    tree.element.swap(one, three);
    debug_assert_eq!(tree.verify(), Err(Violation::Unordered { leaf: root }));

    let mut tree = build();
    let root = tree.arena.root();
    tree.arena.set_left(root, !0);
    debug_assert_eq!(
        tree.verify(),
        Err(Violation::CountMismatch {
            expected: 3,
            found: 2
        })
    );
}
