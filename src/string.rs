//! String trees, storing their elements as `CompactString`
//!
//! These are thin wrappers over `LlrbTree` and `SplayTree` that accept and return `&str`. Short
//! strings are stored inline, so a tree of short keys makes one allocation per arena growth rather
//! than one per element. Lookups build a `CompactString` probe from the `&str` they are given,
//! which does not allocate for keys of up to 24 bytes.
#![warn(missing_docs)]

extern crate alloc;

use compact_str::CompactString;
use core::{cmp::Ordering, fmt, iter::FusedIterator};

use crate::error::{Error, Violation};
use crate::llrb::LlrbTree;
use crate::splay::SplayTree;
use crate::util::{Compare, Iter};

//-----------------------------------------------------------------------------------------------//

/// Orders `CompactString` elements by a function over `&str`
#[derive(Clone)]
pub struct ByStr<F>(F);

impl<F> Compare<CompactString> for ByStr<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &CompactString, b: &CompactString) -> Ordering {
        (self.0)(a.as_str(), b.as_str())
    }
}

//-----------------------------------------------------------------------------------------------//

/// A set of strings, implemented using a left-leaning red-black tree.
#[derive(Clone)]
pub struct StringLlrbTree<F = fn(&str, &str) -> Ordering> {
    tree: LlrbTree<CompactString, ByStr<F>>,
}

impl StringLlrbTree {
    /// Constructor
    pub fn new() -> StringLlrbTree {
        Self::new_by(str::cmp)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringLlrbTree {
        Self::with_capacity_by(capacity, str::cmp)
    }
}

impl<F> StringLlrbTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    /// Constructor, ordering strings with a custom function
    pub fn new_by(compare: F) -> StringLlrbTree<F> {
        StringLlrbTree {
            tree: LlrbTree::with_comparator(ByStr(compare)),
        }
    }

    /// Constructor, ordering strings with a custom function
    pub fn with_capacity_by(capacity: usize, compare: F) -> StringLlrbTree<F> {
        StringLlrbTree {
            tree: LlrbTree::with_capacity_and_comparator(capacity, ByStr(compare)),
        }
    }

    /// Get the number of strings in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all strings from the tree
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    /// Fallible version of `reserve`
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.tree.try_reserve(additional)
    }

    /// Insert a string, returning `Ok(false)` if it is already present
    pub fn insert(&mut self, key: &str) -> Result<bool, Error> {
        self.tree.insert(CompactString::new(key))
    }

    /// Search for a string
    pub fn search(&self, key: &str) -> Option<&str> {
        self.tree.search(&CompactString::new(key)).map(CompactString::as_str)
    }

    /// Check if a string is present
    pub fn contains(&self, key: &str) -> bool {
        self.tree.contains(&CompactString::new(key))
    }

    /// Remove a string, handing back the stored copy
    pub fn remove(&mut self, key: &str) -> Option<CompactString> {
        self.tree.remove(&CompactString::new(key))
    }

    /// Get the first string in the tree
    pub fn first(&self) -> Option<&str> {
        self.tree.first().map(CompactString::as_str)
    }

    /// Get the last string in the tree
    pub fn last(&self) -> Option<&str> {
        self.tree.last().map(CompactString::as_str)
    }

    /// Remove the first string from the tree
    pub fn pop_first(&mut self) -> Option<CompactString> {
        self.tree.pop_first()
    }

    /// Remove the last string from the tree
    pub fn pop_last(&mut self) -> Option<CompactString> {
        self.tree.pop_last()
    }

    /// Iterate over the strings in ascending order
    pub fn iter(&self) -> StringIter<'_> {
        StringIter {
            iter: self.tree.iter(),
        }
    }

    /// Check every structural invariant of the underlying tree
    pub fn verify(&self) -> Result<(), Violation> {
        self.tree.verify()
    }
}

impl Default for StringLlrbTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F> IntoIterator for &'a StringLlrbTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    type Item = &'a str;
    type IntoIter = StringIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F> fmt::Debug for StringLlrbTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

//-----------------------------------------------------------------------------------------------//

/// A set of strings, implemented using a splay tree.
#[derive(Clone)]
pub struct StringSplayTree<F = fn(&str, &str) -> Ordering> {
    tree: SplayTree<CompactString, ByStr<F>>,
}

impl StringSplayTree {
    /// Constructor
    pub fn new() -> StringSplayTree {
        Self::new_by(str::cmp)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> StringSplayTree {
        Self::with_capacity_by(capacity, str::cmp)
    }
}

impl<F> StringSplayTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    /// Constructor, ordering strings with a custom function
    pub fn new_by(compare: F) -> StringSplayTree<F> {
        StringSplayTree {
            tree: SplayTree::with_comparator(ByStr(compare)),
        }
    }

    /// Constructor, ordering strings with a custom function
    pub fn with_capacity_by(capacity: usize, compare: F) -> StringSplayTree<F> {
        StringSplayTree {
            tree: SplayTree::with_capacity_and_comparator(capacity, ByStr(compare)),
        }
    }

    /// Get the number of strings in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any strings in the tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove all strings from the tree
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Reserves capacity for at least `additional` more strings
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }

    /// Fallible version of `reserve`
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        self.tree.try_reserve(additional)
    }

    /// Insert a string, returning `Ok(false)` if it is already present
    pub fn insert(&mut self, key: &str) -> Result<bool, Error> {
        self.tree.insert(CompactString::new(key))
    }

    /// Search for a string, splaying the tree on it
    pub fn search(&mut self, key: &str) -> Option<&str> {
        self.tree.search(&CompactString::new(key)).map(CompactString::as_str)
    }

    /// Check if a string is present, splaying the tree on it
    pub fn contains(&mut self, key: &str) -> bool {
        self.tree.contains(&CompactString::new(key))
    }

    /// Remove a string, handing back the stored copy
    pub fn remove(&mut self, key: &str) -> Option<CompactString> {
        self.tree.remove(&CompactString::new(key))
    }

    /// Get the first string in the tree, splaying it to the root
    pub fn first(&mut self) -> Option<&str> {
        self.tree.first().map(CompactString::as_str)
    }

    /// Get the last string in the tree, splaying it to the root
    pub fn last(&mut self) -> Option<&str> {
        self.tree.last().map(CompactString::as_str)
    }

    /// Remove the first string from the tree
    pub fn pop_first(&mut self) -> Option<CompactString> {
        self.tree.pop_first()
    }

    /// Remove the last string from the tree
    pub fn pop_last(&mut self) -> Option<CompactString> {
        self.tree.pop_last()
    }

    /// Get the string at the root of the tree
    pub fn root(&self) -> Option<&str> {
        self.tree.root().map(CompactString::as_str)
    }

    /// Iterate over the strings in ascending order
    pub fn iter(&self) -> StringIter<'_> {
        StringIter {
            iter: self.tree.iter(),
        }
    }

    /// Check that the strings are in order and the count is right
    pub fn verify(&self) -> Result<(), Violation> {
        self.tree.verify()
    }
}

impl Default for StringSplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F> IntoIterator for &'a StringSplayTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    type Item = &'a str;
    type IntoIter = StringIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F> fmt::Debug for StringSplayTree<F>
where
    F: Fn(&str, &str) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over the strings in a `StringLlrbTree` or `StringSplayTree`
#[derive(Clone)]
pub struct StringIter<'a> {
    iter: Iter<'a, CompactString>,
}

impl<'a> Iterator for StringIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.iter.next().map(CompactString::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for StringIter<'_> {}

impl FusedIterator for StringIter<'_> {}

//-----------------------------------------------------------------------------------------------//

#[test]
// A very simple test of a string red-black tree
fn test_string_0() {
    use alloc::vec::Vec;

    let mut tree = StringLlrbTree::new();

    debug_assert_eq!(tree.insert("Five"), Ok(true));
    debug_assert_eq!(tree.insert("One"), Ok(true));
    debug_assert_eq!(tree.insert("Nine"), Ok(true));
    debug_assert_eq!(tree.insert("One"), Ok(false));

    debug_assert_eq!(tree.search("Five"), Some("Five"));
    debug_assert_eq!(tree.search("Seven"), None);

    let v: Vec<&str> = tree.iter().collect();
    debug_assert_eq!(v, ["Five", "Nine", "One"]);

    debug_assert_eq!(tree.remove("Nine").as_deref(), Some("Nine"));
    debug_assert_eq!(tree.count(), 2);
    debug_assert_eq!(tree.verify(), Ok(()));
}

#[test]
// A very simple test of a string splay tree with a custom order
fn test_string_1() {
    use alloc::vec::Vec;

    let mut tree = StringSplayTree::new_by(|a: &str, b: &str| {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });

    for word in ["ccc", "a", "bb", "dddd", "a long string that will not be inlined"] {
        let _ = tree.insert(word);
    }

    debug_assert_eq!(tree.search("bb"), Some("bb"));
    debug_assert_eq!(tree.root(), Some("bb"));
    debug_assert_eq!(tree.first(), Some("a"));
    debug_assert_eq!(
        tree.pop_last().as_deref(),
        Some("a long string that will not be inlined")
    );

    let v: Vec<&str> = tree.iter().collect();
    debug_assert_eq!(v, ["a", "bb", "ccc", "dddd"]);
    debug_assert_eq!(tree.verify(), Ok(()));
}
