//! Insert-only two-way table.
//!
//! `Bijection` keeps a forward and a backward map behind one API so that
//! every pair is present in both or in neither.

use std::collections::HashMap;
use std::hash::Hash;

/// Which side of a rejected insert was already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Left,
    Right,
}

/// A one-to-one relation between `L` and `R` values.
#[derive(Debug, Clone)]
pub struct Bijection<L, R> {
    forward: HashMap<L, R>,
    backward: HashMap<R, L>,
}

impl<L, R> Default for Bijection<L, R> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<L, R> Bijection<L, R>
where
    L: Eq + Hash + Clone,
    R: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the pair if neither side is present yet.
    ///
    /// The right side is checked first, so a pair whose two halves are both
    /// taken reports `Collision::Right`. Nothing is written on failure.
    pub fn try_insert(&mut self, left: L, right: R) -> Result<(), Collision> {
        if self.backward.contains_key(&right) {
            return Err(Collision::Right);
        }
        if self.forward.contains_key(&left) {
            return Err(Collision::Left);
        }
        self.forward.insert(left.clone(), right.clone());
        self.backward.insert(right, left);
        Ok(())
    }

    pub fn get_by_left<Q>(&self, left: &Q) -> Option<&R>
    where
        L: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.forward.get(left)
    }

    pub fn get_by_right<Q>(&self, right: &Q) -> Option<&L>
    where
        R: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.backward.get(right)
    }

    pub fn contains_left<Q>(&self, left: &Q) -> bool
    where
        L: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.forward.contains_key(left)
    }

    pub fn contains_right<Q>(&self, right: &Q) -> bool
    where
        R: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.backward.contains_key(right)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, &R)> {
        self.forward.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup_both_ways() {
        let mut b = Bijection::new();
        b.try_insert("a".to_string(), 1).unwrap();
        b.try_insert("b".to_string(), 2).unwrap();

        assert_eq!(b.get_by_left("a"), Some(&1));
        assert_eq!(b.get_by_right(&2), Some(&"b".to_string()));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn rejects_reused_left() {
        let mut b = Bijection::new();
        b.try_insert("a", 1).unwrap();
        assert_eq!(b.try_insert("a", 2), Err(Collision::Left));
        assert!(!b.contains_right(&2));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn rejects_reused_right() {
        let mut b = Bijection::new();
        b.try_insert("a", 1).unwrap();
        assert_eq!(b.try_insert("b", 1), Err(Collision::Right));
        assert!(!b.contains_left("b"));
        assert_eq!(b.get_by_right(&1), Some(&"a"));
    }

    #[test]
    fn both_taken_reports_right() {
        let mut b = Bijection::new();
        b.try_insert("a", 1).unwrap();
        b.try_insert("b", 2).unwrap();
        assert_eq!(b.try_insert("a", 2), Err(Collision::Right));
    }

    #[test]
    fn empty_table() {
        let b: Bijection<String, u32> = Bijection::new();
        assert!(b.is_empty());
        assert_eq!(b.iter().count(), 0);
    }
}
