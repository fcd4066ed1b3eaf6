//! Equality classes of value tuples
//!
//! Tuples whose every element has a discriminant are bucketed through a
//! hash map. Any other tuple is compared against the other such classes one
//! by one. A discriminable tuple can never equal one that is not, so the two
//! pools never need to be cross-checked.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::value::{Discriminant, Value};

/// How the classes of a partition were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Every key was bucketed by its hashable discriminant
    Hashed,
    /// At least one key had to be matched by pairwise equality
    EqualityFallback,
}

#[derive(Debug, Default)]
pub(crate) struct Classifier {
    classes: Vec<Vec<Value>>,
    hashed: HashMap<Vec<Discriminant>, usize>,
    linear: Vec<usize>,
}

fn discriminants(key: &[Value]) -> Option<Vec<Discriminant>> {
    key.iter().map(Value::discriminant).collect()
}

impl Classifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Class id of `key`, opening a new class on first sight
    ///
    /// Ids are dense and assigned in first-seen order.
    pub(crate) fn classify(&mut self, key: &[Value]) -> usize {
        match discriminants(key) {
            Some(disc) => match self.hashed.entry(disc) {
                Entry::Occupied(e) => *e.get(),
                Entry::Vacant(e) => {
                    let id = self.classes.len();
                    self.classes.push(key.to_vec());
                    e.insert(id);
                    id
                }
            },
            None => {
                if let Some(id) = self.find_linear(key) {
                    return id;
                }
                let id = self.classes.len();
                self.classes.push(key.to_vec());
                self.linear.push(id);
                id
            }
        }
    }

    /// Class id of `key` if it has been seen
    pub(crate) fn find(&self, key: &[Value]) -> Option<usize> {
        match discriminants(key) {
            Some(disc) => self.hashed.get(&disc).copied(),
            None => self.find_linear(key),
        }
    }

    fn find_linear(&self, key: &[Value]) -> Option<usize> {
        self.linear
            .iter()
            .copied()
            .find(|&id| self.classes[id].as_slice() == key)
    }

    pub(crate) fn len(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn strategy(&self) -> KeyStrategy {
        if self.linear.is_empty() {
            KeyStrategy::Hashed
        } else {
            KeyStrategy::EqualityFallback
        }
    }

    /// Representative key of every class, in id order
    pub(crate) fn into_classes(self) -> Vec<Vec<Value>> {
        self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    #[test]
    fn test_hashed_classes_in_first_seen_order() {
        let mut classifier = Classifier::new();
        let ids: Vec<usize> = values![3, 1, 3, 2, 1.0]
            .iter()
            .map(|v| classifier.classify(std::slice::from_ref(v)))
            .collect();
        assert_eq!(ids, vec![0, 1, 0, 2, 1]);
        assert_eq!(classifier.strategy(), KeyStrategy::Hashed);
        assert_eq!(classifier.len(), 3);
    }

    #[test]
    fn test_unhashable_values_fall_back_to_equality() {
        let mut classifier = Classifier::new();
        let a = Value::List(values![1, 2]);
        let b = Value::List(values![1, 2]);
        let c = Value::List(values![2]);
        assert_eq!(classifier.classify(&[a]), 0);
        assert_eq!(classifier.classify(&[Value::Int(1)]), 1);
        assert_eq!(classifier.classify(&[b.clone()]), 0);
        assert_eq!(classifier.classify(&[c]), 2);
        assert_eq!(classifier.strategy(), KeyStrategy::EqualityFallback);
        assert_eq!(classifier.find(&[b]), Some(0));
        assert_eq!(classifier.find(&[Value::Int(7)]), None);
    }

    #[test]
    fn test_nan_never_matches() {
        let mut classifier = Classifier::new();
        let nan = Value::Float(f64::NAN);
        assert_eq!(classifier.classify(&[nan.clone()]), 0);
        assert_eq!(classifier.classify(&[nan]), 1);
    }
}
