use std::collections::HashMap;
use std::hash::Hash;
use std::slice::{Iter, IterMut};

/// A map that remembers insertion order.
/// Values live in a Vec in the order their keys were first seen,
/// key lookups go through the associated HashMap of positions.
/// Entries are never removed.
pub struct OrderedMap<K, V>
where
    K: Eq + Hash,
{
    values: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            values: Vec::default(),
            index: HashMap::default(),
        }
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.values[i])
    }

    /// Returns the value for `key`, appending `create()` first if the key is new
    pub fn get_or_insert_with<F>(&mut self, key: K, create: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let position = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                self.values.push(create());
                let i = self.values.len() - 1;
                self.index.insert(key, i);
                i
            }
        };
        &mut self.values[position]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, V> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        self.values.iter_mut()
    }

    /// Values in insertion order
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order() {
        let mut map = OrderedMap::new();
        *map.get_or_insert_with("c", || 0) += 3;
        *map.get_or_insert_with("a", || 0) += 1;
        *map.get_or_insert_with("c", || 100) += 3;
        *map.get_or_insert_with("b", || 0) += 2;

        assert_eq!(map.len(), 3);
        assert_eq!(map.as_slice(), &[6, 1, 2]);
        assert_eq!(map.get(&"c"), Some(&6));
        assert_eq!(map.get(&"z"), None);
    }

    #[test]
    fn iter_mut_touches_everything() {
        let mut map = OrderedMap::new();
        map.get_or_insert_with(1, || 1.0);
        map.get_or_insert_with(2, || 2.0);
        map.iter_mut().for_each(|v| *v += 0.5);
        assert_eq!(map.iter().copied().collect::<Vec<_>>(), vec![1.5, 2.5]);
    }
}
