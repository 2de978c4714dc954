use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered storage addressed by stable keys.
///
/// Positions shift when an entry is removed, keys never do.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
	entries: Vec<(K, V)>,
	index: HashMap<K, usize>,
}

impl<K, V> Default for Arena<K, V> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			index: HashMap::new(),
		}
	}
}

impl<K: Copy + Eq + Hash, V> Arena<K, V> {
	pub fn insert(&mut self, key: K, value: V) {
		if let Some(&position) = self.index.get(&key) {
			self.entries[position].1 = value;
			return;
		}
		self.index.insert(key, self.entries.len());
		self.entries.push((key, value));
	}

	pub fn remove(&mut self, key: K) -> Option<V> {
		let position = self.index.remove(&key)?;
		let (_, value) = self.entries.remove(position);
		for (key, _) in &self.entries[position..] {
			if let Some(slot) = self.index.get_mut(key) {
				*slot -= 1;
			}
		}
		Some(value)
	}

	pub fn get(&self, key: K) -> Option<&V> {
		self.index.get(&key).map(|&position| &self.entries[position].1)
	}

	pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
		let position = *self.index.get(&key)?;
		Some(&mut self.entries[position].1)
	}

	pub fn position(&self, key: K) -> Option<usize> {
		self.index.get(&key).copied()
	}

	pub fn contains(&self, key: K) -> bool {
		self.index.contains_key(&key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
		self.entries.iter().map(|(key, _)| *key)
	}

	pub fn values(&self) -> impl Iterator<Item = &V> {
		self.entries.iter().map(|(_, value)| value)
	}

	pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
		self.entries.iter_mut().map(|(_, value)| value)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		self.index.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::Arena;

	#[test]
	fn removal_keeps_order_and_reindexes() {
		let mut arena = Arena::default();
		for key in 0..4u32 {
			arena.insert(key, key * 10);
		}
		assert_eq!(arena.remove(1), Some(10));
		assert_eq!(arena.keys().collect::<Vec<_>>(), vec![0, 2, 3]);
		assert_eq!(arena.position(3), Some(2));
		assert_eq!(arena.get(2), Some(&20));
		assert_eq!(arena.remove(1), None);
	}
}
