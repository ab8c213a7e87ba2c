use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash table with a bucket count fixed at construction.
///
/// The expected number of entities is known from the dump size, so the
/// table never resizes. Each bucket is a short chain scanned linearly.
/// Iteration goes bucket by bucket, and within a bucket in insertion
/// order; it is not sorted and changes with the bucket count.
#[derive(Debug)]
pub struct Store<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);
        Store {
            buckets,
            len: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    // `DefaultHasher::new` uses fixed keys, so the layout is the same on every run.
    // The reduction is done on the unsigned hash, it is always in range.
    fn bucket_of(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    /// Returns the entity stored under `key`, `factory` is called only if there is none yet.
    pub fn insert_or_get<F>(&mut self, key: &K, factory: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];
        match bucket.iter().position(|(k, _)| k == key) {
            Some(position) => &mut bucket[position].1,
            None => {
                let position = bucket.len();
                bucket.push((key.clone(), factory()));
                self.len += 1;
                &mut bucket[position].1
            },
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    pub fn to_ordered_list(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }
}
