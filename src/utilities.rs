use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Hashes a key salted with a layer so that keys colliding on every bit of
/// one layer get fresh bits at the next.
pub fn hash_key(key: &(impl Hash + ?Sized), layer: usize) -> u64 {
    let mut hasher = DefaultHasher::new();

    key.hash(&mut hasher);
    layer.hash(&mut hasher);

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_deterministically() {
        assert_eq!(hash_key(&42, 0), hash_key(&42, 0));
        assert_eq!(hash_key("foo", 1), hash_key(&"foo".to_string(), 1));
    }

    #[test]
    fn hash_with_layers() {
        assert_ne!(hash_key(&42, 0), hash_key(&42, 1));
    }
}
