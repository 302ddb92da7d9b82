use keysplit_core::Key;

/// Separator placed between the original key and the replica index.
pub const REPLICA_SEPARATOR: &str = "::";

/// Number of decimal digits needed to print `n`.
pub const fn decimal_digits(mut n: u64) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

/// Returns `true` if `key` can carry a replica suffix for any replica index
/// below `max_replicas` without exceeding `max_key_length`.
///
/// The budget is computed for the widest possible index, not for the index
/// actually assigned, so a key is either split for every replica or for none.
pub fn can_augment(key: &Key, max_replicas: u64, max_key_length: usize) -> bool {
    let suffix = REPLICA_SEPARATOR.len() + decimal_digits(max_replicas.saturating_sub(1));
    key.len() + suffix <= max_key_length
}

/// Physical key for `replica`.
///
/// Replica `0` keeps the original key; every other replica gets
/// `key + separator + replica`.
pub fn augment(key: &Key, replica: u64, separator: &str) -> Key {
    if replica == 0 {
        return key.clone();
    }
    let index = replica.to_string();
    key.concat(&[separator.as_bytes(), index.as_bytes()])
}

#[cfg(test)]
mod tests {
    use keysplit_core::MAX_KEY_LENGTH;

    use super::*;
    use crate::MAX_REPLICA_COUNT;

    #[test]
    fn digits() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(999), 3);
        assert_eq!(decimal_digits(u64::MAX), 20);
    }

    #[test]
    fn replica_zero_keeps_key() {
        let key = Key::from("foo");
        assert_eq!(augment(&key, 0, REPLICA_SEPARATOR), key);
    }

    #[test]
    fn other_replicas_get_suffix() {
        let key = Key::from("foo");
        assert_eq!(augment(&key, 2, REPLICA_SEPARATOR).as_bytes(), b"foo::2");
        assert_eq!(augment(&key, 999, REPLICA_SEPARATOR).as_bytes(), b"foo::999");
    }

    #[test]
    fn budget_uses_widest_index() {
        let max = u64::from(MAX_REPLICA_COUNT);
        // "::" plus three digits leaves 250 bytes for the key.
        let fits = Key::from("k".repeat(250));
        let too_long = Key::from("k".repeat(251));

        assert!(can_augment(&fits, max, MAX_KEY_LENGTH));
        assert!(!can_augment(&too_long, max, MAX_KEY_LENGTH));
        assert_eq!(augment(&fits, 999, REPLICA_SEPARATOR).len(), MAX_KEY_LENGTH);
    }

    #[test]
    fn budget_for_small_replica_counts() {
        // Four replicas need a single digit.
        assert!(can_augment(&Key::from("k".repeat(252)), 4, MAX_KEY_LENGTH));
        assert!(!can_augment(&Key::from("k".repeat(253)), 4, MAX_KEY_LENGTH));
    }
}
