use bounded_integer::bounded_integer;

/// Smallest replica count a key-split route accepts.
pub const MIN_REPLICA_COUNT: u16 = 2;

/// Largest replica count a key-split route accepts.
pub const MAX_REPLICA_COUNT: u16 = 1000;

bounded_integer! {
    /// Number of replicas a key is split into (2-1000).
    #[repr(u16)]
    pub struct ReplicaCount { 2..=1000 }
}

/// Replica index the host `host_id` is pinned to, in `[0, replicas)`.
///
/// The mapping depends only on its inputs, so a process with a fixed identity
/// always targets the same replica.
///
/// # Panics
///
/// Panics if `replicas` is zero.
pub fn assigned_replica(host_id: u64, replicas: u64) -> u64 {
    host_id % replicas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_in_range_and_stable() {
        for replicas in 1..=64u64 {
            for host_id in [0u64, 1, 7, 1_000_003, u64::MAX] {
                let first = assigned_replica(host_id, replicas);
                assert!(first < replicas);
                assert_eq!(first, assigned_replica(host_id, replicas));
            }
        }
    }

    #[test]
    fn replica_count_bounds() {
        assert!(ReplicaCount::new(1).is_none());
        assert!(ReplicaCount::new(MIN_REPLICA_COUNT).is_some());
        assert!(ReplicaCount::new(MAX_REPLICA_COUNT).is_some());
        assert!(ReplicaCount::new(1001).is_none());
    }
}
