use std::sync::OnceLock;

use keysplit_core::HostId;
use tracing::warn;

static PROCESS_HOST_ID: OnceLock<u64> = OnceLock::new();

/// Host identity derived from the machine hostname.
///
/// The identity is the CRC32 of the hostname, computed on first use and then
/// reused for the rest of the process lifetime. If the hostname cannot be
/// read, the identity is `0`, which pins the process to replica `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessHostId;

impl ProcessHostId {
    fn compute() -> u64 {
        match hostname::get() {
            Ok(name) => u64::from(crc32fast::hash(name.as_encoded_bytes())),
            Err(error) => {
                warn!(%error, "Unable to read hostname, using host id 0");
                0
            }
        }
    }
}

impl HostId for ProcessHostId {
    fn host_id(&self) -> u64 {
        *PROCESS_HOST_ID.get_or_init(Self::compute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_stable() {
        assert_eq!(ProcessHostId.host_id(), ProcessHostId.host_id());
    }
}
