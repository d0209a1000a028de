//! Hashing utilities.

/// Stable hash of a sorted run of point indices.
///
/// Used to bucket the open ridges of newly created hull faces: two ridges can only be
/// glued together when they carry the same vertex indices, and since face vertices are
/// kept sorted the hash only needs to be order-sensitive, not order-independent.
///
/// The hash is an FNV-based polynomial rolling hash finished with a 64-bit avalanche
/// step, so it is identical across runs and platforms.
///
/// # Examples
///
/// ```
/// use hyperhull::core::util::stable_hash_indices;
///
/// let ridge = [2_usize, 5, 9];
/// assert_eq!(stable_hash_indices(&ridge), stable_hash_indices(&[2, 5, 9]));
/// assert_ne!(stable_hash_indices(&ridge), stable_hash_indices(&[2, 5, 10]));
/// assert_eq!(stable_hash_indices(&[]), 0);
/// ```
#[must_use]
pub fn stable_hash_indices(sorted_indices: &[usize]) -> u64 {
    const HASH_PRIME: u64 = 1_099_511_628_211;
    const HASH_OFFSET: u64 = 14_695_981_039_346_656_037;

    if sorted_indices.is_empty() {
        return 0;
    }

    let mut hash = HASH_OFFSET;
    for &index in sorted_indices {
        hash = hash.wrapping_mul(HASH_PRIME).wrapping_add(index as u64);
    }

    // avalanche
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51_afd7_ed55_8ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    hash ^= hash >> 33;

    hash
}
