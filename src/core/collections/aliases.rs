use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use slotmap::SlotMap;
use smallvec::SmallVec;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Arena used for hull faces.
///
/// Keys carry a generation counter, so a key that outlives its face (because the
/// face was recycled and the slot reused) is detected instead of silently aliasing
/// the new occupant.
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::collections::StorageMap;
/// use slotmap::DefaultKey;
///
/// let mut map: StorageMap<DefaultKey, u32> = StorageMap::with_key();
/// let key = map.insert(7);
/// map.remove(key);
/// let reused = map.insert(8);
/// assert!(map.get(key).is_none());
/// assert_eq!(map[reused], 8);
/// ```
pub type StorageMap<K, V> = SlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` type for performance-critical operations.
/// Uses `rustc_hash::FxHasher` for faster hashing in non-cryptographic contexts.
///
/// # Security Warning
///
/// ⚠️ **Not DoS-resistant**: Do not use with attacker-controlled keys.
///
/// # Examples
///
/// ```rust
/// use hyperhull::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Optimized `HashSet` type, see [`FastHashMap`].
pub type FastHashSet<T> = FxHashSet<T>;

/// Build hasher for the `FxHasher`-backed collections.
pub type FastBuildHasher = FxBuildHasher;

/// Small-optimized Vec that uses stack allocation for small collections.
///
/// # Size Guidelines
///
/// - **N=2**: Connectors sharing one hash bucket
/// - **N=8**: Per-face vertex, adjacency and normal storage
/// - **N=9**: Simplex vertices and simplex point slices
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS AND TYPE ALIASES
// =============================================================================

/// Semantic constant for the maximum practical dimension in computational geometry.
///
/// Faces of hulls up to 8D keep their vertices, neighbors and normals inline.
pub const MAX_PRACTICAL_DIMENSION_SIZE: usize = 8;

/// Vertex indices of a single face (`dimension` entries).
pub type FaceVertexBuffer = SmallBuffer<usize, MAX_PRACTICAL_DIMENSION_SIZE>;

/// Coefficients of a face normal (`dimension` entries).
pub type NormalBuffer = SmallBuffer<f64, MAX_PRACTICAL_DIMENSION_SIZE>;
