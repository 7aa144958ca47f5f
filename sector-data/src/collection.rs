use fnv::FnvBuildHasher;
use indexmap::IndexMap;

/// 使用 FNV 哈希、保持插入顺序的 [`IndexMap`]。
///
/// 用于 `Symbol -> T` 映射：调用方提供的代码顺序即输出顺序。
pub type FnvIndexMap<K, V> = IndexMap<K, V, FnvBuildHasher>;
