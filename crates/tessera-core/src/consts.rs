/// Minimum element count of a tile to use element-level Rayon parallelism
/// inside the CPU kernel.
pub const PARALLEL_ELEMENT_THRESHOLD: usize = 65_536;

/// Minimum chunk count to dispatch chunks to the Rayon pool instead of
/// processing them in order on the calling thread.
pub const PARALLEL_CHUNK_THRESHOLD: usize = 2;

/// Fractional origin remainder above which the output window is shifted by
/// one element. Remainders of exactly one half round down.
pub const ORIGIN_ROUNDING_THRESHOLD: f64 = 0.5;

/// Upper bound of the percentile selector.
pub const MAX_PERCENTILE: f64 = 100.0;

/// Default chunk extent used by the CLI when no chunk shape is configured.
pub const DEFAULT_CHUNK_EXTENT: usize = 256;
