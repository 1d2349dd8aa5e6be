/// Largest valid extent of either world axis (world units).
pub const MAX_WORLD_EXTENT: f64 = 16_384.0;

/// Largest supported population. Caps the n×n displacement and distance matrices.
pub const MAX_POPULATION: usize = 4_096;

/// Absolute tolerance used when comparing coordinates that went through wrapping arithmetic.
pub const GEOMETRY_TOLERANCE: f64 = 1.0e-9;
