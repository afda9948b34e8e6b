use thiserror::Error;

/// Failures while constructing the map or its inputs.
///
/// Edits never fail: invalid edits are ignored. Broken internal invariants
/// panic instead of surfacing here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexMapError {
    #[error("grid needs at least one chunk in each axis, got {chunk_count_x}x{chunk_count_z}")]
    EmptyGrid {
        chunk_count_x: usize,
        chunk_count_z: usize,
    },
    #[error("noise field of size {size} needs {expected} samples, got {actual}")]
    NoiseFieldSize {
        size: usize,
        expected: usize,
        actual: usize,
    },
}
