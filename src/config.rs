/// Centralized configuration constants for the world core.
///
/// Single source of truth for map dimensions and chunk layout shared by
/// terrain generation, the spatial index, and pathfinding.

/// Map configuration constants
pub mod map {
    /// Map dimensions: 512x512 tiles = 262,144 tiles total
    pub const WIDTH: i32 = 512;
    pub const HEIGHT: i32 = 512;
    pub const TOTAL_TILES: usize = (WIDTH * HEIGHT) as usize;

    /// Chunk settings: 32x32 tiles per chunk (power of 2)
    pub const CHUNK_SIZE: i32 = 32;
    pub const CHUNKS_WIDE: i32 = WIDTH / CHUNK_SIZE;
    pub const CHUNKS_TALL: i32 = HEIGHT / CHUNK_SIZE;
    pub const TOTAL_CHUNKS: usize = (CHUNKS_WIDE * CHUNKS_TALL) as usize;

    /// Check if tile coordinates are within map bounds
    #[inline]
    pub fn is_in_bounds(x: i32, y: i32) -> bool {
        x >= 0 && x < WIDTH && y >= 0 && y < HEIGHT
    }

    /// Convert tile coordinates to chunk coordinates
    #[inline]
    pub fn tile_to_chunk(x: i32, y: i32) -> (i32, i32) {
        (x / CHUNK_SIZE, y / CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::map;

    #[test]
    fn test_bounds_check() {
        assert!(map::is_in_bounds(0, 0));
        assert!(map::is_in_bounds(map::WIDTH - 1, map::HEIGHT - 1));
        assert!(!map::is_in_bounds(-1, 0));
        assert!(!map::is_in_bounds(map::WIDTH, 0));
    }

    #[test]
    fn test_tile_to_chunk() {
        assert_eq!(map::tile_to_chunk(0, 0), (0, 0));
        assert_eq!(map::tile_to_chunk(31, 31), (0, 0));
        assert_eq!(map::tile_to_chunk(32, 64), (1, 2));
    }
}
