use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rand::Rng;

use super::noise::FieldSampler;
use super::rng::tile_rng;
use super::tile::{Tile, TileKind, VARIANTS};
use crate::config::map as map_config;

/// Thread-safe cache of field samplers by seed
static NOISE_CACHE: Lazy<RwLock<HashMap<i32, Arc<FieldSampler>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

// Classification thresholds. The bands overlap conceptually; rules are
// resolved by first match, so the ordering in classify() is load-bearing.
const SEA_LEVEL: f32 = 0.38;
const COAST_MAX: f32 = 0.42;
const MOUNTAIN_MIN: f32 = 0.8;
const URBAN_DENSE: f32 = 0.8;
const URBAN_SUBURBAN: f32 = 0.5;
const URBAN_BUILT: f32 = 0.7;
const MOISTURE_DRY: f32 = 0.2;
const MOISTURE_WET: f32 = 0.6;

/// Classify a tile from its scalar fields.
///
/// Pure except for the weighted sub-type draws in the dense-urban,
/// suburban, and built-over mountain bands; callers thread a per-tile RNG
/// stream through so those draws stay reproducible.
pub fn classify(height: f32, moisture: f32, urban_density: f32, rng: &mut impl Rng) -> TileKind {
    if height < SEA_LEVEL {
        return TileKind::Water;
    }

    // Coastal band
    if height < COAST_MAX {
        if urban_density > URBAN_BUILT {
            return TileKind::Concrete;
        }
        return if moisture > MOISTURE_WET {
            TileKind::Wetland
        } else {
            TileKind::Sand
        };
    }

    // Main band, branching on urban density
    if height < MOUNTAIN_MIN {
        if urban_density > URBAN_DENSE {
            let roll: f32 = rng.random();
            return if roll < 0.4 {
                TileKind::Concrete
            } else if roll < 0.7 {
                TileKind::Asphalt
            } else if roll < 0.8 {
                TileKind::Metal
            } else if roll < 0.9 {
                TileKind::Tiles
            } else {
                TileKind::Solar
            };
        }

        if urban_density > URBAN_SUBURBAN {
            let roll: f32 = rng.random();
            return if roll < 0.4 {
                TileKind::Garden
            } else if roll < 0.7 {
                TileKind::Grass
            } else {
                TileKind::Concrete
            };
        }

        return if moisture < MOISTURE_DRY {
            TileKind::Dirt
        } else if moisture > MOISTURE_WET {
            TileKind::Forest
        } else {
            TileKind::Grass
        };
    }

    // Mountain band
    if urban_density > URBAN_BUILT {
        if rng.random::<f32>() < 0.7 {
            TileKind::Metal
        } else {
            TileKind::Concrete
        }
    } else {
        TileKind::Mountain
    }
}

/// Deterministic world generator for a single seed.
///
/// Field samplers are shared through a per-seed cache, so any number of
/// generators (and worker threads) for the same world reuse one sampler.
pub struct WorldGenerator {
    seed: i32,
    sampler: Arc<FieldSampler>,
}

impl WorldGenerator {
    /// Create a generator for the given world seed
    pub fn new(seed: i32) -> Self {
        let cached = NOISE_CACHE.read().get(&seed).cloned();
        let sampler = match cached {
            Some(sampler) => sampler,
            None => {
                let mut cache = NOISE_CACHE.write();
                cache
                    .entry(seed)
                    .or_insert_with(|| Arc::new(FieldSampler::new(seed)))
                    .clone()
            }
        };

        Self { seed, sampler }
    }

    /// The world seed this generator was built for
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Build the tile at a coordinate from explicit field values.
    ///
    /// Repeated calls with the same inputs produce identical tiles,
    /// including the weighted sub-type and variant draws.
    pub fn generate_tile(
        &self,
        x: i32,
        y: i32,
        height: f32,
        moisture: f32,
        urban_density: f32,
    ) -> Tile {
        let mut rng = tile_rng(self.seed, x, y);
        let kind = classify(height, moisture, urban_density, &mut rng);
        let variant = VARIANTS.variant_for(kind, &mut rng);

        Tile {
            id: Tile::id_for(x, y),
            x,
            y,
            kind,
            height,
            moisture,
            variant,
        }
    }

    /// Sample the noise fields at a coordinate and build its tile
    pub fn generate_tile_at(&self, x: i32, y: i32) -> Tile {
        let fx = x as f32;
        let fy = y as f32;
        self.generate_tile(
            x,
            y,
            self.sampler.height(fx, fy),
            self.sampler.moisture(fx, fy),
            self.sampler.urban_density(fx, fy),
        )
    }

    /// Generate a full chunk of tiles in row-major order
    pub fn generate_chunk(&self, chunk_x: i32, chunk_y: i32) -> Vec<Tile> {
        let size = map_config::CHUNK_SIZE;
        let base_x = chunk_x * size;
        let base_y = chunk_y * size;

        let mut tiles = Vec::with_capacity((size * size) as usize);
        for ty in 0..size {
            for tx in 0..size {
                tiles.push(self.generate_tile_at(base_x + tx, base_y + ty));
            }
        }
        tiles
    }

    /// Derive the walkability bitmap consumed by the pathfinding worker,
    /// row-major over a width x height region anchored at the origin
    pub fn walkability_map(&self, width: i32, height: i32) -> Vec<bool> {
        let mut map = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                map.push(self.generate_tile_at(x, y).kind.is_walkable());
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        let generator = WorldGenerator::new(7);

        assert_eq!(generator.generate_tile(0, 0, 0.37, 0.5, 0.0).kind, TileKind::Water);
        assert_eq!(generator.generate_tile(0, 0, 0.38, 0.7, 0.0).kind, TileKind::Wetland);
        assert_eq!(generator.generate_tile(0, 0, 0.38, 0.3, 0.0).kind, TileKind::Sand);
        assert_eq!(generator.generate_tile(0, 0, 0.9, 0.0, 0.0).kind, TileKind::Mountain);
    }

    #[test]
    fn test_coastal_build_over() {
        let generator = WorldGenerator::new(7);

        let tile = generator.generate_tile(5, 5, 0.4, 0.9, 0.71);
        assert_eq!(tile.kind, TileKind::Concrete);
    }

    #[test]
    fn test_rural_moisture_bands() {
        let generator = WorldGenerator::new(7);

        assert_eq!(generator.generate_tile(0, 0, 0.5, 0.1, 0.0).kind, TileKind::Dirt);
        assert_eq!(generator.generate_tile(0, 0, 0.5, 0.4, 0.0).kind, TileKind::Grass);
        assert_eq!(generator.generate_tile(0, 0, 0.5, 0.7, 0.0).kind, TileKind::Forest);
    }

    #[test]
    fn test_dense_urban_draws_from_built_set() {
        let generator = WorldGenerator::new(7);

        for x in 0..32 {
            let kind = generator.generate_tile(x, 0, 0.6, 0.5, 0.9).kind;
            assert!(matches!(
                kind,
                TileKind::Concrete
                    | TileKind::Asphalt
                    | TileKind::Metal
                    | TileKind::Tiles
                    | TileKind::Solar
            ));
        }
    }

    #[test]
    fn test_built_mountain_draws_metal_or_concrete() {
        let generator = WorldGenerator::new(7);

        for x in 0..32 {
            let kind = generator.generate_tile(x, 9, 0.85, 0.5, 0.75).kind;
            assert!(matches!(kind, TileKind::Metal | TileKind::Concrete));
        }
    }

    #[test]
    fn test_weighted_draws_are_reproducible() {
        let generator = WorldGenerator::new(99);

        let first = generator.generate_tile(12, 34, 0.6, 0.5, 0.9);
        let second = generator.generate_tile(12, 34, 0.6, 0.5, 0.9);

        assert_eq!(first, second);
    }

    #[test]
    fn test_tile_id_format() {
        let generator = WorldGenerator::new(7);

        let tile = generator.generate_tile_at(14, 92);
        assert_eq!(tile.id, "tile_14_92");
    }

    #[test]
    fn test_chunk_generation_determinism() {
        let gen1 = WorldGenerator::new(12345);
        let gen2 = WorldGenerator::new(12345);

        let chunk1 = gen1.generate_chunk(0, 0);
        let chunk2 = gen2.generate_chunk(0, 0);

        assert_eq!(chunk1, chunk2);
        assert_eq!(chunk1.len(), (map_config::CHUNK_SIZE * map_config::CHUNK_SIZE) as usize);
    }

    #[test]
    fn test_different_chunks_are_different() {
        let generator = WorldGenerator::new(12345);

        assert_ne!(generator.generate_chunk(0, 0), generator.generate_chunk(1, 0));
    }

    #[test]
    fn test_walkability_map_matches_tiles() {
        let generator = WorldGenerator::new(12345);

        let map = generator.walkability_map(16, 16);
        assert_eq!(map.len(), 256);

        for y in 0..16 {
            for x in 0..16 {
                let tile = generator.generate_tile_at(x, y);
                assert_eq!(map[(y * 16 + x) as usize], tile.kind.is_walkable());
            }
        }
    }
}
