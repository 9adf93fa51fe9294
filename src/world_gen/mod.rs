pub mod generator;
pub mod noise;
pub mod rng;
pub mod tile;

pub use generator::{classify, WorldGenerator};
pub use noise::FieldSampler;
pub use rng::tile_rng;
pub use tile::{Tile, TileKind, VariantRegistry, VariantSlot, VARIANTS};
