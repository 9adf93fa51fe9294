use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Discrete tile classifications produced by the terrain generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Water,
    Sand,
    Wetland,
    Concrete,
    Asphalt,
    Metal,
    Tiles,
    Solar,
    Garden,
    Grass,
    Dirt,
    Forest,
    Mountain,
}

impl TileKind {
    /// Stable name used by renderers and persistence
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Water => "water",
            TileKind::Sand => "sand",
            TileKind::Wetland => "wetland",
            TileKind::Concrete => "concrete",
            TileKind::Asphalt => "asphalt",
            TileKind::Metal => "metal",
            TileKind::Tiles => "tiles",
            TileKind::Solar => "solar",
            TileKind::Garden => "garden",
            TileKind::Grass => "grass",
            TileKind::Dirt => "dirt",
            TileKind::Forest => "forest",
            TileKind::Mountain => "mountain",
        }
    }

    /// Whether ground units can traverse this tile
    pub fn is_walkable(&self) -> bool {
        !matches!(self, TileKind::Water | TileKind::Mountain)
    }
}

/// A single generated world tile.
///
/// Immutable per generation: regenerating a coordinate produces a fresh
/// record, never an in-place mutation. The `id` is stable per coordinate
/// and doubles as the persistence key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub kind: TileKind,
    pub height: f32,
    pub moisture: f32,
    pub variant: u8,
}

impl Tile {
    /// Stable tile id for a coordinate
    pub fn id_for(x: i32, y: i32) -> String {
        format!("tile_{}_{}", x, y)
    }
}

/// Variant table for a tile kind: the atlas base index plus how many art
/// variants the atlas carries for it
#[derive(Debug, Clone, Copy)]
pub struct VariantSlot {
    pub atlas_base: u16,
    pub count: u8,
}

/// Registry mapping tile kinds to their cosmetic variants.
///
/// Variant ids are offsets into the kind's atlas slot; the atlas layout
/// lives in terrain_atlas_metadata.json on the rendering side.
pub struct VariantRegistry {
    slots: HashMap<TileKind, VariantSlot>,
}

impl VariantRegistry {
    /// Registry matching the standard terrain atlas layout
    pub fn standard() -> Self {
        let mut slots = HashMap::new();
        let mut base = 0u16;
        for (kind, count) in [
            (TileKind::Water, 4u8),
            (TileKind::Sand, 3),
            (TileKind::Wetland, 2),
            (TileKind::Concrete, 4),
            (TileKind::Asphalt, 3),
            (TileKind::Metal, 2),
            (TileKind::Tiles, 2),
            (TileKind::Solar, 1),
            (TileKind::Garden, 3),
            (TileKind::Grass, 4),
            (TileKind::Dirt, 3),
            (TileKind::Forest, 4),
            (TileKind::Mountain, 2),
        ] {
            slots.insert(kind, VariantSlot { atlas_base: base, count });
            base += count as u16;
        }
        Self { slots }
    }

    /// Variant table for a kind; kinds missing from the registry fall back
    /// to a single variant at atlas index 0
    pub fn slot(&self, kind: TileKind) -> VariantSlot {
        self.slots
            .get(&kind)
            .copied()
            .unwrap_or(VariantSlot { atlas_base: 0, count: 1 })
    }

    /// Draw a cosmetic variant for a kind
    pub fn variant_for(&self, kind: TileKind, rng: &mut impl Rng) -> u8 {
        let slot = self.slot(kind);
        if slot.count <= 1 {
            0
        } else {
            rng.random_range(0..slot.count)
        }
    }

    /// Atlas index for a kind/variant pair
    pub fn atlas_index(&self, kind: TileKind, variant: u8) -> u16 {
        let slot = self.slot(kind);
        slot.atlas_base + variant.min(slot.count.saturating_sub(1)) as u16
    }
}

/// Shared registry for the standard atlas
pub static VARIANTS: Lazy<VariantRegistry> = Lazy::new(VariantRegistry::standard);
