use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Per-tile deterministic RNG streams.
///
/// The weighted classification branches draw from a stream keyed by
/// (world seed, x, y), so a coordinate always rolls the same sub-type and
/// variant for a given seed. This is what keeps save/reload and re-render
/// passes from flickering tiles between runs.

/// splitmix64 finalizer used to mix the key into a stream seed
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Build the RNG stream for a single tile
pub fn tile_rng(seed: i32, x: i32, y: i32) -> ChaCha8Rng {
    let mut key = splitmix64(seed as u32 as u64);
    key = splitmix64(key ^ (x as u32 as u64));
    key = splitmix64(key ^ (y as u32 as u64));
    ChaCha8Rng::seed_from_u64(key)
}
