use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};

/// Layered noise sampler for procedural world generation.
///
/// Produces the three scalar fields that drive terrain classification:
/// height, moisture, and urban density, each normalized to [0, 1].
pub struct FieldSampler {
    continents: FastNoiseLite,
    erosion: FastNoiseLite,
    peaks: FastNoiseLite,
    moisture: FastNoiseLite,
    urban: FastNoiseLite,
}

impl FieldSampler {
    /// Create a new sampler with the given world seed
    pub fn new(seed: i32) -> Self {
        // Continental-scale noise (large landmasses)
        let mut continents = FastNoiseLite::with_seed(seed);
        continents.set_noise_type(Some(NoiseType::OpenSimplex2));
        continents.set_fractal_type(Some(FractalType::FBm));
        continents.set_fractal_octaves(Some(4));
        continents.set_fractal_lacunarity(Some(2.0));
        continents.set_fractal_gain(Some(0.5));
        continents.set_frequency(Some(0.002));

        // Erosion noise (coastal detail)
        let mut erosion = FastNoiseLite::with_seed(seed + 1);
        erosion.set_noise_type(Some(NoiseType::OpenSimplex2));
        erosion.set_fractal_type(Some(FractalType::FBm));
        erosion.set_fractal_octaves(Some(3));
        erosion.set_frequency(Some(0.008));

        // Peaks and ridges (mountain bands)
        let mut peaks = FastNoiseLite::with_seed(seed + 2);
        peaks.set_noise_type(Some(NoiseType::OpenSimplex2));
        peaks.set_fractal_type(Some(FractalType::Ridged));
        peaks.set_fractal_octaves(Some(5));
        peaks.set_frequency(Some(0.02));

        // Moisture (wetland, grassland, and forest banding)
        let mut moisture = FastNoiseLite::with_seed(seed + 3);
        moisture.set_noise_type(Some(NoiseType::OpenSimplex2));
        moisture.set_fractal_type(Some(FractalType::FBm));
        moisture.set_fractal_octaves(Some(3));
        moisture.set_frequency(Some(0.01));

        // Urban density (district-scale gradient around city cores)
        let mut urban = FastNoiseLite::with_seed(seed + 4);
        urban.set_noise_type(Some(NoiseType::OpenSimplex2));
        urban.set_fractal_type(Some(FractalType::FBm));
        urban.set_fractal_octaves(Some(2));
        urban.set_frequency(Some(0.004));

        Self {
            continents,
            erosion,
            peaks,
            moisture,
            urban,
        }
    }

    /// Normalize a raw noise sample from [-1, 1] to [0, 1]
    #[inline]
    fn normalize(sample: f32) -> f32 {
        ((sample + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Height field at tile coordinates (0.0 = deep water, 1.0 = peak)
    ///
    /// Continental noise is the primary shape; erosion and peaks add detail.
    pub fn height(&self, x: f32, y: f32) -> f32 {
        let base = self.continents.get_noise_2d(x, y) * 0.7;
        let detail = self.erosion.get_noise_2d(x, y) * 0.2 + self.peaks.get_noise_2d(x, y) * 0.1;
        Self::normalize((base + detail).clamp(-1.0, 1.0))
    }

    /// Moisture field at tile coordinates, in [0, 1]
    pub fn moisture(&self, x: f32, y: f32) -> f32 {
        Self::normalize(self.moisture.get_noise_2d(x, y))
    }

    /// Urban density field at tile coordinates, in [0, 1]
    pub fn urban_density(&self, x: f32, y: f32) -> f32 {
        Self::normalize(self.urban.get_noise_2d(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_determinism() {
        let gen1 = FieldSampler::new(12345);
        let gen2 = FieldSampler::new(12345);

        let x = 100.5;
        let y = 200.7;

        assert_eq!(gen1.height(x, y), gen2.height(x, y));
        assert_eq!(gen1.moisture(x, y), gen2.moisture(x, y));
        assert_eq!(gen1.urban_density(x, y), gen2.urban_density(x, y));
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let gen1 = FieldSampler::new(12345);
        let gen2 = FieldSampler::new(54321);

        let x = 100.5;
        let y = 200.7;

        assert_ne!(gen1.height(x, y), gen2.height(x, y));
    }

    #[test]
    fn test_fields_in_range() {
        let gen = FieldSampler::new(12345);

        for x in 0..100 {
            for y in 0..100 {
                let h = gen.height(x as f32, y as f32);
                let m = gen.moisture(x as f32, y as f32);
                let u = gen.urban_density(x as f32, y as f32);
                assert!((0.0..=1.0).contains(&h));
                assert!((0.0..=1.0).contains(&m));
                assert!((0.0..=1.0).contains(&u));
            }
        }
    }
}
