use darkship_core::Position;
use rand::Rng;
use serde::Deserialize;

const POSITION_DECIMALS: i32 = 6;
const INCREMENT_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DriftSettings {
    /// Upper bound of the offset applied to each seeded position, in degrees.
    #[serde(default = "default_seed_offset")]
    pub seed_offset: f64,
    #[serde(default = "default_min_increment")]
    pub min_increment: f64,
    #[serde(default = "default_max_increment")]
    pub max_increment: f64,
}

/// Moves every vessel a small step north-east per frame.
#[derive(Debug, Clone, Copy)]
pub struct DriftModel {
    settings: DriftSettings,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            seed_offset: default_seed_offset(),
            min_increment: default_min_increment(),
            max_increment: default_max_increment(),
        }
    }
}

impl DriftSettings {
    pub fn is_valid(&self) -> bool {
        self.seed_offset >= 0.0
            && self.seed_offset.is_finite()
            && self.min_increment >= 0.0
            && self.min_increment <= self.max_increment
            && self.max_increment.is_finite()
    }
}

impl DriftModel {
    pub fn new(settings: DriftSettings) -> Self {
        Self { settings }
    }

    pub fn seed_positions<R: Rng + ?Sized>(
        &self,
        origin: Position,
        count: usize,
        rng: &mut R,
    ) -> Vec<Position> {
        (0..count).map(|_| self.seed_position(origin, rng)).collect()
    }

    pub fn seed_position<R: Rng + ?Sized>(&self, origin: Position, rng: &mut R) -> Position {
        let lat_offset = rng.random_range(0.0..=self.settings.seed_offset);
        let lon_offset = rng.random_range(0.0..=self.settings.seed_offset);

        Position::new(
            round_to(origin.latitude + lat_offset, POSITION_DECIMALS),
            round_to(origin.longitude + lon_offset, POSITION_DECIMALS),
        )
    }

    pub fn advance<R: Rng + ?Sized>(&self, position: Position, rng: &mut R) -> Position {
        let lat_increment = self.increment(rng);
        let lon_increment = self.increment(rng);

        Position::new(
            round_to(position.latitude + lat_increment, POSITION_DECIMALS),
            round_to(position.longitude + lon_increment, POSITION_DECIMALS),
        )
    }

    fn increment<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        round_to(
            rng.random_range(self.settings.min_increment..=self.settings.max_increment),
            INCREMENT_DECIMALS,
        )
    }
}

/// Random base coordinate anywhere on the globe.
pub fn random_origin<R: Rng + ?Sized>(rng: &mut R) -> Position {
    Position::new(rng.random_range(-90.0..=90.0), rng.random_range(-180.0..=180.0))
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn default_seed_offset() -> f64 {
    0.0001
}

fn default_min_increment() -> f64 {
    0.0001
}

fn default_max_increment() -> f64 {
    0.0005
}
