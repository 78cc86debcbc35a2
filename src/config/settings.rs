use crate::domain::models::RatingTrack;

/// One K-factor tier: applies to ratings at or above `min_rating`.
#[derive(Debug, Clone)]
pub struct KTier {
    pub min_rating: i32,
    pub k: f64,
}

#[derive(Debug, Clone)]
pub struct EloSettings {
    pub default_rating: i32,
    pub k_tiers: Vec<KTier>,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            default_rating: 1200,
            k_tiers: vec![
                KTier {
                    min_rating: 0,
                    k: 32.0,
                },
                KTier {
                    min_rating: 2000,
                    k: 16.0,
                },
            ],
        }
    }
}

impl EloSettings {
    /// K-factor for a player, picked from the highest tier their rating reaches.
    pub fn k_for(&self, rating: i32) -> f64 {
        self.k_tiers
            .iter()
            .filter(|tier| rating >= tier.min_rating)
            .max_by_key(|tier| tier.min_rating)
            .map(|tier| tier.k)
            .unwrap_or(32.0)
    }

    /// Starting value of a track before any ledger entries exist.
    pub fn track_default(&self, track: RatingTrack) -> i32 {
        match track {
            RatingTrack::Elo => self.default_rating,
            RatingTrack::Atp => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub max_attempts: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub elo: EloSettings,
    pub retry: RetrySettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "jdd_platform.db".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_factor_drops_at_tier_boundary() {
        let settings = EloSettings::default();
        assert_eq!(settings.k_for(1999) as i32, 32);
        assert_eq!(settings.k_for(2000) as i32, 16);
        assert_eq!(settings.k_for(2400) as i32, 16);
    }

    #[test]
    fn track_defaults() {
        let settings = EloSettings::default();
        assert_eq!(settings.track_default(RatingTrack::Elo), 1200);
        assert_eq!(settings.track_default(RatingTrack::Atp), 0);
    }
}
