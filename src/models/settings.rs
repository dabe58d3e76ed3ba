//! Global rating settings stored alongside players and matches.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_K: f64 = 32.0;
pub const MIN_K: f64 = 1.0;
pub const MAX_K: f64 = 128.0;

/// How per-team deltas are derived from a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatingMethod {
    /// All-pairs Elo between teams ordered by placement.
    #[default]
    Pairwise,
    /// Normalised placement against the mean expected score vs. the field.
    Field,
}

impl std::str::FromStr for RatingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PAIRWISE" => Ok(RatingMethod::Pairwise),
            "FIELD" => Ok(RatingMethod::Field),
            other => Err(format!("unknown rating method: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub method: RatingMethod,
    /// Always within `[1, 128]`, also when read from stored JSON.
    #[serde(default = "default_k", deserialize_with = "deserialize_k")]
    pub k: f64,
    /// Cosmetic, carried through untouched.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_k() -> f64 {
    DEFAULT_K
}

fn deserialize_k<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map_or(DEFAULT_K, normalize_k))
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            method: RatingMethod::default(),
            k: DEFAULT_K,
            theme: default_theme(),
        }
    }
}

impl Settings {
    /// Set the K-factor: rounded to a whole number and clamped to `[1, 128]`.
    /// Non-finite input falls back to the default.
    pub fn set_k(&mut self, k: f64) {
        self.k = normalize_k(k);
    }

    pub fn with_method(mut self, method: RatingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_k(mut self, k: f64) -> Self {
        self.set_k(k);
        self
    }
}

pub fn normalize_k(k: f64) -> f64 {
    if !k.is_finite() {
        return DEFAULT_K;
    }
    k.round().clamp(MIN_K, MAX_K)
}
