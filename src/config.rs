//! Environment overrides for the built-in defaults.
//!
//! A `.env` file in the working directory is loaded first (if present), then
//! the `HVAC_*` variables are read. CLI flags still win over anything here.

use std::str::FromStr;

use tracing::debug;

use crate::error::AppError;

pub const ENV_DAYS: &str = "HVAC_DAYS";
pub const ENV_SEED: &str = "HVAC_SEED";
pub const ENV_MARGIN: &str = "HVAC_MARGIN";
pub const ENV_DISCOUNT: &str = "HVAC_DISCOUNT";

/// Defaults taken from the environment; `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDefaults {
    pub days: Option<i64>,
    pub seed: Option<u64>,
    pub margin: Option<f64>,
    pub volume_discount: Option<f64>,
}

impl EnvDefaults {
    /// Load `.env` and read the process environment.
    pub fn load() -> Result<Self, AppError> {
        // A missing .env is the normal case.
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup` (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        Ok(Self {
            days: parse_var(&lookup, ENV_DAYS)?,
            seed: parse_var(&lookup, ENV_SEED)?,
            margin: parse_var(&lookup, ENV_MARGIN)?,
            volume_discount: parse_var(&lookup, ENV_DISCOUNT)?,
        })
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::validation(format!("Invalid {key}='{raw}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::error::ErrorKind;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn unset_and_blank_mean_no_override() {
        let d = EnvDefaults::from_lookup(env(&[(ENV_MARGIN, "  ")])).unwrap();
        assert_eq!(d, EnvDefaults::default());
    }

    #[test]
    fn values_are_parsed() {
        let d = EnvDefaults::from_lookup(env(&[
            (ENV_DAYS, "90"),
            (ENV_SEED, "42"),
            (ENV_MARGIN, "0.25"),
            (ENV_DISCOUNT, "0.1"),
        ]))
        .unwrap();
        assert_eq!(d.days, Some(90));
        assert_eq!(d.seed, Some(42));
        assert_eq!(d.margin, Some(0.25));
        assert_eq!(d.volume_discount, Some(0.1));
    }

    #[test]
    fn negative_days_parse_so_generation_can_reject_them() {
        let d = EnvDefaults::from_lookup(env(&[(ENV_DAYS, "-5")])).unwrap();
        assert_eq!(d.days, Some(-5));
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let err = EnvDefaults::from_lookup(env(&[(ENV_SEED, "abc")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.message().contains(ENV_SEED));
    }
}
