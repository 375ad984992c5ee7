//! Process-lifetime configuration the core itself consults.
//!
//! Only two of the service's environment variables are read by the core
//! (see the crate's external-interfaces documentation); everything
//! else (listen port, log level, body-size limit, job concurrency) is
//! the surrounding service's concern and is not modeled here.

use std::env;

/// The subset of service configuration the packing core reads directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Hard ceiling on the total requested item quantity (`sum(items.qty)`).
    pub max_instances: usize,
    /// Unit-scale used when a request doesn't specify `params.unit_scale`.
    pub default_unit_scale: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_instances: 5000,
            default_unit_scale: 100,
        }
    }
}

impl Config {
    /// Builds a `Config` from the process environment, falling back to defaults
    /// for any variable that is unset or fails to parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_instances: get_usize("MAX_INSTANCES", defaults.max_instances),
            default_unit_scale: get_i64("DEFAULT_UNIT_SCALE", defaults.default_unit_scale),
        }
    }
}

fn get_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn get_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
