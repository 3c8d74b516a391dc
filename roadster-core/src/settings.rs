use config::{Config, ConfigError, File};
use lazy_static::lazy_static;
use serde::Deserialize;

// Environment-level tunables only; everything about a particular vehicle
// comes from its spec artifact instead
#[derive(Deserialize)]
pub struct Settings {
    /// kg/m^3, sea-level default
    pub air_density: f64,
    /// m/s^2
    pub gravity: f64,
    /// slip ratio below which tires are in the stiction regime
    pub slip_threshold: f64,
    /// seconds for a decoupled engine to close most of the gap to its target RPM
    pub engine_rev_response: f64,
}

impl Settings {
    fn new() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("air_density", 1.225)?
            .set_default("gravity", 9.81)?
            .set_default("slip_threshold", 0.1)?
            .set_default("engine_rev_response", 0.3)?
            .add_source(File::with_name("config.yaml").required(false))
            .build()?;

        config.try_deserialize()
    }
}

lazy_static! {
    pub static ref GLOBAL_CONFIG: Settings = Settings::new().expect("failed to read config file");
}
