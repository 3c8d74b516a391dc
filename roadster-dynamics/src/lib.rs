pub mod dynamics;
pub mod error;

pub use dynamics::{DynamicsOutput, Environment, TickInput, VehicleInstance};
pub use error::DynamicsError;
