use glam::DVec3;

use roadster_core::vehicle_spec::VehicleSpec;

// Drag equation as in https://asawicki.info/Mirror/Car%20Physics%20for%20Games/Car%20Physics%20for%20Games.html

/// Aerodynamic drag, N, opposing the velocity vector:
/// F = 0.5 * rho * Cd * A * v^2. Multiplying the vector by its own length
/// folds the direction in, and makes zero velocity give zero drag instead
/// of a normalization blowup.
pub fn drag_force(spec: &VehicleSpec, air_density: f64, velocity: DVec3) -> DVec3 {
    velocity * -0.5 * air_density * spec.drag_coefficient * spec.front_area * velocity.length()
}
