use serde::{Deserialize, Serialize};

/// Gearbox position. Forward gears are numbered from 1 (the deepest ratio)
/// up to however many ratios the vehicle's transmission carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gear {
    Reverse,
    Neutral,
    Forward(u8),
}

impl Gear {
    pub fn is_forward(&self) -> bool {
        matches!(self, Gear::Forward(_))
    }
}
