/// Dash length of the marching-ants border, in canvas units.
pub const ANTS_DASH: f64 = 5.0;
/// Phase advance per rendered frame.
pub const ANTS_STEP: f64 = 0.5;

/// Dash phase for the closed-lasso border. Presentation only; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarchingAnts {
    phase: f64,
}

impl MarchingAnts {
    /// Current phase in `[0, 2 * ANTS_DASH)`.
    pub fn phase(self) -> f64 {
        self.phase
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.phase = (self.phase + ANTS_STEP) % (2.0 * ANTS_DASH);
    }

    /// Dash offsets for the white and black passes, half a period apart.
    pub fn offsets(self) -> (f64, f64) {
        (-self.phase, -self.phase + ANTS_DASH)
    }
}
