use super::rect::Rect;

/// The simulated body of one agent: a vertical position/velocity integrator.
///
/// The horizontal position never changes; the world scrolls past the bird.
/// Per tick the canonical update order is:
///
/// 1. [`Self::flap`] if a flap was requested this tick
/// 2. [`Self::apply_gravity`]
/// 3. [`Self::step_position`]
///
/// so a flap overrides the velocity that gravity would otherwise have
/// incremented from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    x: f32,
    y: f32,
    velocity: f32,
}

impl Bird {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Sets velocity to `strength` unconditionally.
    ///
    /// Flapping is not additive: it always resets velocity to the same strong
    /// upward (negative) value regardless of the current velocity.
    pub const fn flap(&mut self, strength: f32) {
        self.velocity = strength;
    }

    /// Integrates gravity into velocity.
    pub const fn apply_gravity(&mut self, gravity: f32) {
        self.velocity += gravity;
    }

    /// Integrates velocity into position.
    ///
    /// Must be called after [`Self::apply_gravity`] within the same tick.
    pub const fn step_position(&mut self) {
        self.y += self.velocity;
    }

    /// Bounding box at the current position.
    #[must_use]
    pub const fn bounds(&self, width: f32, height: f32) -> Rect {
        Rect::new(self.x, self.y, width, height)
    }
}
