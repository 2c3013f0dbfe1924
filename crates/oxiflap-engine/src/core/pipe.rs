use super::rect::Rect;

/// One gated obstacle: a vertical pipe pair with a gap the bird must thread.
///
/// The gap center is randomized at spawn time (see
/// [`PipeStream`](crate::engine::PipeStream)); the gap height is fixed by
/// configuration. `passed` transitions `false -> true` exactly once, the tick
/// the pipe's horizontal position first drops below the bird's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    x: f32,
    gap_center: f32,
    gap_height: f32,
    passed: bool,
}

impl Pipe {
    #[must_use]
    pub const fn new(x: f32, gap_center: f32, gap_height: f32) -> Self {
        Self {
            x,
            gap_center,
            gap_height,
            passed: false,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn gap_center(&self) -> f32 {
        self.gap_center
    }

    #[must_use]
    pub const fn gap_height(&self) -> f32 {
        self.gap_height
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        self.passed
    }

    pub(crate) const fn shift_left(&mut self, distance: f32) {
        self.x -= distance;
    }

    pub(crate) const fn mark_passed(&mut self) {
        self.passed = true;
    }

    /// Solid region above the gap, from the top of the playfield down to the
    /// gap's upper edge.
    #[must_use]
    pub const fn top_bounds(&self, pipe_width: f32) -> Rect {
        Rect::new(self.x, 0.0, pipe_width, self.gap_center - self.gap_height / 2.0)
    }

    /// Solid region below the gap, from the gap's lower edge down to the
    /// bottom of the playfield.
    #[must_use]
    pub const fn bottom_bounds(&self, pipe_width: f32, playfield_height: f32) -> Rect {
        let gap_bottom = self.gap_center + self.gap_height / 2.0;
        Rect::new(self.x, gap_bottom, pipe_width, playfield_height - gap_bottom)
    }
}
