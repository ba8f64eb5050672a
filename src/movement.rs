use crate::detect::Point;

/// Frame-to-frame displacement of the tracked person anchor.
#[derive(Clone, Debug, Default)]
pub struct MovementEstimator {
    last_point: Option<Point>,
}

impl MovementEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` and return its distance from the previous anchor.
    ///
    /// Returns `None` on the first observation. Frames without a person
    /// should not call this, so the last known position survives gaps.
    pub fn update(&mut self, current: Point) -> Option<f32> {
        let distance = self.last_point.map(|prev| prev.distance_to(current));
        self.last_point = Some(current);
        distance
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn clear(&mut self) {
        self.last_point = None;
    }
}
