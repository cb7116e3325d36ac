use crate::math::Coord;

/// Axis-aligned bounding box. A freshly created envelope is *null* (covers
/// nothing) until a coordinate is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::null()
    }
}

impl Envelope {
    /// The null envelope.
    #[must_use]
    pub fn null() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope spanned by two points.
    #[must_use]
    pub fn from_points(p1: &Coord, p2: &Coord) -> Self {
        Self {
            min_x: p1.x.min(p2.x),
            min_y: p1.y.min(p2.y),
            max_x: p1.x.max(p2.x),
            max_y: p1.y.max(p2.y),
        }
    }

    /// Envelope of a coordinate slice (null if empty).
    #[must_use]
    pub fn from_coords(coords: &[Coord]) -> Self {
        let mut env = Self::null();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Centre point, or `None` for the null envelope.
    #[must_use]
    pub fn centre(&self) -> Option<Coord> {
        if self.is_null() {
            return None;
        }
        Some(Coord::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ))
    }

    pub fn expand_to_include(&mut self, c: &Coord) {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
    }

    pub fn expand_to_include_env(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Returns a copy grown by `distance` on every side.
    #[must_use]
    pub fn expanded_by(&self, distance: f64) -> Self {
        if self.is_null() {
            return *self;
        }
        Self {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Returns `true` if `other` lies within this envelope (boundary
    /// included).
    #[must_use]
    pub fn covers(&self, other: &Envelope) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Largest absolute value of any bounding ordinate (0 when null).
    #[must_use]
    pub fn max_magnitude(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        self.min_x
            .abs()
            .max(self.min_y.abs())
            .max(self.max_x.abs())
            .max(self.max_y.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    #[test]
    fn null_envelope_intersects_nothing() {
        let null = Envelope::null();
        let unit = Envelope::from_points(&coord(0.0, 0.0), &coord(1.0, 1.0));
        assert!(null.is_null());
        assert!(!null.intersects(&unit));
        assert!(!unit.intersects(&null));
        assert!(!unit.covers(&null));
    }

    #[test]
    fn touching_envelopes_intersect() {
        let a = Envelope::from_points(&coord(0.0, 0.0), &coord(1.0, 1.0));
        let b = Envelope::from_points(&coord(1.0, 1.0), &coord(2.0, 2.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn covers_and_expand() {
        let mut a = Envelope::from_coords(&[coord(0.0, 0.0), coord(4.0, 2.0)]);
        let b = Envelope::from_points(&coord(1.0, 1.0), &coord(2.0, 2.0));
        assert!(a.covers(&b));
        a.expand_to_include(&coord(-3.0, 5.0));
        assert!((a.max_magnitude() - 5.0).abs() < f64::EPSILON);
        assert!(a.expanded_by(1.0).covers(&a));
    }
}
