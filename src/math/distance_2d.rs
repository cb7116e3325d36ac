use super::Coord;

/// Distance from `p` to the closed segment `a → b`.
///
/// A zero-length segment degenerates to the distance between `p` and `a`.
#[must_use]
pub fn coord_to_segment(p: &Coord, a: &Coord, b: &Coord) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let frac = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    distance(p, &(a + ab * frac))
}

/// Euclidean distance between two coordinates.
#[must_use]
pub fn distance(a: &Coord, b: &Coord) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::coord;

    #[test]
    fn projection_falls_inside() {
        let d = coord_to_segment(&coord(1.0, 1.0), &coord(0.0, 0.0), &coord(2.0, 0.0));
        assert_relative_eq!(d, 1.0);
    }

    #[test]
    fn nearest_is_an_endpoint() {
        let d = coord_to_segment(&coord(-1.0, 0.0), &coord(0.0, 0.0), &coord(2.0, 0.0));
        assert_relative_eq!(d, 1.0);
        let d = coord_to_segment(&coord(5.0, 4.0), &coord(0.0, 0.0), &coord(2.0, 0.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn zero_length_segment() {
        let d = coord_to_segment(&coord(3.0, 4.0), &coord(0.0, 0.0), &coord(0.0, 0.0));
        assert_relative_eq!(d, 5.0);
    }
}
