//! Catmull-Rom spline through mass-point positions

use nalgebra::Point3;

/// Uniform Catmull-Rom curve with clamped endpoints.
///
/// Control points are overwritten in place every step from body positions;
/// the allocation is reused across frames.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Point3<f32>>,
}

impl CatmullRom {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        debug_assert!(points.len() >= 2, "a curve needs at least two points");
        Self { points }
    }

    pub fn points_mut(&mut self) -> &mut [Point3<f32>] {
        &mut self.points
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    fn control(&self, index: isize) -> Point3<f32> {
        let clamped = index.clamp(0, self.points.len() as isize - 1) as usize;
        self.points[clamped]
    }

    /// Evaluate the curve at `u` in [0, 1].
    pub fn sample(&self, u: f32) -> Point3<f32> {
        let segments = self.points.len() - 1;
        let x = u.clamp(0.0, 1.0) * segments as f32;
        let i = (x.floor() as usize).min(segments - 1);
        let t = x - i as f32;

        let p0 = self.control(i as isize - 1).coords;
        let p1 = self.control(i as isize).coords;
        let p2 = self.control(i as isize + 1).coords;
        let p3 = self.control(i as isize + 2).coords;

        let t2 = t * t;
        let t3 = t2 * t;

        let result = (p1 * 2.0
            + (p2 - p0) * t
            + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
            + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
            * 0.5;
        Point3::from(result)
    }

    /// Sample `count + 1` evenly-parameterized points along the curve.
    pub fn sample_path(&self, count: usize) -> Vec<Point3<f32>> {
        (0..=count)
            .map(|i| self.sample(i as f32 / count as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_line() -> CatmullRom {
        CatmullRom::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(0.0, 0.0, 3.0),
        ])
    }

    #[test]
    fn test_interpolates_endpoints() {
        let curve = straight_line();
        assert_relative_eq!(curve.sample(0.0).z, 0.0, epsilon = 1e-5);
        assert_relative_eq!(curve.sample(1.0).z, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_passes_through_control_points() {
        let curve = straight_line();
        // u = 1/3 lands exactly on the second control point.
        let p = curve.sample(1.0 / 3.0);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_straight_line_stays_on_axis() {
        let curve = straight_line();
        for p in curve.sample_path(32) {
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sample_path_length() {
        let curve = straight_line();
        assert_eq!(curve.sample_path(64).len(), 65);
    }
}
