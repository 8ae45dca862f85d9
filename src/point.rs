//! Vehicle positions.

/// A two-dimensional vehicle position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// The x coordinate.
    pub x: f64,
    /// The y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Returns the euclidean distance to another point.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vanet::Point;
    /// let distance = Point::new(0., 0.).distance(&Point::new(3., 4.));
    /// assert_eq!(5., distance);
    /// ```
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
