// src/position.rs

//! Discrete coordinate vocabulary shared by every grid cursor.
//!
//! `Localizable` answers "where am I", `Positionable` moves. Both are cheap,
//! integer-only operations; nothing here ever touches a transform or a source.

/// Something with an integer position in an n-dimensional grid.
pub trait Localizable {
    /// Number of dimensions of the position.
    fn num_dimensions(&self) -> usize;

    /// The coordinate along dimension `d`.
    fn get_long_position(&self, d: usize) -> i64;

    /// The coordinate along dimension `d` as a real number.
    #[inline]
    fn get_double_position(&self, d: usize) -> f64 {
        self.get_long_position(d) as f64
    }

    /// Writes the full position into `position`.
    ///
    /// # Panics
    /// If `position` is shorter than `num_dimensions()`.
    fn localize(&self, position: &mut [i64]) {
        for (d, p) in position[..self.num_dimensions()].iter_mut().enumerate() {
            *p = self.get_long_position(d);
        }
    }

    /// Writes the full position into `position` as reals.
    fn localize_real(&self, position: &mut [f64]) {
        for (d, p) in position[..self.num_dimensions()].iter_mut().enumerate() {
            *p = self.get_double_position(d);
        }
    }
}

/// Something whose integer position can be changed.
pub trait Positionable: Localizable {
    /// Moves one step forward along dimension `d`.
    fn fwd(&mut self, d: usize);

    /// Moves one step backward along dimension `d`.
    fn bck(&mut self, d: usize);

    /// Moves by `distance` along dimension `d`.
    fn move_by(&mut self, distance: i64, d: usize);

    /// Moves by `distance[d]` along every dimension.
    fn move_by_all(&mut self, distance: &[i64]);

    /// Sets the full position.
    fn set_position(&mut self, position: &[i64]);

    /// Sets the coordinate along dimension `d`.
    fn set_position_at(&mut self, position: i64, d: usize);
}

/// A plain n-dimensional integer point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    position: Vec<i64>,
}

impl Point {
    /// Creates a point at the origin of an `n`-dimensional grid.
    pub fn new(n: usize) -> Self {
        Point {
            position: vec![0; n],
        }
    }

    /// Creates a point at the given coordinates.
    pub fn from_slice(position: &[i64]) -> Self {
        Point {
            position: position.to_vec(),
        }
    }

    /// The coordinates as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.position
    }
}

impl From<Vec<i64>> for Point {
    fn from(position: Vec<i64>) -> Self {
        Point { position }
    }
}

impl Localizable for Point {
    #[inline]
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    #[inline]
    fn get_long_position(&self, d: usize) -> i64 {
        self.position[d]
    }

    fn localize(&self, position: &mut [i64]) {
        position[..self.position.len()].copy_from_slice(&self.position);
    }
}

impl Positionable for Point {
    #[inline]
    fn fwd(&mut self, d: usize) {
        self.position[d] += 1;
    }

    #[inline]
    fn bck(&mut self, d: usize) {
        self.position[d] -= 1;
    }

    #[inline]
    fn move_by(&mut self, distance: i64, d: usize) {
        self.position[d] += distance;
    }

    fn move_by_all(&mut self, distance: &[i64]) {
        assert_eq!(
            distance.len(),
            self.position.len(),
            "move distance has {} components, point has {}",
            distance.len(),
            self.position.len()
        );
        for (p, delta) in self.position.iter_mut().zip(distance) {
            *p += delta;
        }
    }

    fn set_position(&mut self, position: &[i64]) {
        assert_eq!(
            position.len(),
            self.position.len(),
            "position has {} components, point has {}",
            position.len(),
            self.position.len()
        );
        self.position.copy_from_slice(position);
    }

    #[inline]
    fn set_position_at(&mut self, position: i64, d: usize) {
        self.position[d] = position;
    }
}
