//! Signed distance fields built from closed 2D polygons.
//!
//! An [`SdfGrid`] stores, for every integer lattice point of a
//! `width × height` grid, the signed distance to the polygon boundary and the
//! unit direction in which that distance grows fastest.
//!
//! # Sign Convention
//!
//! | Region | `value` | `gradient` points |
//! |--------|---------|-------------------|
//! | outside polygon | `> 0` | away from the boundary |
//! | inside polygon | `< 0` | toward the boundary |
//! | on the boundary | `0` | nowhere (zero vector) |
//!
//! The integrator treats `value < 0` as penetration, so a freshly built grid
//! describes the polygon as an obstacle. Call [`SdfGrid::inverted`] to keep
//! particles inside the polygon instead.
//!
//! # Example
//!
//! ```ignore
//! let square = [
//!     Vec2::new(10.0, 10.0),
//!     Vec2::new(50.0, 10.0),
//!     Vec2::new(50.0, 50.0),
//!     Vec2::new(10.0, 50.0),
//! ];
//! let sdf = SdfGrid::build(&square, 64, 64)?;
//! assert!(sdf.value(Vec2::new(30.0, 30.0)) < 0.0);
//! ```

use crate::error::{Result, SimulationError};
use glam::Vec2;
use tracing::debug;

/// Dense grid of signed distances and gradients.
///
/// Immutable after construction; rebuild by calling [`SdfGrid::build`] again.
#[derive(Clone, Debug, PartialEq)]
pub struct SdfGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
    gradients: Vec<Vec2>,
}

impl SdfGrid {
    /// Build a field from an implicitly closed polygon.
    ///
    /// Each cell `(i, j)` is sampled at the lattice point `(i, j)`. The edge
    /// scan visits every polygon edge once per cell, tracking the closest
    /// point and toggling the inside/outside sign with a crossing-number test
    /// in the same pass. Cost is `O(width * height * vertices)`; intended for
    /// setup and geometry edits, not per-frame use.
    ///
    /// Fails with an invalid-argument error for fewer than three vertices,
    /// non-finite vertices or a zero dimension.
    pub fn build(polygon: &[Vec2], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SimulationError::InvalidDimensions { width, height });
        }
        if polygon.len() < 3 {
            return Err(SimulationError::DegeneratePolygon {
                vertices: polygon.len(),
            });
        }
        if polygon.iter().any(|v| !v.is_finite()) {
            return Err(SimulationError::NonFinitePolygon);
        }

        let cells = width * height;
        let mut values = Vec::with_capacity(cells);
        let mut gradients = Vec::with_capacity(cells);

        for i in 0..width {
            for j in 0..height {
                let (value, gradient) = sample_polygon(polygon, Vec2::new(i as f32, j as f32));
                values.push(value);
                gradients.push(gradient);
            }
        }

        debug!(
            width,
            height,
            vertices = polygon.len(),
            "built signed distance field"
        );

        Ok(Self {
            width,
            height,
            values,
            gradients,
        })
    }

    /// Swap inside and outside.
    ///
    /// After inversion the polygon interior is the free region (positive
    /// values) and gradients point inward, away from the boundary.
    pub fn inverted(mut self) -> Self {
        for v in &mut self.values {
            *v = -*v;
        }
        for g in &mut self.gradients {
            *g = -*g;
        }
        self
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat storage index for cell `(x, y)`, clamped into the grid.
    ///
    /// Coordinates outside `[0, width) × [0, height)` saturate to the nearest
    /// edge cell; this never fails.
    #[inline]
    pub fn idx(&self, x: i64, y: i64) -> usize {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        x * self.height + y
    }

    /// Signed distance at a world position.
    #[inline]
    pub fn value(&self, pos: Vec2) -> f32 {
        self.values[self.cell(pos)]
    }

    /// Distance gradient at a world position.
    #[inline]
    pub fn gradient(&self, pos: Vec2) -> Vec2 {
        self.gradients[self.cell(pos)]
    }

    /// Distance and gradient with a single index computation.
    #[inline]
    pub fn sample(&self, pos: Vec2) -> (f32, Vec2) {
        let cell = self.cell(pos);
        (self.values[cell], self.gradients[cell])
    }

    /// Raw distances in storage order (`x * height + y`).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Raw gradients in storage order (`x * height + y`).
    pub fn gradients(&self) -> &[Vec2] {
        &self.gradients
    }

    // Float-to-int casts truncate toward zero and saturate, NaN maps to 0.
    #[inline]
    fn cell(&self, pos: Vec2) -> usize {
        self.idx(pos.x as i64, pos.y as i64)
    }
}

/// Signed distance and gradient from `p` to the polygon boundary.
fn sample_polygon(v: &[Vec2], p: Vec2) -> (f32, Vec2) {
    let n = v.len();
    let mut r = Vec2::ZERO;
    let mut best = f32::MAX;
    let mut sign = 1.0_f32;

    let mut l = n - 1;
    for k in 0..n {
        let e = v[l] - v[k];
        let w = p - v[k];

        let len_sq = e.length_squared();
        let t = if len_sq > 0.0 {
            (w.dot(e) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let b = w - e * t;
        let b_sq = b.length_squared();
        if b_sq < best {
            best = b_sq;
            r = b;
        }

        let cross_lhs = e.x * w.y;
        let cross_rhs = e.y * w.x;
        if (p.y >= v[k].y && p.y < v[l].y && cross_lhs > cross_rhs)
            || (p.y < v[k].y && p.y >= v[l].y && cross_lhs <= cross_rhs)
        {
            sign = -sign;
        }

        l = k;
    }

    let d = r.length();
    // On the boundary itself the gradient degenerates to zero.
    let norm = if d == 0.0 { 1.0 } else { d };
    (sign * d, sign * r / norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(10.0, 10.0),
            Vec2::new(50.0, 10.0),
            Vec2::new(50.0, 50.0),
            Vec2::new(10.0, 50.0),
        ]
    }

    #[test]
    fn test_inside_is_negative() {
        let sdf = SdfGrid::build(&square(), 64, 64).unwrap();
        let v = sdf.value(Vec2::new(30.0, 25.0));
        assert!((v + 15.0).abs() < 1e-4, "got {}", v);
        // Closest edge is y = 10, gradient points at it.
        let g = sdf.gradient(Vec2::new(30.0, 25.0));
        assert!((g - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_outside_is_positive() {
        let sdf = SdfGrid::build(&square(), 64, 64).unwrap();
        let (v, g) = sdf.sample(Vec2::new(60.0, 30.0));
        assert!((v - 10.0).abs() < 1e-4);
        assert!((g - Vec2::X).length() < 1e-5);

        // Beyond a corner the distance is Euclidean to the vertex.
        let v = sdf.value(Vec2::new(53.0, 54.0));
        assert!((v - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_edge_midpoint_is_zero() {
        let sdf = SdfGrid::build(&square(), 64, 64).unwrap();
        let (v, g) = sdf.sample(Vec2::new(30.0, 10.0));
        assert!(v.abs() < 1e-5);
        assert_eq!(g, Vec2::ZERO);
    }

    #[test]
    fn test_winding_order_does_not_matter() {
        let mut reversed = square();
        reversed.reverse();
        let a = SdfGrid::build(&square(), 32, 32).unwrap();
        let b = SdfGrid::build(&reversed, 32, 32).unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_concave_notch_is_outside() {
        let l_shape = [
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 0.0),
            Vec2::new(40.0, 20.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(20.0, 40.0),
            Vec2::new(0.0, 40.0),
        ];
        let sdf = SdfGrid::build(&l_shape, 48, 48).unwrap();
        assert!(sdf.value(Vec2::new(30.0, 30.0)) > 0.0);
        assert!(sdf.value(Vec2::new(10.0, 30.0)) < 0.0);
        assert!(sdf.value(Vec2::new(30.0, 10.0)) < 0.0);
    }

    #[test]
    fn test_idx_clamps() {
        let sdf = SdfGrid::build(&square(), 64, 48).unwrap();
        assert_eq!(sdf.idx(-100, 500), sdf.idx(0, 47));
        assert_eq!(sdf.idx(1_000_000, -3), sdf.idx(63, 0));
        assert_eq!(sdf.idx(5, 7), 5 * 48 + 7);

        let far = Vec2::new(-1.0e9, 1.0e9);
        assert_eq!(sdf.value(far), sdf.value(Vec2::new(0.0, 47.0)));
        assert_eq!(sdf.value(Vec2::NAN), sdf.value(Vec2::ZERO));
    }

    #[test]
    fn test_inverted_flips_sign_and_gradient() {
        let sdf = SdfGrid::build(&square(), 64, 64).unwrap();
        let inv = sdf.clone().inverted();
        let p = Vec2::new(60.0, 30.0);
        assert_eq!(inv.value(p), -sdf.value(p));
        assert_eq!(inv.gradient(p), -sdf.gradient(p));
    }

    #[test]
    fn test_zero_length_edge_is_tolerated() {
        let poly = [
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 10.0),
            Vec2::new(10.0, 30.0),
        ];
        let sdf = SdfGrid::build(&poly, 40, 40).unwrap();
        assert!(sdf.values().iter().all(|v| v.is_finite()));
        assert!(sdf.gradients().iter().all(|g| g.is_finite()));
    }

    #[test]
    fn test_rejects_bad_input() {
        let tri = [Vec2::ZERO, Vec2::X, Vec2::Y];
        assert!(matches!(
            SdfGrid::build(&tri[..2], 8, 8),
            Err(SimulationError::DegeneratePolygon { vertices: 2 })
        ));
        assert!(matches!(
            SdfGrid::build(&tri, 0, 8),
            Err(SimulationError::InvalidDimensions { width: 0, height: 8 })
        ));
        let bad = [Vec2::ZERO, Vec2::new(f32::NAN, 1.0), Vec2::Y];
        assert!(matches!(
            SdfGrid::build(&bad, 8, 8),
            Err(SimulationError::NonFinitePolygon)
        ));
    }
}
