//! Capability interface for the map surface, and the geometry it speaks.
//!
//! The underlying map/tile engine is treated as an opaque capability
//! provider: a [`MapSurface`] can draw a polyline and fit its visible area to
//! a bounding region, and hands back a [`PathHandle`] for each drawn path.
//! The renderer only ever talks to these traits.

pub mod console;

use serde::Deserialize;

/// Data structure representing a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

/// Data structure representing a latitude-longitude coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    /// Latitude, in degrees.
    pub lat: f64,
    /// Longitude, in degrees.
    pub lon: f64,
}

impl LatLon {
    /// Converts the coordinates into Mercator's projection, the native point
    /// representation of a [`MapSurface`].
    ///
    /// Under Mercator coordinates, the whole world is a unit square (i.e. of
    /// size 1.0 x 1.0).
    pub fn as_mercator(&self) -> Point<f64> {
        let x = 0.5 + self.lon / 360.0;
        let s = (self.lat * std::f64::consts::PI / 180.0).tan().asinh();
        let y = 0.5 - s / (2.0 * std::f64::consts::PI);

        Point { x, y }
    }
}

/// A bounding region for a set of points, in Mercator coordinates.
///
/// A freshly created region is empty and covers nothing; it grows point by
/// point through [`Bounds::extend`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    span: Option<(Point<f64>, Point<f64>)>,
}

impl Bounds {
    /// Creates an empty region.
    pub fn new() -> Self {
        Self { span: None }
    }

    /// Extends the region to cover the given point.
    pub fn extend(&mut self, p: Point<f64>) {
        match &mut self.span {
            None => self.span = Some((p, p)),
            Some((min, max)) => {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
        }
    }

    /// Checks whether the region covers nothing.
    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    /// Checks whether the region covers the given point.
    pub fn contains(&self, p: Point<f64>) -> bool {
        match &self.span {
            None => false,
            Some((min, max)) => p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y,
        }
    }

    /// Returns the minimum and maximum corners of the region, unless it is
    /// empty.
    pub fn corners(&self) -> Option<(Point<f64>, Point<f64>)> {
        self.span
    }
}

/// Style applied to a rendered activity path.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathStyle {
    /// Stroke color, as a `#RRGGBB` string.
    pub stroke_color: String,
    /// Stroke opacity, from 0.0 (transparent) to 1.0 (opaque).
    pub stroke_opacity: f64,
    /// Stroke weight, in pixels.
    pub stroke_weight: u32,
    /// Whether segments follow great-circle arcs instead of straight planar
    /// lines.
    pub geodesic: bool,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#FF0000".to_owned(),
            stroke_opacity: 1.0,
            stroke_weight: 2,
            geodesic: true,
        }
    }
}

/// Handle to a path drawn on a [`MapSurface`].
///
/// Detaching consumes the handle, so a detached path cannot be touched again.
pub trait PathHandle {
    /// Detaches this path from the surface it was drawn on.
    fn detach(self);
}

/// Capability interface of the underlying map engine.
pub trait MapSurface {
    /// Handle type for paths drawn on this surface.
    type Path: PathHandle;

    /// Draws a polyline through the given points, in order, and returns a
    /// handle to it.
    fn draw_path(&mut self, points: &[Point<f64>], style: &PathStyle) -> Self::Path;

    /// Pans and zooms the visible area to cover the given region.
    fn fit_bounds(&mut self, bounds: &Bounds);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mercator_origin() {
        let p = LatLon { lat: 0.0, lon: 0.0 }.as_mercator();
        assert_eq!(p, Point { x: 0.5, y: 0.5 });
    }

    #[test]
    fn mercator_antimeridian() {
        let east = LatLon { lat: 0.0, lon: 180.0 }.as_mercator();
        let west = LatLon { lat: 0.0, lon: -180.0 }.as_mercator();
        assert_eq!(east, Point { x: 1.0, y: 0.5 });
        assert_eq!(west, Point { x: 0.0, y: 0.5 });
    }

    #[test]
    fn mercator_northern_latitude_is_above_center() {
        let p = LatLon {
            lat: 45.0,
            lon: 7.0,
        }
        .as_mercator();
        assert!(p.y < 0.5);
        assert!(p.x > 0.5);
    }

    #[test]
    fn bounds_empty() {
        let bounds = Bounds::new();
        assert!(bounds.is_empty());
        assert!(!bounds.contains(Point { x: 0.5, y: 0.5 }));
        assert_eq!(bounds.corners(), None);
    }

    #[test]
    fn bounds_extend_covers_points() {
        let a = Point { x: 0.2, y: 0.8 };
        let b = Point { x: 0.6, y: 0.3 };

        let mut bounds = Bounds::new();
        bounds.extend(a);
        assert!(!bounds.is_empty());
        assert!(bounds.contains(a));
        assert!(!bounds.contains(b));

        bounds.extend(b);
        assert!(bounds.contains(a));
        assert!(bounds.contains(b));
        // The region is the enclosing rectangle, not just the two points.
        assert!(bounds.contains(Point { x: 0.4, y: 0.5 }));

        let (min, max) = bounds.corners().unwrap();
        assert_eq!(min, Point { x: 0.2, y: 0.3 });
        assert_eq!(max, Point { x: 0.6, y: 0.8 });
    }

    #[test]
    fn default_style() {
        let style = PathStyle::default();
        assert_eq!(style.stroke_color, "#FF0000");
        assert_eq!(style.stroke_opacity, 1.0);
        assert_eq!(style.stroke_weight, 2);
        assert!(style.geodesic);
    }
}
