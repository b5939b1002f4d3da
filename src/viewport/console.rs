//! Surface and panel backed by the terminal, to run the viewer loop without
//! a graphical map engine.

use super::{Bounds, MapSurface, PathHandle, PathStyle, Point};
use crate::render::SummaryPanel;
use log::{debug, info};

/// Map surface that logs drawing operations instead of rasterizing them.
pub struct ConsoleSurface {
    next_id: u64,
}

#[allow(clippy::new_without_default)]
impl ConsoleSurface {
    /// Creates a new console surface.
    pub fn new() -> Self {
        Self { next_id: 0 }
    }
}

impl MapSurface for ConsoleSurface {
    type Path = ConsolePath;

    fn draw_path(&mut self, points: &[Point<f64>], style: &PathStyle) -> ConsolePath {
        let id = self.next_id;
        self.next_id += 1;
        info!(
            "Drawing path #{id} with {} points (stroke {}, weight {}, geodesic: {})",
            points.len(),
            style.stroke_color,
            style.stroke_weight,
            style.geodesic
        );
        ConsolePath {
            id,
            points: points.len(),
        }
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        if let Some((min, max)) = bounds.corners() {
            info!(
                "Fitting view to ({:.6}, {:.6}) - ({:.6}, {:.6})",
                min.x, min.y, max.x, max.y
            );
        }
    }
}

/// Handle to a path drawn on a [`ConsoleSurface`].
pub struct ConsolePath {
    id: u64,
    points: usize,
}

impl PathHandle for ConsolePath {
    fn detach(self) {
        debug!("Detached path #{} ({} points)", self.id, self.points);
    }
}

/// Summary panel printing each line to standard output.
pub struct ConsolePanel {
    lines: usize,
}

#[allow(clippy::new_without_default)]
impl ConsolePanel {
    /// Creates a new console panel.
    pub fn new() -> Self {
        Self { lines: 0 }
    }
}

impl SummaryPanel for ConsolePanel {
    fn clear(&mut self) {
        // The terminal cannot unprint, so separate summaries instead.
        if self.lines > 0 {
            println!("---");
            self.lines = 0;
        }
    }

    fn append_line(&mut self, line: &str) {
        println!("{line}");
        self.lines += 1;
    }
}
