//! The activity renderer: projects one activity record onto a map surface
//! and a text summary panel.

use crate::activity::Activity;
use crate::viewport::{Bounds, MapSurface, PathHandle, PathStyle, Point};
use chrono::{Local, LocalResult, TimeZone};
use log::{debug, warn};

/// A panel of human-readable summary lines.
pub trait SummaryPanel {
    /// Removes every line from the panel.
    fn clear(&mut self);

    /// Appends one line at the bottom of the panel.
    fn append_line(&mut self, line: &str);
}

/// Renders one activity at a time onto a map surface and a summary panel.
///
/// The renderer owns the single path artifact currently displayed: each call
/// to [`ActivityRenderer::render`] detaches the previous path before drawing
/// the next one, so at most one path is ever attached to the surface, and a
/// detached path is dropped rather than retained.
pub struct ActivityRenderer<S: MapSurface, P: SummaryPanel> {
    surface: S,
    panel: P,
    style: PathStyle,
    path: Option<S::Path>,
    shown: Option<String>,
}

impl<S: MapSurface, P: SummaryPanel> ActivityRenderer<S, P> {
    /// Creates a renderer with nothing displayed yet.
    pub fn new(surface: S, panel: P, style: PathStyle) -> Self {
        Self {
            surface,
            panel,
            style,
            path: None,
            shown: None,
        }
    }

    /// Identifier of the activity currently displayed, if any.
    pub fn shown(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Detaches the currently displayed path from the surface.
    ///
    /// Calling this with no path displayed is a no-op, so the call is safe to
    /// repeat.
    pub fn clear_path(&mut self) {
        if let Some(path) = self.path.take() {
            path.detach();
        }
    }

    /// Removes every line from the summary panel.
    pub fn clear_summary(&mut self) {
        self.panel.clear();
    }

    /// Displays the given activity, replacing whatever was displayed before.
    ///
    /// The coordinates are drawn in recording order; the visible area is
    /// fitted to cover all of them. An activity without coordinates draws no
    /// path and leaves the viewport where it is.
    pub fn render(&mut self, id: &str, activity: &Activity) {
        self.clear_path();

        let points: Vec<Point<f64>> = activity
            .coords
            .iter()
            .map(|gps| gps.latlon().as_mercator())
            .collect();

        if points.is_empty() {
            // Fitting the view to an empty region is unspecified in most map
            // engines, so skip both the path and the fit.
            warn!("Activity {id} has no coordinates, keeping the current viewport");
        } else {
            self.path = Some(self.surface.draw_path(&points, &self.style));

            let mut bounds = Bounds::new();
            for &point in &points {
                bounds.extend(point);
            }
            self.surface.fit_bounds(&bounds);
        }

        self.clear_summary();
        let summary = &activity.summary;
        self.panel.append_line(&date_line(summary.timestamp));
        self.panel.append_line(&format!("Sport: {}", summary.sport));
        self.panel
            .append_line(&format!("Duration: {}", summary.duration));
        self.panel
            .append_line(&format!("Distance: {} km", summary.distance));

        self.shown = Some(id.to_owned());
        debug!("Rendered activity {id} with {} points", points.len());
    }
}

/// Formats an epoch timestamp as a local date/time line.
fn date_line(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0) {
        LocalResult::Single(date) => date.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        _ => format!("timestamp {timestamp}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::activity::{GpsPoint, Summary};
    use crate::viewport::LatLon;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Operations recorded by the fake surface.
    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Draw {
            id: u64,
            points: Vec<Point<f64>>,
            style: PathStyle,
        },
        Detach {
            id: u64,
        },
        Fit {
            bounds: Bounds,
        },
    }

    /// Shared journal of surface operations and currently attached paths.
    #[derive(Default)]
    struct Journal {
        ops: Vec<Op>,
        attached: Vec<u64>,
    }

    struct FakeSurface {
        journal: Rc<RefCell<Journal>>,
        next_id: u64,
    }

    struct FakePath {
        journal: Rc<RefCell<Journal>>,
        id: u64,
    }

    impl PathHandle for FakePath {
        fn detach(self) {
            let mut journal = self.journal.borrow_mut();
            journal.attached.retain(|&id| id != self.id);
            journal.ops.push(Op::Detach { id: self.id });
        }
    }

    impl MapSurface for FakeSurface {
        type Path = FakePath;

        fn draw_path(&mut self, points: &[Point<f64>], style: &PathStyle) -> FakePath {
            let id = self.next_id;
            self.next_id += 1;
            let mut journal = self.journal.borrow_mut();
            journal.ops.push(Op::Draw {
                id,
                points: points.to_vec(),
                style: style.clone(),
            });
            journal.attached.push(id);
            FakePath {
                journal: self.journal.clone(),
                id,
            }
        }

        fn fit_bounds(&mut self, bounds: &Bounds) {
            self.journal.borrow_mut().ops.push(Op::Fit { bounds: *bounds });
        }
    }

    struct FakePanel {
        lines: Rc<RefCell<Vec<String>>>,
    }

    impl SummaryPanel for FakePanel {
        fn clear(&mut self) {
            self.lines.borrow_mut().clear();
        }

        fn append_line(&mut self, line: &str) {
            self.lines.borrow_mut().push(line.to_owned());
        }
    }

    type FakeRenderer = ActivityRenderer<FakeSurface, FakePanel>;

    fn renderer() -> (FakeRenderer, Rc<RefCell<Journal>>, Rc<RefCell<Vec<String>>>) {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let lines = Rc::new(RefCell::new(Vec::new()));
        let surface = FakeSurface {
            journal: journal.clone(),
            next_id: 0,
        };
        let panel = FakePanel {
            lines: lines.clone(),
        };
        let renderer = ActivityRenderer::new(surface, panel, PathStyle::default());
        (renderer, journal, lines)
    }

    fn activity(coords: Vec<GpsPoint>) -> Activity {
        Activity {
            summary: Summary {
                sport: "run".to_owned(),
                timestamp: 1700000000,
                duration: "00:32:10".to_owned(),
                distance: 5.2,
            },
            coords,
        }
    }

    fn two_points() -> Vec<GpsPoint> {
        vec![
            GpsPoint {
                lat: 45.0,
                lng: 7.0,
            },
            GpsPoint {
                lat: 45.1,
                lng: 7.1,
            },
        ]
    }

    #[test]
    fn clear_path_is_idempotent() {
        let (mut renderer, journal, _) = renderer();
        renderer.render("a", &activity(two_points()));
        assert_eq!(journal.borrow().attached.len(), 1);

        renderer.clear_path();
        assert!(journal.borrow().attached.is_empty());

        renderer.clear_path();
        assert!(journal.borrow().attached.is_empty());

        // The second call detached nothing.
        let detaches = journal
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Detach { .. }))
            .count();
        assert_eq!(detaches, 1);
    }

    #[test]
    fn at_most_one_path_attached() {
        let (mut renderer, journal, _) = renderer();
        for i in 0..5 {
            renderer.render(&format!("activity-{i}"), &activity(two_points()));
            assert_eq!(journal.borrow().attached.len(), 1);
        }

        let journal = journal.borrow();
        let draws = journal
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Draw { .. }))
            .count();
        let detaches = journal
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Detach { .. }))
            .count();
        assert_eq!(draws, 5);
        assert_eq!(detaches, 4);
        // The attached path is the most recently drawn one.
        assert_eq!(journal.attached, vec![4]);
    }

    #[test]
    fn summary_has_exactly_four_lines() {
        let (mut renderer, _, lines) = renderer();
        renderer.render("a", &activity(two_points()));

        let lines = lines.borrow();
        assert_eq!(lines.len(), 4);
        // The first line is a localized date, so only check the rest.
        assert_eq!(lines[1], "Sport: run");
        assert_eq!(lines[2], "Duration: 00:32:10");
        assert_eq!(lines[3], "Distance: 5.2 km");
    }

    #[test]
    fn summary_is_rewritten_on_each_render() {
        let (mut renderer, _, lines) = renderer();
        renderer.render("a", &activity(two_points()));

        let mut other = activity(Vec::new());
        other.summary.sport = "swim".to_owned();
        renderer.render("b", &other);

        let lines = lines.borrow();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Sport: swim");
    }

    #[test]
    fn fitted_bounds_cover_every_drawn_point() {
        let (mut renderer, journal, _) = renderer();
        let coords = vec![
            GpsPoint {
                lat: 45.0,
                lng: 7.0,
            },
            GpsPoint {
                lat: 45.5,
                lng: 6.5,
            },
            GpsPoint {
                lat: 44.8,
                lng: 7.3,
            },
        ];
        renderer.render("a", &activity(coords));

        let journal = journal.borrow();
        let points = journal
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Draw { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        let bounds = journal
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Fit { bounds } => Some(*bounds),
                _ => None,
            })
            .unwrap();

        for point in points {
            assert!(bounds.contains(point));
        }
    }

    #[test]
    fn empty_coordinates_draw_nothing() {
        let (mut renderer, journal, lines) = renderer();
        renderer.render("a", &activity(Vec::new()));

        // No path, no fit, but the summary is still rendered.
        assert!(journal.borrow().ops.is_empty());
        assert!(journal.borrow().attached.is_empty());
        assert_eq!(lines.borrow().len(), 4);
        assert_eq!(renderer.shown(), Some("a"));
    }

    #[test]
    fn empty_render_after_full_render_clears_the_path() {
        let (mut renderer, journal, _) = renderer();
        renderer.render("a", &activity(two_points()));
        renderer.render("b", &activity(Vec::new()));
        assert!(journal.borrow().attached.is_empty());
    }

    #[test]
    fn two_point_scenario() {
        let (mut renderer, journal, _) = renderer();
        renderer.render("a", &activity(two_points()));

        let journal = journal.borrow();
        let (points, style) = journal
            .ops
            .iter()
            .find_map(|op| match op {
                Op::Draw { points, style, .. } => Some((points.clone(), style.clone())),
                _ => None,
            })
            .unwrap();

        let expected: Vec<Point<f64>> = two_points()
            .iter()
            .map(|gps| {
                LatLon {
                    lat: gps.lat,
                    lon: gps.lng,
                }
                .as_mercator()
            })
            .collect();
        assert_eq!(points, expected);

        assert!(style.geodesic);
        assert_eq!(style.stroke_color, "#FF0000");
        assert_eq!(style.stroke_opacity, 1.0);
        assert_eq!(style.stroke_weight, 2);
    }

    #[test]
    fn shown_tracks_the_latest_activity() {
        let (mut renderer, _, _) = renderer();
        assert_eq!(renderer.shown(), None);
        renderer.render("a", &activity(two_points()));
        assert_eq!(renderer.shown(), Some("a"));
        renderer.render("b", &activity(two_points()));
        assert_eq!(renderer.shown(), Some("b"));
    }
}
