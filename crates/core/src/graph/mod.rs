use serde::{Deserialize, Serialize};

use crate::GraphConfig;

/// Number of intervals on the value axis; there is one tick more than this.
pub const AXIS_DIVISIONS: usize = 10;

/// Value range assumed when every visible sample has the same value.
const FLAT_RANGE: f32 = 5.0;
/// Head room added above and below the value range, relative to its size.
const RANGE_PADDING: f32 = 0.2;

/// Position inside the chart area, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f32,
    pub y: f32,
}

impl GraphPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: GraphPoint, t: f32) -> GraphPoint {
        GraphPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Straight segment joining two consecutive points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLink {
    pub from: GraphPoint,
    pub to: GraphPoint,
}

impl GraphLink {
    pub fn length(&self) -> f32 {
        (self.to.x - self.from.x).hypot(self.to.y - self.from.y)
    }

    pub fn midpoint(&self) -> GraphPoint {
        self.from.lerp(self.to, 0.5)
    }

    /// Rotation of the segment in degrees, counter-clockwise from the x axis.
    pub fn angle_degrees(&self) -> f32 {
        (self.to.y - self.from.y)
            .atan2(self.to.x - self.from.x)
            .to_degrees()
    }
}

/// Tick on the value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Height of the tick inside the chart area.
    pub position: f32,
    pub value: f32,
    pub label: String,
}

/// Geometry of the NPS line graph for a fixed-size chart area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphLayout {
    width: f32,
    height: f32,
    first_index: usize,
    y_min: f32,
    y_max: f32,
    points: Vec<GraphPoint>,
    ticks: Vec<AxisTick>,
}

impl GraphLayout {
    /// Lays out `values` left to right. When `config.max_visible` is set only
    /// the trailing values are placed; the rest have no point.
    pub fn new(values: &[f32], config: &GraphConfig) -> Self {
        let visible_count = config
            .max_visible
            .filter(|&max| max > 0)
            .map_or(values.len(), |max| max.min(values.len()));
        let first_index = values.len() - visible_count;
        let visible = &values[first_index..];

        let mut layout = Self {
            width: config.width,
            height: config.height,
            first_index,
            ..Default::default()
        };
        if visible.is_empty() {
            return layout;
        }

        let mut y_max = visible.iter().copied().fold(f32::MIN, f32::max);
        let mut y_min = visible.iter().copied().fold(f32::MAX, f32::min);
        let mut range = y_max - y_min;
        if range <= 0.0 {
            range = FLAT_RANGE;
        }
        y_max += range * RANGE_PADDING;
        y_min -= range * RANGE_PADDING;
        if config.origin_zero {
            y_min = 0.0;
        }

        let x_step = config.width / (visible_count + 1) as f32;
        layout.points = visible
            .iter()
            .enumerate()
            .map(|(k, value)| {
                GraphPoint::new(
                    x_step * (k + 1) as f32,
                    (value - y_min) / (y_max - y_min) * config.height,
                )
            })
            .collect();

        layout.ticks = (0..=AXIS_DIVISIONS)
            .map(|j| {
                let fraction = j as f32 / AXIS_DIVISIONS as f32;
                let value = y_min + fraction * (y_max - y_min);
                AxisTick {
                    position: fraction * config.height,
                    value,
                    label: format!("{}", value.round() as i64),
                }
            })
            .collect();

        layout.y_min = y_min;
        layout.y_max = y_max;
        layout
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Value range covered by the vertical axis.
    pub fn value_range(&self) -> (f32, f32) {
        (self.y_min, self.y_max)
    }

    pub fn points(&self) -> &[GraphPoint] {
        &self.points
    }

    pub fn ticks(&self) -> &[AxisTick] {
        &self.ticks
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point of the sample at `sample_index` in the full value list, if it
    /// is visible.
    pub fn point(&self, sample_index: usize) -> Option<GraphPoint> {
        sample_index
            .checked_sub(self.first_index)
            .and_then(|index| self.points.get(index))
            .copied()
    }

    pub fn links(&self) -> impl Iterator<Item = GraphLink> + '_ {
        self.points.windows(2).map(|pair| GraphLink {
            from: pair[0],
            to: pair[1],
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    const EPS: f32 = 1e-4;

    fn config(width: f32, height: f32) -> GraphConfig {
        GraphConfig {
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn empty_values_have_no_geometry() {
        let layout = GraphLayout::new(&[], &GraphConfig::default());
        assert!(layout.is_empty());
        assert!(layout.ticks().is_empty());
        assert_eq!(layout.links().count(), 0);
        assert_eq!(layout.point(0), None);
    }

    #[test]
    fn spreads_points_evenly_with_padding() {
        let layout = GraphLayout::new(&[0.0, 10.0, 0.0], &config(100.0, 70.0));

        let (y_min, y_max) = layout.value_range();
        assert_approx_eq!(y_min, -2.0, EPS);
        assert_approx_eq!(y_max, 12.0, EPS);

        let points = layout.points();
        assert_eq!(points.len(), 3);
        assert_approx_eq!(points[0].x, 25.0, EPS);
        assert_approx_eq!(points[1].x, 50.0, EPS);
        assert_approx_eq!(points[2].x, 75.0, EPS);
        assert_approx_eq!(points[0].y, 10.0, EPS);
        assert_approx_eq!(points[1].y, 60.0, EPS);
    }

    #[test]
    fn flat_values_use_default_range() {
        let layout = GraphLayout::new(&[3.0, 3.0], &config(90.0, 50.0));
        let (y_min, y_max) = layout.value_range();
        assert_approx_eq!(y_min, 2.0, EPS);
        assert_approx_eq!(y_max, 4.0, EPS);
        assert_approx_eq!(layout.points()[0].y, 25.0, EPS);
    }

    #[test]
    fn origin_zero_anchors_axis() {
        let mut cfg = config(100.0, 100.0);
        cfg.origin_zero = true;
        let layout = GraphLayout::new(&[0.0, 10.0], &cfg);

        assert_eq!(layout.value_range().0, 0.0);
        assert_eq!(layout.points()[0].y, 0.0);
    }

    #[test]
    fn builds_eleven_labelled_ticks() {
        let layout = GraphLayout::new(&[0.0, 10.0], &config(100.0, 50.0));
        let ticks = layout.ticks();

        assert_eq!(ticks.len(), AXIS_DIVISIONS + 1);
        assert_eq!(ticks[0].position, 0.0);
        assert_approx_eq!(ticks[10].position, 50.0, EPS);
        assert_eq!(ticks[0].label, "-2");
        assert_eq!(ticks[10].label, "12");
    }

    #[test]
    fn limits_to_trailing_values() {
        let mut cfg = config(40.0, 10.0);
        cfg.max_visible = Some(3);
        let layout = GraphLayout::new(&[9.0, 1.0, 2.0, 3.0], &cfg);

        assert_eq!(layout.points().len(), 3);
        assert_eq!(layout.point(0), None);
        assert_approx_eq!(layout.point(1).unwrap().x, 10.0, EPS);
        assert_approx_eq!(layout.point(3).unwrap().x, 30.0, EPS);
    }

    #[test]
    fn links_join_neighbours() {
        let layout = GraphLayout::new(&[0.0, 10.0, 0.0], &config(100.0, 70.0));
        let links: Vec<_> = layout.links().collect();

        assert_eq!(links.len(), 2);
        assert_approx_eq!(links[0].length(), 25.0_f32.hypot(50.0), EPS);
        assert!(links[0].angle_degrees() > 0.0);
        assert!(links[1].angle_degrees() < 0.0);
        assert_approx_eq!(links[0].midpoint().x, 37.5, EPS);
    }
}
