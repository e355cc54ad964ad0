//! Geometry for the built-in canvas renderer
//!
//! Everything here is pure math over CSS pixels so the browser side only has
//! to issue draw calls.

/// Margins around the plot area, room for tick labels and axis titles
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 12.0;
const MARGIN_BOTTOM: f64 = 52.0;

/// Number of horizontal grid lines (and y tick labels)
pub const Y_TICKS: usize = 5;

/// Minimum horizontal room for one x label
const MIN_LABEL_SPACING: f64 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        let left = MARGIN_LEFT.min(width / 2.0);
        let bottom = (height - MARGIN_BOTTOM).max(MARGIN_TOP);
        Self {
            left,
            top: MARGIN_TOP,
            right: (width - MARGIN_RIGHT).max(left),
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The y range shown on the chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    /// Fit the non-null values, padding a flat series so it is not drawn on
    /// the plot border.
    pub fn fit(values: &[Option<f64>]) -> Self {
        let range = values.iter().flatten().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        });

        match range {
            None => Self { min: 0.0, max: 1.0 },
            Some((lo, hi)) if lo == hi => {
                let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
                Self {
                    min: lo - pad,
                    max: hi + pad,
                }
            }
            Some((lo, hi)) => {
                let pad = (hi - lo) * 0.05;
                Self {
                    min: lo - pad,
                    max: hi + pad,
                }
            }
        }
    }

    /// Tick values from top to bottom
    pub fn ticks(&self) -> Vec<f64> {
        (0..Y_TICKS)
            .map(|i| self.max - (self.max - self.min) * (i as f64 / (Y_TICKS - 1) as f64))
            .collect()
    }

    pub fn y_for(&self, value: f64, area: &PlotArea) -> f64 {
        let span = (self.max - self.min).max(f64::EPSILON);
        area.bottom - area.height() * ((value - self.min) / span)
    }
}

/// x coordinate of the `index`-th of `count` points
pub fn x_for(index: usize, count: usize, area: &PlotArea) -> f64 {
    if count <= 1 {
        return area.left + area.width() / 2.0;
    }
    area.left + area.width() * (index as f64 / (count - 1) as f64)
}

/// Project values to canvas coordinates, `None` for gaps.
pub fn project(values: &[Option<f64>], scale: &ValueScale, area: &PlotArea) -> Vec<Option<(f64, f64)>> {
    let count = values.len();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| v.map(|v| (x_for(i, count, area), scale.y_for(v, area))))
        .collect()
}

/// Split projected points into runs without gaps; each run is drawn as one
/// polyline and one filled area.
pub fn segments(points: &[Option<(f64, f64)>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for point in points {
        match point {
            Some(p) => current.push(*p),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Bezier control points for each point of a run, as `(incoming, outgoing)`.
///
/// Same cardinal spline as Chart.js line tension: `0.0` gives straight
/// segments, larger values round the curve.
pub fn control_points(run: &[(f64, f64)], tension: f64) -> Vec<((f64, f64), (f64, f64))> {
    (0..run.len())
        .map(|i| {
            let current = run[i];
            let previous = if i == 0 { current } else { run[i - 1] };
            let next = run.get(i + 1).copied().unwrap_or(current);

            let d01 = distance(previous, current);
            let d12 = distance(current, next);
            let total = d01 + d12;
            if total == 0.0 {
                return (current, current);
            }

            let fa = tension * d01 / total;
            let fb = tension * d12 / total;
            let dx = next.0 - previous.0;
            let dy = next.1 - previous.1;

            (
                (current.0 - fa * dx, current.1 - fa * dy),
                (current.0 + fb * dx, current.1 + fb * dy),
            )
        })
        .collect()
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

/// Draw every `stride`-th x label so that labels do not overlap.
pub fn label_stride(count: usize, area: &PlotArea) -> usize {
    if count == 0 {
        return 1;
    }
    let fits = (area.width() / MIN_LABEL_SPACING).floor().max(1.0) as usize;
    count.div_ceil(fits).max(1)
}

/// Compact tick label
pub fn format_tick(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 1_000_000_000.0 {
        format!("{}{:.1}G", sign, abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{}{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{:.1}K", sign, abs / 1_000.0)
    } else if abs >= 10.0 {
        format!("{}{:.0}", sign, abs)
    } else if abs >= 0.01 {
        format!("{}{:.2}", sign, abs)
    } else if abs == 0.0 {
        "0".to_string()
    } else {
        format!("{}{:.3}", sign, abs)
    }
}
