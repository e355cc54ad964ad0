//! Light/dark chart colors

/// Line and point color
pub const LINE_COLOR: &str = "#6366f1";

/// Gradient under the line, top stop then bottom stop
pub const GRADIENT_STOPS: [(f64, &str); 2] = [
    (0.0, "rgba(99,102,241,0.35)"),
    (1.0, "rgba(99,102,241,0.05)"),
];

pub const X_GRID_COLOR: &str = "transparent";
pub const Y_GRID_COLOR: &str = "rgba(0,0,0,0.04)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Tick and axis title color
    pub fn axis_color(self) -> &'static str {
        match self {
            Theme::Dark => "#9CA3AF",
            Theme::Light => "#6B7280",
        }
    }
}
