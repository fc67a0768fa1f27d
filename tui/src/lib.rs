//! Terminal charts for fitted regression lines.
//!
//! Every coordinate handled here is in the dataset's own units, lines fitted in normalized
//! space have to be converted with `FittedRegression::original_line` first.

mod app;
mod chart;
mod line_arg;
mod theme;

pub use app::{App, run};
pub use chart::{ChartData, ChartLine, PlotLine, render};
pub use line_arg::parse_plot_line;
pub use theme::Theme;
