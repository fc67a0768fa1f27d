use machine_learning::{Dataset, OriginalLine};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset as Series, GraphType, Paragraph},
};

use crate::theme::Theme;

/// Share of the data range added on each side of both axes.
const PADDING: f64 = 0.05;

/// A regression line to draw over the data, in the dataset's units.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLine {
    pub label: String,
    pub line: OriginalLine,
    pub color: Color,
}

impl PlotLine {
    pub fn new(label: impl Into<String>, line: OriginalLine, color: Color) -> Self {
        Self {
            label: label.into(),
            line,
            color,
        }
    }
}

/// A `PlotLine` evaluated at both ends of the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub plot: PlotLine,
    pub segment: [(f64, f64); 2],
}

/// Everything a chart needs, computed once per dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    points: Vec<(f64, f64)>,
    lines: Vec<ChartLine>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartData {
    /// Builds the scatter points, the line segments and the axis bounds.
    ///
    /// The x axis spans the data, the y axis spans both the data and every line over the x
    /// axis, so no line leaves the plot. Both are padded and a constant axis is widened.
    pub fn new(dataset: &Dataset, lines: &[PlotLine]) -> Self {
        let points: Vec<(f64, f64)> = dataset
            .x()
            .iter()
            .zip(dataset.y().iter())
            .map(|(&x, &y)| (x, y))
            .collect();

        let (x_min, x_max) = extent(points.iter().map(|&(x, _)| x));
        let x_bounds = pad(x_min, x_max);

        let lines: Vec<ChartLine> = lines
            .iter()
            .map(|plot| ChartLine {
                segment: x_bounds.map(|x| (x, plot.line.predict(x))),
                plot: plot.clone(),
            })
            .collect();

        let ys = points
            .iter()
            .map(|&(_, y)| y)
            .chain(lines.iter().flat_map(|l| l.segment.iter().map(|&(_, y)| y)))
            .filter(|y| y.is_finite());
        let (y_min, y_max) = extent(ys);

        Self {
            points,
            lines,
            x_bounds,
            y_bounds: pad(y_min, y_max),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn lines(&self) -> &[ChartLine] {
        &self.lines
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        self.x_bounds
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn pad(min: f64, max: f64) -> [f64; 2] {
    let span = max - min;
    let margin = if span > 0.0 {
        span * PADDING
    } else {
        (min.abs() * PADDING).max(1.0)
    };

    [min - margin, max + margin]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = bounds[0] + (bounds[1] - bounds[0]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Span::raw(format!("{v:.2}")))
        .collect()
}

/// Draws the data and the line at `selected`, with a key hint underneath.
///
/// # Arguments
/// * `frame` - The frame to draw on, the whole area is used.
/// * `data` - The chart contents.
/// * `selected` - Index into `data.lines()`, out of range draws the data alone.
pub fn render(frame: &mut Frame, data: &ChartData, selected: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.size());

    let position = if selected < data.lines.len() { selected + 1 } else { 0 };
    let selected = data.lines.get(selected);
    let title = match selected {
        Some(line) => format!("Linear Regression ({})", line.plot.label),
        None => "Linear Regression".to_string(),
    };

    let mut series = vec![
        Series::default()
            .name("Data Points")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Theme::POINTS))
            .data(&data.points),
    ];

    if let Some(line) = selected {
        series.push(
            Series::default()
                .name(line.plot.line.to_string())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line.plot.color))
                .data(&line.segment),
        );
    }

    let chart = Chart::new(series)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, Theme::title())),
        )
        .x_axis(
            Axis::default()
                .title("x (Independent Variable)")
                .style(Theme::axis())
                .bounds(data.x_bounds)
                .labels(axis_labels(data.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("y (Dependent Variable)")
                .style(Theme::axis())
                .bounds(data.y_bounds)
                .labels(axis_labels(data.y_bounds)),
        )
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, rows[0]);

    let hint = format!(
        "Left/Right: switch line ({}/{})  q: quit",
        position,
        data.lines.len()
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, Theme::hint()))),
        rows[1],
    );
}
