use std::io::Write;

use log::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    util::num::{format_real, usize_to_f64},
};

/// Receives the data of `plot` calls.
///
/// `plot(y)` calls [`Plotter::plot`] with `y` alone, `plot(x, y)` with both
/// series. Every call is followed by [`Plotter::show`], which receives the
/// interpreter's output sink so that text figures land next to `print`
/// output.
pub trait Plotter {
    /// Adds a series to the current figure.
    ///
    /// # Errors
    /// A message describing why the data cannot be plotted.
    fn plot(&mut self, series: &[f64], other: Option<&[f64]>) -> Result<(), String>;

    /// Displays the current figure.
    ///
    /// # Parameters
    /// - `out`: The sink `print` writes to. Plotters that draw elsewhere may
    ///   ignore it.
    ///
    /// # Errors
    /// A message describing why the figure cannot be shown.
    fn show(&mut self, out: &mut dyn Write) -> Result<(), String>;
}

/// Markers used for the successive series of one figure.
const MARKERS: [char; 4] = ['*', '+', 'o', 'x'];

/// Draws figures as ASCII charts into the interpreter's output.
#[derive(Debug, Clone)]
pub struct TextPlotter {
    width:   usize,
    height:  usize,
    pending: Vec<(Vec<f64>, Vec<f64>)>,
}

impl Default for TextPlotter {
    fn default() -> Self {
        Self::new(60, 15)
    }
}

/// Maps `fraction` in `[0, 1]` onto one of `cells` positions.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell(fraction: f64, cells: usize) -> usize {
    let position = (fraction * usize_to_f64(cells - 1)).round();
    (position.max(0.0) as usize).min(cells - 1)
}

/// The bounds of the finite values, widened when they coincide.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo == hi { (lo - 1.0, hi + 1.0) } else { (lo, hi) }
}

impl TextPlotter {
    /// Creates a plotter drawing on a grid of `width` × `height` characters.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width:   width.max(2),
               height:  height.max(2),
               pending: Vec::new(), }
    }

    /// Renders the pending series as text.
    #[must_use]
    pub fn render(&self) -> String {
        let points: Vec<(f64, f64)> = self.pending
                                          .iter()
                                          .flat_map(|(xs, ys)| xs.iter().copied().zip(ys.iter().copied()))
                                          .filter(|(x, y)| x.is_finite() && y.is_finite())
                                          .collect();
        if points.is_empty() {
            return "(empty plot)\n".to_string();
        }

        let (x_lo, x_hi) = bounds(points.iter().map(|p| p.0));
        let (y_lo, y_hi) = bounds(points.iter().map(|p| p.1));

        let mut grid = vec![vec![' '; self.width]; self.height];
        for (marker, (xs, ys)) in MARKERS.iter().cycle().zip(&self.pending) {
            for (&x, &y) in xs.iter().zip(ys).filter(|(x, y)| x.is_finite() && y.is_finite()) {
                let col = cell((x - x_lo) / (x_hi - x_lo), self.width);
                let row = self.height - 1 - cell((y - y_lo) / (y_hi - y_lo), self.height);
                grid[row][col] = *marker;
            }
        }

        let top = format_real(y_hi);
        let bottom = format_real(y_lo);
        let label_width = top.len().max(bottom.len());

        let mut text = String::new();
        for (i, row) in grid.iter().enumerate() {
            let label = match i {
                0 => top.as_str(),
                _ if i == self.height - 1 => bottom.as_str(),
                _ => "",
            };
            text.push_str(&format!("{label:>label_width$} |{}\n", row.iter().collect::<String>()));
        }
        text.push_str(&format!("{:>label_width$} +{}\n", "", "-".repeat(self.width)));

        let left = format_real(x_lo);
        let right = format_real(x_hi);
        let gap = self.width.saturating_sub(left.len() + right.len());
        text.push_str(&format!("{:>label_width$}  {left}{}{right}\n", "", " ".repeat(gap)));
        text
    }
}

impl Plotter for TextPlotter {
    fn plot(&mut self, series: &[f64], other: Option<&[f64]>) -> Result<(), String> {
        let (xs, ys) = match other {
            Some(ys) => {
                if series.len() != ys.len() {
                    return Err(format!("x and y must have the same length, got {} and {}",
                                       series.len(),
                                       ys.len()));
                }
                (series.to_vec(), ys.to_vec())
            },
            None => ((0..series.len()).map(usize_to_f64).collect(), series.to_vec()),
        };

        self.pending.push((xs, ys));
        Ok(())
    }

    fn show(&mut self, out: &mut dyn Write) -> Result<(), String> {
        let text = self.render();
        self.pending.clear();

        out.write_all(text.as_bytes()).map_err(|e| e.to_string())?;
        out.flush().map_err(|e| e.to_string())
    }
}

/// Flattens a plot argument into its values.
fn series_data(value: &Value, line: usize) -> EvalResult<Vec<f64>> {
    match value {
        Value::Array(tensor) => Ok(tensor.data().to_vec()),
        v if v.is_numeric() => Ok(vec![v.as_real(line)?]),
        other => Err(RuntimeError::TypeError { details: format!("plot() expects numbers or arrays, found {}",
                                                                other.type_name()),
                                               line }),
    }
}

impl Interpreter {
    /// Evaluates a call to `plot` with already evaluated arguments.
    ///
    /// `plot(y)` and `plot(x, y)` hand their data to the plotter and then ask
    /// it to show the figure. The call returns `None`.
    ///
    /// # Errors
    /// - `RuntimeError::ArgumentCountMismatch` for anything but one or two
    ///   arguments.
    /// - `RuntimeError::TypeError` for arguments that are not numbers or
    ///   arrays.
    /// - `RuntimeError::Plot` if the plotter fails.
    pub(crate) fn eval_plot(&mut self, args: &[Value], line: usize) -> EvalResult<Value> {
        let series = match args {
            [y] => (series_data(y, line)?, None),
            [x, y] => (series_data(x, line)?, Some(series_data(y, line)?)),
            _ => {
                return Err(RuntimeError::ArgumentCountMismatch { name: "plot".to_string(),
                                                                 expected: "1 or 2".to_string(),
                                                                 found: args.len(),
                                                                 line });
            },
        };
        trace!("plotting {} point(s)", series.0.len());

        let to_plot_error = |details: String| RuntimeError::Plot { details, line };
        self.plotter.plot(&series.0, series.1.as_deref()).map_err(to_plot_error)?;
        self.plotter.show(&mut *self.out).map_err(to_plot_error)?;

        Ok(Value::None)
    }
}
