use crate::graphics::Canvas;
use crate::scrolling::ScrollingBuffer;

/// Shortest plot window, seconds
pub const MIN_HISTORY: f64 = 1.0;
/// Longest plot window, seconds
pub const MAX_HISTORY: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotConfig {
    /// Width of the time window ending at the newest sample, seconds
    pub history: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            history: 10.0,
            y_min: -1.0,
            y_max: 1.0,
        }
    }
}

impl PlotConfig {
    /// Lengthens or shortens the window, staying within the allowed range
    pub fn adjust_history(&mut self, delta: f64) {
        self.history = (self.history + delta).clamp(MIN_HISTORY, MAX_HISTORY);
    }
}

/// Draws a scrolling line plot of `buffer` over `[now - history, now]`.
///
/// The plot area is the whole canvas except the left label column. Samples
/// outside the y range are clipped by the canvas; non-finite samples break
/// the line.
pub fn draw_plot(
    canvas: &mut Canvas,
    buffer: &ScrollingBuffer,
    now: f64,
    config: &PlotConfig,
    label: &str,
) {
    const LABEL_WIDTH: usize = 8;
    let width = canvas.width();
    let height = canvas.height();
    if width <= LABEL_WIDTH + 1 || height < 2 {
        return;
    }

    let plot_w = (width - LABEL_WIDTH - 1) as f64;
    let plot_h = (height - 1) as f64;
    let x_min = now - config.history;
    let to_cell = |x: f64, y: f64| {
        [
            LABEL_WIDTH as f64 + (x - x_min) / config.history * plot_w,
            (config.y_max - y) / (config.y_max - config.y_min) * plot_h,
        ]
    };

    // Zero line
    if config.y_min < 0.0 && config.y_max > 0.0 {
        let row = to_cell(x_min, 0.0)[1];
        canvas.draw_line([LABEL_WIDTH as f64, row], [(width - 1) as f64, row], (1.0, 1.0), '.');
    }

    let mut previous: Option<[f64; 2]> = None;
    for (x, y) in buffer.points() {
        let (x, y) = (f64::from(x), f64::from(y));
        if x < x_min || !y.is_finite() {
            previous = None;
            continue;
        }
        let cell = to_cell(x, y);
        match previous {
            Some(prev) => canvas.draw_line(prev, cell, (0.0, 0.0), '*'),
            None => canvas.plot(cell[0].round() as isize, cell[1].round() as isize, '*', 0.0),
        }
        previous = Some(cell);
    }

    canvas.text(0, 0, &format!("{:>7.2}", config.y_max));
    canvas.text(0, height - 1, &format!("{:>7.2}", config.y_min));
    canvas.text(0, height / 2, &format!("{label:>7.7}"));
    canvas.text(LABEL_WIDTH, height - 1, &format!("[{:.0}s]", config.history));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(canvas: &Canvas, y: usize) -> String {
        canvas.rows().nth(y).unwrap()
    }

    #[test]
    fn flat_signal_draws_a_horizontal_line() {
        let mut buffer = ScrollingBuffer::new(100).unwrap();
        for i in 0..=50 {
            buffer.add_point(i as f32 * 0.1, 0.5);
        }
        let config = PlotConfig::default();
        let mut canvas = Canvas::new(40, 9);
        draw_plot(&mut canvas, &buffer, 5.0, &config, "qvel1");

        // y = 0.5 maps to row 2 of 0..=8
        let line = row(&canvas, 2);
        assert!(line[8..].contains("***"), "{line:?}");
        // Zero line sits in the middle
        assert!(row(&canvas, 4).contains("...."));
    }

    #[test]
    fn samples_older_than_history_are_skipped() {
        let mut buffer = ScrollingBuffer::new(100).unwrap();
        buffer.add_point(0.0, 0.9);
        buffer.add_point(0.1, 0.9);
        let config = PlotConfig {
            history: 1.0,
            ..PlotConfig::default()
        };
        let mut canvas = Canvas::new(40, 9);
        draw_plot(&mut canvas, &buffer, 20.0, &config, "x");
        let drawn: String = canvas.rows().collect();
        assert!(!drawn.contains('*'));
    }

    #[test]
    fn huge_and_non_finite_samples_are_clipped() {
        let mut buffer = ScrollingBuffer::new(100).unwrap();
        buffer.add_point(0.0, 0.0);
        buffer.add_point(1.0, 3e38);
        buffer.add_point(2.0, -1e30);
        buffer.add_point(3.0, f32::NAN);
        buffer.add_point(4.0, 0.5);
        let config = PlotConfig {
            y_min: 0.0,
            y_max: 1e-6,
            ..PlotConfig::default()
        };
        let mut canvas = Canvas::new(40, 9);
        let started = std::time::Instant::now();
        draw_plot(&mut canvas, &buffer, 5.0, &config, "x");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        let drawn: String = canvas.rows().collect();
        assert!(drawn.contains('*'));
    }

    #[test]
    fn history_stays_in_range() {
        let mut config = PlotConfig::default();
        config.adjust_history(100.0);
        assert_eq!(config.history, MAX_HISTORY);
        config.adjust_history(-100.0);
        assert_eq!(config.history, MIN_HISTORY);
    }
}
