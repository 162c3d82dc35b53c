use crate::camera::CameraState;
use crate::sim::Segment;
use crate::vertex::{project, Vertex};

/// Character grid with a per-cell depth buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<char>,
    depth: Vec<f64>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            cells: vec![' '; width * height],
            depth: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Writes `ch` if the cell is on the grid and nothing nearer is there
    pub fn plot(&mut self, x: isize, y: isize, ch: char, depth: f64) {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return;
        }
        let offset = y as usize * self.width + x as usize;
        if depth <= self.depth[offset] {
            self.depth[offset] = depth;
            self.cells[offset] = ch;
        }
    }

    /// Writes text on top of everything, clipped to the grid
    pub fn text(&mut self, x: usize, y: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.plot((x + i) as isize, y as isize, ch, f64::NEG_INFINITY);
        }
    }

    /// One string per row
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.width.max(1)).map(|row| row.iter().collect())
    }

    /// Draws a line between two grid points using Bresenham's algorithm,
    /// interpolating depth along the way. The segment is clipped to the grid
    /// first so far off-grid endpoints cost nothing; non-finite ones draw nothing.
    pub fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], depths: (f64, f64), ch: char) {
        let Some(([from, to], [t_from, t_to])) = self.clip(from, to) else {
            return;
        };
        let depth_at = |t: f64| depths.0 + (depths.1 - depths.0) * t;
        let depths = (depth_at(t_from), depth_at(t_to));

        let (mut x0, mut y0, x1, y1) = (
            from[0].round() as isize,
            from[1].round() as isize,
            to[0].round() as isize,
            to[1].round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy
        let total = dx.max(-dy).max(1) as f64;
        let mut walked = 0.0;

        loop {
            let depth = depths.0 + (depths.1 - depths.0) * (walked / total);
            self.plot(x0, y0, ch, depth);

            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            walked += 1.0;
        }
    }

    /// Cohen-Sutherland clip of `from -> to` against the grid plus a one-cell
    /// margin. Returns the clipped endpoints and where they sit along the
    /// original segment, `0..=1`.
    fn clip(&self, from: [f64; 2], to: [f64; 2]) -> Option<([[f64; 2]; 2], [f64; 2])> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const ABOVE: u8 = 4;
        const BELOW: u8 = 8;

        if !from.iter().chain(to.iter()).all(|v| v.is_finite()) {
            return None;
        }
        let (min, max_x, max_y) = (-1.0, self.width as f64, self.height as f64);
        let outcode = |p: [f64; 2]| {
            let mut code = 0;
            if p[0] < min {
                code |= LEFT;
            } else if p[0] > max_x {
                code |= RIGHT;
            }
            if p[1] < min {
                code |= ABOVE;
            } else if p[1] > max_y {
                code |= BELOW;
            }
            code
        };
        let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
        let param = |p: [f64; 2]| {
            if dx.abs() >= dy.abs() && dx != 0.0 {
                (p[0] - from[0]) / dx
            } else if dy != 0.0 {
                (p[1] - from[1]) / dy
            } else {
                0.0
            }
        };

        let mut ends = [from, to];
        loop {
            let codes = [outcode(ends[0]), outcode(ends[1])];
            if codes[0] | codes[1] == 0 {
                let t = [param(ends[0]).clamp(0.0, 1.0), param(ends[1]).clamp(0.0, 1.0)];
                return Some((ends, t));
            }
            if codes[0] & codes[1] != 0 {
                return None;
            }
            let i = if codes[0] != 0 { 0 } else { 1 };
            let [a, b] = ends;
            let code = codes[i];
            ends[i] = if code & ABOVE != 0 {
                [a[0] + (b[0] - a[0]) * (min - a[1]) / (b[1] - a[1]), min]
            } else if code & BELOW != 0 {
                [a[0] + (b[0] - a[0]) * (max_y - a[1]) / (b[1] - a[1]), max_y]
            } else if code & LEFT != 0 {
                [min, a[1] + (b[1] - a[1]) * (min - a[0]) / (b[0] - a[0])]
            } else {
                [max_x, a[1] + (b[1] - a[1]) * (max_x - a[0]) / (b[0] - a[0])]
            };
        }
    }
}

/// Picks a glyph that follows the on-screen slope of a line
pub fn line_glyph(from: [f64; 2], to: [f64; 2]) -> char {
    let dx = to[0] - from[0];
    // Rows are about twice as tall as columns are wide
    let dy = (to[1] - from[1]) * 2.0;
    if dx.abs() > 2.0 * dy.abs() {
        '-'
    } else if dy.abs() > 2.0 * dx.abs() {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Draws a projected segment; segments crossing the near plane are skipped
fn draw_segment(
    canvas: &mut Canvas,
    camera: &CameraState,
    segment: &Segment,
    glyph: Option<char>,
) -> Option<(Vertex, Vertex)> {
    let a = project(&segment.start, camera, canvas.width(), canvas.height())?;
    let b = project(&segment.end, camera, canvas.width(), canvas.height())?;
    let ch = glyph.unwrap_or_else(|| line_glyph(a.screen_position, b.screen_position));
    canvas.draw_line(a.screen_position, b.screen_position, (a.depth(), b.depth()), ch);
    Some((a, b))
}

/// Ground grid on the z = 0 plane, `lines` lines per direction
pub fn ground_grid(half_size: f64, lines: usize) -> Vec<Segment> {
    let lines = lines.max(2);
    let mut segments = Vec::with_capacity(2 * lines);
    for i in 0..lines {
        let s = -half_size + 2.0 * half_size * i as f64 / (lines - 1) as f64;
        segments.push(Segment {
            start: [s, -half_size, 0.0],
            end: [s, half_size, 0.0],
        });
        segments.push(Segment {
            start: [-half_size, s, 0.0],
            end: [half_size, s, 0.0],
        });
    }
    segments
}

/// Renders the ground and the simulation's wireframe as seen from `camera`
pub fn render_scene(canvas: &mut Canvas, camera: &CameraState, segments: &[Segment], extent: f64) {
    for segment in ground_grid(extent, 9) {
        draw_segment(canvas, camera, &segment, Some('.'));
    }
    for segment in segments {
        if let Some((a, b)) = draw_segment(canvas, camera, segment, None) {
            // Joints sit slightly in front so they win over the links
            for v in [a, b] {
                canvas.plot(
                    v.screen_position[0].round() as isize,
                    v.screen_position[1].round() as isize,
                    'o',
                    v.depth() - 1e-6,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_covers_both_endpoints() {
        let mut canvas = Canvas::new(10, 5);
        canvas.draw_line([1.0, 1.0], [8.0, 3.0], (1.0, 1.0), '#');
        assert_eq!(canvas.get(1, 1), Some('#'));
        assert_eq!(canvas.get(8, 3), Some('#'));
        assert_eq!(canvas.get(0, 0), Some(' '));
    }

    #[test]
    fn nearer_lines_win() {
        let mut canvas = Canvas::new(10, 3);
        canvas.draw_line([0.0, 1.0], [9.0, 1.0], (1.0, 1.0), 'a');
        canvas.draw_line([0.0, 1.0], [9.0, 1.0], (5.0, 5.0), 'b');
        assert_eq!(canvas.get(4, 1), Some('a'));
        canvas.draw_line([0.0, 1.0], [9.0, 1.0], (0.5, 0.5), 'c');
        assert_eq!(canvas.get(4, 1), Some('c'));
    }

    #[test]
    fn drawing_is_clipped_to_the_grid() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_line([-10.0, -10.0], [20.0, 20.0], (1.0, 1.0), '#');
        canvas.text(2, 0, "long text");
        assert_eq!(canvas.rows().count(), 4);
        assert_eq!(canvas.rows().next().unwrap(), "# lo");
    }

    #[test]
    fn far_off_grid_endpoints_are_clipped() {
        let mut canvas = Canvas::new(40, 9);
        let started = std::time::Instant::now();
        canvas.draw_line([10.0, 4.0], [11.0, 1e30], (0.0, 0.0), '#');
        canvas.draw_line([-1e6, 4.0], [1e6, 4.0], (0.0, 0.0), '-');
        canvas.draw_line([30.0, -1e30], [30.0, 2.0], (0.0, 0.0), '|');
        canvas.draw_line([0.0, 0.0], [f64::NAN, 3.0], (0.0, 0.0), 'x');
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        assert_eq!(canvas.get(10, 4), Some('-'));
        assert_eq!(canvas.get(10, 8), Some('#'));
        assert_eq!(canvas.get(0, 4), Some('-'));
        assert_eq!(canvas.get(39, 4), Some('-'));
        assert_eq!(canvas.get(30, 0), Some('|'));
        assert_eq!(canvas.get(30, 3), Some(' '));
        assert_eq!(canvas.get(0, 0), Some(' '));
    }

    #[test]
    fn glyph_follows_slope() {
        assert_eq!(line_glyph([0.0, 0.0], [10.0, 0.0]), '-');
        assert_eq!(line_glyph([0.0, 0.0], [0.0, 10.0]), '|');
        assert_eq!(line_glyph([0.0, 0.0], [4.0, 2.0]), '\\');
        assert_eq!(line_glyph([0.0, 2.0], [4.0, 0.0]), '/');
    }

    #[test]
    fn scene_draws_segments_in_view() {
        let camera = CameraState::framing(2.0, [0.0, 0.0, 0.5]);
        let mut canvas = Canvas::new(60, 20);
        let segment = Segment {
            start: [-0.3, 0.0, 0.5],
            end: [0.3, 0.0, 0.5],
        };
        render_scene(&mut canvas, &camera, &[segment], 1.0);
        let drawn: String = canvas.rows().collect();
        assert!(drawn.contains('o'));
        assert!(drawn.contains('.'));
    }
}
