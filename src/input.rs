//! Keys and taps, both normalised to a `char`.

use ratzilla::event::KeyCode;
use ratzilla::ratatui::layout::Rect;

/// A screen region that acts like pressing `key`.
#[derive(Debug, Clone)]
pub struct TapTarget {
    pub rect: Rect,
    pub key: char,
}

/// Targets from the last drawn frame plus the grid size they were drawn at.
#[derive(Default)]
pub struct TapTargets {
    pub targets: Vec<TapTarget>,
    pub cols: u16,
    pub rows: u16,
}

impl TapTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.targets.clear();
        self.cols = cols;
        self.rows = rows;
    }

    pub fn add(&mut self, rect: Rect, key: char) {
        self.targets.push(TapTarget { rect, key });
    }

    /// One full-width line of `area` at absolute `row`. Rows outside `area` are skipped.
    pub fn add_row(&mut self, area: Rect, row: u16, key: char) {
        if row >= area.y && row < area.y + area.height {
            self.add(Rect::new(area.x, row, area.width, 1), key);
        }
    }

    /// Key for a tap on cell (`col`, `row`). Later targets sit on top.
    pub fn hit(&self, col: u16, row: u16) -> Option<char> {
        self.targets.iter().rev().find_map(|t| {
            let r = t.rect;
            (col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height).then_some(t.key)
        })
    }

    /// Key for a tap at pixel offset (`x`, `y`) inside a grid of `width`×`height` pixels.
    pub fn hit_pixel(&self, x: f64, y: f64, width: f64, height: f64) -> Option<char> {
        let col = pixel_to_cell(x, width, self.cols)?;
        let row = pixel_to_cell(y, height, self.rows)?;
        self.hit(col, row)
    }
}

/// Cell index along one axis, or `None` outside the grid.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / f64::from(cells))) as u16;
    (cell < cells).then_some(cell)
}

/// Phones get the stacked layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Map a key event to the router's key alphabet.
pub fn key_char(code: &KeyCode) -> Option<char> {
    match code {
        KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
        KeyCode::Left => Some('h'),
        KeyCode::Right => Some('l'),
        KeyCode::Esc => Some('b'),
        KeyCode::Enter => Some(' '),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_inside_and_outside() {
        let mut t = TapTargets::new();
        t.reset(80, 24);
        t.add(Rect::new(10, 5, 20, 2), 'p');
        assert_eq!(t.hit(10, 5), Some('p'));
        assert_eq!(t.hit(29, 6), Some('p'));
        assert_eq!(t.hit(30, 5), None);
        assert_eq!(t.hit(10, 7), None);
    }

    #[test]
    fn later_target_wins() {
        let mut t = TapTargets::new();
        t.add(Rect::new(0, 0, 80, 10), ' ');
        t.add(Rect::new(0, 3, 80, 1), '2');
        assert_eq!(t.hit(4, 3), Some('2'));
        assert_eq!(t.hit(4, 4), Some(' '));
    }

    #[test]
    fn add_row_respects_area() {
        let mut t = TapTargets::new();
        let area = Rect::new(2, 10, 40, 3);
        t.add_row(area, 9, 'x');
        t.add_row(area, 13, 'x');
        assert!(t.targets.is_empty());
        t.add_row(area, 11, '1');
        assert_eq!(t.hit(2, 11), Some('1'));
        assert_eq!(t.hit(1, 11), None);
    }

    #[test]
    fn reset_clears() {
        let mut t = TapTargets::new();
        t.add(Rect::new(0, 0, 1, 1), 'a');
        t.reset(40, 30);
        assert_eq!(t.hit(0, 0), None);
        assert_eq!((t.cols, t.rows), (40, 30));
    }

    #[test]
    fn pixel_conversion() {
        // 30 rows over 450px: 15px each
        assert_eq!(pixel_to_cell(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_to_cell(16.0, 450.0, 30), Some(1));
        assert_eq!(pixel_to_cell(449.0, 450.0, 30), Some(29));
        assert_eq!(pixel_to_cell(450.0, 450.0, 30), None);
        assert_eq!(pixel_to_cell(-1.0, 450.0, 30), None);
        assert_eq!(pixel_to_cell(10.0, 0.0, 30), None);
        assert_eq!(pixel_to_cell(10.0, 450.0, 0), None);
    }

    #[test]
    fn tap_pipeline() {
        let mut t = TapTargets::new();
        t.reset(40, 20);
        t.add_row(Rect::new(0, 0, 40, 20), 12, 'w');
        // 400x300 grid: 10px columns, 15px rows
        assert_eq!(t.hit_pixel(55.0, 12.0 * 15.0 + 3.0, 400.0, 300.0), Some('w'));
        assert_eq!(t.hit_pixel(55.0, 11.0 * 15.0 + 3.0, 400.0, 300.0), None);
    }

    #[test]
    fn narrow_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(key_char(&KeyCode::Char('P')), Some('p'));
        assert_eq!(key_char(&KeyCode::Left), Some('h'));
        assert_eq!(key_char(&KeyCode::Right), Some('l'));
        assert_eq!(key_char(&KeyCode::Esc), Some('b'));
        assert_eq!(key_char(&KeyCode::Tab), None);
    }
}
