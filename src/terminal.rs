//! Terminal integration: sizing the frame to the window and emitting it.

use std::io::{self, BufWriter, Write};

use crossterm::terminal;

/// Clamp a requested frame size to what the current terminal can show.
/// Each pixel prints two glyphs wide, and one row is left for the shell
/// prompt after the frame.
pub fn fit_to_terminal(width: usize, height: usize) -> io::Result<(usize, usize)> {
    let (cols, rows) = terminal::size()?;
    Ok(clamp_to(width, height, cols as usize, rows as usize))
}

fn clamp_to(width: usize, height: usize, cols: usize, rows: usize) -> (usize, usize) {
    let max_width = (cols / 2).max(1);
    let max_height = rows.saturating_sub(1).max(1);
    (width.min(max_width), height.min(max_height))
}

/// Write the rendered frame to stdout through a buffered writer in a
/// single pass.
pub fn write_frame(frame: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    out.write_all(frame.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_halves_columns() {
        assert_eq!(clamp_to(500, 500, 160, 50), (80, 49));
    }

    #[test]
    fn test_small_frame_untouched() {
        assert_eq!(clamp_to(20, 20, 160, 50), (20, 20));
    }

    #[test]
    fn test_degenerate_terminal_keeps_one_pixel() {
        assert_eq!(clamp_to(500, 500, 0, 0), (1, 1));
    }
}
