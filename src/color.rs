use comfy_table::{Cell, Color};

// ---------------------------------------------------------------------------
// Sign colouring for deviations from a group mean
// ---------------------------------------------------------------------------

/// Above the mean is green, below is red, on the mean keeps the default.
pub fn deviation_color(deviation: f64) -> Option<Color> {
    if deviation > 0.0 {
        Some(Color::Green)
    } else if deviation < 0.0 {
        Some(Color::Red)
    } else {
        None
    }
}

/// Apply [`deviation_color`] to a cell.
pub fn colored(cell: Cell, deviation: f64) -> Cell {
    match deviation_color(deviation) {
        Some(c) => cell.fg(c),
        None => cell,
    }
}
