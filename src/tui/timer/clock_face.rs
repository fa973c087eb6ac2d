//! Five-row block digits for the running clock.

use crate::model::clock_parts;

pub const GLYPH_ROWS: usize = 5;

const DIGITS: [[&str; GLYPH_ROWS]; 10] = [
    [" ███ ", "█   █", "█   █", "█   █", " ███ "],
    ["  █  ", " ██  ", "  █  ", "  █  ", "█████"],
    [" ███ ", "█   █", "   █ ", "  █  ", "█████"],
    [" ███ ", "█   █", "  ██ ", "█   █", " ███ "],
    ["█   █", "█   █", "█████", "    █", "    █"],
    ["█████", "█    ", "████ ", "    █", "████ "],
    [" ███ ", "█    ", "████ ", "█   █", " ███ "],
    ["█████", "    █", "   █ ", "  █  ", " █   "],
    [" ███ ", "█   █", " ███ ", "█   █", " ███ "],
    [" ███ ", "█   █", " ████", "    █", " ███ "],
];

const COLON: [&str; GLYPH_ROWS] = ["     ", "  █  ", "     ", "  █  ", "     "];

/// `HH:MM:SS` once an hour has passed, `MM:SS` before that
pub fn clock_text(elapsed_secs: u64) -> String {
    let (h, m, s) = clock_parts(elapsed_secs);
    if h > 0 {
        format!("{:02}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

/// The clock text drawn as block glyphs, one string per row
pub fn big_clock(elapsed_secs: u64) -> [String; GLYPH_ROWS] {
    let mut rows: [String; GLYPH_ROWS] = Default::default();
    for c in clock_text(elapsed_secs).chars() {
        let glyph = match c.to_digit(10) {
            Some(d) => &DIGITS[d as usize],
            None => &COLON,
        };
        for (row, part) in rows.iter_mut().zip(glyph) {
            if !row.is_empty() {
                row.push(' ');
            }
            row.push_str(part);
        }
    }
    rows
}
