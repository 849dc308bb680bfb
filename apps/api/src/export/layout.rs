//! Page geometry for exported reports.
//!
//! Reports are set in Courier, so every glyph is 0.6 em wide and the usable
//! width is a fixed number of columns. Wrapping is greedy by word; words wider
//! than a line are hard-split.

use serde::{Deserialize, Serialize};

/// Courier advance width in em units, identical for every glyph.
pub const COURIER_CHAR_WIDTH_EM: f32 = 0.6;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for one exported page. Lengths are in PDF points (1/72").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_pt: f32,
    pub font_size_pt: f32,
    /// Baseline-to-baseline distance.
    pub leading_pt: f32,
    /// Lines reserved at the bottom of each page for the page footer.
    pub footer_lines: u16,
}

/// US letter (8.5" × 11"), 0.75" margins, Courier 10pt on 13pt leading.
impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_width_pt: 612.0,
            page_height_pt: 792.0,
            margin_pt: 54.0,
            font_size_pt: 10.0,
            leading_pt: 13.0,
            footer_lines: 2,
        }
    }
}

impl PageConfig {
    /// Characters that fit on one line. Never less than 20.
    pub fn columns(&self) -> usize {
        let usable = self.page_width_pt - 2.0 * self.margin_pt;
        let per_char = self.font_size_pt * COURIER_CHAR_WIDTH_EM;
        if per_char <= 0.0 {
            return 20;
        }
        ((usable / per_char).floor() as usize).max(20)
    }

    /// Body lines per page, excluding the footer. Never less than 5.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height_pt - 2.0 * self.margin_pt;
        if self.leading_pt <= 0.0 {
            return 5;
        }
        let total = (usable / self.leading_pt).floor() as usize;
        total.saturating_sub(self.footer_lines as usize).max(5)
    }

    /// Baseline of the first body line, measured from the page bottom.
    pub fn first_baseline_pt(&self) -> f32 {
        self.page_height_pt - self.margin_pt - self.font_size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping and pagination
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap of one logical line. Leading indentation is kept and
/// repeated on continuation lines. A blank line wraps to a single "".
pub fn wrap_line(line: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return vec![String::new()];
    }

    let indent_len = line.chars().count() - trimmed.chars().count();
    // Deep indents would leave no room for text.
    let indent = " ".repeat(indent_len.min(columns / 2));
    let width = columns - indent.len();

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in trimmed.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        // Hard-split words that can never fit.
        while chars.len() > width {
            if current_len > 0 {
                lines.push(format!("{indent}{current}"));
                current.clear();
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(format!("{indent}{}", chars.iter().collect::<String>()));
            chars = rest;
        }
        if chars.is_empty() {
            continue;
        }

        let word_len = chars.len();
        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
        if needed > width {
            lines.push(format!("{indent}{current}"));
            current.clear();
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(format!("{indent}{current}"));
    }
    lines
}

/// Wraps every line and splits the result into pages. Always returns at
/// least one page.
pub fn paginate(lines: &[String], config: &PageConfig) -> Vec<Vec<String>> {
    let columns = config.columns();
    let per_page = config.lines_per_page();

    let wrapped: Vec<String> = lines
        .iter()
        .flat_map(|line| wrap_line(line, columns))
        .collect();

    if wrapped.is_empty() {
        return vec![Vec::new()];
    }
    wrapped.chunks(per_page).map(<[String]>::to_vec).collect()
}
