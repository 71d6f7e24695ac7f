use crate::config::LayoutConfig;
use crate::theme::Theme;

use super::TextBlock;

/// Wraps a node label to the configured width and measures the block.
pub(crate) fn measure_label(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    measure_label_with_font_size(text, theme.font_size, config)
}

pub(crate) fn measure_label_with_font_size(
    text: &str,
    font_size: f32,
    config: &LayoutConfig,
) -> TextBlock {
    let max_width_px = (config.max_label_width_chars.max(1) as f32) * average_char_width(font_size);
    let mut lines: Vec<String> = split_lines(text)
        .into_iter()
        .flat_map(|line| wrap_line(&line, max_width_px, font_size))
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }

    let width = lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * font_size * config.label_line_height;

    TextBlock {
        lines,
        width,
        height,
    }
}

// Proportional serif widths, em units.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.25,
        '.' | ',' | ':' | ';' | '|' | '!' | '\'' | '(' | ')' | '[' | ']' => 0.28,
        'i' | 'j' | 'l' | 't' | 'f' | 'r' | 'I' => 0.3,
        'm' | 'w' => 0.78,
        'M' | 'W' => 0.9,
        'A'..='Z' => 0.68,
        '0'..='9' => 0.5,
        '@' | '#' | '%' | '&' => 0.9,
        _ => 0.5,
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

fn wrap_line(line: &str, max_width: f32, font_size: f32) -> Vec<String> {
    if text_width(line, font_size) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

fn average_char_width(font_size: f32) -> f32 {
    font_size * 0.5
}
