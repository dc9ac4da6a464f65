use crate::metrics::{FontFace, TextMeasure};

/// Text that would need to shrink below this fraction of the ideal size
/// keeps the ideal size and wraps instead.
pub const MIN_SHRINK_RATIO: f64 = 0.9;

const WRAP_TOLERANCE: f64 = 0.01;

/// Picks the size a string is drawn at. Slightly-too-wide text shrinks so it
/// fits on one line; anything else stays at `ideal`.
pub fn fit_font_size(ideal: f64, natural_width: f64, available: f64) -> f64 {
    if natural_width <= 0.0 || available <= 0.0 {
        return ideal;
    }
    let needed = ideal * available / natural_width;
    if ideal * MIN_SHRINK_RATIO < needed && needed < ideal {
        needed
    } else {
        ideal
    }
}

/// Greedy word wrap. Runs of whitespace collapse to one space, and a word
/// wider than the column is broken between characters.
pub fn wrap_lines(
    measure: &dyn TextMeasure,
    face: FontFace,
    size: f64,
    text: &str,
    width: f64,
) -> Vec<String> {
    let limit = width + WRAP_TOLERANCE;
    let fits = |candidate: &str| measure.width(face, size, candidate) <= limit;

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            if fits(word) {
                current.push_str(word);
            } else {
                current = break_word(word, &fits, &mut lines);
            }
            continue;
        }

        let candidate = format!("{current} {word}");
        if fits(&candidate) {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            if fits(word) {
                current.push_str(word);
            } else {
                current = break_word(word, &fits, &mut lines);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// Pushes full chunks onto `lines` and returns the trailing partial chunk.
fn break_word(word: &str, fits: &dyn Fn(&str) -> bool, lines: &mut Vec<String>) -> String {
    let mut chunk = String::new();
    for ch in word.chars() {
        let mut candidate = chunk.clone();
        candidate.push(ch);
        if chunk.is_empty() || fits(&candidate) {
            chunk = candidate;
        } else {
            lines.push(std::mem::replace(&mut chunk, ch.to_string()));
        }
    }
    chunk
}
