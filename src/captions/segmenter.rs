use std::fmt;

use log::debug;

// @module: Greedy transcript line wrapping

/// One display line of caption text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    /// Position in the caption sequence, 0-based
    pub index: usize,

    /// Space-joined words
    pub text: String,
}

impl CaptionLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Length in characters, the unit `max_len` is measured in
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl fmt::Display for CaptionLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Split a transcript into lines of at most `max_len` characters.
///
/// Words are taken greedily in order and joined by single spaces. A word that would push
/// the current line past `max_len` starts a new line; a word longer than `max_len` still
/// gets a line of its own. The last line is always emitted, so an empty transcript yields
/// one empty line.
pub fn segment(text: &str, max_len: usize) -> Vec<CaptionLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_len {
            lines.push(CaptionLine::new(lines.len(), std::mem::take(&mut current)));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    lines.push(CaptionLine::new(lines.len(), current));

    debug!("Segmented transcript into {} caption line(s) (max {} chars)", lines.len(), max_len);
    lines
}
