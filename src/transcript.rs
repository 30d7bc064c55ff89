use serde::{Deserialize, Serialize};

// @module: Speech-to-text output shared by providers and the caption core

/// One recognized word with its position in the audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Full result of transcribing one audio clip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Flat transcript text
    pub text: String,

    /// Word timings, empty when the engine did not report them
    #[serde(default)]
    pub words: Vec<TimedWord>,
}

impl Transcript {
    /// Transcript with no word timings
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<TimedWord>) -> Self {
        self.words = words;
        self
    }

    pub fn has_word_timings(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
