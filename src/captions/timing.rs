use log::warn;

use crate::captions::segmenter::CaptionLine;
use crate::transcript::Transcript;

// @module: Cue timing strategies

/// A timed caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Start offset in whole seconds
    pub start_secs: u64,

    /// End offset in whole seconds
    pub end_secs: u64,

    pub text: String,
}

impl Cue {
    pub fn new(start_secs: u64, end_secs: u64, text: impl Into<String>) -> Self {
        Self {
            start_secs,
            end_secs,
            text: text.into(),
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.end_secs.saturating_sub(self.start_secs)
    }
}

/// Strategy that assigns a time window to each caption line.
///
/// Implementations must return one cue per line, in order, starting at 0 with each
/// cue's start equal to the previous cue's end.
pub trait CueTimer: Send + Sync {
    /// Time every line, given the transcript the lines were cut from
    fn assign_times(&self, lines: &[CaptionLine], transcript: &Transcript) -> Vec<Cue>;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

/// Line `i` occupies `[i * per_line_seconds, (i + 1) * per_line_seconds)`.
pub fn assign_fixed_times(lines: &[CaptionLine], per_line_seconds: u64) -> Vec<Cue> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let i = i as u64;
            Cue::new(i * per_line_seconds, (i + 1) * per_line_seconds, line.text.clone())
        })
        .collect()
}

/// Content-blind timing: every line gets the same duration
#[derive(Debug, Clone)]
pub struct FixedDurationTimer {
    pub seconds_per_line: u64,
}

impl FixedDurationTimer {
    pub fn new(seconds_per_line: u64) -> Self {
        Self { seconds_per_line }
    }
}

impl Default for FixedDurationTimer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl CueTimer for FixedDurationTimer {
    fn assign_times(&self, lines: &[CaptionLine], _transcript: &Transcript) -> Vec<Cue> {
        assign_fixed_times(lines, self.seconds_per_line)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Timing from engine word timestamps.
///
/// Each line starts on the second its first word was spoken; the first line is pinned to 0
/// and every start is at least one second after the previous one so cues stay contiguous
/// and non-empty. Falls back to fixed timing when the word timings cannot be matched to
/// the lines.
#[derive(Debug, Clone)]
pub struct WordAlignedTimer {
    fallback: FixedDurationTimer,
}

impl WordAlignedTimer {
    pub fn new(fallback_seconds_per_line: u64) -> Self {
        Self {
            fallback: FixedDurationTimer::new(fallback_seconds_per_line),
        }
    }

    fn can_align(lines: &[CaptionLine], transcript: &Transcript) -> bool {
        if lines.iter().any(|line| line.word_count() == 0) {
            return false;
        }
        let expected: usize = lines.iter().map(|line| line.word_count()).sum();
        expected == transcript.words.len()
    }
}

impl CueTimer for WordAlignedTimer {
    fn assign_times(&self, lines: &[CaptionLine], transcript: &Transcript) -> Vec<Cue> {
        if !Self::can_align(lines, transcript) {
            warn!(
                "Word timings ({} words) do not match caption lines; using fixed {}s per line",
                transcript.words.len(),
                self.fallback.seconds_per_line
            );
            return self.fallback.assign_times(lines, transcript);
        }

        let words = &transcript.words;
        let mut starts: Vec<u64> = Vec::with_capacity(lines.len());
        let mut cursor = 0;
        let mut last_word_end_ms = 0;

        for (i, line) in lines.iter().enumerate() {
            let count = line.word_count();
            let spoken_at = words[cursor].start_ms / 1000;
            let start = match starts.last() {
                None => 0,
                Some(previous) => spoken_at.max(previous + 1),
            };
            debug_assert!(i == 0 || start > starts[i - 1]);
            starts.push(start);

            last_word_end_ms = words[cursor + count - 1].end_ms;
            cursor += count;
        }

        let last_start = starts.last().copied().unwrap_or(0);
        let final_end = last_word_end_ms.div_ceil(1000).max(last_start + 1);

        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let end = starts.get(i + 1).copied().unwrap_or(final_end);
                Cue::new(starts[i], end, line.text.clone())
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "word_aligned"
    }
}
