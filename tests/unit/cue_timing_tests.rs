/*!
 * Tests for cue timing strategies
 */

use shortcap::app_config::{CaptionConfig, TimingStrategy};
use shortcap::captions::{CueTimer, FixedDurationTimer, WordAlignedTimer, assign_fixed_times, segment, timer_for};
use shortcap::transcript::{TimedWord, Transcript};

fn timed(text: &str, spacing_ms: u64) -> Transcript {
    let words = text
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| {
            let start = i as u64 * spacing_ms;
            TimedWord {
                text: w.to_string(),
                start_ms: start,
                end_ms: start + spacing_ms / 2,
            }
        })
        .collect();
    Transcript::from_text(text).with_words(words)
}

fn assert_contiguous(cues: &[shortcap::captions::Cue]) {
    assert_eq!(cues.first().map(|c| c.start_secs), Some(0));
    for pair in cues.windows(2) {
        assert_eq!(pair[0].end_secs, pair[1].start_secs);
    }
    for cue in cues {
        assert!(cue.end_secs > cue.start_secs);
    }
}

#[test]
fn test_assignFixedTimes_fiveLines_shouldUseTwoSecondWindows() {
    let lines = segment("the quick brown fox jumps over the lazy dog", 10);
    let cues = assign_fixed_times(&lines, 2);

    let windows: Vec<(u64, u64)> = cues.iter().map(|c| (c.start_secs, c.end_secs)).collect();
    assert_eq!(windows, vec![(0, 2), (2, 4), (4, 6), (6, 8), (8, 10)]);
    assert_eq!(cues[2].text, "jumps over");
}

#[test]
fn test_fixedTimer_ignoresWordTimings_shouldMatchFixedFunction() {
    let text = "one two three four five six";
    let lines = segment(text, 8);
    let transcript = timed(text, 5000);

    let cues = FixedDurationTimer::new(3).assign_times(&lines, &transcript);
    assert_eq!(cues, assign_fixed_times(&lines, 3));
    assert_contiguous(&cues);
}

#[test]
fn test_wordAlignedTimer_slowSpeech_shouldStretchCues() {
    let text = "one two three four five six";
    let lines = segment(text, 8);
    let transcript = timed(text, 2500);

    let cues = WordAlignedTimer::new(2).assign_times(&lines, &transcript);
    assert_contiguous(&cues);
    assert_eq!(cues.len(), lines.len());
    // last word starts at 12.5s and ends at 13.75s
    assert_eq!(cues.last().map(|c| c.end_secs), Some(14));
}

#[test]
fn test_wordAlignedTimer_noWords_shouldFallBackToFixed() {
    let lines = segment("nothing timed here", 8);
    let cues = WordAlignedTimer::new(2).assign_times(&lines, &Transcript::from_text("nothing timed here"));
    assert_eq!(cues, assign_fixed_times(&lines, 2));
}

#[test]
fn test_wordAlignedTimer_emptyTranscript_shouldYieldOneEmptyCue() {
    let lines = segment("", 40);
    let cues = WordAlignedTimer::new(2).assign_times(&lines, &Transcript::default());
    assert_eq!(cues.len(), 1);
    assert_eq!((cues[0].start_secs, cues[0].end_secs), (0, 2));
}

#[test]
fn test_timerFor_config_shouldSelectStrategy() {
    let mut config = CaptionConfig::default();
    assert_eq!(timer_for(&config).name(), "fixed");

    config.timing = TimingStrategy::WordAligned;
    assert_eq!(timer_for(&config).name(), "word_aligned");
}
