/*!
 * Caption core: turns a flat transcript into a timed subtitle document.
 *
 * - `segmenter`: greedy wrapping of transcript words into display lines
 * - `timing`: `CueTimer` strategies that give each line a time window
 * - `document`: rendering of the header, style and event records
 */

pub mod document;
pub mod segmenter;
pub mod timing;

pub use document::{SubtitleDocument, escape_event_text};
pub use segmenter::{CaptionLine, segment};
pub use timing::{Cue, CueTimer, FixedDurationTimer, WordAlignedTimer, assign_fixed_times};

use log::debug;

use crate::app_config::{CaptionConfig, StyleConfig, TimingStrategy};
use crate::transcript::Transcript;

/// Create the cue timer selected in the caption config
pub fn timer_for(config: &CaptionConfig) -> Box<dyn CueTimer> {
    match config.timing {
        TimingStrategy::Fixed => Box::new(FixedDurationTimer::new(config.seconds_per_line)),
        TimingStrategy::WordAligned => Box::new(WordAlignedTimer::new(config.seconds_per_line)),
    }
}

/// Segment, time and assemble the subtitle document for one transcript
pub fn build_subtitles(
    transcript: &Transcript,
    captions: &CaptionConfig,
    style: &StyleConfig,
) -> SubtitleDocument {
    let lines = segment(&transcript.text, captions.max_line_len);
    let timer = timer_for(captions);
    let cues = timer.assign_times(&lines, transcript);

    debug!("Timed {} cue(s) with the '{}' strategy", cues.len(), timer.name());
    SubtitleDocument::build(cues, style)
}
