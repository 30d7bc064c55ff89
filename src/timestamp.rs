use std::fmt;

use crate::errors::PipelineError;

// @module: Human-readable timestamps and subtitle clock formatting

/// Parse `ss`, `mm:ss` or `hh:mm:ss` into a whole number of seconds.
///
/// Fields are base-10 unsigned integers. Minutes and seconds are not bounded to `< 60`,
/// so `"01:90"` is 150 seconds.
pub fn parse_timestamp(text: &str) -> Result<u64, PipelineError> {
    let trimmed = text.trim();
    let fields: Vec<&str> = trimmed.split(':').collect();

    if fields.len() > 3 {
        return Err(PipelineError::malformed(
            text,
            format!("expected 1 to 3 ':'-separated fields, found {}", fields.len()),
        ));
    }

    let mut values = Vec::with_capacity(fields.len());
    for field in &fields {
        let value: u64 = field
            .parse()
            .map_err(|_| PipelineError::malformed(text, format!("'{}' is not a base-10 integer", field)))?;
        values.push(value);
    }

    let seconds = match values.as_slice() {
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*s)),
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        [s] => Some(*s),
        _ => return Err(PipelineError::malformed(text, "empty timestamp")),
    };

    seconds.ok_or_else(|| PipelineError::malformed(text, "timestamp overflows"))
}

/// Format whole seconds as a subtitle event clock, `HH:MM:SS.00`.
pub fn format_ass_timestamp(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}.00", hours, minutes, seconds)
}

/// Start/end offsets of the requested clip, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub start_secs: u64,
    pub end_secs: u64,
}

impl ClipRange {
    /// Parse both ends of a clip. Fails before anything is fetched.
    pub fn parse(start: &str, end: &str) -> Result<Self, PipelineError> {
        let start_secs = parse_timestamp(start)?;
        let end_secs = parse_timestamp(end)?;

        if end_secs <= start_secs {
            return Err(PipelineError::malformed(end, "end must be after start"));
        }

        Ok(Self { start_secs, end_secs })
    }

    pub fn duration_secs(&self) -> u64 {
        self.end_secs - self.start_secs
    }
}

impl fmt::Display for ClipRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}s-{}s", self.start_secs, self.end_secs)
    }
}
