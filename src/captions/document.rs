use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::app_config::StyleConfig;
use crate::captions::timing::Cue;
use crate::errors::PipelineError;
use crate::timestamp::format_ass_timestamp;

// @module: Advanced SubStation Alpha document rendering

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, BackColour, Bold, Italic, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";
const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Override tag that pins a line to the top-center of the frame
pub const TOP_ALIGNMENT_TAG: &str = r"{\an8}";

/// A complete subtitle document: header, one style and one event per cue
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    style: StyleConfig,
    cues: Vec<Cue>,
}

impl SubtitleDocument {
    /// Assemble a document from timed cues
    pub fn build(cues: Vec<Cue>, style: &StyleConfig) -> Self {
        Self {
            style: style.clone(),
            cues,
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Render the document text
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the rendered document, creating the parent directory if needed
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, PipelineError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;

        debug!("Wrote {} subtitle event(s) to {}", self.cues.len(), path.display());
        Ok(path.to_path_buf())
    }

    fn style_record(&self) -> String {
        let s = &self.style;
        format!(
            "Style: {},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            s.name,
            s.font_name,
            s.font_size,
            s.primary_colour,
            s.back_colour,
            ass_bool(s.bold),
            ass_bool(s.italic),
            s.border_style,
            s.outline,
            s.shadow,
            s.alignment,
            s.margin_l,
            s.margin_r,
            s.margin_v,
            s.encoding,
        )
    }

    fn event_record(&self, cue: &Cue) -> String {
        let prefix = if self.style.force_top { TOP_ALIGNMENT_TAG } else { "" };
        format!(
            "Dialogue: 0,{},{},{},,0,0,0,,{}{}",
            format_ass_timestamp(cue.start_secs),
            format_ass_timestamp(cue.end_secs),
            self.style.name,
            prefix,
            escape_event_text(&cue.text),
        )
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[Script Info]")?;
        writeln!(f, "Title: {}", self.style.title)?;
        writeln!(f, "ScriptType: v4.00+")?;
        writeln!(f, "PlayResX: {}", self.style.play_res_x)?;
        writeln!(f, "PlayResY: {}", self.style.play_res_y)?;
        writeln!(f)?;
        writeln!(f, "[V4+ Styles]")?;
        writeln!(f, "{}", STYLE_FORMAT)?;
        writeln!(f, "{}", self.style_record())?;
        writeln!(f)?;
        writeln!(f, "[Events]")?;
        writeln!(f, "{}", EVENT_FORMAT)?;
        for cue in &self.cues {
            writeln!(f, "{}", self.event_record(cue))?;
        }
        Ok(())
    }
}

fn ass_bool(value: bool) -> i8 {
    if value { -1 } else { 0 }
}

/// Make caption text safe for the last field of a Dialogue record.
///
/// Override-block braces are escaped, newlines become hard breaks and commas are replaced
/// with U+201A so the record always has the same number of fields. A literal backslash is
/// followed by U+200B so libass cannot read it as the start of `\N`, `\h` or a brace escape.
pub fn escape_event_text(text: &str) -> String {
    text.replace('\\', "\\\u{200B}")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace("\r\n", "\\N")
        .replace(&['\n', '\r'][..], "\\N")
        .replace(',', "\u{201A}")
}
