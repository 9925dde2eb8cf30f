use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};

use crate::wav::{FormatDescriptor, PcmView};

const CONVERSION_TARGET: &str = "pcmwrap::conversion";
const PATH_CHAR_LIMIT: usize = 96;
const TARGET_GUTTER_WIDTH: usize = 20;
const TIMESTAMP_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Summary of one finished conversion, rendered as a block under the log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub input: Option<String>,
    pub output: String,
    pub channels: u16,
    pub sample_width: u16,
    pub sample_rate: u32,
    pub data_bytes: usize,
    pub frames: usize,
    pub trailing_bytes: usize,
    pub peak: Option<u32>,
}

impl ConversionRecord {
    pub fn new(
        input: Option<&Path>,
        output: &Path,
        format: &FormatDescriptor,
        pcm: &PcmView<'_>,
    ) -> Self {
        Self {
            input: input.map(|path| path.display().to_string()),
            output: output.display().to_string(),
            channels: format.channels(),
            sample_width: format.sample_width(),
            sample_rate: format.sample_rate(),
            data_bytes: pcm.byte_len(),
            frames: pcm.frame_count(),
            trailing_bytes: pcm.trailing_bytes(),
            peak: pcm.peak(),
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / f64::from(self.sample_rate)
    }

    pub fn render_pretty(&self, use_color: bool) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "┌─ WAV container ({} ch, {}-bit, {} Hz)",
            self.channels,
            u32::from(self.sample_width) * 8,
            self.sample_rate
        ));

        let source = self.input.as_deref().unwrap_or("<memory>");
        push_body_line(&mut lines, format!("IN  : {}", preview_path(source, use_color)));
        push_body_line(
            &mut lines,
            format!("OUT : {}", preview_path(&self.output, use_color)),
        );
        push_body_line(
            &mut lines,
            format!(
                "data: {} bytes, {} frames, {:.3}s",
                self.data_bytes,
                self.frames,
                self.duration_secs()
            ),
        );
        if let Some(peak) = self.peak {
            push_body_line(&mut lines, format!("peak: {}", peak));
        }
        if self.trailing_bytes > 0 {
            let note = format!("{} trailing bytes after last full frame", self.trailing_bytes);
            let note = if use_color {
                note.yellow().to_string()
            } else {
                note
            };
            push_body_line(&mut lines, note);
        }
        lines.push("└─".to_string());

        lines.join("\n")
    }
}

fn push_body_line(lines: &mut Vec<String>, content: String) {
    lines.push(format!("│ {}", content));
}

fn preview_path(value: &str, use_color: bool) -> String {
    let count = value.chars().count();
    let preview = if count > PATH_CHAR_LIMIT {
        // keep the file name end, which is the informative part
        let tail: String = value.chars().skip(count - PATH_CHAR_LIMIT).collect();
        format!("...{}", tail)
    } else {
        value.to_string()
    };
    if use_color {
        preview.cyan().to_string()
    } else {
        preview
    }
}

#[derive(Debug, Default)]
struct ConversionEventVisitor {
    record_json: Option<String>,
}

impl tracing::field::Visit for ConversionEventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "record_json" {
            self.record_json = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "record_json" && self.record_json.is_none() {
            self.record_json = Some(format!("{value:?}"));
        }
    }
}

#[derive(Default)]
pub struct ConversionFormatter;

impl ConversionFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl<S, N> FormatEvent<S, N> for ConversionFormatter
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let use_color = writer.has_ansi_escapes();

        write_prefix(&mut writer, metadata, use_color)?;
        ctx.format_fields(writer.by_ref(), event)?;
        writer.write_char('\n')?;

        if metadata.target() == CONVERSION_TARGET {
            let mut visitor = ConversionEventVisitor::default();
            event.record(&mut visitor);
            if let Some(json) = visitor.record_json {
                match serde_json::from_str::<ConversionRecord>(&json) {
                    Ok(record) => {
                        writer.write_str(&record.render_pretty(use_color))?;
                        writer.write_char('\n')?;
                    }
                    Err(err) => {
                        writer.write_str("│ Failed to render conversion summary: ")?;
                        writer.write_str(&err.to_string())?;
                        writer.write_char('\n')?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Emits the conversion summary. `build` runs only when the event is enabled.
pub fn record_conversion<F>(build: F)
where
    F: FnOnce() -> ConversionRecord,
{
    if !tracing::enabled!(target: CONVERSION_TARGET, Level::INFO) {
        return;
    }
    let record = build();
    if let Ok(json) = serde_json::to_string(&record) {
        tracing::event!(
            target: CONVERSION_TARGET,
            Level::INFO,
            record_json = json.as_str(),
            frames = record.frames,
            "conversion finished"
        );
    } else {
        tracing::event!(
            target: CONVERSION_TARGET,
            Level::INFO,
            "conversion finished (summary serialization failure)"
        );
    }
}

fn write_prefix(
    writer: &mut Writer<'_>,
    metadata: &tracing::Metadata<'_>,
    use_color: bool,
) -> fmt::Result {
    let timestamp_plain = format_timestamp();
    let timestamp_display = if use_color {
        timestamp_plain.as_str().dimmed().to_string()
    } else {
        timestamp_plain
    };
    writer.write_str(&timestamp_display)?;

    let level_plain = format!("{:>5}", metadata.level());
    let level_display = if use_color {
        color_level(&level_plain, *metadata.level())
    } else {
        level_plain.clone()
    };
    if !level_plain.starts_with(' ') {
        writer.write_char(' ')?;
    }
    writer.write_str(&level_display)?;
    writer.write_char(' ')?;

    let target_text = format!("{:<width$}", metadata.target(), width = TARGET_GUTTER_WIDTH);
    let target_text = if use_color {
        target_text.blue().dimmed().to_string()
    } else {
        target_text
    };
    writer.write_str(&target_text)?;
    writer.write_str(": ")?;

    Ok(())
}

fn color_level(text: &str, level: Level) -> String {
    match level {
        Level::ERROR => text.red().bold().to_string(),
        Level::WARN => text.yellow().bold().to_string(),
        Level::INFO => text.green().to_string(),
        Level::DEBUG => text.cyan().to_string(),
        Level::TRACE => text.dimmed().to_string(),
    }
}

fn format_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| "0000-00-00 00:00:00".to_string())
}
