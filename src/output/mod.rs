//! Terminal-facing output: the styled writer every reporter renders through, the colorizer
//! palettes and the failure formatters.

use std::io::{self, Write};

use termcolor::WriteColor;

pub mod colorizer;
pub mod formatter;

pub use colorizer::{Colorizer, Style};
pub use formatter::FailureFormatter;

// ============================================================================
// STYLED WRITER
// ============================================================================

/// Writes text to a `WriteColor` sink, applying the colorizer's styles.
///
/// Output is best-effort: a failed write is logged once and later writes are still attempted.
pub struct StyledWriter<W> {
    out: W,
    colorizer: Colorizer,
    write_failed: bool,
}

impl<W: WriteColor> StyledWriter<W> {
    pub fn new(out: W, colorizer: Colorizer) -> Self {
        Self {
            out,
            colorizer,
            write_failed: false,
        }
    }

    pub fn plain(&mut self, text: &str) {
        let result = self.out.write_all(text.as_bytes());
        self.check(result);
    }

    pub fn line(&mut self, text: &str) {
        self.plain(text);
        self.plain("\n");
    }

    /// Writes `text` wrapped in the colors of `style`; the text itself is never altered.
    pub fn styled(&mut self, style: Style, text: &str) {
        let Some(spec) = self.colorizer.spec(style) else {
            self.plain(text);
            return;
        };
        let result = self.out.set_color(&spec);
        self.check(result);
        self.plain(text);
        let result = self.out.reset();
        self.check(result);
    }

    pub fn flush(&mut self) {
        let result = self.out.flush();
        self.check(result);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            if !self.write_failed {
                tracing::warn!(error = %err, "reporter output could not be written");
                self.write_failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::{Ansi, NoColor};

    #[test]
    fn no_color_sink_keeps_text_intact() {
        let mut writer = StyledWriter::new(NoColor::new(Vec::new()), Colorizer::Dark);
        writer.styled(Style::Good, ".");
        writer.styled(Style::Bad, "F");
        writer.line("");
        assert_eq!(writer.into_inner().into_inner(), b".F\n");
    }

    #[test]
    fn ansi_sink_wraps_styled_text() {
        let mut writer = StyledWriter::new(Ansi::new(Vec::new()), Colorizer::Light);
        writer.styled(Style::Bad, "F");
        let bytes = writer.into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("\x1b["));
        assert!(text.contains('F'));
        assert!(text.ends_with("\x1b[0m"));
    }

    #[test]
    fn off_colorizer_writes_no_escape_codes() {
        let mut writer = StyledWriter::new(Ansi::new(Vec::new()), Colorizer::Off);
        writer.styled(Style::Bad, "F");
        assert_eq!(writer.into_inner().into_inner(), b"F");
    }
}
