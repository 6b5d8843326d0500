//! Singleline reporter: one progress line, rewritten after every example.

use termcolor::WriteColor;

use super::{write_summary, Aggregator, Reporter};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, Style, StyledWriter};

pub struct SinglelineReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
    /// Width of the line currently on screen, so a shorter redraw can blank the rest.
    drawn_width: usize,
}

impl<W: WriteColor> SinglelineReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter, colorizer: Colorizer) -> Self {
        Self {
            out: StyledWriter::new(out, colorizer),
            formatter,
            stats: Aggregator::new(),
            drawn_width: 0,
        }
    }

    pub fn writer(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn progress(&mut self, running: Option<&str>) {
        let executed = format!("Executed {} tests.", self.stats.examples_run);
        let failed = (self.stats.failed > 0).then(|| format!(" {} failed.", self.stats.failed));
        let skipped =
            (self.stats.skipped > 0).then(|| format!(" {} skipped.", self.stats.skipped));
        let running = running.map(|name| format!(" Running \"{}\"", name));

        self.out.plain("\r");
        self.out.plain(&executed);
        if let Some(text) = &failed {
            self.out.styled(Style::Bad, text);
        }
        if let Some(text) = &skipped {
            self.out.styled(Style::Neutral, text);
        }
        if let Some(text) = &running {
            self.out.plain(text);
        }

        let width = [Some(&executed), failed.as_ref(), skipped.as_ref(), running.as_ref()]
            .into_iter()
            .flatten()
            .map(|text| text.chars().count())
            .sum::<usize>();
        if width < self.drawn_width {
            self.out.plain(&" ".repeat(self.drawn_width - width));
        }
        self.drawn_width = width;
        self.out.flush();
    }
}

impl<W: WriteColor> Reporter for SinglelineReporter<W> {
    fn test_run_starting(&mut self) {
        self.stats.reset();
        self.drawn_width = 0;
    }

    fn context_starting(&mut self, name: &str) {
        self.stats.push_context(name);
    }

    fn context_ended(&mut self, _name: &str) {
        self.stats.pop_context();
    }

    fn it_starting(&mut self, name: &str) {
        let full_name = self.stats.full_name(name);
        self.progress(Some(&full_name));
    }

    fn it_succeeded(&mut self, _name: &str) {
        self.stats.record_success();
        self.progress(None);
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.stats.record_failure(name, failure);
        self.progress(None);
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.stats.record_unknown_error(name);
        self.progress(None);
    }

    fn it_skip(&mut self, _name: &str) {
        self.stats.record_skip();
        self.progress(None);
    }

    fn test_run_error(&mut self, _context_name: &str, message: &str) {
        self.stats.record_run_error(message);
    }

    fn test_run_complete(&mut self) {
        self.out.line("");
        self.drawn_width = 0;
        write_summary(&mut self.out, &self.stats, self.formatter);
        self.out.flush();
    }

    fn did_we_pass(&self) -> bool {
        self.stats.did_we_pass()
    }
}
