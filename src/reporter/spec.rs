//! Spec reporter: an indented `describe` / `- it ... OK` listing of the whole run.

use termcolor::WriteColor;

use super::{write_summary, Aggregator, Reporter};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, Style, StyledWriter};

const INDENT: &str = "  ";

pub struct SpecReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
}

impl<W: WriteColor> SpecReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter, colorizer: Colorizer) -> Self {
        Self {
            out: StyledWriter::new(out, colorizer),
            formatter,
            stats: Aggregator::new(),
        }
    }

    pub fn writer(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn indent(&self) -> String {
        INDENT.repeat(self.stats.depth())
    }

    fn verdict(&mut self, style: Style, word: &str) {
        self.out.styled(style, word);
        self.out.line("");
        self.out.flush();
    }
}

impl<W: WriteColor> Reporter for SpecReporter<W> {
    fn test_run_starting(&mut self) {
        self.stats.reset();
    }

    fn context_starting(&mut self, name: &str) {
        let indent = self.indent();
        self.out.plain(&indent);
        self.out.styled(Style::Emphasis, &format!("describe {}", name));
        self.out.line("");
        self.stats.push_context(name);
    }

    fn context_ended(&mut self, _name: &str) {
        self.stats.pop_context();
    }

    fn it_starting(&mut self, name: &str) {
        let indent = self.indent();
        self.out.plain(&format!("{}- it {} ... ", indent, name));
        self.out.flush();
    }

    fn it_succeeded(&mut self, _name: &str) {
        self.stats.record_success();
        self.verdict(Style::Good, "OK");
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.stats.record_failure(name, failure);
        self.verdict(Style::Bad, "FAILED");
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.stats.record_unknown_error(name);
        self.verdict(Style::Bad, "ERROR");
    }

    fn it_skip(&mut self, name: &str) {
        self.stats.record_skip();
        let indent = self.indent();
        self.out.plain(&format!("{}- it {} ... ", indent, name));
        self.verdict(Style::Neutral, "SKIPPED");
    }

    fn test_run_error(&mut self, _context_name: &str, message: &str) {
        self.stats.record_run_error(message);
        let indent = self.indent();
        self.out.plain(&indent);
        self.verdict(Style::Bad, "SETUP ERROR");
    }

    fn test_run_complete(&mut self) {
        self.out.line("");
        write_summary(&mut self.out, &self.stats, self.formatter);
        self.out.flush();
    }

    fn did_we_pass(&self) -> bool {
        self.stats.did_we_pass()
    }
}
