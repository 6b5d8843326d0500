//! Info reporter: `begin`/`end` blocks per context with a tally of the subtree, and a
//! bracketed status per example.

use termcolor::WriteColor;

use super::{write_summary, Aggregator, Reporter};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, Style, StyledWriter};

const INDENT: &str = "  ";

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    passed: usize,
    failed: usize,
    skipped: usize,
    errors: usize,
}

impl Tally {
    fn absorb(&mut self, child: Tally) {
        self.passed += child.passed;
        self.failed += child.failed;
        self.skipped += child.skipped;
        self.errors += child.errors;
    }

    fn describe(&self) -> String {
        let mut text = format!("{} passed, {} failed", self.passed, self.failed);
        if self.skipped > 0 {
            text.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.errors > 0 {
            text.push_str(&format!(", {} errors", self.errors));
        }
        text
    }
}

pub struct InfoReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
    tallies: Vec<Tally>,
}

impl<W: WriteColor> InfoReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter, colorizer: Colorizer) -> Self {
        Self {
            out: StyledWriter::new(out, colorizer),
            formatter,
            stats: Aggregator::new(),
            tallies: Vec::new(),
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

    fn status(&mut self, style: Style, tag: &str, name: &str) {
        let indent = self.indent();
        self.out.plain(&indent);
        self.out.styled(style, tag);
        self.out.line(&format!(" {}", name));
        self.out.flush();
    }

    fn tally(&mut self) -> Option<&mut Tally> {
        self.tallies.last_mut()
    }
}

impl<W: WriteColor> Reporter for InfoReporter<W> {
    fn test_run_starting(&mut self) {
        self.stats.reset();
        self.tallies.clear();
    }

    fn context_starting(&mut self, name: &str) {
        let indent = self.indent();
        self.out.plain(&indent);
        self.out.styled(Style::Emphasis, "begin");
        self.out.line(&format!(" {}", name));
        self.stats.push_context(name);
        self.tallies.push(Tally::default());
    }

    fn context_ended(&mut self, name: &str) {
        self.stats.pop_context();
        let finished = self.tallies.pop().unwrap_or_default();
        if let Some(parent) = self.tally() {
            parent.absorb(finished);
        }
        let indent = self.indent();
        self.out.plain(&indent);
        self.out.styled(Style::Emphasis, "end");
        self.out
            .line(&format!(" {} ({})", name, finished.describe()));
        self.out.flush();
    }

    fn it_starting(&mut self, _name: &str) {}

    fn it_succeeded(&mut self, name: &str) {
        self.stats.record_success();
        if let Some(t) = self.tally() {
            t.passed += 1;
        }
        self.status(Style::Good, "[ PASS ]", name);
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.stats.record_failure(name, failure);
        if let Some(t) = self.tally() {
            t.failed += 1;
        }
        self.status(Style::Bad, "[ FAIL ]", name);
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.stats.record_unknown_error(name);
        if let Some(t) = self.tally() {
            t.failed += 1;
        }
        self.status(Style::Bad, "[ ERROR ]", name);
    }

    fn it_skip(&mut self, name: &str) {
        self.stats.record_skip();
        if let Some(t) = self.tally() {
            t.skipped += 1;
        }
        self.status(Style::Neutral, "[ SKIP ]", name);
    }

    fn test_run_error(&mut self, context_name: &str, message: &str) {
        self.stats.record_run_error(message);
        if let Some(t) = self.tally() {
            t.errors += 1;
        }
        self.status(Style::Bad, "[ ERROR ]", &format!("setting up {}", context_name));
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
