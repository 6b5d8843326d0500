//! XUnit reporter: buffers every example and writes one JUnit-style `<testsuite>` at the end.

use std::time::Instant;

use termcolor::WriteColor;

use super::{Aggregator, Reporter};
use crate::assertion::AssertionFailure;
use crate::output::{Colorizer, FailureFormatter, StyledWriter};

const SUITE_NAME: &str = "spectree";

#[derive(Debug, Clone)]
enum CaseResult {
    Passed,
    Failed(String),
    Errored(String),
    Skipped,
}

#[derive(Debug, Clone)]
struct TestCase {
    classname: String,
    name: String,
    seconds: f64,
    result: CaseResult,
}

pub struct XunitReporter<W> {
    out: StyledWriter<W>,
    formatter: FailureFormatter,
    stats: Aggregator,
    cases: Vec<TestCase>,
    started: Option<Instant>,
    assertion_failures: usize,
}

impl<W: WriteColor> XunitReporter<W> {
    pub fn new(out: W, formatter: FailureFormatter) -> Self {
        Self {
            out: StyledWriter::new(out, Colorizer::Off),
            formatter,
            stats: Aggregator::new(),
            cases: Vec::new(),
            started: None,
            assertion_failures: 0,
        }
    }

    pub fn writer(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn push_case(&mut self, name: &str, result: CaseResult) {
        let seconds = self
            .started
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or_default();
        self.cases.push(TestCase {
            classname: self.stats.current_context_name(),
            name: name.to_string(),
            seconds,
            result,
        });
    }

    fn render_case(case: &TestCase) -> String {
        let open = format!(
            "  <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
            escape(&case.classname),
            escape(&case.name),
            case.seconds
        );
        match &case.result {
            CaseResult::Passed => format!("{} />\n", open),
            CaseResult::Failed(message) => format!(
                "{}>\n    <failure message=\"{}\" />\n  </testcase>\n",
                open,
                escape(message)
            ),
            CaseResult::Errored(message) => format!(
                "{}>\n    <error message=\"{}\" />\n  </testcase>\n",
                open,
                escape(message)
            ),
            CaseResult::Skipped => format!("{}>\n    <skipped />\n  </testcase>\n", open),
        }
    }
}

impl<W: WriteColor> Reporter for XunitReporter<W> {
    fn test_run_starting(&mut self) {
        self.stats.reset();
        self.cases.clear();
        self.started = None;
        self.assertion_failures = 0;
    }

    fn context_starting(&mut self, name: &str) {
        self.stats.push_context(name);
    }

    fn context_ended(&mut self, _name: &str) {
        self.stats.pop_context();
    }

    fn it_starting(&mut self, _name: &str) {
        self.started = Some(Instant::now());
    }

    fn it_succeeded(&mut self, name: &str) {
        self.stats.record_success();
        self.push_case(name, CaseResult::Passed);
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.stats.record_failure(name, failure);
        self.assertion_failures += 1;
        let message = self.formatter.format(failure);
        self.push_case(name, CaseResult::Failed(message));
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.stats.record_unknown_error(name);
        self.push_case(name, CaseResult::Errored("Unknown exception".to_string()));
    }

    fn it_skip(&mut self, name: &str) {
        self.stats.record_skip();
        self.started = None;
        self.push_case(name, CaseResult::Skipped);
    }

    fn test_run_error(&mut self, _context_name: &str, message: &str) {
        let rendered = self.formatter.render(self.stats.record_run_error(message));
        self.started = None;
        self.push_case("context setup", CaseResult::Errored(rendered));
    }

    fn test_run_complete(&mut self) {
        let errors = self.stats.failed - self.assertion_failures + self.stats.context_errors;
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n");
        xml.push_str(&format!(
            "<testsuite name=\"{}\" tests=\"{}\" errors=\"{}\" failures=\"{}\" skipped=\"{}\">\n",
            SUITE_NAME, self.stats.examples_run, errors, self.assertion_failures, self.stats.skipped
        ));
        for case in &self.cases {
            xml.push_str(&Self::render_case(case));
        }
        xml.push_str("</testsuite>\n");
        self.out.plain(&xml);
        self.out.flush();
    }

    fn did_we_pass(&self) -> bool {
        self.stats.did_we_pass()
    }
}

/// Escapes text for use inside an XML attribute value.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
