//! Shared fixtures for the spectree integration tests: an inspectable output sink, a reporter
//! that records the event stream, and a body-call log.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use spectree::{AssertionFailure, Reporter};
use termcolor::NoColor;

// =============================================================================
// OUTPUT CAPTURE
// =============================================================================

/// A `Write` sink whose bytes stay readable after a reporter has taken ownership of it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink to hand to a reporter. Colors are dropped so text can be compared directly.
    pub fn sink(&self) -> NoColor<SharedBuffer> {
        NoColor::new(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("reporter output is UTF-8")
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The lines a terminal would display for `output`: a carriage return moves back to the
/// start of the line and later characters overwrite earlier ones. Trailing blanks are dropped.
pub fn terminal_lines(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(|raw| {
            let mut cells: Vec<char> = Vec::new();
            let mut cursor = 0;
            for c in raw.chars() {
                if c == '\r' {
                    cursor = 0;
                    continue;
                }
                if cursor < cells.len() {
                    cells[cursor] = c;
                } else {
                    cells.push(c);
                }
                cursor += 1;
            }
            cells.into_iter().collect::<String>().trim_end().to_string()
        })
        .collect()
}

// =============================================================================
// EVENT RECORDING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RunStarting,
    ContextStarting(String),
    ContextEnded(String),
    ItStarting(String),
    ItSucceeded(String),
    ItFailed(String, String),
    ItUnknownError(String),
    ItSkip(String),
    RunError(String, String),
    RunComplete,
}

/// Records every event it receives and passes as long as nothing failed.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of examples that were started, in order.
    pub fn started(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ItStarting(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::ItSkip(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn test_run_starting(&mut self) {
        self.events.push(Event::RunStarting);
    }

    fn context_starting(&mut self, name: &str) {
        self.events.push(Event::ContextStarting(name.into()));
    }

    fn context_ended(&mut self, name: &str) {
        self.events.push(Event::ContextEnded(name.into()));
    }

    fn it_starting(&mut self, name: &str) {
        self.events.push(Event::ItStarting(name.into()));
    }

    fn it_succeeded(&mut self, name: &str) {
        self.events.push(Event::ItSucceeded(name.into()));
    }

    fn it_failed(&mut self, name: &str, failure: &AssertionFailure) {
        self.events
            .push(Event::ItFailed(name.into(), failure.message.clone()));
    }

    fn it_unknown_error(&mut self, name: &str) {
        self.events.push(Event::ItUnknownError(name.into()));
    }

    fn it_skip(&mut self, name: &str) {
        self.events.push(Event::ItSkip(name.into()));
    }

    fn test_run_error(&mut self, context_name: &str, message: &str) {
        self.events
            .push(Event::RunError(context_name.into(), message.into()));
    }

    fn test_run_complete(&mut self) {
        self.events.push(Event::RunComplete);
    }

    fn did_we_pass(&self) -> bool {
        !self.events.iter().any(|e| {
            matches!(
                e,
                Event::ItFailed(..) | Event::ItUnknownError(_) | Event::RunError(..)
            )
        })
    }
}

// =============================================================================
// CALL LOG
// =============================================================================

/// Shared list of labels pushed by example bodies and hooks, to check execution order.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A body that appends `label` and succeeds.
    pub fn step(&self, label: &str) -> impl Fn() + 'static {
        let log = self.clone();
        let label = label.to_string();
        move || log.push(&label)
    }

    pub fn push(&self, label: &str) {
        self.0.borrow_mut().push(label.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// A located failure, as the dots reporter scenarios expect it.
pub fn located_failure() -> AssertionFailure {
    AssertionFailure::new("assertion failed!", "some_file", 123)
}
