//! The execution engine: walks a [`Suite`] depth first, runs hooks and examples in nesting
//! order, classifies every outcome and drives the [`Reporter`].

use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::assertion::AssertionFailure;
use crate::policy::{Decision, RunPolicy};
use crate::reporter::Reporter;
use crate::tree::{catch_quietly, panic_message, ContextNode, ExampleNode, Hook, Item, Suite};

// ============================================================================
// OUTCOMES
// ============================================================================

/// Classified result of invoking one body or hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(AssertionFailure),
    /// Anything that is not an assertion failure; the description is only logged.
    Errored(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    fn of(result: std::thread::Result<anyhow::Result<()>>) -> Self {
        match result {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(err)) => match err.downcast::<AssertionFailure>() {
                Ok(failure) => Outcome::Failed(failure),
                Err(other) => Outcome::Errored(format!("{:#}", other)),
            },
            Err(payload) => match payload.downcast::<AssertionFailure>() {
                Ok(failure) => Outcome::Failed(*failure),
                Err(payload) => Outcome::Errored(panic_message(&*payload)),
            },
        }
    }
}

fn invoke(action: impl FnOnce() -> anyhow::Result<()>) -> Outcome {
    Outcome::of(catch_quietly(action))
}

/// Keeps the first failure; later ones are dropped.
fn merge(current: &mut Outcome, next: Outcome) {
    if current.is_passed() {
        *current = next;
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: bool,
    pub aborted: bool,
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// Runs every example of `suite` under `policy`, streaming events to `reporter`.
pub fn run(suite: &Suite, policy: &mut RunPolicy, reporter: &mut dyn Reporter) -> RunSummary {
    let root = suite.root();
    policy.set_focus_mode(root.contains_focus());
    info!(
        examples = root.example_count(),
        dry_run = policy.is_dry_run(),
        "test run starting"
    );

    reporter.test_run_starting();
    let mut runner = Runner {
        policy,
        reporter,
        stack: vec![root],
    };
    let flow = runner.visit_items(root);
    runner.reporter.test_run_complete();

    let summary = RunSummary {
        passed: runner.reporter.did_we_pass(),
        aborted: flow.is_break(),
    };
    info!(passed = summary.passed, aborted = summary.aborted, "test run complete");
    summary
}

struct Runner<'r, 't> {
    policy: &'r mut RunPolicy,
    reporter: &'r mut dyn Reporter,
    /// Contexts from the root down to the one being visited.
    stack: Vec<&'t ContextNode>,
}

impl<'r, 't> Runner<'r, 't> {
    fn visit_items(&mut self, context: &'t ContextNode) -> ControlFlow<()> {
        for item in context.items() {
            match item {
                Item::Context(child) => self.visit_context(child)?,
                Item::Example(example) => self.visit_example(example)?,
            }
        }
        ControlFlow::Continue(())
    }

    fn visit_context(&mut self, context: &'t ContextNode) -> ControlFlow<()> {
        self.reporter.context_starting(context.name());
        if let Some(message) = context.setup_error() {
            self.reporter.test_run_error(context.name(), message);
        } else {
            self.stack.push(context);
            let flow = self.visit_items(context);
            self.stack.pop();
            flow?;
        }
        self.reporter.context_ended(context.name());
        ControlFlow::Continue(())
    }

    fn visit_example(&mut self, example: &ExampleNode) -> ControlFlow<()> {
        let full_name = self.full_name(example);
        let decision = self.policy.decide(&full_name, example.markers());
        debug!(example = %full_name, ?decision, "policy decision");

        match decision {
            Decision::Skip => self.reporter.it_skip(example.name()),
            Decision::Abort => {
                info!(example = %full_name, "aborting run after earlier failure");
                return ControlFlow::Break(());
            }
            Decision::Run => {
                self.reporter.it_starting(example.name());
                if self.policy.is_dry_run() {
                    self.reporter.it_succeeded(example.name());
                    return ControlFlow::Continue(());
                }
                match self.execute(example) {
                    Outcome::Passed => self.reporter.it_succeeded(example.name()),
                    Outcome::Failed(failure) => {
                        self.policy.record_failure();
                        self.reporter.it_failed(example.name(), &failure);
                    }
                    Outcome::Errored(description) => {
                        debug!(example = %full_name, %description, "example raised an unknown error");
                        self.policy.record_failure();
                        self.reporter.it_unknown_error(example.name());
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Before-hooks outermost first, the body, then after-hooks innermost first. After-hooks
    /// run for every scope whose before-hooks all completed, whatever happened afterwards.
    fn execute(&self, example: &ExampleNode) -> Outcome {
        let mut outcome = Outcome::Passed;
        let mut entered = 0;
        for context in &self.stack {
            if let Some(failure) = run_hooks(context.before_hooks()) {
                outcome = failure;
                break;
            }
            entered += 1;
        }

        if outcome.is_passed() {
            outcome = invoke(|| example.invoke());
        }

        for context in self.stack[..entered].iter().rev() {
            for hook in context.after_hooks() {
                merge(&mut outcome, invoke(|| hook.invoke()));
            }
        }
        outcome
    }

    /// Context names below the root followed by the example name.
    fn full_name(&self, example: &ExampleNode) -> String {
        self.stack[1..]
            .iter()
            .map(|c| c.name())
            .chain(std::iter::once(example.name()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs hooks in order, stopping at the first failure.
fn run_hooks(hooks: &[Hook]) -> Option<Outcome> {
    hooks
        .iter()
        .map(|hook| invoke(|| hook.invoke()))
        .find(|outcome| !outcome.is_passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_classifies_assertions_errors_and_panics() {
        assert_eq!(invoke(|| Ok(())), Outcome::Passed);

        let failure = AssertionFailure::new("nope", "f.rs", 3);
        let expected = failure.clone();
        assert_eq!(invoke(move || Err(failure.into())), Outcome::Failed(expected));

        assert_eq!(
            invoke(|| Err(anyhow::anyhow!("io broke"))),
            Outcome::Errored("io broke".to_string())
        );

        assert_eq!(
            invoke(|| panic!("kaboom")),
            Outcome::Errored("kaboom".to_string())
        );

        let raised = AssertionFailure::unlocated("raised");
        assert_eq!(
            invoke(|| std::panic::panic_any(AssertionFailure::unlocated("raised"))),
            Outcome::Failed(raised)
        );
    }

    #[test]
    fn merge_keeps_first_failure() {
        let mut outcome = Outcome::Passed;
        merge(&mut outcome, Outcome::Errored("first".into()));
        merge(&mut outcome, Outcome::Errored("second".into()));
        assert_eq!(outcome, Outcome::Errored("first".into()));
    }
}
