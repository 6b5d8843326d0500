//! Run policy: decides, per example, whether it runs, is skipped, or ends the run.

/// Skip and focus markers of a node, merged with those of its ancestors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub hard_skip: bool,
    pub focused: bool,
}

impl Markers {
    /// Markers of a child registered under `self` with its own flags.
    pub fn inherit(self, skip: bool, only: bool) -> Self {
        Self {
            hard_skip: self.hard_skip || skip,
            focused: self.focused || only,
        }
    }
}

/// Outcome of consulting the policy for one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip,
    Abort,
}

/// Filtering, fail-fast and dry-run settings plus the failure state of the current run.
#[derive(Debug, Clone, Default)]
pub struct RunPolicy {
    skip: Option<String>,
    only: Option<String>,
    break_on_failure: bool,
    dry_run: bool,
    focus_mode: bool,
    has_failed_since_start: bool,
}

fn non_empty(pattern: Option<String>) -> Option<String> {
    pattern.filter(|p| !p.is_empty())
}

impl RunPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips every example whose full name contains `pattern`. Empty means unset.
    pub fn with_skip(mut self, pattern: Option<String>) -> Self {
        self.skip = non_empty(pattern);
        self
    }

    /// Skips every example whose full name does not contain `pattern`. Empty means unset.
    pub fn with_only(mut self, pattern: Option<String>) -> Self {
        self.only = non_empty(pattern);
        self
    }

    pub fn with_break_on_failure(mut self, enabled: bool) -> Self {
        self.break_on_failure = enabled;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Marks the suite as containing focused examples; unfocused ones are then skipped.
    pub fn set_focus_mode(&mut self, enabled: bool) {
        self.focus_mode = enabled;
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn has_failed(&self) -> bool {
        self.has_failed_since_start
    }

    pub fn record_failure(&mut self) {
        self.has_failed_since_start = true;
    }

    pub fn decide(&self, full_name: &str, markers: Markers) -> Decision {
        if let Some(only) = &self.only {
            if !full_name.contains(only.as_str()) {
                return Decision::Skip;
            }
        }
        if let Some(skip) = &self.skip {
            if full_name.contains(skip.as_str()) {
                return Decision::Skip;
            }
        }
        if markers.hard_skip {
            return Decision::Skip;
        }
        if self.focus_mode && !markers.focused {
            return Decision::Skip;
        }
        if self.break_on_failure && self.has_failed_since_start {
            return Decision::Abort;
        }
        Decision::Run
    }
}
