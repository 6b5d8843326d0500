//! The context tree: nested `describe` scopes, their hooks and `it` examples.
//!
//! A [`Suite`] owns the root context. Registration is an explicit, synchronous process: each
//! `describe` call creates a child context, runs its body against a [`Scope`] handle for that
//! child, and appends the finished child to the parent. Once registration is done the tree is
//! only read.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::policy::Markers;

// ============================================================================
// BODY RESULTS
// ============================================================================

pub(crate) type Action = Box<dyn Fn() -> anyhow::Result<()>>;

/// Values an example or hook body may return.
pub trait IntoBodyResult {
    fn into_body_result(self) -> anyhow::Result<()>;
}

impl IntoBodyResult for () {
    fn into_body_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E: Into<anyhow::Error>> IntoBodyResult for Result<(), E> {
    fn into_body_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// Values a `describe` body may return. An error becomes the context's setup error.
pub trait IntoSetupResult {
    fn into_setup_result(self) -> Result<(), String>;
}

impl IntoSetupResult for () {
    fn into_setup_result(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: fmt::Display> IntoSetupResult for Result<(), E> {
    fn into_setup_result(self) -> Result<(), String> {
        self.map_err(|e| e.to_string())
    }
}

fn boxed_action<F, R>(body: F) -> Action
where
    F: Fn() -> R + 'static,
    R: IntoBodyResult,
{
    Box::new(move || body().into_body_result())
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

fn panics_are_quiet() -> bool {
    QUIET_PANICS.try_with(Cell::get).unwrap_or(false)
}

/// Wraps the current panic hook once so it stays silent on threads inside [`catch_quietly`].
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !panics_are_quiet() {
                previous(info);
            }
        }));
    });
}

/// `catch_unwind` without the panic hook's stderr report; the caller classifies the payload.
pub(crate) fn catch_quietly<T>(action: impl FnOnce() -> T) -> std::thread::Result<T> {
    install_quiet_hook();
    let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(action));
    QUIET_PANICS.with(|quiet| quiet.set(was_quiet));
    result
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Plain,
    Skip,
    Only,
}

/// A before/after action scoped to one context.
pub struct Hook {
    action: Action,
}

impl Hook {
    pub(crate) fn invoke(&self) -> anyhow::Result<()> {
        (self.action)()
    }
}

/// A single named test case.
pub struct ExampleNode {
    name: String,
    body: Action,
    markers: Markers,
}

impl ExampleNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Skip and focus markers, already merged with those of every ancestor.
    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub(crate) fn invoke(&self) -> anyhow::Result<()> {
        (self.body)()
    }
}

/// A child of a context, in registration order.
pub enum Item {
    Context(ContextNode),
    Example(ExampleNode),
}

/// A named grouping of examples, nested contexts and hooks.
pub struct ContextNode {
    name: String,
    items: Vec<Item>,
    before: Vec<Hook>,
    after: Vec<Hook>,
    markers: Markers,
    setup_error: Option<String>,
}

impl ContextNode {
    fn root() -> Self {
        Self {
            name: String::new(),
            items: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            markers: Markers::default(),
            setup_error: None,
        }
    }

    fn child(&self, name: String, marker: Marker) -> Self {
        Self {
            name,
            items: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            markers: self.markers.inherit(marker == Marker::Skip, marker == Marker::Only),
            setup_error: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn contexts(&self) -> impl Iterator<Item = &ContextNode> {
        self.items.iter().filter_map(|item| match item {
            Item::Context(c) => Some(c),
            Item::Example(_) => None,
        })
    }

    pub fn examples(&self) -> impl Iterator<Item = &ExampleNode> {
        self.items.iter().filter_map(|item| match item {
            Item::Example(e) => Some(e),
            Item::Context(_) => None,
        })
    }

    pub fn before_hooks(&self) -> &[Hook] {
        &self.before
    }

    pub fn after_hooks(&self) -> &[Hook] {
        &self.after
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    /// The message recorded when this context's `describe` body failed.
    pub fn setup_error(&self) -> Option<&str> {
        self.setup_error.as_deref()
    }

    /// Whether any runnable example below this context carries a focus marker.
    pub fn contains_focus(&self) -> bool {
        if self.setup_error.is_some() {
            return false;
        }
        self.items.iter().any(|item| match item {
            Item::Context(c) => c.contains_focus(),
            Item::Example(e) => e.markers.focused && !e.markers.hard_skip,
        })
    }

    /// Number of examples registered anywhere below this context.
    pub fn example_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                Item::Context(c) => c.example_count(),
                Item::Example(_) => 1,
            })
            .sum()
    }
}

impl fmt::Debug for ContextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextNode")
            .field("name", &self.name)
            .field("contexts", &self.contexts().collect::<Vec<_>>())
            .field("examples", &self.examples().map(|e| &e.name).collect::<Vec<_>>())
            .field("before_hooks", &self.before.len())
            .field("after_hooks", &self.after.len())
            .field("markers", &self.markers)
            .field("setup_error", &self.setup_error)
            .finish()
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Handle to the context that is currently open for registration.
pub struct Scope<'a> {
    node: &'a mut ContextNode,
}

impl<'a> Scope<'a> {
    /// Opens a nested context and registers its children by running `body`.
    pub fn describe<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.open(name.into(), Marker::Plain, body)
    }

    /// Like [`Scope::describe`], but every example below is skipped.
    pub fn describe_skip<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.open(name.into(), Marker::Skip, body)
    }

    /// Like [`Scope::describe`], but every example below is focused.
    pub fn describe_only<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.open(name.into(), Marker::Only, body)
    }

    pub fn it<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.example(name.into(), Marker::Plain, boxed_action(body))
    }

    pub fn it_skip<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.example(name.into(), Marker::Skip, boxed_action(body))
    }

    pub fn it_only<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.example(name.into(), Marker::Only, boxed_action(body))
    }

    /// Runs `hook` before every example in this context's subtree.
    pub fn before_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.node.before.push(Hook {
            action: boxed_action(hook),
        });
        self
    }

    /// Runs `hook` after every example in this context's subtree.
    pub fn after_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.node.after.push(Hook {
            action: boxed_action(hook),
        });
        self
    }

    fn open<B, R>(&mut self, name: String, marker: Marker, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        let mut child = self.node.child(name, marker);
        let outcome = catch_quietly(|| {
            let mut scope = Scope { node: &mut child };
            body(&mut scope).into_setup_result()
        });
        child.setup_error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(message)) => Some(message),
            Err(payload) => Some(panic_message(&*payload)),
        };
        if let Some(message) = &child.setup_error {
            tracing::debug!(context = %child.name, %message, "context setup failed");
        }
        self.node.items.push(Item::Context(child));
        self
    }

    fn example(&mut self, name: String, marker: Marker, body: Action) -> &mut Self {
        let markers = self
            .node
            .markers
            .inherit(marker == Marker::Skip, marker == Marker::Only);
        self.node.items.push(Item::Example(ExampleNode {
            name,
            body,
            markers,
        }));
        self
    }
}

/// A complete specification tree, ready to run.
pub struct Suite {
    root: ContextNode,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    pub fn new() -> Self {
        Self {
            root: ContextNode::root(),
        }
    }

    pub fn root(&self) -> &ContextNode {
        &self.root
    }

    /// Registration handle for the root context.
    pub fn scope(&mut self) -> Scope<'_> {
        Scope {
            node: &mut self.root,
        }
    }

    pub fn describe<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.scope().describe(name, body);
        self
    }

    pub fn describe_skip<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.scope().describe_skip(name, body);
        self
    }

    pub fn describe_only<B, R>(&mut self, name: impl Into<String>, body: B) -> &mut Self
    where
        B: FnOnce(&mut Scope<'_>) -> R,
        R: IntoSetupResult,
    {
        self.scope().describe_only(name, body);
        self
    }

    pub fn it<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.scope().it(name, body);
        self
    }

    pub fn it_skip<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.scope().it_skip(name, body);
        self
    }

    pub fn it_only<F, R>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.scope().it_only(name, body);
        self
    }

    pub fn before_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.scope().before_each(hook);
        self
    }

    pub fn after_each<F, R>(&mut self, hook: F) -> &mut Self
    where
        F: Fn() -> R + 'static,
        R: IntoBodyResult,
    {
        self.scope().after_each(hook);
        self
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite").field("root", &self.root).finish()
    }
}
