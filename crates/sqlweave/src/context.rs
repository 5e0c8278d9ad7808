use std::cell::RefCell;
use std::collections::HashSet;

/// How parameter markers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// Dialect-neutral `?` markers.
    #[default]
    Question,
    /// `$1`, `$2`, ... markers numbered by position in the bound-value list.
    Numbered,
}

impl ParamStyle {
    /// Returns the marker for the parameter at `index` (zero-based position
    /// in the final bound-value list).
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            ParamStyle::Question => "?".to_string(),
            ParamStyle::Numbered => format!("${}", index + 1),
        }
    }
}

/// Read-only input to a rewrite call: identifier allow-lists and the
/// parameter marker style.
#[derive(Debug, Clone, Default)]
pub struct RewriteContext {
    pub columns: HashSet<String>,
    pub tables: HashSet<String>,
    pub param_style: ParamStyle,
}

impl RewriteContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tables(mut self, tables: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    pub fn is_valid_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    pub fn is_valid_table(&self, name: &str) -> bool {
        self.tables.contains(name)
    }

    /// Snapshot of the ambient context for the current thread. Returns the
    /// default context when no scope is active.
    pub fn current() -> RewriteContext {
        CONTEXT_STACK.with(|stack| stack.borrow().last().cloned().unwrap_or_default())
    }

    /// Installs `self` as the ambient context until the returned guard is
    /// dropped. Scopes nest; the previous context is restored on every exit
    /// path, including unwinding.
    pub fn enter(self) -> ContextGuard {
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(self));
        ContextGuard { _private: () }
    }
}

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<RewriteContext>> = const { RefCell::new(Vec::new()) };
}

/// Restores the previous ambient context when dropped.
#[must_use = "dropping the guard immediately restores the previous context"]
pub struct ContextGuard {
    _private: (),
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
