use sailor_domain::identity::UserIdentity;
use std::fmt::Debug;
use std::sync::Arc;

/// A module's runnable implementation: something the host shell can render.
pub trait ModuleComponent: Debug + Send + Sync + 'static {
    fn render(&self, user: &UserIdentity) -> ModuleView;
}

/// Presentation-neutral content of a module screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleView {
    pub title: String,
    pub subtitle: Option<String>,
    pub sections: Vec<ViewSection>,
}

impl ModuleView {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn section(mut self, section: ViewSection) -> Self {
        self.sections.push(section);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ViewSection {
    pub fn new<I, L>(heading: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self { heading: heading.into(), lines: lines.into_iter().map(Into::into).collect() }
    }
}

/// What a factory hands back. A missing `component` is a load failure.
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    pub component: Option<Arc<dyn ModuleComponent>>,
}

impl ModuleExports {
    pub fn component(component: impl ModuleComponent) -> Self {
        Self { component: Some(Arc::new(component)) }
    }

    /// Exports without an entry point.
    pub fn empty() -> Self {
        Self::default()
    }
}
