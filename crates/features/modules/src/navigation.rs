use crate::access::AvailableModules;
use crate::state::LoaderState;
use sailor_domain::constants::{APP_TITLE, LOGOUT};
use sailor_domain::identity::UserIdentity;
use sailor_event_bus::EventBus;
use tracing::{debug, warn};

pub const LOGOUT_GLYPH: &str = "🚪";
pub const LOGOUT_LABEL: &str = "Logout";
const FALLBACK_GLYPH: &str = "📄";

/// The one event a navigation interaction produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Selected(String),
    /// The reserved `logout` entry. Handled by the host shell, never loaded.
    Logout,
}

/// Maps a descriptor icon key to the glyph shown next to it.
pub fn glyph_for(icon: &str) -> &'static str {
    match icon {
        "dashboard" => "📊",
        "boat" => "⛵",
        "map" => "🗺️",
        "tools" | "wrench" => "🔧",
        "calendar" => "📅",
        "compass" => "🧭",
        "users" => "👥",
        "settings" => "⚙️",
        _ => FALLBACK_GLYPH,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationHeader {
    pub title: String,
    pub user: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationItem {
    pub name: String,
    pub display_name: String,
    /// Tooltip text.
    pub description: String,
    pub glyph: &'static str,
    pub active: bool,
    pub loading: bool,
    /// Set while this very module is being resolved.
    pub disabled: bool,
}

/// Everything needed to draw the navigation pane once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationView {
    pub header: NavigationHeader,
    pub items: Vec<NavigationItem>,
    pub logout: NavigationItem,
    pub collapsed: bool,
}

impl NavigationView {
    pub fn item(&self, name: &str) -> Option<&NavigationItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn active(&self) -> Option<&NavigationItem> {
        self.items.iter().find(|item| item.active)
    }
}

/// Renders the permitted module list and turns clicks into [`NavigationEvent`]s.
#[derive(Debug, Clone)]
pub struct NavigationPresenter {
    bus: EventBus,
    title: String,
    collapsed: bool,
}

impl NavigationPresenter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus, title: APP_TITLE.to_owned(), collapsed: false }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub const fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Flips the display mode. Returns the new value.
    pub const fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn render(
        &self,
        available: &AvailableModules,
        state: &LoaderState,
        user: &UserIdentity,
    ) -> NavigationView {
        let selected = state.selection();
        let busy = state.is_busy();

        let items = available
            .iter()
            .map(|descriptor| {
                let active = selected == Some(&*descriptor.name);
                NavigationItem {
                    name: descriptor.name.to_string(),
                    display_name: descriptor.display_name.to_string(),
                    description: descriptor.description.to_string(),
                    glyph: glyph_for(&descriptor.icon),
                    active,
                    loading: active && busy,
                    disabled: active && busy,
                }
            })
            .collect();

        NavigationView {
            header: NavigationHeader {
                title: self.title.clone(),
                user: user.display_name().to_owned(),
                is_admin: user.is_admin,
            },
            items,
            logout: NavigationItem {
                name: LOGOUT.to_owned(),
                display_name: LOGOUT_LABEL.to_owned(),
                description: "End the session".to_owned(),
                glyph: LOGOUT_GLYPH,
                active: false,
                loading: false,
                disabled: false,
            },
            collapsed: self.collapsed,
        }
    }

    /// Handles one click on an entry and publishes the resulting event.
    ///
    /// `logout` always yields [`NavigationEvent::Logout`]. Clicking the module
    /// that is still being resolved is swallowed; any other module is selectable
    /// at any time.
    pub fn select(&self, name: &str, state: &LoaderState) -> Option<NavigationEvent> {
        let name = name.trim();
        let event = if name == LOGOUT {
            NavigationEvent::Logout
        } else if state.is_busy() && state.selection() == Some(name) {
            debug!(module = %name, "Selection ignored while the module is resolving");
            return None;
        } else {
            NavigationEvent::Selected(name.to_owned())
        };

        if let Err(err) = self.bus.publish(event.clone()) {
            warn!(error = %err, "Failed to publish navigation event");
        }
        Some(event)
    }
}
