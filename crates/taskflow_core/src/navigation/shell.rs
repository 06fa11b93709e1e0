//! Dashboard shell: sidebar state and navigation entries.

use crate::i18n::{Locale, Message};
use crate::navigation::Route;

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: Message,
    pub route: Route,
}

impl NavItem {
    pub fn label_text(&self, locale: Locale) -> &'static str {
        self.label.text(locale)
    }

    pub fn href(&self) -> &'static str {
        self.route.path()
    }
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem {
        label: Message::NavDashboard,
        route: Route::Dashboard,
    },
    NavItem {
        label: Message::NavTasks,
        route: Route::Tasks,
    },
    NavItem {
        label: Message::NavProjects,
        route: Route::Projects,
    },
    NavItem {
        label: Message::NavReports,
        route: Route::Reports,
    },
    NavItem {
        label: Message::NavSettings,
        route: Route::Settings,
    },
];

/// View state of the authenticated layout.
///
/// The sidebar starts closed; on wide layouts the UI shows it regardless.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardShell {
    sidebar_open: bool,
}

impl DashboardShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brand(&self) -> Message {
        Message::AppTitle
    }

    pub fn nav_items(&self) -> &'static [NavItem] {
        NAV_ITEMS
    }

    /// Highlight rule: exact path equality, no prefix matching.
    pub fn is_active(&self, item: &NavItem, current_path: &str) -> bool {
        item.href() == current_path
    }

    /// Returns the entry matching `current_path`, if any.
    pub fn active_item(&self, current_path: &str) -> Option<&'static NavItem> {
        NAV_ITEMS.iter().find(|item| item.href() == current_path)
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    /// Also used by the backdrop and by selecting an entry.
    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}
