//! Client routes and the navigation boundary.
//!
//! # Responsibility
//! - Define the fixed route table of the client.
//! - Abstract route changes behind `Navigator`.
//!
//! # Invariants
//! - Route paths are absolute and unique.
//! - Navigation never carries parameters.

pub mod shell;

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use shell::{DashboardShell, NavItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Tasks,
    Projects,
    Reports,
    Settings,
}

const ALL_ROUTES: &[Route] = &[
    Route::Login,
    Route::Dashboard,
    Route::Tasks,
    Route::Projects,
    Route::Reports,
    Route::Settings,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::Dashboard => "/dashboard",
            Self::Tasks => "/dashboard/tasks",
            Self::Projects => "/dashboard/projects",
            Self::Reports => "/dashboard/reports",
            Self::Settings => "/dashboard/settings",
        }
    }

    /// Resolves an exact path; a single trailing slash is tolerated.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => trimmed,
        };
        ALL_ROUTES
            .iter()
            .copied()
            .find(|route| route.path() == normalized)
    }

    /// Returns whether the route sits under the authenticated shell.
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Route to open instead of `self`; `None` lets navigation proceed.
    pub fn redirect_for(self, signed_in: bool) -> Option<Route> {
        (self.requires_session() && !signed_in).then_some(Route::Login)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParseError(pub String);

impl Display for RouteParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown route `{}`", self.0)
    }
}

impl Error for RouteParseError {}

impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_path(value).ok_or_else(|| RouteParseError(value.trim().to_string()))
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation boundary consumed by controllers.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn navigate(&mut self, route: Route) {
        (**self).navigate(route);
    }
}

/// In-process router tracking the current route and history.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Login)
    }

    pub fn current_path(&self) -> &'static str {
        self.current().path()
    }

    /// Visited routes, oldest first, including the initial route.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Returns to the previous route; the initial route is never popped.
    pub fn back(&mut self) -> Option<Route> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        Some(self.current())
    }
}

impl Navigator for Router {
    fn navigate(&mut self, route: Route) {
        info!(
            "event=navigate module=navigation from={} to={}",
            self.current_path(),
            route.path()
        );
        self.history.push(route);
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, Route, RouteParseError, Router};

    #[test]
    fn resolves_paths_exactly() {
        assert_eq!(Route::from_path("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/dashboard/tasks/"), Some(Route::Tasks));
        assert_eq!(Route::from_path("/dashboard/task"), None);
        assert_eq!(
            "/nope".parse::<Route>(),
            Err(RouteParseError("/nope".to_string()))
        );
    }

    #[test]
    fn every_route_round_trips_through_its_path() {
        for route in super::ALL_ROUTES {
            assert_eq!(Route::from_path(route.path()), Some(*route));
        }
    }

    #[test]
    fn shell_routes_redirect_to_login_without_session() {
        assert_eq!(Route::Reports.redirect_for(false), Some(Route::Login));
        assert_eq!(Route::Reports.redirect_for(true), None);
        assert_eq!(Route::Login.redirect_for(false), None);
        assert!(!Route::Login.requires_session());
    }

    #[test]
    fn router_tracks_history_and_back() {
        let mut router = Router::default();
        assert_eq!(router.current(), Route::Login);

        router.navigate(Route::Dashboard);
        router.navigate(Route::Tasks);
        assert_eq!(router.current_path(), "/dashboard/tasks");

        assert_eq!(router.back(), Some(Route::Dashboard));
        assert_eq!(router.back(), Some(Route::Login));
        assert_eq!(router.back(), None);
        assert_eq!(router.history(), &[Route::Login]);
    }
}
