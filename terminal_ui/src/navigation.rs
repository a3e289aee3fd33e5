use std::fmt;

use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    SignIn,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::SignIn => "/auth/signin",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

pub trait Navigator {
    fn push(&mut self, route: Route);
}

/// Records where the view has been sent. The terminal loop leaves the
/// dashboard as soon as the current route is no longer `Dashboard`.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Route::Dashboard,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for Router {
    fn push(&mut self, route: Route) {
        info!(from = %self.current, to = %route, "navigating");
        self.history.push(route);
        self.current = route;
    }
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn push(&mut self, route: Route) {
        (**self).push(route)
    }
}
