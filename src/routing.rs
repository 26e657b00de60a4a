// ABOUTME: Route resolution for the wizard's routable surface
// Maps a requested path to the page to render or the path to redirect to

use serde::Serialize;
use std::fmt;

use crate::auth::AuthGate;
use crate::wizard::{FlowController, StepId};

pub const LOGIN_PATH: &str = "/login";
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "step", rename_all = "lowercase")]
pub enum Route {
    Login,
    Step(StepId),
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => LOGIN_PATH,
            Self::Step(step) => step.path(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "route", rename_all = "lowercase")]
pub enum Resolution {
    /// The requested path is served as-is
    Render(Route),
    /// The client should be sent elsewhere
    Redirect(Route),
}

impl Resolution {
    pub const fn route(self) -> Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}

pub struct Router {
    require_auth: bool,
}

impl Router {
    pub const fn new(require_auth: bool) -> Self {
        Self { require_auth }
    }

    /// Resolve `path` without consulting step completion
    pub fn resolve(&self, path: &str, auth: &dyn AuthGate) -> Resolution {
        let path = path.trim();
        if path == LOGIN_PATH {
            return Resolution::Render(Route::Login);
        }
        if self.require_auth && !auth.is_authenticated() {
            return Resolution::Redirect(Route::Login);
        }

        match StepId::from_path(path) {
            Some(step) => Resolution::Render(Route::Step(step)),
            // Root and anything unknown land on the first step
            None => Resolution::Redirect(Route::Step(StepId::BasicInfo)),
        }
    }

    /// Resolve `path` and apply the controller's direct-navigation policy
    pub fn resolve_with(
        &self,
        path: &str,
        auth: &dyn AuthGate,
        controller: &FlowController,
    ) -> Resolution {
        match self.resolve(path, auth) {
            Resolution::Render(Route::Step(step)) => {
                let allowed = controller.navigate(step.path());
                if allowed == step {
                    Resolution::Render(Route::Step(step))
                } else {
                    Resolution::Redirect(Route::Step(allowed))
                }
            }
            other => other,
        }
    }
}
