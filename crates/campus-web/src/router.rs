//! Root router: literal path dispatch over a fixed route table

use tracing::debug;

use crate::auth::{AuthState, SetLoggedIn};
use crate::page::{Injection, NavBar, Page, PageKind, PageProps, View};

const HOME_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: PageKind,
    pub injection: Injection,
}

impl Route {
    const fn new(path: &'static str, page: PageKind, injection: Injection) -> Self {
        Self {
            path,
            page,
            injection,
        }
    }
}

pub static ROUTES: &[Route] = &[
    Route::new("/", PageKind::Home, Injection::None),
    Route::new("/register", PageKind::Register, Injection::None),
    Route::new("/login", PageKind::Login, Injection::FlagAndSetter),
    Route::new("/profile", PageKind::Profile, Injection::None),
    Route::new("/edit", PageKind::EditProfile, Injection::None),
    Route::new("/resources", PageKind::Resources, Injection::None),
    Route::new("/forum", PageKind::Forum, Injection::None),
    Route::new("/chat", PageKind::Chat, Injection::Flag),
    Route::new("/add-resource", PageKind::AddResource, Injection::Flag),
    Route::new("/search", PageKind::SearchProfiles, Injection::None),
    Route::new("/university", PageKind::University, Injection::None),
    Route::new("/question-reply", PageKind::QuestionReply, Injection::Flag),
];

/// Canonical form used for matching: query and fragment dropped, one
/// trailing slash removed, ASCII lowercased.
pub fn normalize(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let mut path = &path[..end];
    if path.len() > 1 {
        path = path.strip_suffix('/').unwrap_or(path);
    }
    if path.is_empty() {
        return HOME_PATH.to_string();
    }
    path.to_ascii_lowercase()
}

/// Stateless apart from the login capabilities it threads into pages.
#[derive(Clone)]
pub struct RootRouter {
    logged_in: bool,
    set_logged_in: SetLoggedIn,
}

impl RootRouter {
    pub fn new(logged_in: bool, set_logged_in: SetLoggedIn) -> Self {
        Self {
            logged_in,
            set_logged_in,
        }
    }

    /// Snapshot of `auth` with its setter.
    pub fn from_auth(auth: &AuthState) -> Self {
        Self::new(auth.is_logged_in(), auth.setter())
    }

    pub fn route_for(path: &str) -> Option<&'static Route> {
        let path = normalize(path);
        ROUTES.iter().find(|route| route.path == path)
    }

    pub fn resolve(&self, path: &str) -> View {
        let (route, redirected_from) = match Self::route_for(path) {
            Some(route) => (route, None),
            None => {
                debug!("no route for {}, redirecting to {}", path, HOME_PATH);
                (self.home(), Some(path.to_string()))
            }
        };

        View {
            path: route.path,
            redirected_from,
            navbar: NavBar {
                logged_in: self.logged_in,
                set_logged_in: self.set_logged_in.clone(),
            },
            page: Page {
                kind: route.page,
                props: PageProps::injected(route.injection, self.logged_in, &self.set_logged_in),
            },
        }
    }

    fn home(&self) -> &'static Route {
        &ROUTES[0]
    }
}
