//! Page descriptors produced by the router

use std::fmt;

use crate::auth::SetLoggedIn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    Register,
    Login,
    Profile,
    EditProfile,
    Resources,
    Forum,
    Chat,
    AddResource,
    SearchProfiles,
    University,
    QuestionReply,
}

impl PageKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Register => "Register",
            Self::Login => "Login",
            Self::Profile => "Profile",
            Self::EditProfile => "EditProfile",
            Self::Resources => "Resources",
            Self::Forum => "Forum",
            Self::Chat => "Chat",
            Self::AddResource => "AddResource",
            Self::SearchProfiles => "SearchProfiles",
            Self::University => "University",
            Self::QuestionReply => "QuestionReply",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which login capabilities a page receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    None,
    Flag,
    FlagAndSetter,
}

/// Parameters handed to a page; absent entries were not injected.
#[derive(Clone, Default)]
pub struct PageProps {
    pub logged_in: Option<bool>,
    pub set_logged_in: Option<SetLoggedIn>,
}

impl PageProps {
    pub fn injected(injection: Injection, logged_in: bool, set_logged_in: &SetLoggedIn) -> Self {
        match injection {
            Injection::None => Self::default(),
            Injection::Flag => Self {
                logged_in: Some(logged_in),
                set_logged_in: None,
            },
            Injection::FlagAndSetter => Self {
                logged_in: Some(logged_in),
                set_logged_in: Some(set_logged_in.clone()),
            },
        }
    }
}

impl fmt::Debug for PageProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageProps")
            .field("logged_in", &self.logged_in)
            .field("set_logged_in", &self.set_logged_in.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub kind: PageKind,
    pub props: PageProps,
}

/// Navigation bar shown above every page.
#[derive(Clone)]
pub struct NavBar {
    pub logged_in: bool,
    pub set_logged_in: SetLoggedIn,
}

impl fmt::Debug for NavBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavBar")
            .field("logged_in", &self.logged_in)
            .finish_non_exhaustive()
    }
}

/// What the router resolved a path to.
#[derive(Debug, Clone)]
pub struct View {
    /// Path of the matched route; `/` after a redirect.
    pub path: &'static str,
    /// Set when the requested path matched nothing.
    pub redirected_from: Option<String>,
    pub navbar: NavBar,
    pub page: Page,
}

impl View {
    pub fn is_redirect(&self) -> bool {
        self.redirected_from.is_some()
    }
}
