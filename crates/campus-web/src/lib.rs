//! # Campus Web
//!
//! Client route table: resolves a URL path to the page that should be shown
//! and hands the page the login capabilities it declares.

pub mod auth;
pub mod page;
pub mod router;

pub use auth::{AuthState, SetLoggedIn};
pub use page::{Injection, NavBar, Page, PageKind, PageProps, View};
pub use router::{normalize, RootRouter, Route, ROUTES};
