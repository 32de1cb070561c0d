//! Terminal browser for a categorized blog / documentation site.
//!
//! Articles come from a [`content::ContentGateway`] (the bundled catalog or a
//! json-server style endpoint) and are addressed by locations such as
//! `blog/learn?page=2&theme=dark`. The [`navigation::Navigator`] owns the
//! current location; every change flows through the
//! [`navigation::RouteReactor`], which derives category, article, page and
//! display mode and decides what to fetch.

pub mod app;
pub mod config;
pub mod content;
pub mod keybindings;
pub mod navigation;
pub mod pagination;
pub mod print;
pub mod theme;
pub mod ui;
pub mod util;
