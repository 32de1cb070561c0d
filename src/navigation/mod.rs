//! Navigable location and the machinery reacting to it.
//!
//! - [`location`] - path segments + query map, merge/replace semantics
//! - [`route`] - path pattern resolution
//! - [`router`] - the single writer of the current location
//! - [`reactor`] - location → view state + fetch plan

pub mod location;
pub mod reactor;
pub mod route;
pub mod router;

pub use location::{Location, QueryHandling, PAGE_PARAM, THEME_PARAM};
pub use reactor::{ChangeKind, FetchPlan, Reaction, RouteReactor, ViewState};
pub use route::Route;
pub use router::{NavigationIntent, Navigator};
