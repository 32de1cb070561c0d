//! Article content: records, sources, and bodies.
//!
//! - [`types`] - Article, Category, page query/result records
//! - [`catalog`] - bundled content repository
//! - [`gateway`] - paginated and unpaginated queries (local or HTTP)
//! - [`body`] - article body addressing, loading, and HTML rendering

pub mod body;
pub mod catalog;
pub mod gateway;
mod transport;
pub mod types;

pub use body::{render_html, BodyError, BodyLoader, BodySource};
pub use gateway::{ContentGateway, GatewayError, HttpGateway, LocalGateway};
pub use types::{Article, ArticleId, Category, PageQuery, PaginationResult};
