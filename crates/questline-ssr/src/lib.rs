/* crates/questline-ssr/src/lib.rs */

pub mod envelope;
pub mod errors;
pub mod escape;
pub mod html;
pub mod http;
pub mod key;
pub mod loader;
pub mod render;
pub mod route;
pub mod store;

// Re-exports for ergonomic use
pub use envelope::Envelope;
pub use errors::SsrError;
pub use escape::{escape_embedded_json, escape_html_text};
pub use html::{HeadMeta, BODY_OUTLET};
pub use http::{site_loaders, ApiClient};
pub use key::{detail_key, home_key, list_key, route_key};
pub use loader::{loader, BoxFuture, LoaderFn, LoaderRegistry, LoaderSet};
pub use render::{RenderedPage, SsrPipeline, ViewOutput, ViewRenderer};
pub use route::{ListQuery, ResolvedRoute, RouteKind, RouteParams, RouteTable};
pub use store::{InitialDataStore, DEFAULT_DATA_ID};
