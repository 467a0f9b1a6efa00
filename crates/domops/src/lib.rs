//! domops
//!
//! jQuery-style traversal and manipulation of an in-memory HTML document.
//!
//! # Example
//! ```rust,ignore
//! use domops::Dom;
//!
//! let dom = Dom::parse("<div id=header><h1>Welcome</h1></div>")?;
//! let titles = dom.query("#header h1")?.text();
//! assert_eq!(titles, ["Welcome"]);
//! ```

mod access;
mod config;
mod error;
mod geometry;
mod helpers;
mod mutation;
mod page;
mod ready;
mod selection;

pub use access::{Access, AccessArg, Accessed};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{BoxOptions, CssBox};
pub use helpers::{OneOrMany, unique};
pub use mutation::Child;
pub use page::Dom;
pub use ready::{delay, is_ready, on_ready, signal_ready};
pub use selection::{QueryArg, Selection};

// Re-export sub-crates for advanced usage
pub use domops_css as css;
pub use domops_dom as dom;
pub use domops_html as html;
pub use domops_layout as layout;

pub use domops_dom::{Event, NodeId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
