//! crawlkit library: a synchronous HTTP crawler toolkit
//!
//! A `Context` binds a host identity (domain, subdomain, default path, scheme
//! and default query) to the policies that drive requests against it: URL
//! normalization, bounded redirect following, a per-call cookie queue on top of
//! a transport-owned jar, and method-keyed pipelines that post-process bodies.
//!
//! # Example
//!
//! ```no_run
//! use crawlkit::{Context, Data, Query};
//!
//! # fn main() -> Result<(), crawlkit::CrawlerError> {
//! let mut context = Context::new("httpbin.org", None);
//! context.set_query(Some(Query::from([("token", "secret")])));
//! context.add_json_pipe();
//!
//! // GET https://httpbin.org/get?token=secret&page=2
//! let value = context
//!     .new_request("get", Some(Query::from([("page", "2")])), None)
//!     .send()?;
//! println!("{:?}", value);
//!
//! let mut request = context.new_request("/post", None, None);
//! request.to_post(Some(Data::from(Query::from([("name", "value")]))), None);
//! request.send()?;
//! println!("status {:?}", context.last_status_code());
//! # Ok(())
//! # }
//! ```
//!
//! # Model
//!
//! All calls block until the redirect chain and the pipeline have completed.
//! One context serves one caller at a time; concurrent callers each need their
//! own context.

#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod cookies;
pub mod error_handling;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod initialization;
pub mod pipeline;
pub mod urls;
pub mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use context::{BoundRequest, Context, PipelineChoice, PipelineKey, UrlOverrides};
pub use cookies::{Cookie, CookieJar};
pub use error_handling::{CrawlerError, ErrorKind};
pub use extract::{Extracted, Extractor, Group};
pub use fetch::{
    CrawlerHooks, Data, DataType, DownloadEvent, Options, RedirectEvent, Request, RequestEvent,
    Response, Transport,
};
pub use http::{Headers, Method};
pub use pipeline::{CallbackPipe, JsonPipe, Pipe, PipeValue, Pipeline};
pub use urls::Query;
pub use utils::OneOrMany;
