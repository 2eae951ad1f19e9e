//! Request, response and transport types.
//!
//! This module provides:
//! - `Options`, payload encoding (`DataType`, `Data`, `Payload`) and `Request`
//! - `Response`, assembled from a transport `Reply`
//! - Event types and the `CrawlerHooks` trait
//! - `RedirectTracker`, the redirect-following state machine
//! - The `Transport` contract and the default `ReqwestTransport`

mod events;
mod options;
mod redirects;
mod request;
mod response;
mod transport;

// Re-export public API
pub use events::{CrawlerHooks, DownloadEvent, NoHooks, RedirectEvent, RequestEvent};
pub use options::{Data, DataType, Options, Payload, Proxy};
pub use redirects::{RedirectStep, RedirectTracker};
pub use request::Request;
pub use response::Response;
pub use transport::{
    reqwest_connector, BodySink, Connector, Exchange, Reply, ReqwestTransport, Timings,
    Transport,
};
