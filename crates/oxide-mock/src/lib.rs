//! # oxide-mock
//!
//! Mock or implement an HTTP API described by an OpenAPI document, one
//! handler per declared path and method.
//!
//! This crate provides:
//! - Path templates in OpenAPI syntax (`{id}`, `{.label}`, `{;matrix}`, `{ids*}`)
//! - Specificity ordering, so `/pet/findByStatus` wins over `/pet/{petId}`
//! - Handlers that can decline a request and let a later route answer it
//! - A configurable base path and not-found policy
//!
//! It produces a request handler, not a server; binding it to a socket is
//! up to the caller.
//!
//! ## Quick Start
//!
//! ```
//! use oxide_mock::{HandlerOptions, MockHandler, Request};
//! use serde_json::json;
//!
//! let handler = MockHandler::build(
//!     |ctx| {
//!         vec![
//!             ctx.get("/pet/{petId}", |_req, c| async move {
//!                 c.json_response(200, &json!({"id": c.params.path.get("petId")}))
//!             }),
//!             ctx.get("/pet/findByStatus", |_req, c| async move {
//!                 c.json_response(200, &json!([{"status": c.params.query.get("status")}]))
//!             }),
//!         ]
//!     },
//!     HandlerOptions::default(),
//! )
//! .unwrap();
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let res = handler
//!     .handle(Request::get("https://example.com/pet/findByStatus?status=available"))
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(res.status, 200);
//! # });
//! ```
//!
//! ## Declaring Routes Separately
//!
//! ```
//! use oxide_mock::{context, HandlerOptions, MockHandler, Response};
//!
//! let health = context().get("/health", |_req, _ctx| async { Response::text("ok") });
//! let handler = MockHandler::new(
//!     vec![health],
//!     HandlerOptions::new().base_path("/api"),
//! )
//! .unwrap();
//! assert_eq!(handler.routes()[0].template.as_str(), "/api/health");
//! ```
//!
//! ## Declining a Request
//!
//! A handler returning `Option<Response>` declines with `None`; dispatch
//! then continues with the next matching route.
//!
//! ```ignore
//! ctx.get("/report", |req, _ctx| async move {
//!     (req.get_header("Accept") == Some("text/csv")).then(|| Response::text("a,b"))
//! })
//! ```

mod error;
mod handler;
mod options;
mod path;
mod request;
mod response;
mod route;

pub use error::{HandlerError, Result, RouterError};
pub use handler::{HandlerFn, MockHandler};
pub use options::{HandlerOptions, ResolvedOptions};
pub use path::{split_path, ParamSegment, ParamStyle, PathSegment, PathTemplate};
pub use request::{Method, PathParams, QueryParams, Request};
pub use response::{Response, ResponseInit};
pub use route::{
    context, Action, Context, IntoOutcome, Outcome, Params, RouteContext, RouteDeclaration,
    RouteEntry,
};
