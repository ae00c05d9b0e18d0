//! The request dispatcher.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, trace};

use crate::error::{HandlerError, Result};
use crate::options::HandlerOptions;
use crate::request::Request;
use crate::response::Response;
use crate::route::{context, Outcome, RouteContext, RouteDeclaration, RouteEntry};

/// An async function from request to response, as produced by
/// [`MockHandler::into_fn`].
pub type HandlerFn =
    Arc<dyn Fn(Request) -> BoxFuture<'static, std::result::Result<Option<Response>, HandlerError>> + Send + Sync>;

/// A request handler built from route declarations.
///
/// The route table is sorted once at construction and never changes, so a
/// handler can be cloned and used from many tasks at once.
#[derive(Clone)]
pub struct MockHandler {
    /// Entries, most specific first.
    routes: Arc<[RouteEntry]>,
    /// Return `None` instead of a 404 when nothing handles a request.
    return_none_on_no_match: bool,
}

impl MockHandler {
    /// Builds a handler from a list of declarations.
    pub fn new(declarations: Vec<RouteDeclaration>, options: HandlerOptions) -> Result<Self> {
        let resolved = options.resolve()?;

        let mut routes = Vec::with_capacity(declarations.len());
        for (index, declaration) in declarations.iter().enumerate() {
            // Base path segments are literals; only the declared part is checked.
            declaration.template().validate()?;
            routes.push(declaration.finalize(&resolved, index));
        }
        routes.sort_by(RouteEntry::compare);

        debug!(
            routes = routes.len(),
            base_path = %options.base_path,
            "built mock handler"
        );

        Ok(Self {
            routes: routes.into(),
            return_none_on_no_match: options.return_none_on_no_match,
        })
    }

    /// Builds a handler from a closure that declares the routes.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_mock::{HandlerOptions, MockHandler, Request};
    ///
    /// let handler = MockHandler::build(
    ///     |ctx| {
    ///         vec![ctx.get("/users/{id}", |_req, c| async move {
    ///             c.json_response(200, &serde_json::json!({"id": c.params.path.get("id")}))
    ///         })]
    ///     },
    ///     HandlerOptions::default(),
    /// )
    /// .unwrap();
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let res = handler.handle(Request::get("/users/7")).await.unwrap().unwrap();
    /// assert_eq!(res.status, 200);
    /// # });
    /// ```
    pub fn build<G>(generate: G, options: HandlerOptions) -> Result<Self>
    where
        G: FnOnce(RouteContext) -> Vec<RouteDeclaration>,
    {
        Self::new(generate(context()), options)
    }

    /// Returns the route table in dispatch order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Handles an incoming request.
    ///
    /// Entries are offered the request in order until one produces a
    /// response; an entry whose handler declines passes it on to the next.
    /// When nothing responds, the result is a 404, or `None` if the handler
    /// was built with `return_none_on_no_match`. A handler error ends
    /// dispatch and is returned as-is.
    pub fn handle(
        &self,
        request: Request,
    ) -> BoxFuture<'static, std::result::Result<Option<Response>, HandlerError>> {
        let routes = Arc::clone(&self.routes);
        let return_none = self.return_none_on_no_match;

        Box::pin(async move {
            for entry in routes.iter() {
                let Some(pending) = entry.try_handle(&request) else {
                    continue;
                };
                trace!(
                    method = %entry.method,
                    template = %entry.template,
                    path = request.path(),
                    "route matched"
                );
                match pending.await? {
                    Outcome::Handled(response) => return Ok(Some(response)),
                    Outcome::NotHandled => {
                        trace!(template = %entry.template, "handler declined, falling through");
                    }
                }
            }

            debug!(
                method = %request.method,
                path = request.path(),
                return_none,
                "no route handled request"
            );
            if return_none {
                Ok(None)
            } else {
                Ok(Some(Response::not_found()))
            }
        })
    }

    /// Turns the handler into a plain async function.
    pub fn into_fn(self) -> HandlerFn {
        Arc::new(move |request| self.handle(request))
    }
}

impl std::fmt::Debug for MockHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHandler")
            .field("routes", &self.routes)
            .field("return_none_on_no_match", &self.return_none_on_no_match)
            .finish()
    }
}
