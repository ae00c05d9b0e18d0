//! Route declarations, resolved entries, and the handler context.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::HandlerError;
use crate::options::ResolvedOptions;
use crate::path::PathTemplate;
use crate::request::{Method, PathParams, QueryParams, Request};
use crate::response::{Response, ResponseInit};

/// What a handler did with a request it was offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler produced a response; dispatch stops.
    Handled(Response),
    /// The handler declined; dispatch moves on to the next entry.
    NotHandled,
}

/// Conversion from a handler's return value into an [`Outcome`].
///
/// Implemented for `Response`, `Option<Response>` (`None` declines),
/// `Outcome`, and `Result`s of those whose error converts into a
/// [`HandlerError`].
pub trait IntoOutcome {
    /// Performs the conversion.
    fn into_outcome(self) -> Result<Outcome, HandlerError>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(self)
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(Outcome::Handled(self))
    }
}

impl IntoOutcome for Option<Response> {
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        Ok(self.map_or(Outcome::NotHandled, Outcome::Handled))
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<HandlerError>,
{
    fn into_outcome(self) -> Result<Outcome, HandlerError> {
        match self {
            Ok(value) => value.into_outcome(),
            Err(err) => Err(err.into()),
        }
    }
}

/// Parameters bound for one matched request.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Path parameters, as raw strings.
    pub path: PathParams,
    /// Query string parameters.
    pub query: QueryParams,
}

/// Per-request context handed to a handler alongside the request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Matched parameters.
    pub params: Params,
}

impl Context {
    /// Creates a context from matched parameters.
    pub fn new(path: PathParams, query: QueryParams) -> Self {
        Self {
            params: Params { path, query },
        }
    }

    /// Builds a JSON response with the given status.
    pub fn json_response<T: serde::Serialize + ?Sized>(
        &self,
        status: u16,
        body: &T,
    ) -> Result<Response, serde_json::Error> {
        Response::json(status, body)
    }

    /// Builds a JSON response and applies extra headers or status.
    ///
    /// Headers in `init` are merged over the defaults and win on conflict.
    pub fn json_response_with<T: serde::Serialize + ?Sized>(
        &self,
        status: u16,
        body: &T,
        init: ResponseInit,
    ) -> Result<Response, serde_json::Error> {
        Ok(Response::json(status, body)?.with_init(init))
    }

    /// Sleeps for the given duration.
    ///
    /// Purely cooperative; the dispatcher never imposes a timeout.
    pub async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A type-erased async handler.
pub type Action =
    Arc<dyn Fn(Request, Context) -> BoxFuture<'static, Result<Outcome, HandlerError>> + Send + Sync>;

fn boxed_action<F, Fut, R>(handler: F) -> Action
where
    F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome,
{
    Arc::new(move |req, ctx| -> BoxFuture<'static, Result<Outcome, HandlerError>> {
        let fut = handler(req, ctx);
        Box::pin(async move { fut.await.into_outcome() })
    })
}

/// A declared route that has not yet been given handler options.
///
/// Declarations can be written in one place and assembled into a
/// [`MockHandler`](crate::MockHandler) in another; the base path is only
/// applied by [`RouteDeclaration::finalize`].
#[derive(Clone)]
pub struct RouteDeclaration {
    method: Method,
    template: PathTemplate,
    action: Action,
}

impl RouteDeclaration {
    /// Declares a route.
    pub fn new<F, Fut, R>(method: Method, template: &str, handler: F) -> Self
    where
        F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        Self {
            method,
            template: PathTemplate::parse(template),
            action: boxed_action(handler),
        }
    }

    /// Returns the declared method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the declared template, without any base path.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Resolves this declaration against handler options.
    ///
    /// `index` is the declaration position, used to keep declaration order
    /// among equally specific entries.
    pub fn finalize(&self, options: &ResolvedOptions, index: usize) -> RouteEntry {
        RouteEntry {
            method: self.method,
            template: self.template.prefixed(&options.base_segments),
            action: Arc::clone(&self.action),
            index,
        }
    }
}

impl std::fmt::Debug for RouteDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDeclaration")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .finish_non_exhaustive()
    }
}

/// A route ready for dispatch.
#[derive(Clone)]
pub struct RouteEntry {
    /// HTTP method.
    pub method: Method,
    /// Full template, base path included.
    pub template: PathTemplate,
    /// Request handler.
    pub action: Action,
    /// Declaration position.
    pub index: usize,
}

impl RouteEntry {
    /// Orders entries by template specificity, then declaration order.
    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        self.template
            .compare_specificity(&other.template)
            .then_with(|| self.index.cmp(&other.index))
    }

    /// Offers a request to this entry.
    ///
    /// Returns `None` when the method or path does not match, without
    /// running the handler.
    pub fn try_handle(
        &self,
        request: &Request,
    ) -> Option<BoxFuture<'static, Result<Outcome, HandlerError>>> {
        if !self.method.matches(&request.method) {
            return None;
        }
        let path = self.template.match_path(request.path())?;
        let context = Context::new(path, request.query());
        Some((self.action)(request.clone(), context))
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Declares routes per HTTP method.
///
/// Stateless; obtain one with [`context`] or receive it in the closure
/// passed to [`MockHandler::build`](crate::MockHandler::build).
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteContext;

/// Returns a route context for declaring routes outside of a handler.
///
/// # Example
///
/// ```
/// use oxide_mock::{context, HandlerOptions, MockHandler};
///
/// let list_users = context().get("/users", |_req, ctx| async move {
///     ctx.json_response(200, &serde_json::json!({"users": []}))
/// });
/// let handler = MockHandler::new(vec![list_users], HandlerOptions::default()).unwrap();
/// assert_eq!(handler.routes().len(), 1);
/// ```
pub fn context() -> RouteContext {
    RouteContext
}

macro_rules! method_builders {
    ($($fn_name:ident => $method:ident),* $(,)?) => {
        impl RouteContext {
            $(
                #[doc = concat!("Declares a ", stringify!($method), " route.")]
                pub fn $fn_name<F, Fut, R>(&self, template: &str, handler: F) -> RouteDeclaration
                where
                    F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
                    Fut: Future<Output = R> + Send + 'static,
                    R: IntoOutcome,
                {
                    self.route(Method::$method, template, handler)
                }
            )*
        }
    };
}

method_builders! {
    get => Get,
    put => Put,
    post => Post,
    delete => Delete,
    options => Options,
    head => Head,
    patch => Patch,
    trace => Trace,
}

impl RouteContext {
    /// Declares a route with any method.
    pub fn route<F, Fut, R>(&self, method: Method, template: &str, handler: F) -> RouteDeclaration
    where
        F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoOutcome,
    {
        RouteDeclaration::new(method, template, handler)
    }
}
