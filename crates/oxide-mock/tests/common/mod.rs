#![allow(dead_code)]

use oxide_mock::{HandlerOptions, MockHandler, Request, Response, RouteContext, RouteDeclaration};
use serde_json::{json, Value};

pub const BASE_URL: &str = "https://example.com/";

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

pub fn url(path: &str) -> String {
    format!("{BASE_URL}{}", path.trim_start_matches('/'))
}

/// Petstore routes, declared with the parameter route first.
pub fn petstore_routes(ctx: RouteContext) -> Vec<RouteDeclaration> {
    vec![
        ctx.get("/pet/{petId}", |_req, c| async move {
            c.json_response(
                200,
                &json!({
                    "id": c.params.path.get("petId"),
                    "name": "Mocked Pet",
                    "photoUrls": [],
                }),
            )
        }),
        ctx.get("/pet/findByStatus", |_req, c| async move {
            let status = c.params.query.get("status").unwrap_or("available");
            c.json_response(
                200,
                &json!([{
                    "name": format!("Mocked Pet ({status})"),
                    "photoUrls": [],
                }]),
            )
        }),
        ctx.get("/pet/findByTags", |_req, c| async move {
            c.json_response(200, &json!({ "tags": c.params.query.get_all("tags") }))
        }),
        ctx.post("/pet", |req: Request, c| async move {
            let pet: Value = req.json()?;
            Ok::<_, oxide_mock::HandlerError>(c.json_response(201, &pet)?)
        }),
        ctx.delete("/pet/{petId}", |_req, _c| async { Response::new(204) }),
        ctx.get("/store/inventory", |_req, c| async move {
            c.json_response(200, &json!({ "available": 3, "sold": 1 }))
        }),
    ]
}

pub fn petstore(options: HandlerOptions) -> MockHandler {
    init_tracing();
    MockHandler::build(petstore_routes, options).expect("petstore routes are valid")
}

pub async fn send(handler: &MockHandler, request: Request) -> Response {
    handler
        .handle(request)
        .await
        .expect("handler failed")
        .expect("handler returned no response")
}

pub async fn json_of(handler: &MockHandler, request: Request) -> (u16, Value) {
    let res = send(handler, request).await;
    let body = res.json_body().expect("response body is JSON");
    (res.status, body)
}
