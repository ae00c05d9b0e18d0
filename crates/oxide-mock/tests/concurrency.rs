//! Shared handlers across tasks.

mod common;
use common::*;

use std::time::Duration;

use oxide_mock::{HandlerOptions, MockHandler, Request};

#[tokio::test]
async fn repeated_dispatch_is_stable() {
    let handler = petstore(HandlerOptions::default());
    let first = send(&handler, Request::get(url("pet/findByStatus?status=sold"))).await;
    let second = send(&handler, Request::get(url("pet/findByStatus?status=sold"))).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn concurrent_requests_share_one_handler() {
    let handler = petstore(HandlerOptions::default());

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let handler = handler.clone();
            tokio::spawn(async move { json_of(&handler, Request::get(url(&format!("pet/{i}")))).await })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(body["id"], i.to_string());
    }
}

#[tokio::test(start_paused = true)]
async fn delay_does_not_block_other_requests() {
    init_tracing();
    let handler = MockHandler::build(
        |ctx| {
            vec![
                ctx.get("/slow", |_req, c| async move {
                    c.delay(Duration::from_secs(5)).await;
                    oxide_mock::Response::text("slow")
                }),
                ctx.get("/fast", |_req, _c| async { oxide_mock::Response::text("fast") }),
            ]
        },
        HandlerOptions::default(),
    )
    .unwrap();

    let slow = tokio::spawn({
        let handler = handler.clone();
        async move { send(&handler, Request::get("/slow")).await }
    });
    let fast = send(&handler, Request::get("/fast")).await;
    assert_eq!(fast.body_string().as_deref(), Some("fast"));
    assert!(!slow.is_finished());

    let slow = slow.await.unwrap();
    assert_eq!(slow.body_string().as_deref(), Some("slow"));
}

#[tokio::test]
async fn into_fn_can_be_shared() {
    let handle = petstore(HandlerOptions::default()).into_fn();
    let other = handle.clone();
    let (a, b) = tokio::join!(handle(Request::get("/pet/1")), other(Request::get("/pet/2")));
    assert_eq!(a.unwrap().unwrap().status, 200);
    assert_eq!(b.unwrap().unwrap().status, 200);
}
