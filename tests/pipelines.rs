//! Pipeline dispatch on send.

mod helpers;

use std::sync::Arc;

use crawlkit::error_handling::PipeError;
use crawlkit::{
    CallbackPipe, Data, ErrorKind, JsonPipe, Method, PipeValue, Pipeline, PipelineChoice,
};
use helpers::{ok, scripted_context};
use serde_json::json;

#[test]
fn test_json_pipe_decodes_get_bodies() {
    let (mut context, script) = scripted_context("api.example.org");
    context.add_json_pipe();
    script.reply(ok(r#"{"items":[1,2,3]}"#));

    let value = context.new_request("items", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Structured(json!({"items": [1, 2, 3]}))));
}

#[test]
fn test_malformed_json_degrades_to_empty() {
    let (mut context, script) = scripted_context("example.org");
    context.add_json_pipe();
    script.reply(ok("<html>not json</html>"));

    let value = context.new_request("page", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Empty));
}

#[test]
fn test_method_specific_pipeline_wins_over_default() {
    let (mut context, script) = scripted_context("example.org");
    context.add_callback_pipe_to(|_| PipeValue::Text("default".into()), "");
    context.add_callback_pipe_to(
        |v| PipeValue::Text(format!("posted:{}", v.as_text().unwrap_or(""))),
        Method::Post,
    );
    script.reply(ok("a")).reply(ok("b")).reply(ok("c"));

    let mut request = context.new_request("form", None, None);
    request.to_post(Some(Data::from("x=1")), None);
    assert_eq!(
        request.send().expect("post"),
        Some(PipeValue::Text("posted:a".into()))
    );

    let mut request = context.new_request("thing", None, None);
    request.to_head();
    assert_eq!(
        request.send().expect("head"),
        Some(PipeValue::Text("default".into()))
    );

    assert_eq!(
        context.new_request("plain", None, None).send().expect("get"),
        Some(PipeValue::Text("default".into()))
    );
}

#[test]
fn test_pipes_compose_in_registration_order() {
    let (mut context, script) = scripted_context("example.org");
    context.add_json_pipe_to(Method::Get);
    context.add_callback_pipe_to(
        |v| match v.as_structured().and_then(|s| s.get("count")) {
            Some(count) => PipeValue::Text(format!("count={}", count)),
            None => PipeValue::Empty,
        },
        Method::Get,
    );
    script.reply(ok(r#"{"count":7}"#));

    let value = context.new_request("stats", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Text("count=7".into())));
}

#[test]
fn test_disabled_pipelines_return_raw_body() {
    let (mut context, script) = scripted_context("example.org");
    context.add_json_pipe();
    context.disable_pipelines();
    script.reply(ok(r#"{"a":1}"#));

    let value = context.new_request("x", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Text(r#"{"a":1}"#.into())));
}

#[test]
fn test_inactive_pipeline_is_identity() {
    let (mut context, script) = scripted_context("example.org");
    let mut pipeline = Pipeline::new();
    pipeline.push(JsonPipe);
    pipeline.disable();
    context.set_pipeline(Some(pipeline), Method::Get);
    script.reply(ok("[1]"));

    let value = context.new_request("x", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Text("[1]".into())));
}

#[test]
fn test_per_send_pipeline_choice() {
    let (mut context, script) = scripted_context("example.org");
    context.add_json_pipe();
    script.reply(ok("[1,2]")).reply(ok("[3]"));

    let raw = context
        .new_request("x", None, None)
        .send_with(PipelineChoice::Raw)
        .expect("raw");
    assert_eq!(raw, Some(PipeValue::Text("[1,2]".into())));

    let mut custom = Pipeline::new();
    custom.add(Arc::new(CallbackPipe::new(|v| {
        PipeValue::Text(v.as_text().unwrap_or("").len().to_string())
    })));
    let value = context
        .new_request("y", None, None)
        .send_with(PipelineChoice::Custom(custom))
        .expect("custom");
    assert_eq!(value, Some(PipeValue::Text("3".into())));
}

#[test]
fn test_hard_pipe_failure_aborts_send() {
    let (mut context, script) = scripted_context("example.org");
    context.add_pipe(
        Arc::new(CallbackPipe::fallible(|_| Err(PipeError("schema mismatch".into())))),
        Method::Get,
    );
    script.reply(ok("body"));

    let error = context.new_request("x", None, None).send().expect_err("hard failure");
    assert_eq!(error.kind(), ErrorKind::Pipeline);
    assert_eq!(context.last_status_code(), Some(200));
}

#[test]
fn test_empty_body_yields_empty_value() {
    let (mut context, script) = scripted_context("example.org");
    script.reply(ok(""));
    let value = context.new_request("x", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Empty));
}
