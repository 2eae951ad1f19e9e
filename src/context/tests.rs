// Context unit tests.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::*;
use crate::cookies::CookieJar;
use crate::error_handling::{ErrorKind, TransportFailure};
use crate::fetch::{BodySink, Exchange, Reply, RequestEvent};
use crate::http::Method;
use crate::pipeline::PipeValue;

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<Reply, TransportFailure>>,
    seen: Vec<Exchange>,
    jar: CookieJar,
}

struct FakeTransport(Arc<Mutex<Script>>);

impl Transport for FakeTransport {
    fn exchange(
        &mut self,
        exchange: &Exchange,
        sink: Option<&mut dyn BodySink>,
    ) -> Result<Reply, TransportFailure> {
        let mut script = self.0.lock().expect("script lock");
        script.seen.push(exchange.clone());
        let mut reply = script
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(reply(200, "")))?;
        reply.effective_url = exchange.url.clone();
        if let (Some(sink), Some(body)) = (sink, reply.body.take()) {
            sink.write_all(&body)
                .map_err(|e| TransportFailure::new(23, e.to_string()))?;
            reply.download_size = body.len() as i64;
        }
        Ok(reply)
    }

    fn import_cookie(&mut self, record: &str) {
        let mut script = self.0.lock().expect("script lock");
        let _ = script.jar.import_record(record);
    }

    fn cookie_records(&self) -> Vec<String> {
        self.0.lock().expect("script lock").jar.records()
    }

    fn clear_cookies(&mut self) {
        self.0.lock().expect("script lock").jar.clear();
    }

    fn load_cookies(&mut self, path: &Path) -> io::Result<usize> {
        self.0.lock().expect("script lock").jar.load(path)
    }

    fn save_cookies(&self, path: &Path) -> io::Result<()> {
        self.0.lock().expect("script lock").jar.save(path)
    }
}

fn reply(status: u16, body: &str) -> Reply {
    Reply {
        status_code: status,
        header_lines: vec![format!("HTTP/1.1 {}", status)],
        body: Some(body.as_bytes().to_vec()),
        download_size: body.len() as i64,
        file_time: -1,
        ..Default::default()
    }
}

fn redirect(status: u16, location: &str) -> Reply {
    let mut reply = reply(status, "");
    reply.redirect_url = Some(location.to_string());
    reply
}

fn scripted(domain: &str) -> (Context, Arc<Mutex<Script>>) {
    let script = Arc::new(Mutex::new(Script::default()));
    let shared = Arc::clone(&script);
    let connector: Connector = Box::new(move |_config: &Config| {
        Ok(Box::new(FakeTransport(Arc::clone(&shared))) as Box<dyn Transport>)
    });
    let context = Context::with_transport(Config::default(), domain, None, connector);
    (context, script)
}

fn push(script: &Arc<Mutex<Script>>, reply: Reply) {
    script.lock().expect("script lock").replies.push_back(Ok(reply));
}

// Identity

#[test]
fn test_www_prefix_moves_into_subdomain() {
    let context = Context::new("www.httpbin.org", None);
    assert_eq!(context.domain(), "httpbin.org");
    assert_eq!(context.subdomain(), Some("www"));
    assert_eq!(context.host(), "www.httpbin.org");

    let context = Context::new("www.httpbin.org", Some("api"));
    assert_eq!(context.domain(), "www.httpbin.org");
    assert_eq!(context.host(), "api.www.httpbin.org");
}

#[test]
fn test_setters_trim_and_clear() {
    let mut context = Context::new("example.org", None);
    context.set_subdomain(Some("  "));
    assert_eq!(context.subdomain(), None);
    context.set_path(Some("//foo/bar"));
    assert_eq!(context.path(), Some("foo/bar"));
    context.set_path(Some(""));
    assert_eq!(context.path(), None);
    context.set_redirects_limit(Some(0));
    assert_eq!(context.redirects_limit(), None);
    assert_eq!(context.host_for(Some("cdn")), "cdn.example.org");
}

// Composition

#[test]
fn test_compose_url() {
    let mut context = Context::new("httpbin.org", None);
    assert_eq!(context.compose_url(None, None), "https://httpbin.org/");
    assert_eq!(context.compose_url(Some("/get"), None), "https://httpbin.org/get");

    context.set_subdomain(Some("www"));
    assert_eq!(context.compose_url(None, None), "https://www.httpbin.org/");

    context.set_secured(false);
    context.set_subdomain(None);
    assert_eq!(context.compose_url(None, None), "http://httpbin.org/");
}

#[test]
fn test_compose_url_with_overrides() {
    let mut context = Context::new("httpbin.org", None);
    context.set_query(Some(Query::from([("token", "secret")])));
    let query = Query::from([("q", "foo")]);
    let url = context.compose_url_with(UrlOverrides {
        path: Some("search"),
        query: Some(&query),
        subdomain: Some("www"),
        secured: Some(false),
        domain: Some("google.com"),
    });
    assert_eq!(url, "http://www.google.com/search?token=secret&q=foo");
}

// Normalization

#[test]
fn test_normalize_relative_urls() {
    let context = Context::new("httpbin.org", None);
    assert_eq!(context.normalize_url("", None), "https://httpbin.org/");
    assert_eq!(context.normalize_url("foo", None), "https://httpbin.org/foo");
    assert_eq!(
        context.normalize_url("foo?bar=123", Some(&Query::from([("test", "me")]))),
        "https://httpbin.org/foo?test=me&bar=123"
    );
}

#[test]
fn test_normalize_keeps_fragment_and_default_query() {
    let mut context = Context::new("httpbin.org", None);
    context.set_query(Some(Query::from([("token", "secret")])));
    assert_eq!(
        context.normalize_url("#here", None),
        "https://httpbin.org/?token=secret#here"
    );
}

#[test]
fn test_normalize_foreign_host_forces_scheme_only() {
    let context = Context::new("httpbin.org", None);
    assert_eq!(
        context.normalize_url("//google.com/search", None),
        "https://google.com/search"
    );
    assert_eq!(
        context.normalize_url("http://other.example/x?y=1", Some(&Query::from([("a", "b")]))),
        "https://other.example/x?y=1"
    );
}

#[test]
fn test_normalize_own_host_is_rewritten() {
    let mut context = Context::new("example.org", Some("api"));
    context.set_secured(false);
    assert_eq!(
        context.normalize_url("https://api.example.org/v1/items", None),
        "http://api.example.org/v1/items"
    );
}

#[test]
fn test_normalize_without_encoding() {
    let context = Context::new("sample.com", None);
    assert_eq!(
        context.normalize_url_with("https://sample.com/100%success", None, Some(false)),
        "https://sample.com/100%success"
    );
}

#[test]
fn test_relaxed_path_handling() {
    let mut context = Context::new("example.org", None);
    context.set_path(Some("foo"));
    assert_eq!(context.normalize_url("", None), "https://example.org/foo");
    assert_eq!(context.normalize_url("bar", None), "https://example.org/foo/bar");
    assert_eq!(context.normalize_url("/bar", None), "https://example.org/bar");
}

#[test]
fn test_strict_path_handling() {
    let mut context = Context::new("example.org", None);
    context.set_strict_path_handling(true);
    context.set_path(Some("foo"));
    assert_eq!(context.normalize_url("bar", None), "https://example.org/bar");

    context.set_path(Some("foo/"));
    assert_eq!(context.normalize_url("", None), "https://example.org/foo/");
    assert_eq!(context.normalize_url("bar", None), "https://example.org/foo/bar");
    assert_eq!(context.normalize_url("/bar/", None), "https://example.org/bar/");
}

#[test]
fn test_default_path_is_encoded_like_caller_input() {
    let mut context = Context::new("example.org", None);
    context.set_path(Some("my docs"));

    let once = context.normalize_url("x", None);
    assert_eq!(once, "https://example.org/my%20docs/x");
    assert_eq!(context.normalize_url(&once, None), once);
    assert_eq!(context.normalize_url("", None), "https://example.org/my%20docs");

    context.set_strict_path_handling(true);
    context.set_path(Some("my docs/index"));
    assert_eq!(context.normalize_url("x", None), "https://example.org/my%20docs/x");

    context.set_encode_urls(false);
    assert_eq!(context.normalize_url("x", None), "https://example.org/my docs/x");
}

#[test]
fn test_query_layers_merge_in_order() {
    let mut context = Context::new("example.org", None);
    context.set_query(Some(Query::from([("token", "secret")])));
    assert_eq!(
        context.normalize_url("x?user=1", Some(&Query::from([("source", "email")]))),
        "https://example.org/x?token=secret&source=email&user=1"
    );
    assert_eq!(
        context.normalize_url("x?token=literal", Some(&Query::from([("token", "arg")]))),
        "https://example.org/x?token=literal"
    );
}

// Pipelines

#[test]
fn test_pipeline_lookup_falls_back_to_default() {
    let mut context = Context::new("example.org", None);
    context.add_callback_pipe_to(|_| PipeValue::Text("default".into()), "");
    context.add_callback_pipe_to(|_| PipeValue::Text("post".into()), Method::Post);

    let out = context
        .perform_pipeline(PipeValue::Text("in".into()), Method::Get)
        .expect("pipeline");
    assert_eq!(out, PipeValue::Text("default".into()));
    let out = context
        .perform_pipeline(PipeValue::Text("in".into()), Method::Post)
        .expect("pipeline");
    assert_eq!(out, PipeValue::Text("post".into()));
}

#[test]
fn test_pipeline_composes_left_to_right() {
    let mut context = Context::new("example.org", None);
    context.add_callback_pipe(|v| PipeValue::Text(format!("{}1", v.as_text().unwrap_or(""))));
    context.add_callback_pipe(|v| PipeValue::Text(format!("{}2", v.as_text().unwrap_or(""))));
    let out = context
        .perform_pipeline(PipeValue::Text("x".into()), Method::Put)
        .expect("pipeline");
    assert_eq!(out, PipeValue::Text("x12".into()));

    context.disable_pipelines();
    let out = context
        .perform_pipeline(PipeValue::Text("x".into()), Method::Put)
        .expect("pipeline");
    assert_eq!(out, PipeValue::Text("x".into()));
}

#[test]
fn test_set_pipeline_none_removes_keys() {
    let mut context = Context::new("example.org", None);
    context.add_json_pipe();
    assert!(context.get_pipeline(Method::Get).is_some());
    assert!(context.get_pipeline(Method::Head).is_none());
    context.set_pipeline(None, vec![Method::Get, Method::Post]);
    assert!(context.get_pipeline(Method::Get).is_none());
    assert!(context.get_pipeline(Method::Put).is_some());
    context.clear_pipelines();
    assert_eq!(context.pipelines().count(), 0);
}

// Cookies

#[test]
fn test_simple_cookie_defaults() {
    let mut context = Context::new("example.org", Some("www"));
    context.set_path(Some("app"));
    context.add_simple_cookie("session", Some("abc"), None, None);
    let cookie = &context.queued_cookies()[0];
    assert_eq!(cookie.host(), "www.example.org");
    assert_eq!(cookie.path(), "/app");
    assert!(cookie.is_secure());
    assert_eq!(cookie.expires_at(), None);
}

#[test]
fn test_cookie_queue_flushes_only_with_transport() {
    let (mut context, script) = scripted("example.org");
    context.add_simple_cookies([("a", "1"), ("b", "2")]);
    context.flush_cookies();
    assert_eq!(context.queued_cookies().len(), 2);

    context.initialize().expect("init");
    let cookies = context.obtain_cookies();
    assert!(context.queued_cookies().is_empty());
    assert_eq!(cookies.len(), 2);
    assert_eq!(script.lock().expect("lock").jar.len(), 2);

    context.add_simple_cookie("c", Some("3"), None, None);
    context.clear_cookies();
    assert!(context.queued_cookies().is_empty());
    assert!(context.obtain_cookies().is_empty());
}

// Sending

#[test]
fn test_send_records_history_and_runs_pipeline() {
    let (mut context, script) = scripted("example.org");
    push(&script, reply(200, "{\"ok\":true}"));
    context.add_json_pipe();

    let value = context.new_request("status", None, None).send().expect("send");
    assert_eq!(value, Some(PipeValue::Structured(serde_json::json!({"ok": true}))));
    assert_eq!(context.last_status_code(), Some(200));
    assert_eq!(context.last_url(), Some("https://example.org/status"));
    assert_eq!(script.lock().expect("lock").seen[0].url, "https://example.org/status");
}

#[test]
fn test_send_follows_redirect_chain() {
    let (mut context, script) = scripted("example.org");
    push(&script, redirect(301, "https://example.org/b"));
    push(&script, redirect(302, "/c"));
    push(&script, reply(200, "done"));

    let value = context
        .new_request("a", None, None)
        .send_with(PipelineChoice::Raw)
        .expect("send");
    assert_eq!(value, Some(PipeValue::Text("done".into())));
    assert_eq!(context.responses().len(), 3);
    assert_eq!(context.last_url(), Some("https://example.org/c"));
}

#[test]
fn test_send_detects_loop_after_two_exchanges() {
    let (mut context, script) = scripted("example.org");
    push(&script, redirect(302, "https://example.org/b"));
    push(&script, redirect(302, "https://example.org/a"));

    let error = context.new_request("a", None, None).send().expect_err("loop");
    assert_eq!(error.kind(), ErrorKind::LoopedRedirect);
    assert_eq!(script.lock().expect("lock").seen.len(), 2);
}

#[test]
fn test_redirects_disallowed_single_exchange() {
    let (mut context, script) = scripted("example.org");
    context.set_redirects_allowed(false);
    push(&script, redirect(302, "https://example.org/b"));
    context.new_request("a", None, None).send().expect("send");
    assert_eq!(context.responses().len(), 1);
    assert_eq!(context.last_redirect_url(), Some("https://example.org/b"));
}

#[test]
fn test_transport_error_surfaces() {
    let (mut context, script) = scripted("example.org");
    script
        .lock()
        .expect("lock")
        .replies
        .push_back(Err(TransportFailure::new(28, "timed out")));
    let error = context.new_request("slow", None, None).send().expect_err("timeout");
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert!(error.is_transport_level());
}

struct Veto;

impl CrawlerHooks for Veto {
    fn on_request(&mut self, event: &mut RequestEvent<'_>) {
        event.ignore();
    }
}

#[test]
fn test_vetoed_request_is_not_sent() {
    let (mut context, script) = scripted("example.org");
    context.set_hooks(Box::new(Veto));
    let value = context.new_request("x", None, None).send().expect("send");
    assert_eq!(value, None);
    assert!(script.lock().expect("lock").seen.is_empty());
}

#[test]
fn test_transport_closed_without_persistence() {
    let (mut context, _script) = scripted("example.org");
    context.set_persist_transport(false);
    context.new_request("x", None, None).send().expect("send");
    assert!(!context.is_transport_initialized());

    context.set_persist_transport(true);
    context.new_request("x", None, None).send().expect("send");
    assert!(context.is_transport_initialized());
}

#[test]
fn test_request_copies_context_defaults() {
    let mut context = Context::new("example.org", None);
    context.set_xhr(true);
    context.set_default_data_type(Some(DataType::Json));
    let mut request = context.request("x", None, Some("https://ref.example/"));
    request.headers_mut().add("x-extra", "1");
    assert!(request.headers().is_xhr());
    assert!(!context.headers().has("x-extra"));
    assert_eq!(request.default_data_type(), Some(&DataType::Json));
    assert_eq!(request.options().referer.as_deref(), Some("https://ref.example/"));
}

#[test]
fn test_sink_receives_body() {
    struct Shared(Arc<Mutex<Vec<u8>>>);
    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
    impl BodySink for Shared {
        fn truncate(&mut self) -> io::Result<()> {
            self.0.lock().expect("lock").clear();
            Ok(())
        }
    }

    let (mut context, script) = scripted("example.org");
    let mut first = redirect(302, "https://example.org/final");
    first.body = Some(b"redirect page".to_vec());
    push(&script, first);
    push(&script, reply(200, "payload"));

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let mut request = context.request("start", None, None);
    request.set_sink(Box::new(Shared(Arc::clone(&buffer))));
    context
        .send_request(request, PipelineChoice::Raw)
        .expect("send");
    assert_eq!(buffer.lock().expect("lock").as_slice(), b"payload");
}
