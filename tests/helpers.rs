// Shared test helpers: a scripted in-memory transport.
//
// Replies are served in order; every exchange is recorded so tests can assert
// on URLs, methods and header lines the context produced.

#![allow(dead_code)] // Not every test file uses every helper

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crawlkit::config::Config;
use crawlkit::cookies::CookieJar;
use crawlkit::error_handling::TransportFailure;
use crawlkit::fetch::{BodySink, Connector, Exchange, Reply, Transport};
use crawlkit::Context;

#[derive(Default)]
pub struct ScriptState {
    pub replies: VecDeque<Result<Reply, TransportFailure>>,
    pub exchanges: Vec<Exchange>,
    pub jar: CookieJar,
    pub connects: usize,
}

/// Handle on the state shared by every transport a connector builds.
#[derive(Clone, Default)]
pub struct Script(Arc<Mutex<ScriptState>>);

impl Script {
    pub fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.0.lock().expect("script lock poisoned")
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.state().replies.push_back(Ok(reply));
        self
    }

    pub fn fail(&self, code: u32, message: &str) -> &Self {
        self.state()
            .replies
            .push_back(Err(TransportFailure::new(code, message)));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.state().exchanges.iter().map(|e| e.url.clone()).collect()
    }

    pub fn exchange_count(&self) -> usize {
        self.state().exchanges.len()
    }

    pub fn last_exchange(&self) -> Option<Exchange> {
        self.state().exchanges.last().cloned()
    }

    pub fn connects(&self) -> usize {
        self.state().connects
    }

    pub fn connector(&self) -> Connector {
        let script = self.clone();
        Box::new(move |_config: &Config| {
            script.state().connects += 1;
            Ok(Box::new(ScriptedTransport(script.clone())) as Box<dyn Transport>)
        })
    }
}

pub struct ScriptedTransport(Script);

impl Transport for ScriptedTransport {
    fn exchange(
        &mut self,
        exchange: &Exchange,
        sink: Option<&mut dyn BodySink>,
    ) -> Result<Reply, TransportFailure> {
        let mut state = self.0.state();
        state.exchanges.push(exchange.clone());
        let mut reply = state
            .replies
            .pop_front()
            .unwrap_or_else(|| Ok(ok("")))?;
        if reply.effective_url.is_empty() {
            reply.effective_url = exchange.url.clone();
        }
        if exchange.options.no_body {
            reply.body = None;
        }
        if let Some(sink) = sink {
            if let Some(body) = reply.body.take() {
                sink.write_all(&body)
                    .map_err(|e| TransportFailure::new(23, e.to_string()))?;
            }
        }
        Ok(reply)
    }

    fn import_cookie(&mut self, record: &str) {
        let _ = self.0.state().jar.import_record(record);
    }

    fn cookie_records(&self) -> Vec<String> {
        self.0.state().jar.records()
    }

    fn clear_cookies(&mut self) {
        self.0.state().jar.clear();
    }

    fn load_cookies(&mut self, path: &Path) -> io::Result<usize> {
        self.0.state().jar.load(path)
    }

    fn save_cookies(&self, path: &Path) -> io::Result<()> {
        self.0.state().jar.save(path)
    }
}

/// A context on `domain` whose transport is scripted.
pub fn scripted_context(domain: &str) -> (Context, Script) {
    let script = Script::default();
    let context = Context::with_transport(Config::default(), domain, None, script.connector());
    (context, script)
}

/// A 200 reply with `body`.
pub fn ok(body: &str) -> Reply {
    status(200, body)
}

/// A reply with the given status and body.
pub fn status(code: u16, body: &str) -> Reply {
    Reply {
        status_code: code,
        header_lines: vec![format!("HTTP/1.1 {}", code)],
        body: Some(body.as_bytes().to_vec()),
        download_size: body.len() as i64,
        file_time: -1,
        ..Default::default()
    }
}

/// A redirect reply pointing at `location`.
pub fn redirect(code: u16, location: &str) -> Reply {
    let mut reply = status(code, "");
    reply.header_lines.push(format!("Location: {}", location));
    reply.redirect_url = Some(location.to_string());
    reply
}
