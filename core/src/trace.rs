// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Diagnostic dump of outgoing requests and incoming responses.

use crate::request::set_content_length;
use crate::utils::Redact;
use crate::{Payload, Request};
use bytes::Bytes;
use http::HeaderMap;
use std::fmt::Write;

/// Log target used by the tracer.
pub const TRACE_TARGET: &str = "storsign::trace";

/// Tracer dumps requests and responses through `log` when enabled.
///
/// The tracer only observes: it never consumes a stream payload or a
/// streamed response body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracer {
    enabled: bool,
}

impl Tracer {
    /// Create a tracer, no-op when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if the tracer is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Dump an outgoing request.
    pub fn trace_request(&self, req: &Request) {
        if !self.enabled {
            return;
        }
        log::info!(target: TRACE_TARGET, "{}", format_request(req));
    }

    /// Dump a buffered response.
    pub fn trace_response(&self, resp: &http::Response<Bytes>) {
        if !self.enabled {
            return;
        }
        log::info!(
            target: TRACE_TARGET,
            "{}",
            format_response(resp.status(), resp.headers(), Some(resp.body()))
        );
    }

    /// Dump a streamed response without touching its body.
    pub fn trace_stream_response<T>(&self, resp: &http::Response<T>) {
        if !self.enabled {
            return;
        }
        log::info!(
            target: TRACE_TARGET,
            "{}",
            format_response(resp.status(), resp.headers(), None)
        );
    }
}

/// Render a request dump.
///
/// Headers are shown as they go on the wire, including the
/// `content-length` set at materialization.
pub fn format_request(req: &Request) -> String {
    let mut headers = req.headers().clone();
    set_content_length(&mut headers, req.payload().known_length());

    let mut s = String::new();
    let _ = writeln!(s, "---------START-HTTP---------");
    let _ = writeln!(s, "{} {}", req.method(), req.uri());
    write_headers(&mut s, &headers);
    let _ = writeln!(s);
    match req.payload() {
        Payload::Text(v) => s.push_str(v),
        Payload::Bytes(bs) => {
            let _ = write!(s, "<{} bytes>", bs.len());
        }
        Payload::Stream(_) => s.push_str("<stream>"),
    }
    let _ = write!(s, "\n---------END-HTTP---------");
    s
}

/// Render a response dump, `body` is `None` for streamed responses.
pub fn format_response(status: http::StatusCode, headers: &HeaderMap, body: Option<&Bytes>) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "---------START-HTTP---------");
    let _ = writeln!(
        s,
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    write_headers(&mut s, headers);
    let _ = writeln!(s);
    match body {
        Some(bs) => s.push_str(&String::from_utf8_lossy(bs)),
        None => s.push_str("<stream>"),
    }
    let _ = write!(s, "\n---------END-HTTP---------");
    s
}

fn write_headers(s: &mut String, headers: &HeaderMap) {
    for (k, v) in headers {
        let value = String::from_utf8_lossy(v.as_bytes());
        if v.is_sensitive() {
            let _ = writeln!(s, "{}: {}", k, Redact::from(value.as_ref()));
        } else {
            let _ = writeln!(s, "{}: {}", k, value);
        }
    }
}
