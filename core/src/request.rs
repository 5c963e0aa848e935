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

use crate::endpoint;
use crate::payload::{Body, Payload};
use crate::{ClientConfig, Error, Operation, Result, Stage};
use http::header::{HeaderName, CONTENT_LENGTH, HOST};
use http::{HeaderMap, HeaderValue, Method, Uri};

/// Bucket and object targeted by a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    /// Target bucket, `None` for service-level calls.
    pub bucket: Option<String>,
    /// Target object key.
    pub object: Option<String>,
}

/// Request is an assembled request whose body is not materialized yet.
///
/// The payload is chosen at construction and can only be replaced through
/// [`Request::with_payload`]. Call [`Request::materialize`] to get the
/// value handed to the transport.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) payload: Payload,
    pub(crate) resource: Resource,
}

impl Request {
    /// Create a new request with empty headers and payload.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            payload: Payload::default(),
            resource: Resource::default(),
        }
    }

    /// Assemble the request of `op` against `config`.
    ///
    /// - The URL comes from [`endpoint::resolve`] with `region`.
    /// - `host` is set to the URL authority.
    /// - Caller headers are merged on top, the caller wins on collision.
    pub fn build(config: &ClientConfig, region: &str, op: Operation) -> Result<Self> {
        let uri = endpoint::resolve(
            config,
            region,
            op.bucket.as_deref(),
            op.object.as_deref(),
            &op.resource,
            &op.queries,
        )
        .map_err(|e| e.with_stage(Stage::Resolve))?;

        let mut headers = HeaderMap::with_capacity(op.headers.len() + 1);
        let authority = uri
            .authority()
            .ok_or_else(|| Error::request_invalid("resolved url has no authority"))
            .map_err(|e| e.with_stage(Stage::Assemble))?;
        headers.insert(
            HOST,
            HeaderValue::from_str(authority.as_str())
                .map_err(|e| Error::from(e).with_stage(Stage::Assemble))?,
        );

        for (k, v) in op.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| Error::from(e).with_stage(Stage::Assemble))?;
            let value =
                HeaderValue::from_str(&v).map_err(|e| Error::from(e).with_stage(Stage::Assemble))?;
            headers.insert(name, value);
        }

        Ok(Self {
            method: op.method,
            uri,
            headers,
            payload: op.payload,
            resource: Resource {
                bucket: op.bucket.filter(|v| !v.is_empty()),
                object: op.object.filter(|v| !v.is_empty()),
            },
        })
    }

    /// Set the targeted resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// Replace the payload, returning the new request.
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request url.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Request payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Bucket and object targeted by this request.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Check if the request is sent over TLS.
    pub fn is_secure(&self) -> bool {
        self.uri.scheme_str() == Some("https")
    }

    /// Materialize the payload into the outgoing body.
    ///
    /// When the payload length is known, `content-length` is set to it,
    /// replacing any previous value. Stream payloads leave it untouched.
    pub fn materialize(self) -> MaterializedRequest {
        let mut headers = self.headers;
        let (body, size) = self.payload.materialize();
        set_content_length(&mut headers, size);

        MaterializedRequest {
            method: self.method,
            uri: self.uri,
            headers,
            body,
        }
    }
}

/// Set `content-length` to the known body size.
///
/// Streams are sent chunked, so a caller supplied length is removed.
pub(crate) fn set_content_length(headers: &mut HeaderMap, size: Option<u64>) {
    match size {
        Some(size) => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
        }
        None => {
            headers.remove(CONTENT_LENGTH);
        }
    }
}

/// MaterializedRequest is a request whose body is ready to be sent.
#[derive(Debug)]
pub struct MaterializedRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
}

impl MaterializedRequest {
    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request url.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of `content-length`, if set.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    /// Convert into an [`http::Request`].
    pub fn into_http(self) -> Result<http::Request<Body>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(self.body)
            .map_err(|e| Error::from(e).with_stage(Stage::Materialize))?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vendor;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    fn config() -> ClientConfig {
        ClientConfig {
            endpoint: "s3.amazonaws.com".to_string(),
            region: Some("us-east-1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_sets_host_and_merges_headers() {
        let op = Operation::new(Method::PUT)
            .with_bucket("logs-2024")
            .with_object("jan/01.log")
            .with_header("Content-Type", "text/plain")
            .with_header("X-Amz-Meta-Owner", "ops")
            .with_payload("hello");
        let req = Request::build(&config(), "us-east-1", op).unwrap();

        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.uri().to_string(), "https://logs-2024.s3.amazonaws.com/jan/01.log");
        assert_eq!(req.headers()[HOST], "logs-2024.s3.amazonaws.com");
        assert_eq!(req.headers()["content-type"], "text/plain");
        assert_eq!(req.headers()["x-amz-meta-owner"], "ops");
        assert_eq!(
            req.resource(),
            &Resource {
                bucket: Some("logs-2024".to_string()),
                object: Some("jan/01.log".to_string()),
            }
        );
        assert!(req.is_secure());
    }

    #[test]
    fn test_build_caller_header_wins() {
        let op = Operation::new(Method::GET)
            .with_bucket("bucket")
            .with_header("HOST", "proxy.internal");
        let req = Request::build(&config(), "us-east-1", op).unwrap();
        assert_eq!(req.headers()[HOST], "proxy.internal");
        assert_eq!(req.headers().get_all(HOST).iter().count(), 1);
    }

    #[test]
    fn test_build_host_keeps_port() {
        let cfg = ClientConfig {
            endpoint: "localhost:9000".to_string(),
            secure: false,
            ..Default::default()
        };
        let req = Request::build(&cfg, "", Operation::new(Method::GET).with_bucket("b1b")).unwrap();
        assert_eq!(req.headers()[HOST], "localhost:9000");
        assert_eq!(req.uri().path(), "/b1b");
    }

    #[test]
    fn test_build_service_level_oss() {
        let cfg = ClientConfig {
            endpoint: "oss-cn-beijing.aliyuncs.com".to_string(),
            vendor: Vendor::Oss,
            ..Default::default()
        };
        let req = Request::build(&cfg, "", Operation::new(Method::GET)).unwrap();
        assert_eq!(req.headers()[HOST], "oss-cn-beijing.aliyuncs.com");
        assert_eq!(req.resource(), &Resource::default());
        assert_eq!(req.payload().known_length(), Some(0));
    }

    #[test]
    fn test_build_invalid_header_is_assemble_error() {
        let op = Operation::new(Method::GET).with_header("bad header", "v");
        let err = Request::build(&config(), "us-east-1", op).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
        assert_eq!(err.stage(), Some(Stage::Assemble));
    }

    #[test]
    fn test_build_invalid_endpoint_is_resolve_error() {
        let cfg = ClientConfig {
            endpoint: "bad host".to_string(),
            ..Default::default()
        };
        let err = Request::build(&cfg, "", Operation::new(Method::GET)).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Resolve));
    }

    #[test]
    fn test_materialize_bytes_sets_content_length() {
        for n in [0usize, 1, 1024] {
            let req = Request::new(Method::PUT, Uri::from_static("http://127.0.0.1/b/k"))
                .with_payload(Bytes::from(vec![7u8; n]));
            let req = req.materialize();
            assert_eq!(req.content_length(), Some(n as u64));
            assert_eq!(req.headers().get_all(CONTENT_LENGTH).iter().count(), 1);
        }
    }

    #[test]
    fn test_materialize_replaces_stale_content_length() {
        let mut req = Request::new(Method::PUT, Uri::from_static("http://127.0.0.1/b/k"))
            .with_payload("abc");
        req.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("99"));
        let req = req.materialize();
        assert_eq!(req.content_length(), Some(3));
        assert_eq!(req.headers().get_all(CONTENT_LENGTH).iter().count(), 1);
    }

    #[test]
    fn test_materialize_stream_has_no_content_length() {
        let req = Request::new(Method::PUT, Uri::from_static("http://127.0.0.1/b/k"))
            .with_payload(Payload::stream(futures::stream::empty()));
        let req = req.materialize();
        assert_eq!(req.content_length(), None);

        let req = req.into_http().unwrap();
        assert!(matches!(req.body(), Body::Stream(_)));
        assert!(req.headers().get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_materialize_stream_drops_caller_content_length() {
        let mut req = Request::new(Method::PUT, Uri::from_static("http://127.0.0.1/b/k"))
            .with_payload(Payload::stream(futures::stream::empty()));
        req.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("99"));

        let req = req.materialize();
        assert_eq!(req.content_length(), None);
        assert!(req.headers().get(CONTENT_LENGTH).is_none());
    }
}
