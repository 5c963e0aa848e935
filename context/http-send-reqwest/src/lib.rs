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

//! Transport for storsign backed by [`reqwest`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use http_body_util::BodyExt;
use reqwest::Client;
use storsign_core::{Body, ByteStream, Error, HttpSend, Result};

/// ReqwestHttpSend sends requests with a [`reqwest::Client`].
///
/// Redirects and timeouts follow the configuration of the client passed in.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        let req = into_reqwest_request(req)?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }

    async fn http_send_stream(
        &self,
        req: http::Request<Body>,
    ) -> Result<http::Response<ByteStream>> {
        let req = into_reqwest_request(req)?;
        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport("failed to send request").with_source(e))?;

        let mut builder = http::Response::builder()
            .status(resp.status())
            .version(resp.version());
        if let Some(headers) = builder.headers_mut() {
            *headers = resp.headers().clone();
        }

        let stream: ByteStream = Box::pin(
            resp.bytes_stream()
                .map_err(|e| Error::transport("failed to read response body").with_source(e)),
        );
        Ok(builder.body(stream)?)
    }
}

fn into_reqwest_request(req: http::Request<Body>) -> Result<reqwest::Request> {
    let req = req.map(|body| match body {
        Body::Full(bs) => reqwest::Body::from(bs),
        Body::Stream(s) => reqwest::Body::wrap_stream(s),
    });
    reqwest::Request::try_from(req)
        .map_err(|e| Error::request_invalid("failed to build reqwest request").with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_into_reqwest_request_full_body() {
        let req = http::Request::builder()
            .method(Method::PUT)
            .uri("http://127.0.0.1:9000/bucket/key")
            .header("content-length", "5")
            .body(Body::Full(Bytes::from_static(b"hello")))
            .unwrap();

        let req = into_reqwest_request(req).unwrap();
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.url().as_str(), "http://127.0.0.1:9000/bucket/key");
        assert_eq!(req.headers()["content-length"], "5");
        assert_eq!(
            req.body().and_then(|b| b.as_bytes()),
            Some(&b"hello"[..])
        );
    }

    #[test]
    fn test_into_reqwest_request_stream_body() {
        let stream: ByteStream = Box::pin(futures::stream::iter(vec![Ok(Bytes::from_static(
            b"chunk",
        ))]));
        let req = http::Request::builder()
            .method(Method::PUT)
            .uri("http://127.0.0.1:9000/bucket/key")
            .body(Body::Stream(stream))
            .unwrap();

        let req = into_reqwest_request(req).unwrap();
        assert!(req.headers().get("content-length").is_none());
        assert!(req.body().and_then(|b| b.as_bytes()).is_none());
    }
}
