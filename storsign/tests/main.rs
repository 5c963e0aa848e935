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

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use http::{header, HeaderMap, Method, StatusCode};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use storsign::aliyun;
use storsign::{
    Body, ByteStream, Client, ClientConfig, Context, Error, ErrorKind, HttpSend, Operation,
    Payload, ProvideRegion, Result, Stage, StaticRegionProvider, Vendor,
};
use test_case::test_case;

/// A request as seen by the transport.
#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    uri: String,
    headers: HeaderMap,
    chunks: Vec<Bytes>,
}

/// MockHttpSend records every request and answers with a fixed status.
#[derive(Debug, Clone)]
struct MockHttpSend {
    status: StatusCode,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    fn new(status: StatusCode) -> Self {
        Self {
            status,
            requests: Arc::default(),
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    async fn record(&self, req: http::Request<Body>) -> Result<()> {
        let (parts, body) = req.into_parts();
        let chunks: Vec<Bytes> = body.into_stream().try_collect().await?;
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            chunks,
        });
        Ok(())
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Body>) -> Result<http::Response<Bytes>> {
        self.record(req).await?;
        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(b"<Result/>"))?)
    }

    async fn http_send_stream(
        &self,
        req: http::Request<Body>,
    ) -> Result<http::Response<ByteStream>> {
        self.record(req).await?;
        let body: ByteStream = Box::pin(futures::stream::iter(vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]));
        Ok(http::Response::builder().status(self.status).body(body)?)
    }
}

/// FailingRegionProvider always fails the lookup.
#[derive(Debug)]
struct FailingRegionProvider;

#[async_trait]
impl ProvideRegion for FailingRegionProvider {
    async fn provide_region(&self, _: &Context, _: &str) -> Result<Option<String>> {
        Err(Error::transport("lookup endpoint unreachable"))
    }
}

fn config() -> ClientConfig {
    ClientConfig {
        endpoint: "s3.amazonaws.com".to_string(),
        secure: true,
        region: Some("us-east-1".to_string()),
        access_key_id: "access_key_id".to_string(),
        secret_access_key: "secret_access_key".to_string(),
        ..Default::default()
    }
}

fn client(config: ClientConfig) -> (Client, MockHttpSend) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::new(StatusCode::OK);
    let ctx = Context::new().with_http_send(mock.clone());
    (Client::new(ctx, config), mock)
}

fn put_log() -> Operation {
    Operation::new(Method::PUT)
        .with_bucket("logs-2024")
        .with_object("jan/01.log")
        .with_header("content-type", "text/plain")
        .with_payload("hello")
}

#[tokio::test]
async fn test_send_standard() {
    let (client, mock) = client(config());

    let resp = client.send(put_log()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), &Bytes::from_static(b"<Result/>"));

    let reqs = mock.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.uri, "https://logs-2024.s3.amazonaws.com/jan/01.log");
    assert_eq!(req.headers[header::HOST], "logs-2024.s3.amazonaws.com");
    assert_eq!(req.headers[header::CONTENT_LENGTH], "5");
    assert_eq!(req.headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(req.headers["x-amz-content-sha256"], "UNSIGNED-PAYLOAD");
    assert_eq!(req.headers[header::USER_AGENT], storsign::aws::USER_AGENT);
    assert_eq!(req.chunks, vec![Bytes::from_static(b"hello")]);

    let auth = req.headers[header::AUTHORIZATION].to_str().unwrap();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=access_key_id/"));
    assert!(auth.contains("/us-east-1/s3/aws4_request, SignedHeaders="));
}

#[tokio::test]
async fn test_send_oss_vendor() {
    let (client, mock) = client(ClientConfig {
        vendor: Vendor::Oss,
        ..config()
    });

    client.send(put_log()).await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri, "https://logs-2024.s3.amazonaws.com/jan/01.log");
    assert!(req.headers[header::AUTHORIZATION]
        .to_str()
        .unwrap()
        .starts_with("OSS access_key_id:"));
    assert!(req.headers.contains_key(header::DATE));
    assert!(!req.headers.contains_key("x-amz-date"));
}

#[tokio::test]
async fn test_send_anonymous() {
    let (client, mock) = client(ClientConfig {
        access_key_id: String::new(),
        secret_access_key: String::new(),
        secure: false,
        ..config()
    });

    client.send(put_log()).await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri, "http://logs-2024.s3.amazonaws.com/jan/01.log");
    assert_eq!(req.headers["x-amz-content-sha256"], "UNSIGNED-PAYLOAD");
    assert!(!req.headers.contains_key(header::AUTHORIZATION));
}

#[tokio::test]
async fn test_service_level_call() {
    let (client, mock) = client(config());

    client.send(Operation::new(Method::GET)).await.unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri, "https://s3.amazonaws.com/");
    assert_eq!(req.headers[header::CONTENT_LENGTH], "0");
}

#[test_case(Some("ap-south-1"), Some("eu-west-1"), Some("us-west-2"), "ap-south-1"; "operation override wins")]
#[test_case(None, Some("eu-west-1"), Some("us-west-2"), "eu-west-1"; "provider before config")]
#[test_case(None, None, Some("us-west-2"), "us-west-2"; "config when provider has no answer")]
#[test_case(None, None, None, "us-east-1"; "default region")]
#[tokio::test]
async fn test_region_precedence(
    op_region: Option<&str>,
    bucket_region: Option<&str>,
    config_region: Option<&str>,
    expected: &str,
) {
    let mut provider = StaticRegionProvider::new();
    if let Some(region) = bucket_region {
        provider = provider.with_bucket("logs-2024", region);
    }
    let (client, _) = client(ClientConfig {
        region: config_region.map(|v| v.to_string()),
        ..config()
    });
    let client = client.with_region_provider(provider);

    let mut op = put_log();
    if let Some(region) = op_region {
        op = op.with_region(region);
    }
    let req = client.prepare(op).await.unwrap();

    // Credential=access_key_id/<date>/<region>/s3/aws4_request
    let auth = req.headers()[header::AUTHORIZATION].to_str().unwrap();
    assert_eq!(auth.split('/').nth(2), Some(expected));

    let host = if expected == "us-east-1" {
        "logs-2024.s3.amazonaws.com".to_string()
    } else {
        format!("logs-2024.s3.{expected}.amazonaws.com")
    };
    assert_eq!(req.uri().host(), Some(host.as_str()));
}

#[tokio::test]
async fn test_region_lookup_failure() {
    let (client, mock) = client(ClientConfig {
        region: None,
        ..config()
    });
    let client = client.with_region_provider(FailingRegionProvider);

    let err = client.send(put_log()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RegionUnresolved);
    assert_eq!(err.stage(), Some(Stage::Resolve));
    assert!(mock.requests().is_empty());

    // Service-level calls never ask the provider.
    client.send(Operation::new(Method::GET)).await.unwrap();
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_secret() {
    let (client, mock) = client(ClientConfig {
        secret_access_key: String::new(),
        ..config()
    });

    let err = client.send(put_log()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialMissing);
    assert_eq!(err.stage(), Some(Stage::Sign));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_not_an_error() {
    let mock = MockHttpSend::new(StatusCode::NOT_FOUND);
    let client = Client::new(Context::new().with_http_send(mock.clone()), config());

    let resp = client
        .send(
            Operation::new(Method::HEAD)
                .with_bucket("logs-2024")
                .with_object("missing"),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transport_failure() {
    let client = Client::new(Context::new(), config());

    let err = client.send(put_log()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.stage(), Some(Stage::Send));
}

#[tokio::test]
async fn test_send_stream_passes_chunks_through() {
    let (client, mock) = client(ClientConfig {
        trace: true,
        ..config()
    });

    let op = Operation::new(Method::PUT)
        .with_bucket("logs-2024")
        .with_object("jan/02.log")
        .with_payload(Payload::stream(futures::stream::iter(vec![
            Ok(Bytes::from_static(b"a")),
            Ok(Bytes::from_static(b"bc")),
        ])));
    let resp = client.send_stream(op).await.unwrap();

    let chunks: Vec<Bytes> = resp.into_body().try_collect().await.unwrap();
    assert_eq!(chunks.concat(), b"hello world");

    let req = &mock.requests()[0];
    assert!(!req.headers.contains_key(header::CONTENT_LENGTH));
    assert_eq!(
        req.chunks,
        vec![Bytes::from_static(b"a"), Bytes::from_static(b"bc")]
    );
}

#[tokio::test]
async fn test_prepare_does_not_send() {
    let (client, mock) = client(config());

    let req = client.prepare(put_log()).await.unwrap();
    assert!(req.headers().contains_key(header::AUTHORIZATION));
    assert!(mock.requests().is_empty());

    let req = req.materialize();
    assert_eq!(req.content_length(), Some(5));
}

#[tokio::test]
async fn test_custom_signer() {
    let (client, mock) = client(ClientConfig {
        vendor: Vendor::Oss,
        endpoint: "oss-cn-hangzhou.aliyuncs.com".to_string(),
        ..config()
    });
    let client = client.with_signer(aliyun::RequestSigner::new().with_sub_resources(true));

    client
        .send(
            Operation::new(Method::GET)
                .with_bucket("logs-2024")
                .with_resource("?acl"),
        )
        .await
        .unwrap();

    let req = &mock.requests()[0];
    assert_eq!(req.uri, "https://logs-2024.oss-cn-hangzhou.aliyuncs.com/?acl");
    assert!(req.headers.contains_key(header::AUTHORIZATION));
}
