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

use crate::Payload;
use http::Method;

/// Operation is a logical storage call before it becomes an HTTP request.
///
/// ```
/// use storsign_core::Operation;
///
/// let op = Operation::new(http::Method::PUT)
///     .with_bucket("logs-2024")
///     .with_object("jan/01.log")
///     .with_header("content-type", "text/plain")
///     .with_payload("hello");
/// ```
#[derive(Debug, Default)]
pub struct Operation {
    /// HTTP method.
    pub method: Method,
    /// Target bucket, `None` for service-level calls.
    pub bucket: Option<String>,
    /// Target object key.
    pub object: Option<String>,
    /// Region override, looked up from the bucket when `None`.
    pub region: Option<String>,
    /// Sub-resource suffix such as `?location`, copied verbatim into the query.
    pub resource: String,
    /// Extra query parameters, sent in insertion order.
    pub queries: Vec<(String, String)>,
    /// Extra headers, names are case-insensitive.
    pub headers: Vec<(String, String)>,
    /// Payload, an empty string by default.
    pub payload: Payload,
}

impl Operation {
    /// Create a new operation for `method`.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Set the bucket.
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.bucket = Some(bucket.to_string());
        self
    }

    /// Set the object key.
    pub fn with_object(mut self, object: &str) -> Self {
        self.object = Some(object.to_string());
        self
    }

    /// Set the region override.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Set the sub-resource suffix.
    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = resource.to_string();
        self
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.queries.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a header.
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Bucket name if the operation targets one.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref().filter(|v| !v.is_empty())
    }
}
