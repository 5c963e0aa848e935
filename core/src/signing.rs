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

use crate::time::DateTime;
use crate::{Credential, Error, Request, Result};
use http::header::HeaderName;
use http::uri::{Authority, Scheme};
use http::{HeaderMap, HeaderValue, Method};
use std::mem;

/// Everything a signer needs besides the request itself.
///
/// Passed by value so that concurrent calls never share signing state.
#[derive(Debug, Clone)]
pub struct SigningContext {
    /// Credential used to sign.
    pub credential: Credential,
    /// Signing time.
    pub time: DateTime,
    /// Region the request is sent to.
    pub region: String,
}

impl SigningContext {
    /// Create a new signing context.
    pub fn new(credential: Credential, time: DateTime, region: &str) -> Self {
        Self {
            credential,
            time,
            region: region.to_string(),
        }
    }
}

/// Signing view of a request.
///
/// Method and url parts are copied, headers are taken out of the request
/// and returned by [`SigningRequest::apply`].
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, percent encoded.
    pub path: String,
    /// HTTP query parameters, as they appear in the url.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing view of `req`.
    pub fn build(req: &mut Request) -> Result<Self> {
        let uri = req.uri();
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| Error::request_invalid("request without authority is invalid for signing"))?;

        Ok(SigningRequest {
            method: req.method().clone(),
            scheme: uri.scheme().cloned().unwrap_or(Scheme::HTTP),
            authority,
            path: uri.path().to_string(),
            query: uri
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            headers: mem::take(req.headers_mut()),
        })
    }

    /// Return the signed headers back to `req`.
    ///
    /// The url is left untouched so the query keeps its original order.
    pub fn apply(mut self, req: &mut Request) {
        mem::swap(req.headers_mut(), &mut self.headers);
    }

    /// Get header value by name.
    ///
    /// Returns empty string if header not found.
    #[inline]
    pub fn header_get_or_default(&self, key: &HeaderName) -> Result<&str> {
        match self.headers.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    /// Normalize header value by trimming surrounding spaces.
    pub fn header_value_normalize(v: &mut HeaderValue) -> Result<()> {
        let bs = v.as_bytes();

        let starting_index = bs.iter().position(|b| *b != b' ').unwrap_or(0);
        let ending_offset = bs.iter().rev().position(|b| *b != b' ').unwrap_or(0);
        let ending_index = bs.len() - ending_offset;

        *v = HeaderValue::from_bytes(&bs[starting_index..ending_index])?;
        Ok(())
    }

    /// Get header names as sorted vector.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }

    /// Get headers whose name starts with prefix.
    pub fn header_to_vec_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        self.headers
            .iter()
            .filter(|(k, _)| k.as_str().starts_with(prefix))
            .map(|(k, v)| Ok((k.as_str().to_string(), v.to_str()?.to_string())))
            .collect()
    }

    /// Convert sorted headers to string.
    ///
    /// ```shell
    /// [(a, b), (c, d)] => "a:b\nc:d"
    /// ```
    pub fn header_to_string(mut headers: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        headers.sort();

        for (idx, (k, v)) in headers.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            s.push_str(sep);
            s.push_str(&v);
        }

        s
    }

    /// Convert sorted query to string, keys without value are kept bare.
    ///
    /// ```shell
    /// [(a, b), (c, "")] => "a=b&c"
    /// ```
    pub fn query_to_string(mut query: Vec<(String, String)>, sep: &str, join: &str) -> String {
        let mut s = String::with_capacity(16);

        query.sort();

        for (idx, (k, v)) in query.into_iter().enumerate() {
            if idx != 0 {
                s.push_str(join);
            }

            s.push_str(&k);
            if !v.is_empty() {
                s.push_str(sep);
                s.push_str(&v);
            }
        }

        s
    }
}
