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

use crate::constants::{SUB_RESOURCES, X_OSS_PREFIX, X_OSS_SECURITY_TOKEN};
use http::header::{AUTHORIZATION, CONTENT_TYPE, DATE};
use http::{HeaderName, HeaderValue};
use log::debug;
use std::fmt::Write;
use storsign_core::hash::base64_hmac_sha1;
use storsign_core::time::format_http_date;
use storsign_core::{Request, Resource, Result, SignRequest, SigningContext, SigningRequest, Stage};

const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");

/// RequestSigner for Aliyun OSS signature.
///
/// - [Header signature](https://help.aliyun.com/document_detail/31951.html)
#[derive(Debug, Default)]
pub struct RequestSigner {
    sub_resources: bool,
}

impl RequestSigner {
    /// Create a new signer for Aliyun OSS.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign recognised sub-resources such as `acl` or `uploadId`.
    ///
    /// By default the canonicalized resource is `/{bucket}/{object}` and the
    /// query is left out. Enable this for endpoints that verify the
    /// sub-resource suffix, e.g. `/{bucket}/?acl`.
    pub fn with_sub_resources(mut self, enabled: bool) -> Self {
        self.sub_resources = enabled;
        self
    }
}

impl SignRequest for RequestSigner {
    fn sign_request(&self, req: Request, ctx: SigningContext) -> Result<Request> {
        self.sign_header(req, ctx)
            .map_err(|e| e.with_stage(Stage::Sign))
    }
}

impl RequestSigner {
    fn sign_header(&self, mut req: Request, ctx: SigningContext) -> Result<Request> {
        let cred = &ctx.credential;
        if cred.is_anonymous() {
            return Ok(req);
        }
        let secret = cred.require_secret()?;

        let resource = req.resource().clone();
        let mut signed_req = SigningRequest::build(&mut req)?;

        // Add date header
        signed_req
            .headers
            .insert(DATE, HeaderValue::from_str(&format_http_date(ctx.time))?);

        // Add security token if present
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            signed_req.headers.insert(X_OSS_SECURITY_TOKEN, value);
        }

        let string_to_sign = self.build_string_to_sign(&signed_req, &resource)?;
        debug!("calculated string to sign: {string_to_sign}");
        let signature = base64_hmac_sha1(secret.as_bytes(), string_to_sign.as_bytes());

        // Add authorization header
        let mut header_value =
            HeaderValue::from_str(&format!("OSS {}:{}", cred.access_key_id, signature))?;
        header_value.set_sensitive(true);
        signed_req.headers.insert(AUTHORIZATION, header_value);

        signed_req.apply(&mut req);
        Ok(req)
    }

    fn build_string_to_sign(&self, req: &SigningRequest, resource: &Resource) -> Result<String> {
        let mut s = String::new();
        writeln!(&mut s, "{}", req.method.as_str())?;
        writeln!(&mut s, "{}", req.header_get_or_default(&CONTENT_MD5)?)?;
        writeln!(&mut s, "{}", req.header_get_or_default(&CONTENT_TYPE)?)?;
        writeln!(&mut s, "{}", req.header_get_or_default(&DATE)?)?;
        s.write_str(&canonicalize_headers(req)?)?;
        s.write_str(&self.canonicalize_resource(req, resource))?;

        Ok(s)
    }

    fn canonicalize_resource(&self, req: &SigningRequest, resource: &Resource) -> String {
        let mut s = match &resource.bucket {
            None => return "/".to_string(),
            Some(bucket) => format!("/{bucket}/{}", resource.object.as_deref().unwrap_or("")),
        };
        if !self.sub_resources {
            return s;
        }

        let sub_resources: Vec<(String, String)> = req
            .query
            .iter()
            .filter(|(k, _)| is_sub_resource(k))
            .cloned()
            .collect();
        if !sub_resources.is_empty() {
            s.push('?');
            s.push_str(&SigningRequest::query_to_string(sub_resources, "=", "&"));
        }
        s
    }
}

/// Build the `x-oss-*` header block, one `key:value\n` line per header.
fn canonicalize_headers(req: &SigningRequest) -> Result<String> {
    let headers = req.header_to_vec_with_prefix(X_OSS_PREFIX)?;
    if headers.is_empty() {
        return Ok(String::new());
    }

    let mut s = SigningRequest::header_to_string(headers, ":", "\n");
    s.push('\n');
    Ok(s)
}

fn is_sub_resource(key: &str) -> bool {
    SUB_RESOURCES.contains(key)
}
