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

use crate::constants::*;
use http::header::{self, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;
use storsign_core::constants::{QUERY_ENCODE_SET, URI_ENCODE_SET};
use storsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use storsign_core::time::{format_date, format_iso8601, DateTime};
use storsign_core::{Error, Request, Result, SignRequest, SigningContext, SigningRequest, Stage};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// The payload hash is `UNSIGNED-PAYLOAD` for anonymous calls, for calls
/// over TLS and for stream payloads. Otherwise it is the hex SHA-256 of
/// the payload bytes.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(S3_SERVICE)
    }
}

impl RequestSigner {
    /// Create a new signer for `service`.
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }
}

impl SignRequest for RequestSigner {
    fn sign_request(&self, req: Request, ctx: SigningContext) -> Result<Request> {
        self.sign(req, ctx).map_err(|e| e.with_stage(Stage::Sign))
    }
}

impl RequestSigner {
    fn sign(&self, mut req: Request, ctx: SigningContext) -> Result<Request> {
        let cred = &ctx.credential;
        let anonymous = cred.is_anonymous();
        if !anonymous {
            cred.require_secret()?;
        }

        let payload_hash = if anonymous || req.is_secure() {
            UNSIGNED_PAYLOAD.to_string()
        } else {
            match req.payload().as_bytes() {
                Some(bs) => hex_sha256(bs),
                None => UNSIGNED_PAYLOAD.to_string(),
            }
        };

        let mut signed_req = SigningRequest::build(&mut req)?;
        canonicalize_header(&mut signed_req, &ctx, &payload_hash)?;

        if !anonymous {
            let now = ctx.time;
            canonicalize_query(&mut signed_req);

            // build canonical request and string to sign.
            let creq = canonical_request_string(&signed_req)?;
            debug!("calculated canonical request: {creq}");
            let encoded_req = hex_sha256(creq.as_bytes());

            // Scope: "20220313/<region>/<service>/aws4_request"
            let scope = format!(
                "{}/{}/{}/aws4_request",
                format_date(now),
                ctx.region,
                self.service
            );
            debug!("calculated scope: {scope}");

            // StringToSign:
            //
            // AWS4-HMAC-SHA256
            // 20220313T072004Z
            // 20220313/<region>/<service>/aws4_request
            // <hashed_canonical_request>
            let string_to_sign = {
                let mut f = String::new();
                writeln!(f, "AWS4-HMAC-SHA256")?;
                writeln!(f, "{}", format_iso8601(now))?;
                writeln!(f, "{}", &scope)?;
                write!(f, "{}", &encoded_req)?;
                f
            };
            debug!("calculated string to sign: {string_to_sign}");

            let signing_key =
                generate_signing_key(&cred.secret_access_key, now, &ctx.region, &self.service);
            let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

            let mut authorization = HeaderValue::from_str(&format!(
                "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
                cred.access_key_id,
                scope,
                signed_headers(&signed_req).join(";"),
                signature
            ))?;
            authorization.set_sensitive(true);

            signed_req
                .headers
                .insert(header::AUTHORIZATION, authorization);
        }

        signed_req
            .headers
            .insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

        signed_req.apply(&mut req);
        Ok(req)
    }
}

/// Header names covered by the signature, sorted.
///
/// `user-agent` is rewritten by proxies and left out.
fn signed_headers(ctx: &SigningRequest) -> Vec<&str> {
    ctx.header_name_to_vec_sorted()
        .into_iter()
        .filter(|k| *k != header::USER_AGENT.as_str())
        .collect()
}

fn canonical_request_string(ctx: &SigningRequest) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert encoded path
    let path = percent_decode_str(&ctx.path)
        .decode_utf8()
        .map_err(|e| Error::request_invalid("request path is not valid utf-8").with_source(e))?;
    writeln!(f, "{}", utf8_percent_encode(&path, &URI_ENCODE_SET))?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert signed headers
    let signed_headers = signed_headers(ctx);
    for header in signed_headers.iter() {
        let value = &ctx.headers[*header];
        writeln!(f, "{}:{}", header, value.to_str()?)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    let payload_hash = match ctx.headers.get(X_AMZ_CONTENT_SHA_256) {
        Some(v) => v.to_str()?,
        None => UNSIGNED_PAYLOAD,
    };
    write!(f, "{payload_hash}")?;

    Ok(f)
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    signing: &SigningContext,
    payload_hash: &str,
) -> Result<()> {
    // Header values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)?;
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, HeaderValue::from_str(ctx.authority.as_str())?);
    }

    ctx.headers.insert(
        X_AMZ_DATE,
        HeaderValue::try_from(format_iso8601(signing.time))?,
    );

    // Insert X_AMZ_CONTENT_SHA_256 header if not present.
    if ctx.headers.get(X_AMZ_CONTENT_SHA_256).is_none() {
        ctx.headers
            .insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(payload_hash)?);
    }

    if let Some(token) = &signing.credential.session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to valid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Sort by param name
    ctx.query.sort();

    ctx.query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
