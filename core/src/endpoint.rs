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

//! Endpoint resolution: host, path and query of an operation.

use crate::constants::{QUERY_ENCODE_SET, URI_ENCODE_SET};
use crate::{AddressingStyle, ClientConfig, Error, Result, Vendor};
use http::uri::{Authority, Scheme};
use http::Uri;
use percent_encoding::utf8_percent_encode;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// Placeholder endpoint rewritten into the region specific endpoint.
const GLOBAL_S3_ENDPOINT: &str = "s3.amazonaws.com";
/// Max length of a full DNS name.
const MAX_HOST_LENGTH: usize = 253;

/// Resolve the URL of an operation.
///
/// `bucket` and `object` are treated as absent when empty. `resource` is the
/// sub-resource suffix such as `?location` and is copied verbatim into the
/// query, followed by `queries` percent-encoded in the given order.
pub fn resolve(
    config: &ClientConfig,
    region: &str,
    bucket: Option<&str>,
    object: Option<&str>,
    resource: &str,
    queries: &[(String, String)],
) -> Result<Uri> {
    let bucket = bucket.filter(|v| !v.is_empty());
    let object = object.filter(|v| !v.is_empty());

    let endpoint = config.endpoint.trim_end_matches('/').to_lowercase();
    let authority = Authority::from_str(&endpoint).map_err(|e| {
        Error::config_invalid(format!("endpoint {endpoint} is not a valid host")).with_source(e)
    })?;
    let mut host = authority.host().to_string();
    let port = config.port.or_else(|| authority.port_u16());

    let mut path = String::from("/");
    match config.vendor {
        Vendor::Oss => {
            if let Some(bucket) = bucket {
                host = format!("{bucket}.{host}");
            }
            if let Some(object) = object {
                path.push_str(&encode_path(object));
            }
        }
        Vendor::Standard => {
            host = rewrite_endpoint(&host, region);

            match bucket {
                Some(bucket) if use_virtual_host(config, &host, bucket) => {
                    host = format!("{bucket}.{host}");
                    if let Some(object) = object {
                        path.push_str(&encode_path(object));
                    }
                }
                Some(bucket) => {
                    path.push_str(&encode_path(bucket));
                    if let Some(object) = object {
                        path.push('/');
                        path.push_str(&encode_path(object));
                    }
                }
                None => {}
            }
        }
    }

    let query = build_query(resource, queries);
    let path_and_query = if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    };

    let scheme = if config.secure {
        Scheme::HTTPS
    } else {
        Scheme::HTTP
    };
    let default_port = if config.secure { 443 } else { 80 };
    let authority = match port {
        Some(port) if port != default_port => format!("{host}:{port}"),
        _ => host,
    };

    let uri = Uri::builder()
        .scheme(scheme)
        .authority(authority.as_str())
        .path_and_query(path_and_query.as_str())
        .build()?;
    Ok(uri)
}

/// Rewrite the global placeholder endpoint into the endpoint of `region`.
///
/// Other hosts are returned as is.
pub fn rewrite_endpoint(host: &str, region: &str) -> String {
    if host != GLOBAL_S3_ENDPOINT {
        return host.to_string();
    }

    let region = if region.is_empty() {
        crate::constants::DEFAULT_REGION
    } else {
        region
    };
    if region == crate::constants::DEFAULT_REGION {
        GLOBAL_S3_ENDPOINT.to_string()
    } else {
        format!("s3.{region}.amazonaws.com")
    }
}

fn use_virtual_host(config: &ClientConfig, host: &str, bucket: &str) -> bool {
    match config.addressing_style {
        AddressingStyle::Auto => is_virtual_host_style(host, config.secure, bucket),
        AddressingStyle::Path => false,
        AddressingStyle::VirtualHost => true,
    }
}

/// Decide whether `bucket` can be addressed as a sub-domain of `host`.
///
/// This is a pure function of its inputs:
///
/// - the bucket must be a valid DNS label sequence (see [`is_dns_compatible_bucket`])
/// - with TLS, a dotted bucket would not match the `*.host` wildcard certificate
/// - IP addresses and `localhost` have no sub-domains
/// - `bucket.host` must fit in a DNS name
pub fn is_virtual_host_style(host: &str, secure: bool, bucket: &str) -> bool {
    if !is_dns_compatible_bucket(bucket) {
        return false;
    }
    if secure && bucket.contains('.') {
        return false;
    }

    let bare_host = host.trim_start_matches('[').trim_end_matches(']');
    if bare_host == "localhost" || IpAddr::from_str(bare_host).is_ok() {
        return false;
    }

    bucket.len() + 1 + host.len() <= MAX_HOST_LENGTH
}

/// Check bucket naming rules that keep it usable as a host prefix.
pub fn is_dns_compatible_bucket(bucket: &str) -> bool {
    if bucket.len() < 3 || bucket.len() > 63 {
        return false;
    }

    let bs = bucket.as_bytes();
    let valid_chars = bs
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'.' || *b == b'-');
    if !valid_chars {
        return false;
    }
    if !bs[0].is_ascii_alphanumeric() || !bs[bs.len() - 1].is_ascii_alphanumeric() {
        return false;
    }
    if bucket.contains("..") || bucket.contains(".-") || bucket.contains("-.") {
        return false;
    }

    Ipv4Addr::from_str(bucket).is_err()
}

fn encode_path(v: &str) -> String {
    utf8_percent_encode(v, &URI_ENCODE_SET).to_string()
}

fn build_query(resource: &str, queries: &[(String, String)]) -> String {
    let mut parts = Vec::with_capacity(queries.len() + 1);

    let resource = resource.strip_prefix('?').unwrap_or(resource);
    if !resource.is_empty() {
        parts.push(resource.to_string());
    }

    for (k, v) in queries {
        let k = utf8_percent_encode(k, &QUERY_ENCODE_SET);
        if v.is_empty() {
            parts.push(k.to_string());
        } else {
            parts.push(format!("{k}={}", utf8_percent_encode(v, &QUERY_ENCODE_SET)));
        }
    }

    parts.join("&")
}
