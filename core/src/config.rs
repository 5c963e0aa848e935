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
use crate::utils::Redact;
use crate::{Context, Credential, Error, Result};
use std::fmt::{Debug, Formatter};
use std::str::FromStr;

/// Vendor decides both the addressing family and the signing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Vendor {
    /// Standard addressing with SigV4 signing.
    #[default]
    Standard,
    /// Bucket is always a sub-domain of the endpoint, requests use OSS signing.
    Oss,
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "s3" | "aws" => Ok(Vendor::Standard),
            "oss" | "aliyun" => Ok(Vendor::Oss),
            v => Err(Error::config_invalid(format!("unknown vendor: {v}"))),
        }
    }
}

/// AddressingStyle controls where the bucket goes in standard mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressingStyle {
    /// Pick virtual-host style when the bucket allows it, path style otherwise.
    #[default]
    Auto,
    /// Always put the bucket in the path.
    Path,
    /// Always put the bucket in the host.
    VirtualHost,
}

impl FromStr for AddressingStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(AddressingStyle::Auto),
            "path" => Ok(AddressingStyle::Path),
            "virtual" | "virtual-host" | "virtual_host" => Ok(AddressingStyle::VirtualHost),
            v => Err(Error::config_invalid(format!("unknown addressing style: {v}"))),
        }
    }
}

/// ClientConfig carries all the configuration of a storage client.
///
/// The config is immutable once the client is built and shared by all
/// concurrent calls.
#[derive(Clone)]
pub struct ClientConfig {
    /// Endpoint host, for example `s3.amazonaws.com` or `localhost:9000`.
    ///
    /// - env value: [`STORSIGN_ENDPOINT`]
    pub endpoint: String,
    /// Port of the endpoint, defaults to 443 or 80 depending on `secure`.
    ///
    /// - env value: [`STORSIGN_PORT`]
    pub port: Option<u16>,
    /// Use `https` when set.
    ///
    /// - env value: [`STORSIGN_SECURE`]
    pub secure: bool,
    /// Default region for calls that do not resolve one.
    ///
    /// - env value: [`STORSIGN_REGION`]
    pub region: Option<String>,
    /// Access key id, empty for anonymous access.
    ///
    /// - env value: [`STORSIGN_ACCESS_KEY_ID`]
    pub access_key_id: String,
    /// Secret access key, empty for anonymous access.
    ///
    /// - env value: [`STORSIGN_SECRET_ACCESS_KEY`]
    pub secret_access_key: String,
    /// Session token of temporary credentials.
    ///
    /// - env value: [`STORSIGN_SESSION_TOKEN`]
    pub session_token: Option<String>,
    /// Vendor mode.
    ///
    /// - env value: [`STORSIGN_VENDOR`]
    pub vendor: Vendor,
    /// Addressing style used in standard mode.
    ///
    /// - env value: [`STORSIGN_ADDRESSING_STYLE`]
    pub addressing_style: AddressingStyle,
    /// Dump outgoing requests and incoming responses.
    ///
    /// - env value: [`STORSIGN_TRACE`]
    pub trace: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            port: None,
            secure: true,
            region: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            vendor: Vendor::Standard,
            addressing_style: AddressingStyle::Auto,
            trace: false,
        }
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("region", &self.region)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("vendor", &self.vendor)
            .field("addressing_style", &self.addressing_style)
            .field("trace", &self.trace)
            .finish()
    }
}

impl ClientConfig {
    /// Load config from env.
    ///
    /// Every variable present in the environment replaces the value of its field.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(STORSIGN_ENDPOINT) {
            self.endpoint = v;
        }
        if let Some(v) = ctx.env_var(STORSIGN_PORT) {
            let port = v.parse::<u16>().map_err(|e| {
                Error::config_invalid(format!("{STORSIGN_PORT} is not a valid port: {v}"))
                    .with_source(e)
            })?;
            self.port = Some(port);
        }
        if let Some(v) = ctx.env_var(STORSIGN_SECURE) {
            self.secure = parse_bool(STORSIGN_SECURE, &v)?;
        }
        if let Some(v) = ctx.env_var(STORSIGN_REGION) {
            self.region = Some(v);
        }
        if let Some(v) = ctx.env_var(STORSIGN_ACCESS_KEY_ID) {
            self.access_key_id = v;
        }
        if let Some(v) = ctx.env_var(STORSIGN_SECRET_ACCESS_KEY) {
            self.secret_access_key = v;
        }
        if let Some(v) = ctx.env_var(STORSIGN_SESSION_TOKEN) {
            self.session_token = Some(v);
        }
        if let Some(v) = ctx.env_var(STORSIGN_VENDOR) {
            self.vendor = v.parse()?;
        }
        if let Some(v) = ctx.env_var(STORSIGN_ADDRESSING_STYLE) {
            self.addressing_style = v.parse()?;
        }
        if let Some(v) = ctx.env_var(STORSIGN_TRACE) {
            self.trace = parse_bool(STORSIGN_TRACE, &v)?;
        }

        Ok(self)
    }

    /// Credential carried by this config.
    pub fn credential(&self) -> Credential {
        Credential {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
        }
    }

    /// Both keys are empty: requests are sent unsigned.
    pub fn is_anonymous(&self) -> bool {
        self.access_key_id.is_empty() && self.secret_access_key.is_empty()
    }
}

fn parse_bool(key: &str, v: &str) -> Result<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        _ => Err(Error::config_invalid(format!(
            "{key} must be a boolean, got: {v}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, StaticEnv};
    use std::collections::HashMap;

    fn ctx_with(envs: &[(&str, &str)]) -> Context {
        Context::new().with_env(StaticEnv {
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
    }

    #[test]
    fn test_default_is_anonymous_standard() {
        let cfg = ClientConfig::default();
        assert!(cfg.is_anonymous());
        assert!(cfg.secure);
        assert_eq!(cfg.vendor, Vendor::Standard);
        assert_eq!(cfg.endpoint, "s3.amazonaws.com");
    }

    #[test]
    fn test_from_env() {
        let ctx = ctx_with(&[
            (STORSIGN_ENDPOINT, "oss-cn-hangzhou.aliyuncs.com"),
            (STORSIGN_PORT, "8443"),
            (STORSIGN_SECURE, "off"),
            (STORSIGN_REGION, "cn-hangzhou"),
            (STORSIGN_ACCESS_KEY_ID, "access_key_id"),
            (STORSIGN_SECRET_ACCESS_KEY, "secret_access_key"),
            (STORSIGN_SESSION_TOKEN, "token"),
            (STORSIGN_VENDOR, "oss"),
            (STORSIGN_ADDRESSING_STYLE, "path"),
            (STORSIGN_TRACE, "1"),
        ]);

        let cfg = ClientConfig::default().from_env(&ctx).unwrap();
        assert_eq!(cfg.endpoint, "oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(cfg.port, Some(8443));
        assert!(!cfg.secure);
        assert_eq!(cfg.region.as_deref(), Some("cn-hangzhou"));
        assert_eq!(cfg.vendor, Vendor::Oss);
        assert_eq!(cfg.addressing_style, AddressingStyle::Path);
        assert!(cfg.trace);

        let cred = cfg.credential();
        assert_eq!(cred.access_key_id, "access_key_id");
        assert_eq!(cred.session_token.as_deref(), Some("token"));
        assert!(!cfg.is_anonymous());
    }

    #[test]
    fn test_from_env_keeps_fields_without_env() {
        let cfg = ClientConfig {
            region: Some("us-west-2".to_string()),
            ..Default::default()
        }
        .from_env(&ctx_with(&[]))
        .unwrap();
        assert_eq!(cfg.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_from_env_invalid() {
        for (k, v) in [
            (STORSIGN_PORT, "http"),
            (STORSIGN_SECURE, "maybe"),
            (STORSIGN_VENDOR, "gcs"),
            (STORSIGN_ADDRESSING_STYLE, "dns"),
        ] {
            let err = ClientConfig::default()
                .from_env(&ctx_with(&[(k, v)]))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigInvalid, "{k}={v}");
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cfg = ClientConfig {
            secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string(),
            ..Default::default()
        };
        assert!(!format!("{cfg:?}").contains("K7MDENG"));
    }
}
