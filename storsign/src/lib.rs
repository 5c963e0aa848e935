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

//! Build signed, ready-to-send object storage requests.
//!
//! `storsign` turns a logical storage [`Operation`] into a signed HTTP
//! request for S3 compatible services or Aliyun OSS, and sends it through
//! the transport carried by a [`Context`].
//!
//! ```no_run
//! use storsign::{Client, ClientConfig, Operation};
//!
//! # #[tokio::main]
//! # async fn main() -> storsign::Result<()> {
//! let ctx = storsign::default_context();
//! let config = ClientConfig::default().from_env(&ctx)?;
//! let client = Client::new(ctx, config);
//!
//! let resp = client
//!     .send(
//!         Operation::new(http::Method::PUT)
//!             .with_bucket("logs-2024")
//!             .with_object("jan/01.log")
//!             .with_payload("hello"),
//!     )
//!     .await?;
//! println!("status: {}", resp.status());
//! # Ok(())
//! # }
//! ```

pub use storsign_core::*;

mod client;
pub use client::Client;

/// AWS SigV4 signing.
pub mod aws {
    pub use storsign_aws_v4::*;
}

/// Aliyun OSS signing.
pub mod aliyun {
    pub use storsign_aliyun_oss::*;
}

/// Create a context reading the OS environment and sending with reqwest.
#[cfg(feature = "default-context")]
pub fn default_context() -> Context {
    Context::new()
        .with_env(OsEnv)
        .with_http_send(storsign_http_send_reqwest::ReqwestHttpSend::default())
}
