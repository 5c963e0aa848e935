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

//! AWS SigV4 signer for storsign.
//!
//! ```
//! use storsign_aws_v4::RequestSigner;
//! use storsign_core::{Credential, Request, SignRequest, SigningContext};
//!
//! # fn main() -> storsign_core::Result<()> {
//! let req = Request::new(
//!     http::Method::GET,
//!     http::Uri::from_static("https://logs-2024.s3.amazonaws.com/jan/01.log"),
//! );
//! let ctx = SigningContext::new(
//!     Credential::new("access_key_id", "secret_access_key"),
//!     storsign_core::time::now(),
//!     "us-east-1",
//! );
//! let req = RequestSigner::default().sign_request(req, ctx)?;
//! assert!(req.headers().contains_key(http::header::AUTHORIZATION));
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{
    S3_SERVICE, UNSIGNED_PAYLOAD, USER_AGENT, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE,
    X_AMZ_SECURITY_TOKEN,
};

mod sign_request;
pub use sign_request::RequestSigner;
