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

//! Core components for building signed object storage requests.
//!
//! This crate provides the data model and the traits shared by the storsign
//! ecosystem. Signers live in their own crates, and the `storsign` crate
//! wires everything into a client.
//!
//! ## Overview
//!
//! - [`Operation`]: a logical storage call (method, bucket, object, headers, payload)
//! - [`endpoint`]: turns an operation into a URL
//! - [`Request`]: the assembled request, materialized into the outgoing body
//! - [`SignRequest`]: signs a request with a [`SigningContext`]
//! - [`Context`]: the transport ([`HttpSend`]) and environment ([`Env`]) used by the client
//!
//! ## Example
//!
//! ```
//! use storsign_core::{ClientConfig, Operation, Request};
//!
//! # fn main() -> storsign_core::Result<()> {
//! let config = ClientConfig::default();
//! let op = Operation::new(http::Method::GET)
//!     .with_bucket("logs-2024")
//!     .with_object("jan/01.log");
//!
//! let req = Request::build(&config, "us-east-1", op)?;
//! assert_eq!(
//!     req.uri().to_string(),
//!     "https://logs-2024.s3.amazonaws.com/jan/01.log"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod constants;
pub mod endpoint;
pub mod hash;
pub mod time;
pub mod trace;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result, Stage};
mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};
mod config;
pub use config::{AddressingStyle, ClientConfig, Vendor};
mod credential;
pub use credential::Credential;
mod payload;
pub use payload::{Body, ByteStream, Payload};
mod operation;
pub use operation::Operation;
mod request;
pub use request::{MaterializedRequest, Request, Resource};
mod signing;
pub use signing::{SigningContext, SigningRequest};
mod api;
pub use api::{ProvideRegion, SignRequest, StaticRegionProvider};
pub use trace::Tracer;
