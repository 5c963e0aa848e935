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

use crate::{Context, Request, Result, SigningContext};
use std::collections::HashMap;
use std::fmt::Debug;

/// SignRequest is the trait used by the client to sign an assembled request.
///
/// Implementations are stateless: everything that varies per call comes in
/// through [`SigningContext`], so one signer can be shared by concurrent calls.
pub trait SignRequest: Debug + Send + Sync + 'static {
    /// Sign the request, returning it with the authentication headers added.
    ///
    /// An anonymous credential leaves the request without `authorization`.
    /// A credential with an access key but no secret fails with
    /// [`ErrorKind::CredentialMissing`](crate::ErrorKind::CredentialMissing).
    fn sign_request(&self, req: Request, ctx: SigningContext) -> Result<Request>;
}

/// ProvideRegion resolves the region a bucket lives in.
#[async_trait::async_trait]
pub trait ProvideRegion: Debug + Send + Sync + 'static {
    /// Return the region of `bucket`, or `None` if it is unknown.
    async fn provide_region(&self, ctx: &Context, bucket: &str) -> Result<Option<String>>;
}

/// StaticRegionProvider answers from a fixed bucket to region table.
///
/// A provider without any entry never knows a region, which makes the client
/// fall back to the configured one.
#[derive(Debug, Clone, Default)]
pub struct StaticRegionProvider {
    regions: HashMap<String, String>,
}

impl StaticRegionProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the region of a bucket.
    pub fn with_bucket(mut self, bucket: &str, region: &str) -> Self {
        self.regions.insert(bucket.to_string(), region.to_string());
        self
    }
}

#[async_trait::async_trait]
impl ProvideRegion for StaticRegionProvider {
    async fn provide_region(&self, _: &Context, bucket: &str) -> Result<Option<String>> {
        Ok(self.regions.get(bucket).cloned())
    }
}
