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

use bytes::Bytes;
use log::debug;
use std::sync::Arc;
use storsign_core::constants::DEFAULT_REGION;
use storsign_core::{
    ByteStream, ClientConfig, Context, Error, Operation, ProvideRegion, Request, Result,
    SignRequest, SigningContext, Stage, StaticRegionProvider, Tracer, Vendor,
};

/// Client turns operations into signed requests and sends them.
///
/// The signer is picked once from [`ClientConfig::vendor`]. The client holds
/// no mutable state, so it can be cloned and shared by concurrent calls.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<ClientConfig>,
    signer: Arc<dyn SignRequest>,
    region: Arc<dyn ProvideRegion>,
    tracer: Tracer,
}

impl Client {
    /// Create a new client.
    pub fn new(ctx: Context, config: ClientConfig) -> Self {
        let signer: Arc<dyn SignRequest> = match config.vendor {
            Vendor::Standard => Arc::new(storsign_aws_v4::RequestSigner::default()),
            Vendor::Oss => Arc::new(storsign_aliyun_oss::RequestSigner::new()),
        };

        Self {
            ctx,
            tracer: Tracer::new(config.trace),
            config: Arc::new(config),
            signer,
            region: Arc::new(StaticRegionProvider::new()),
        }
    }

    /// Replace the signer picked from the vendor.
    pub fn with_signer(mut self, signer: impl SignRequest) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// Set the provider used to look up bucket regions.
    pub fn with_region_provider(mut self, provider: impl ProvideRegion) -> Self {
        self.region = Arc::new(provider);
        self
    }

    /// Config of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve, assemble and sign `op` without sending it.
    ///
    /// The returned request is traced already and can be handed to another
    /// transport after [`Request::materialize`].
    pub async fn prepare(&self, op: Operation) -> Result<Request> {
        let region = self.resolve_region(&op).await?;
        debug!("resolved region {region} for bucket {:?}", op.bucket());

        let req = Request::build(&self.config, &region, op)?;
        debug!("assembled request: {} {}", req.method(), req.uri());

        let ctx = SigningContext::new(self.config.credential(), storsign_core::time::now(), &region);
        let req = self
            .signer
            .sign_request(req, ctx)
            .map_err(|e| e.with_stage(Stage::Sign))?;

        self.tracer.trace_request(&req);
        Ok(req)
    }

    /// Send `op` and return the response with its body fully read.
    ///
    /// Non-2xx responses are returned as is.
    pub async fn send(&self, op: Operation) -> Result<http::Response<Bytes>> {
        let req = self.prepare(op).await?.materialize().into_http()?;

        let resp = self
            .ctx
            .http_send(req)
            .await
            .map_err(|e| e.with_stage(Stage::Send))?;
        self.tracer.trace_response(&resp);
        Ok(resp)
    }

    /// Send `op` and return the response once its body is ready to be streamed.
    ///
    /// Non-2xx responses are returned as is.
    pub async fn send_stream(&self, op: Operation) -> Result<http::Response<ByteStream>> {
        let req = self.prepare(op).await?.materialize().into_http()?;

        let resp = self
            .ctx
            .http_send_stream(req)
            .await
            .map_err(|e| e.with_stage(Stage::Send))?;
        self.tracer.trace_stream_response(&resp);
        Ok(resp)
    }

    /// Pick the region of `op`.
    ///
    /// The operation override comes first, then the provider for bucket
    /// calls, then the configured region and finally `us-east-1`.
    async fn resolve_region(&self, op: &Operation) -> Result<String> {
        if let Some(region) = op.region.as_deref().filter(|v| !v.is_empty()) {
            return Ok(region.to_string());
        }

        if let Some(bucket) = op.bucket() {
            match self.region.provide_region(&self.ctx, bucket).await {
                Ok(Some(region)) if !region.is_empty() => return Ok(region),
                Ok(_) => {}
                Err(err) => {
                    return Err(Error::region_unresolved(format!(
                        "failed to look up region of bucket {bucket}"
                    ))
                    .with_source(err)
                    .with_stage(Stage::Resolve))
                }
            }
        }

        Ok(self
            .config
            .region
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string()))
    }
}
