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

use anyhow::Result;
use futures::TryStreamExt;
use http::Method;
use storsign::{Client, ClientConfig, Operation};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    // Reads STORSIGN_ENDPOINT, STORSIGN_ACCESS_KEY_ID, ... from the environment.
    let ctx = storsign::default_context();
    let config = ClientConfig::default().from_env(&ctx)?;
    let client = Client::new(ctx, config);

    let bucket = std::env::var("STORSIGN_BUCKET").unwrap_or_else(|_| "my-test-bucket".to_string());

    let resp = client
        .send(
            Operation::new(Method::PUT)
                .with_bucket(&bucket)
                .with_object("hello.txt")
                .with_header("content-type", "text/plain")
                .with_payload("Hello, World!"),
        )
        .await?;
    println!("put object: {}", resp.status());

    let resp = client
        .send_stream(
            Operation::new(Method::GET)
                .with_bucket(&bucket)
                .with_object("hello.txt"),
        )
        .await?;
    println!("get object: {}", resp.status());

    let chunks: Vec<bytes::Bytes> = resp.into_body().try_collect().await?;
    println!("{}", String::from_utf8_lossy(&chunks.concat()));

    Ok(())
}
