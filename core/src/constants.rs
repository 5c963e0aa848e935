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

//! Constants shared by the client and the signers.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "s3.amazonaws.com";
/// Region used when none is configured or resolved.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Env key for `ClientConfig::endpoint`.
pub const STORSIGN_ENDPOINT: &str = "STORSIGN_ENDPOINT";
/// Env key for `ClientConfig::port`.
pub const STORSIGN_PORT: &str = "STORSIGN_PORT";
/// Env key for `ClientConfig::secure`.
pub const STORSIGN_SECURE: &str = "STORSIGN_SECURE";
/// Env key for `ClientConfig::region`.
pub const STORSIGN_REGION: &str = "STORSIGN_REGION";
/// Env key for `ClientConfig::access_key_id`.
pub const STORSIGN_ACCESS_KEY_ID: &str = "STORSIGN_ACCESS_KEY_ID";
/// Env key for `ClientConfig::secret_access_key`.
pub const STORSIGN_SECRET_ACCESS_KEY: &str = "STORSIGN_SECRET_ACCESS_KEY";
/// Env key for `ClientConfig::session_token`.
pub const STORSIGN_SESSION_TOKEN: &str = "STORSIGN_SESSION_TOKEN";
/// Env key for `ClientConfig::vendor`.
pub const STORSIGN_VENDOR: &str = "STORSIGN_VENDOR";
/// Env key for `ClientConfig::addressing_style`.
pub const STORSIGN_ADDRESSING_STYLE: &str = "STORSIGN_ADDRESSING_STYLE";
/// Env key for `ClientConfig::trace`.
pub const STORSIGN_TRACE: &str = "STORSIGN_TRACE";

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - `/` is kept so object keys map onto path segments.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [AWS UriEncode](https://docs.aws.amazon.com/AmazonS3/latest/API/sig-v4-header-based-auth.html)
///
/// But used in query.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
