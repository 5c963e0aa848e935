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

//! Request payloads and their materialized bodies.

use crate::{Error, Result};
use bytes::Bytes;
use futures::Stream;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::pin::Pin;

/// A single-pass stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send + 'static>>;

/// Payload of a request, chosen at construction.
///
/// Text and byte payloads have a known length and are sent as a single
/// chunk. Stream payloads are passed through verbatim with unknown length,
/// which implies a chunked transfer.
pub enum Payload {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// An open byte stream, consumed exactly once.
    Stream(ByteStream),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Text(String::new())
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Payload::Bytes(bs) => write!(f, "Bytes(<{} bytes>)", bs.len()),
            Payload::Stream(_) => f.write_str("Stream(<stream>)"),
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self {
        Payload::Bytes(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(Bytes::from(value))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(value: &'static [u8]) -> Self {
        Payload::Bytes(Bytes::from_static(value))
    }
}

impl From<ByteStream> for Payload {
    fn from(value: ByteStream) -> Self {
        Payload::Stream(value)
    }
}

impl Payload {
    /// Build a stream payload from any chunk stream.
    pub fn stream(s: impl Stream<Item = Result<Bytes>> + Send + 'static) -> Self {
        Payload::Stream(Box::pin(s))
    }

    /// Build a payload from a dynamically typed value.
    ///
    /// Accepts `String`, `&'static str`, `Vec<u8>`, `Bytes`, [`ByteStream`]
    /// and [`Payload`]. Anything else is rejected with
    /// [`ErrorKind::PayloadUnsupported`](crate::ErrorKind::PayloadUnsupported).
    pub fn try_from_any(value: Box<dyn Any + Send>) -> Result<Self> {
        let value = match value.downcast::<Payload>() {
            Ok(v) => return Ok(*v),
            Err(v) => v,
        };
        let value = match value.downcast::<String>() {
            Ok(v) => return Ok(Payload::Text(*v)),
            Err(v) => v,
        };
        let value = match value.downcast::<&'static str>() {
            Ok(v) => return Ok(Payload::Text(v.to_string())),
            Err(v) => v,
        };
        let value = match value.downcast::<Vec<u8>>() {
            Ok(v) => return Ok(Payload::from(*v)),
            Err(v) => v,
        };
        let value = match value.downcast::<Bytes>() {
            Ok(v) => return Ok(Payload::Bytes(*v)),
            Err(v) => v,
        };
        match value.downcast::<ByteStream>() {
            Ok(v) => Ok(Payload::Stream(*v)),
            Err(_) => Err(Error::payload_unsupported(
                "payload must be text, bytes or a byte stream",
            )),
        }
    }

    /// Length of the payload if it is known ahead of time.
    pub fn known_length(&self) -> Option<u64> {
        match self {
            Payload::Text(s) => Some(s.len() as u64),
            Payload::Bytes(bs) => Some(bs.len() as u64),
            Payload::Stream(_) => None,
        }
    }

    /// Borrow the payload bytes when they are held in memory.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Text(s) => Some(s.as_bytes()),
            Payload::Bytes(bs) => Some(bs),
            Payload::Stream(_) => None,
        }
    }

    /// Check if this payload is a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self, Payload::Stream(_))
    }

    /// Convert the payload into an outgoing body and its known length.
    pub fn materialize(self) -> (Body, Option<u64>) {
        match self {
            Payload::Text(s) => {
                let bs = Bytes::from(s);
                let size = bs.len() as u64;
                (Body::Full(bs), Some(size))
            }
            Payload::Bytes(bs) => {
                let size = bs.len() as u64;
                (Body::Full(bs), Some(size))
            }
            Payload::Stream(s) => (Body::Stream(s), None),
        }
    }
}

/// Outgoing body produced by [`Payload::materialize`].
pub enum Body {
    /// In-memory body, emitted as a single chunk.
    Full(Bytes),
    /// Streamed body of unknown length.
    Stream(ByteStream),
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Full(bs) => write!(f, "Full(<{} bytes>)", bs.len()),
            Body::Stream(_) => f.write_str("Stream(<stream>)"),
        }
    }
}

impl Body {
    /// Turn the body into a chunk stream.
    pub fn into_stream(self) -> ByteStream {
        match self {
            Body::Full(bs) => Box::pin(futures::stream::once(futures::future::ready(Ok(bs)))),
            Body::Stream(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::TryStreamExt;

    #[test]
    fn test_default_payload_is_empty_text() {
        let p = Payload::default();
        assert_eq!(p.known_length(), Some(0));
        assert_eq!(p.as_bytes(), Some(&b""[..]));
    }

    #[tokio::test]
    async fn test_text_is_single_utf8_chunk() {
        let (body, size) = Payload::from("héllo").materialize();
        assert_eq!(size, Some(6));

        let chunks: Vec<Bytes> = body.into_stream().try_collect().await.unwrap();
        assert_eq!(chunks, vec![Bytes::from("héllo")]);
    }

    #[tokio::test]
    async fn test_stream_passes_through() {
        let p = Payload::stream(futures::stream::iter(vec![
            Ok(Bytes::from_static(b"a")),
            Ok(Bytes::from_static(b"bc")),
        ]));
        assert!(p.is_stream());
        assert_eq!(p.known_length(), None);
        assert!(p.as_bytes().is_none());

        let (body, size) = p.materialize();
        assert_eq!(size, None);
        let chunks: Vec<Bytes> = body.into_stream().map(|v| v.unwrap()).collect().await;
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_try_from_any() {
        let p = Payload::try_from_any(Box::new("text".to_string())).unwrap();
        assert!(matches!(p, Payload::Text(s) if s == "text"));

        let p = Payload::try_from_any(Box::new("static")).unwrap();
        assert!(matches!(p, Payload::Text(s) if s == "static"));

        let p = Payload::try_from_any(Box::new(vec![1u8, 2, 3])).unwrap();
        assert_eq!(p.known_length(), Some(3));

        let p = Payload::try_from_any(Box::new(Bytes::from_static(b"xy"))).unwrap();
        assert_eq!(p.known_length(), Some(2));

        let s: ByteStream = Box::pin(futures::stream::empty());
        let p = Payload::try_from_any(Box::new(s)).unwrap();
        assert!(p.is_stream());
    }

    #[test]
    fn test_try_from_any_unsupported() {
        let err = Payload::try_from_any(Box::new(42u32)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PayloadUnsupported);
    }
}
