//! Per-connection HPACK state
//!
//! HPACK keeps a dynamic reference table on each side of a connection, so
//! every connection owns its own `HeaderCodec`. Sharing one across
//! connections would let one peer's table updates corrupt another's.

use super::error::{Error, Result};
use super::DEFAULT_HEADER_TABLE_SIZE;
use crate::http::{Headers, Method, Request, Status, MAX_HEADERS};
use bytes::Bytes;

/// HPACK encoder/decoder pair for one connection
pub struct HeaderCodec {
    encoder: loona_hpack::Encoder<'static>,
    decoder: loona_hpack::Decoder<'static>,
}

impl HeaderCodec {
    /// Create a codec with empty dynamic tables
    ///
    /// The peer may not grow our decoder's table past the default size.
    pub fn new() -> Self {
        let mut decoder = loona_hpack::Decoder::new();
        decoder.set_max_allowed_table_size(DEFAULT_HEADER_TABLE_SIZE);

        HeaderCodec {
            encoder: loona_hpack::Encoder::new(),
            decoder,
        }
    }

    /// Compress a header list into a header block
    pub fn encode(&mut self, headers: &[(&str, &str)]) -> Result<Bytes> {
        let mut block = Vec::new();
        self.encoder.encode_into(
            headers.iter().map(|(name, value)| (name.as_bytes(), value.as_bytes())),
            &mut block,
        )?;
        Ok(Bytes::from(block))
    }

    /// Decompress a header block into `(name, value)` pairs
    pub fn decode(&mut self, block: &[u8]) -> Result<Vec<(String, String)>> {
        let decoded = self
            .decoder
            .decode(block)
            .map_err(|e| Error::HeaderDecode(format!("HPACK decode error: {:?}", e)))?;

        Ok(decoded
            .into_iter()
            .map(|(name, value)| {
                (
                    String::from_utf8_lossy(&name).into_owned(),
                    String::from_utf8_lossy(&value).into_owned(),
                )
            })
            .collect())
    }

    /// Decode a HEADERS block into a request
    ///
    /// `:method` and `:path` become the request line; every other field,
    /// including the remaining pseudo-headers, lands in the header map.
    /// The whole block is always decoded first so the dynamic table stays in
    /// step with the peer even when the request is rejected.
    pub fn decode_request(&mut self, block: &[u8]) -> Result<Request> {
        let fields = self.decode(block)?;
        if fields.len() > MAX_HEADERS {
            return Err(Error::InvalidHeader(format!(
                "{} header fields, limit is {}",
                fields.len(),
                MAX_HEADERS
            )));
        }

        let mut method = None;
        let mut path = None;
        let mut headers = Headers::new();

        for (name, value) in fields {
            match name.as_str() {
                ":method" => method = Some(value),
                ":path" => path = Some(value),
                _ => headers.insert(name, value),
            }
        }

        let method = method.ok_or_else(|| Error::InvalidHeader("missing :method".to_string()))?;
        let path = path.ok_or_else(|| Error::InvalidHeader("missing :path".to_string()))?;
        let method = Method::from_str(&method).map_err(|e| Error::InvalidHeader(e.to_string()))?;

        let mut request = Request::new(method, path);
        *request.headers_mut() = headers;
        Ok(request)
    }

    /// Encode the response header block: `:status` then `content-length`
    pub fn encode_response(&mut self, status: Status, content_length: usize) -> Result<Bytes> {
        let status = status.code().to_string();
        let content_length = content_length.to_string();
        self.encode(&[(":status", &status), ("content-length", &content_length)])
    }
}

impl Default for HeaderCodec {
    fn default() -> Self {
        Self::new()
    }
}
