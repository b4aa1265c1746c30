//! HTTP response produced by the [`ResponseDecoder`](crate::codec::ResponseDecoder).

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::protocol::HeaderMap;

/// Separator between the header block and the body on the wire.
pub(crate) const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

/// A fully received HTTP response.
///
/// The response owns its body buffer. `raw_headers` holds the exact bytes
/// before the `\r\n\r\n` delimiter, status line included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    headers: HeaderMap,
    raw_headers: Bytes,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(status_code: u16, headers: HeaderMap, raw_headers: Bytes, body: Bytes) -> Self {
        Self { status_code, headers, raw_headers, body }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response headers, values kept raw (a leading space after `:` is not trimmed).
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn raw_headers(&self) -> &Bytes {
        &self.raw_headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Writes the response to `writer`: the raw header block and the delimiter
    /// when `include_headers` is set, then the body.
    pub async fn write_to<W>(&self, writer: &mut W, include_headers: bool) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if include_headers {
            writer.write_all(&self.raw_headers).await?;
            writer.write_all(HEADER_DELIMITER).await?;
        }
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}
