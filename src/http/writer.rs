use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::ResponseHead;

/// Head, blank line and body as one buffer.
pub fn serialize_response(head: &ResponseHead, body: &[u8]) -> Vec<u8> {
    let head = head.dump();
    let mut buf = Vec::with_capacity(head.len() + 2 + body.len());

    buf.extend_from_slice(head.as_bytes());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(head: &ResponseHead, body: &[u8]) -> Self {
        Self {
            buffer: serialize_response(head, body),
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;

        Ok(())
    }
}
