//! Serialization of [`QueryResult`] for the response direction.
//!
//! Every value reaching the codec is already a string (the server collapses
//! nulls to the literal `"NULL"` before encoding), so the format only has to
//! carry counts and variable-length UTF-8 strings. All integers are little
//! endian. Strings are length-prefixed with a 4 byte integer:
//!
//! ```text
//! +-----------+-------------+
//! | 5 0 0 0   | 'A' 'l' 'i' 'c' 'e' |
//! +-----------+-------------+
//!   4 bytes       N bytes
//!   Little        UTF-8
//!   Endian
//! ```
//!
//! A complete `QueryResult` is laid out as:
//!
//! ```text
//!   Error    Column            Row      Row cells, one string
//!   String   Count   Names     Count    per column, row-major
//! +--------+-------+--------+---------+----------------------+
//! | string |  2 0  | string |  3 0 0 0 | string string ...   |
//! +--------+-------+--------+---------+----------------------+
//!            2 bytes          4 bytes
//!            Little           Little
//!            Endian           Endian
//! ```
//!
//! There is no outer length prefix and no version byte: the encoding is
//! self-describing and serves as its own framing. Decoding the exact bytes
//! produced by [`QueryResult::encode`] recovers an equal `QueryResult`.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::result::QueryResult;

/// Errors produced while decoding a response off the wire.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The underlying stream failed or ended mid-message.
    #[error("wire read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A length-prefixed string was not valid UTF-8.
    #[error("malformed response: invalid utf-8 in {0}")]
    InvalidUtf8(&'static str),
}

impl QueryResult {
    /// Serializes this result into its wire representation.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());

        put_string(&mut buf, &self.error);

        buf.extend_from_slice(&(self.columns.len() as u16).to_le_bytes());
        for name in &self.columns {
            put_string(&mut buf, name);
        }

        buf.extend_from_slice(&(self.rows.len() as u32).to_le_bytes());
        for row in &self.rows {
            for cell in row {
                put_string(&mut buf, cell);
            }
        }

        buf
    }

    /// Reads exactly one result from `reader`.
    ///
    /// Consumes precisely the bytes written by [`QueryResult::encode`],
    /// leaving any following response untouched on the stream.
    pub async fn decode<R>(reader: &mut R) -> Result<Self, WireError>
    where
        R: AsyncRead + Unpin,
    {
        let error = read_string(reader, "error message").await?;

        let column_count = read_u16(reader).await? as usize;
        let mut columns = Vec::with_capacity(column_count);
        for _ in 0..column_count {
            columns.push(read_string(reader, "column name").await?);
        }

        let row_count = read_u32(reader).await? as usize;
        let mut rows = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let mut row = Vec::with_capacity(column_count);
            for _ in 0..column_count {
                row.push(read_string(reader, "row value").await?);
            }
            rows.push(row);
        }

        Ok(Self {
            columns,
            rows,
            error,
        })
    }

    fn encoded_len(&self) -> usize {
        let strings: usize = std::iter::once(self.error.len())
            .chain(self.columns.iter().map(|c| c.len()))
            .chain(self.rows.iter().flatten().map(|v| v.len()))
            .map(|len| 4 + len)
            .sum();
        strings + 2 + 4
    }
}

fn put_string(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}

async fn read_u16<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<u16> {
    let mut bytes = [0u8; 2];
    reader.read_exact(&mut bytes).await?;
    Ok(u16::from_le_bytes(bytes))
}

async fn read_u32<R: AsyncRead + Unpin>(reader: &mut R) -> std::io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes).await?;
    Ok(u32::from_le_bytes(bytes))
}

async fn read_string<R: AsyncRead + Unpin>(
    reader: &mut R,
    what: &'static str,
) -> Result<String, WireError> {
    let len = read_u32(reader).await? as usize;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes).await?;
    String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8(what))
}
