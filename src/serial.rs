//! Byte-oriented serial line used for command input and console output.

use core::fmt;

use heapless::Vec;

/// Line terminator of [`read_line`] (carriage return).
pub const LINE_END: u8 = 13;

/// Receive half of the serial line.
pub trait ByteSource {
    type Error;

    /// Waits for the next received byte.
    async fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Transmit half of the serial line.
pub trait ByteSink {
    type Error;

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadLineError<E> {
    /// The source failed.
    Source(E),
    /// The line did not fit; the rest of it is left unread.
    Overflow,
}

impl<E: fmt::Debug> fmt::Display for ReadLineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadLineError::Source(e) => write!(f, "serial source error: {e:?}"),
            ReadLineError::Overflow => f.write_str("received line too long"),
        }
    }
}

/// Receives bytes into `line` until [`LINE_END`], which is not stored.
///
/// `line` is cleared first. On overflow the bytes read so far stay in `line`.
///
/// The firmware reads single command bytes; this is for consumers that frame
/// their input by line, sized with [`crate::config::LINE_CAPACITY`].
pub async fn read_line<S: ByteSource, const N: usize>(
    source: &mut S,
    line: &mut Vec<u8, N>,
) -> Result<usize, ReadLineError<S::Error>> {
    line.clear();
    loop {
        let byte = source.read_byte().await.map_err(ReadLineError::Source)?;
        if byte == LINE_END {
            return Ok(line.len());
        }
        line.push(byte).map_err(|_| ReadLineError::Overflow)?;
    }
}
