//! Byte sink and source capabilities used for binary state transfer
//!
//! Serialization only needs "write all of these bytes" and "fill this buffer",
//! so accumulators are written against [`ByteSink`] and [`ByteSource`] instead
//! of a concrete stream type.
//!
//! `Vec<u8>` and `&mut [u8]` are sinks and `&[u8]` is a source in every build.
//! With the `std` feature, any [`std::io::Write`] or [`std::io::Read`] can be
//! wrapped in [`FromStd`].

use core::fmt;

use alloc::vec::Vec;

use crate::traits::DecodeError;

/// Something bytes can be written into
pub trait ByteSink {
    /// Error reported by the underlying sink
    type Error;

    /// Write the whole of `buf`, or fail
    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

/// Something bytes can be read from
pub trait ByteSource {
    /// Error reported by the underlying source
    type Error;

    /// Fill the whole of `buf`, or fail
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Failed `write`/`read` of an accumulator
///
/// `bytes` is the number of bytes transferred before the failing field, so a
/// short transfer tells the caller which field was not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferError<E> {
    /// Bytes successfully transferred before the failure
    pub bytes: usize,
    /// Error reported by the sink or source
    pub error: E,
}

impl<E> TransferError<E> {
    /// Wrap a sink or source error raised after `bytes` bytes
    pub fn new(bytes: usize, error: E) -> Self {
        Self { bytes, error }
    }

    /// Consume and return the underlying error
    pub fn into_inner(self) -> E {
        self.error
    }
}

impl<E: fmt::Display> fmt::Display for TransferError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer failed after {} bytes: {}", self.bytes, self.error)
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for TransferError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// A fixed-size sink ran out of room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferFull {
    /// Bytes left in the sink
    pub capacity: usize,
    /// Bytes the write needed
    pub needed: usize,
}

impl fmt::Display for BufferFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buffer full: {} bytes left, {} needed",
            self.capacity, self.needed
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BufferFull {}

impl ByteSink for Vec<u8> {
    type Error = core::convert::Infallible;

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Writes advance the slice past the bytes written
impl ByteSink for &mut [u8] {
    type Error = BufferFull;

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        if self.len() < buf.len() {
            return Err(BufferFull {
                capacity: self.len(),
                needed: buf.len(),
            });
        }
        let (head, tail) = core::mem::take(self).split_at_mut(buf.len());
        head.copy_from_slice(buf);
        *self = tail;
        Ok(())
    }
}

/// Reads advance the slice past the bytes read; a short read consumes nothing
impl ByteSource for &[u8] {
    type Error = DecodeError;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.len() < buf.len() {
            return Err(DecodeError::BufferTooShort {
                expected: buf.len(),
                found: self.len(),
            });
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/// Adapter exposing a [`std::io::Write`] as a sink or a [`std::io::Read`] as
/// a source, reporting [`std::io::Error`]
///
/// ```
/// use std::io::Cursor;
/// use streamvar::io::FromStd;
/// use streamvar::WeightedStats;
///
/// let mut stats = WeightedStats::new();
/// stats.add(2.0);
///
/// let mut sink = FromStd::new(Cursor::new(Vec::<u8>::new()));
/// stats.write(&mut sink).unwrap();
///
/// let mut source = FromStd::new(Cursor::new(sink.into_inner().into_inner()));
/// let mut restored = WeightedStats::new();
/// restored.read(&mut source).unwrap();
/// assert_eq!(restored, stats);
/// ```
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Debug, Clone, Default)]
pub struct FromStd<T> {
    inner: T,
}

#[cfg(feature = "std")]
impl<T> FromStd<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for FromStd<W> {
    type Error = std::io::Error;

    fn write_bytes(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(buf)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for FromStd<R> {
    type Error = std::io::Error;

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.inner.read_exact(buf)
    }
}
