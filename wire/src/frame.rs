//! Splitting byte streams into frames.

use crate::error::{DecodeError, WireResult};
use crate::header::frame_len;
use crate::limits::Limits;

/// Reassembles frames from a stream transport.
///
/// Bytes are pushed as they arrive; complete frames are popped in order.
/// A bad size byte leaves no way to find the next frame boundary, so the
/// buffered bytes are discarded along with the error.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: Vec<u8>,
    limits: Limits,
}

impl FrameAssembler {
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            buf: Vec::with_capacity(limits.max_packet_bytes),
            limits,
        }
    }

    /// Appends received bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Bytes held that do not yet form a complete frame.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Pops the next complete frame, if one is buffered.
    pub fn next_frame(&mut self) -> Option<WireResult<Vec<u8>>> {
        let size_byte = *self.buf.first()?;
        let size = match frame_len(size_byte, &self.limits) {
            Ok(size) => size,
            Err(err) => {
                self.buf.clear();
                return Some(Err(err));
            }
        };
        if self.buf.len() < size {
            return None;
        }
        let frame = self.buf.drain(..size).collect();
        Some(Ok(frame))
    }
}

/// Iterates over the frames of a complete capture.
///
/// Yields `(offset, frame)` pairs. Iteration stops after the first framing
/// error, since the following boundary cannot be located.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    offset: usize,
    limits: Limits,
    failed: bool,
}

impl<'a> Frames<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8], limits: Limits) -> Self {
        Self {
            data,
            offset: 0,
            limits,
            failed: false,
        }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = WireResult<(usize, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let rest = self.data.get(self.offset..)?;
        let size_byte = *rest.first()?;
        let result = frame_len(size_byte, &self.limits).and_then(|size| {
            rest.get(..size).ok_or(DecodeError::Truncated {
                actual: rest.len(),
                required: size,
            })
        });
        match result {
            Ok(frame) => {
                let offset = self.offset;
                self.offset += frame.len();
                Some(Ok((offset, frame)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_split_frames() {
        let mut assembler = FrameAssembler::new(Limits::default());
        assembler.push(&[4, 3, 0]);
        assert!(assembler.next_frame().is_none());
        assembler.push(&[0, 8, 4, 1, 3, 0]);
        assert_eq!(assembler.next_frame().unwrap().unwrap(), vec![4, 3, 0, 0]);
        assert!(assembler.next_frame().is_none());
        assert_eq!(assembler.buffered(), 5);
        assembler.push(&[0, 0, 0]);
        assert_eq!(
            assembler.next_frame().unwrap().unwrap(),
            vec![8, 4, 1, 3, 0, 0, 0, 0]
        );
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn bad_size_discards_buffer() {
        let mut assembler = FrameAssembler::new(Limits::default());
        assembler.push(&[6, 3, 0, 0, 0, 0]);
        assert!(matches!(
            assembler.next_frame(),
            Some(Err(DecodeError::UnalignedSize { size: 6 }))
        ));
        assert_eq!(assembler.buffered(), 0);
    }

    #[test]
    fn frames_over_capture() {
        let capture = [4, 3, 1, 4, 8, 4, 0, 1, 0, 0, 0, 0];
        let frames: Vec<_> = Frames::new(&capture, Limits::default())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], (0, &capture[..4]));
        assert_eq!(frames[1].0, 4);
    }

    #[test]
    fn frames_stop_after_error() {
        let capture = [4, 3, 1, 4, 8, 4, 0];
        let mut frames = Frames::new(&capture, Limits::default());
        assert!(frames.next().unwrap().is_ok());
        assert!(matches!(
            frames.next(),
            Some(Err(DecodeError::Truncated {
                actual: 3,
                required: 8
            }))
        ));
        assert!(frames.next().is_none());
    }
}
