//! Shape of a buffer the host reports through an out-pointer pair.

use securemsg_primitives::{ErrorCode, ExecError, ExecResult};

/// What a `(ptr, len)` pair written by the host refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostBuffer {
    /// Null pointer: nothing there (missing key, empty input).
    Absent,
    /// Non-null pointer with length 0: a present, empty value.
    Empty { ptr: i32 },
    /// `len` bytes at `ptr`.
    Bytes { ptr: i32, len: usize },
}

impl HostBuffer {
    pub fn classify(ptr: i32, len: i32) -> ExecResult<Self> {
        if ptr == 0 {
            return Ok(Self::Absent);
        }
        match len {
            0 => Ok(Self::Empty { ptr }),
            n if n < 0 => Err(ExecError::HostError(ErrorCode::BadPointer)),
            n => Ok(Self::Bytes { ptr, len: n as usize }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_pointer_is_absent() {
        assert_eq!(HostBuffer::classify(0, 0).unwrap(), HostBuffer::Absent);
        assert_eq!(HostBuffer::classify(0, 12).unwrap(), HostBuffer::Absent);
    }

    #[test]
    fn test_found_empty_value() {
        assert_eq!(
            HostBuffer::classify(65_536, 0).unwrap(),
            HostBuffer::Empty { ptr: 65_536 }
        );
    }

    #[test]
    fn test_bytes_and_bad_length() {
        assert_eq!(
            HostBuffer::classify(65_536, 5).unwrap(),
            HostBuffer::Bytes { ptr: 65_536, len: 5 }
        );
        assert_eq!(
            HostBuffer::classify(65_536, -1).unwrap_err(),
            ExecError::HostError(ErrorCode::BadPointer)
        );
    }
}
