//! Positional reads from the local file under verification.

use std::io::{self, Read, Seek, SeekFrom};

/// Total length of `file` in bytes.
pub(super) fn local_len<R: Seek>(file: &mut R) -> io::Result<u64> {
    file.seek(SeekFrom::End(0))
}

/// Read up to `len` bytes at `offset` into `buf` (cleared first). Fewer bytes
/// come back only when the file ends before `offset + len`.
pub(super) fn read_slice<R: Read + Seek>(
    file: &mut R,
    offset: u64,
    len: u64,
    buf: &mut Vec<u8>,
) -> io::Result<()> {
    buf.clear();
    file.seek(SeekFrom::Start(offset))?;
    file.take(len).read_to_end(buf)?;
    Ok(())
}
