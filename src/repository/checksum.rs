use crate::core::{DebpoolError, DebpoolResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Size and digests of one byte sequence.
///
/// MD5 is kept only for older APT clients; SHA-256 is the digest that
/// matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChecksum {
    pub size: u64,
    pub sha256: String,
    pub md5: String,
}

/// Compute size and both digests in a single pass over `reader`
pub fn checksum_reader<R: Read>(mut reader: R) -> io::Result<FileChecksum> {
    let mut sha256 = Sha256::new();
    let mut md5 = md5::Context::new();
    let mut size = 0u64;
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sha256.update(&buf[..n]);
        md5.consume(&buf[..n]);
        size += n as u64;
    }

    Ok(FileChecksum {
        size,
        sha256: hex::encode(sha256.finalize()),
        md5: format!("{:x}", md5.compute()),
    })
}

pub fn checksum_bytes(data: &[u8]) -> FileChecksum {
    FileChecksum {
        size: data.len() as u64,
        sha256: hex::encode(Sha256::digest(data)),
        md5: format!("{:x}", md5::compute(data)),
    }
}

/// Checksum a file's current on-disk bytes
pub fn checksum_file(path: &Path) -> DebpoolResult<FileChecksum> {
    let file = File::open(path).map_err(|e| {
        DebpoolError::Io(io::Error::new(
            e.kind(),
            format!("Failed to open {} for checksumming: {}", path.display(), e),
        ))
    })?;
    Ok(checksum_reader(io::BufReader::new(file))?)
}
