//! SHA-1 digests of jar content

use crate::{ResolveError, Result};
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Lowercase hex SHA-1 of a file, streamed
pub fn sha1_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| ResolveError::io(path, e))?;
    let mut reader = BufReader::with_capacity(128 * 1024, file);
    let mut hasher = Sha1::new();
    io::copy(&mut reader, &mut hasher).map_err(|e| ResolveError::io(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}
