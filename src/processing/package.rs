/*! Packaging (prepping for distribution) utilities

Computes a sha384sum for each shard of a folder (plain or compressed),
and writes them into a `checksums.sha384` file, _usually_ compatible with `sha384sum -c` implementations.
!*/
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use sha2::Digest;
use sha2::Sha384;

use crate::error::Error;

pub const CHECKSUM_FILE: &str = "checksums.sha384";

/// Shard files (`.txt` or `.txt.gz`) of `src`, sorted by name.
fn shard_files(src: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(src)? {
        let path = entry?.path();
        let is_shard = path
            .file_name()
            .and_then(|f| f.to_str())
            .map_or(false, |f| f.ends_with(".txt") || f.ends_with(".txt.gz"));
        if is_shard {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write the checksum file of `src` and return its path.
pub fn package(src: &Path) -> Result<PathBuf, Error> {
    let files = shard_files(src)?;
    debug!("files to hash: {:#?}", files);

    let mut hasher = Sha384::new();
    let checksum_filepath = src.join(CHECKSUM_FILE);
    let mut checksum_file = File::create(&checksum_filepath)?;

    // write filenames and hashes in sha384sum -c compatible format.
    for f in files {
        info!("hashing {:?}", f);
        let hash = get_hash(&f, &mut hasher)?;
        let filename = f
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        writeln!(&mut checksum_file, "{}  {}", hash, filename)?;
    }

    Ok(checksum_filepath)
}

/// compute the hash of the file pointed by the filepath by using [io::copy] between a file handler and the hasher.
#[inline]
fn get_hash(filepath: &Path, hasher: &mut Sha384) -> Result<String, Error> {
    let mut f = File::open(filepath)?;
    io::copy(&mut f, hasher)?;
    let result = format!("{:x}", hasher.finalize_reset());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha384};

    use super::*;

    #[test]
    fn checksums() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("m_1924.txt"), "b\n").unwrap();
        std::fs::write(src.path().join("m_1923.txt"), "a\n").unwrap();
        std::fs::write(src.path().join("report.json"), "{}").unwrap();

        let path = package(src.path()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("{:x}  m_1923.txt", Sha384::digest(b"a\n"))
        );
        assert!(lines[1].ends_with("  m_1924.txt"));
    }
}
