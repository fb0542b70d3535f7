//! Shard compression.
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use flate2::{write::GzEncoder, Compression};
use log::{error, info};
use rayon::prelude::*;

use crate::error::Error;

/// Gzip every completed shard (`*.txt`) of `src` into `dst`, as `{name}.txt.gz`.
///
/// Files are compressed concurrently. Failures are logged and reported as a single error.
pub fn compress_corpus(src: &Path, dst: &Path) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(dst)?;

    let mut files_to_compress = Vec::new();
    for entry in std::fs::read_dir(src)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "txt") {
            files_to_compress.push(path);
        }
    }
    files_to_compress.sort();

    let results: Vec<Result<PathBuf, Error>> = files_to_compress
        .par_iter()
        .map(|filepath| compress_file(filepath, dst))
        .collect();

    let mut compressed = Vec::with_capacity(results.len());
    let mut nb_errors = 0;
    for result in results {
        match result {
            Ok(path) => compressed.push(path),
            Err(e) => {
                error!("{:?}", e);
                nb_errors += 1;
            }
        }
    }

    if nb_errors > 0 {
        return Err(Error::Custom(format!(
            "{} shards could not be compressed: see previous messages.",
            nb_errors
        )));
    }
    Ok(compressed)
}

fn compress_file(path: &Path, dst: &Path) -> Result<PathBuf, Error> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| Error::Custom(format!("invalid shard name: {:?}", path)))?;
    let dst = dst.join(format!("{}.gz", filename));

    info!("compressing {:?} to {:?}", path, dst);

    let mut src = BufReader::new(File::open(path)?);
    let mut enc = GzEncoder::new(File::create(&dst)?, Compression::default());
    io::copy(&mut src, &mut enc)?;
    enc.finish()?;

    Ok(dst)
}
