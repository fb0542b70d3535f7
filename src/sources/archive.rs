use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::debug;
use zip::ZipArchive;

use crate::error::Error;

/// Archive member, as listed in the central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub is_dir: bool,
}

/// Zip archive of transcripts, generic over reader type.
///
/// Each year worker opens its own [Archive] from the path,
/// no handle is shared between threads.
pub struct Archive<R> {
    inner: ZipArchive<R>,
}

/// Archive reader over a buffered [File].
impl Archive<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        debug!("opening archive {:?}", path.as_ref());
        let f = File::open(path)?;
        Self::new(BufReader::new(f))
    }
}

impl<R: Read + Seek> Archive<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        Ok(Self {
            inner: ZipArchive::new(reader)?,
        })
    }

    /// List members in archive order.
    pub fn members(&mut self) -> Result<Vec<Member>, Error> {
        let mut members = Vec::with_capacity(self.inner.len());
        for idx in 0..self.inner.len() {
            let file = self.inner.by_index(idx)?;
            members.push(Member {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
            });
        }
        Ok(members)
    }

    /// Read the whole content of a member.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>, Error> {
        let mut file = self.inner.by_name(name)?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }
}
