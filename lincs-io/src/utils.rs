use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use crate::error::Result;

pub(crate) fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// File writer that gzips its output when the target path ends in `.gz`.
pub enum DynamicWriter {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

impl DynamicWriter {
    /// Flush everything, writing the gzip trailer if compressing.
    pub fn finish(self) -> Result<()> {
        match self {
            DynamicWriter::Plain(mut w) => w.flush()?,
            DynamicWriter::Gz(w) => {
                w.finish()?.flush()?;
            }
        }
        Ok(())
    }
}

impl Write for DynamicWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            DynamicWriter::Plain(w) => w.write(buf),
            DynamicWriter::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            DynamicWriter::Plain(w) => w.flush(),
            DynamicWriter::Gz(w) => w.flush(),
        }
    }
}

///
/// Get a writer for either a gzip'd or non-gzip'd file, creating parent
/// directories as needed. Call [`DynamicWriter::finish`] when done.
///
/// # Arguments
///
/// - path: path to the file to write
///
pub fn get_dynamic_writer(path: &Path) -> Result<DynamicWriter> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(File::create(path)?);
    let writer = match is_gzipped(path) {
        true => DynamicWriter::Gz(GzEncoder::new(file, Compression::default())),
        false => DynamicWriter::Plain(file),
    };
    Ok(writer)
}
