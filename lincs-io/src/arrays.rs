use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use lincs_classify::{Category, ClassificationArray};
use lincs_core::LincsError;

use crate::error::Result;
use crate::utils::{get_dynamic_reader, get_dynamic_writer, is_gzipped};

/// Bases encoded or decoded per buffered write or read.
const CHUNK_SIZE: usize = 1 << 16;

///
/// File name for a chromosome's array, e.g. `chromosome7_ext500_array.bin`.
///
pub fn array_file_name(chromosome: u8, margin: i64) -> PathBuf {
    PathBuf::from(format!("chromosome{}_ext{}_array.bin", chromosome, margin))
}

///
/// Write a classification array as one letter byte per base, gzip'd when
/// the path ends in `.gz`.
///
/// Bytes are encoded through a fixed-size buffer, so writing never holds a
/// second copy of the array.
///
pub fn write_classification(path: &Path, array: &ClassificationArray) -> Result<()> {
    let mut writer = get_dynamic_writer(path)?;
    let mut buf = Vec::with_capacity(CHUNK_SIZE);
    for chunk in array.categories().chunks(CHUNK_SIZE) {
        buf.clear();
        buf.extend(chunk.iter().map(|c| c.as_byte()));
        writer.write_all(&buf)?;
    }
    writer.finish()
}

///
/// Read back an array written by [`write_classification`]. Every byte must
/// be a valid category letter.
///
/// The file is decoded chunk by chunk straight into the category vector.
///
pub fn read_classification(path: &Path) -> Result<ClassificationArray> {
    let capacity = if is_gzipped(path) {
        0
    } else {
        std::fs::metadata(path)?.len() as usize
    };
    let mut categories: Vec<Category> = Vec::with_capacity(capacity);
    let mut reader = get_dynamic_reader(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            let category = Category::from_byte(byte).ok_or_else(|| {
                LincsError::InvalidArgument(format!(
                    "invalid category byte {:#04x} at position {}",
                    byte,
                    categories.len() + 1
                ))
            })?;
            categories.push(category);
        }
    }
    Ok(ClassificationArray::from_categories(categories)?)
}
