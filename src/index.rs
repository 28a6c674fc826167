use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use crate::metadata::{sort_metas, Meta};

/// Reads the metadata index, newest post first.
pub fn load_index(index_path: &Path) -> anyhow::Result<Vec<Meta>> {
    let fd = File::open(index_path).with_context(|| format!("opening {index_path:?}"))?;
    let reader = BufReader::new(fd);
    let mut metas: Vec<Meta> =
        serde_json::from_reader(reader).with_context(|| format!("decoding {index_path:?}"))?;
    sort_metas(&mut metas);
    Ok(metas)
}

pub fn parse_index(bytes: &[u8]) -> serde_json::Result<Vec<Meta>> {
    let mut metas: Vec<Meta> = serde_json::from_slice(bytes)?;
    sort_metas(&mut metas);
    Ok(metas)
}

/// Writes the records in the given order; sorting happens on read.
pub fn save_index(index_path: &Path, metas: &[Meta]) -> anyhow::Result<()> {
    let fd = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(index_path)
        .with_context(|| format!("creating {index_path:?}"))?;
    let mut writer = BufWriter::new(fd);
    serde_json::to_writer(&mut writer, metas)?;
    writer.flush()?;

    Ok(())
}
