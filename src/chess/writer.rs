use super::encoder::{FEATURE_LEN, FeatureVector};
use super::error::{Error, Result};
use log::info;
use npyz::{NpyWriter, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

/// Create `dir` and all of its parents. An empty path means the working directory.
pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    info!("Directory '{}' ensured.", dir.display());
    Ok(())
}

/// Write the dataset as a C-order `u8` array of shape `[rows, 773]`.
pub fn save_dataset(path: &Path, dataset: &[FeatureVector]) -> Result<()> {
    if let Some(dir) = path.parent() {
        ensure_directory(dir)?;
    }

    write_npy(path, dataset).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Data saved successfully to {} ({} rows)",
        path.display(),
        dataset.len()
    );
    Ok(())
}

fn write_npy(path: &Path, dataset: &[FeatureVector]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer: NpyWriter<u8, BufWriter<File>> = npyz::WriteOptions::new()
        .default_dtype()
        .shape(&[dataset.len() as u64, FEATURE_LEN as u64])
        .writer(BufWriter::new(file))
        .begin_nd()?;

    writer.extend(dataset.iter().flat_map(|v| v.as_slice().iter().copied()))?;
    writer.finish()
}
