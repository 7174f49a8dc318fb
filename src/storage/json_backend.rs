use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::ensure_dir,
    errors::{CoreError, CoreResult},
};

use super::{Bucket, PersistenceGateway};

const BUCKET_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed storage: one JSON file per bucket under a data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(data_dir: PathBuf) -> CoreResult<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bucket_path(&self, bucket: Bucket) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", bucket.name(), BUCKET_EXTENSION))
    }
}

impl PersistenceGateway for JsonStorage {
    fn load(&self, bucket: Bucket) -> CoreResult<Option<String>> {
        let path = self.bucket_path(bucket);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| persistence_error(bucket, "read", &err))
    }

    fn save(&self, bucket: Bucket, payload: &str) -> CoreResult<()> {
        let path = self.bucket_path(bucket);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, payload).map_err(|err| persistence_error(bucket, "write", &err))?;
        fs::rename(&tmp, &path).map_err(|err| persistence_error(bucket, "rename", &err))
    }

    /// Stages every payload to its temp file before renaming any, so a failed write
    /// leaves all bucket files untouched.
    ///
    /// The rename phase is not atomic across buckets: if a rename fails, buckets
    /// renamed before it keep their new content. The remaining temp files are
    /// removed and the error is returned.
    fn save_all(&self, batch: &[(Bucket, String)]) -> CoreResult<()> {
        let mut staged: Vec<(Bucket, PathBuf, PathBuf)> = Vec::with_capacity(batch.len());
        for (bucket, payload) in batch {
            let path = self.bucket_path(*bucket);
            let tmp = tmp_path(&path);
            if let Err(err) = write_atomic(&tmp, payload) {
                discard_staged(&staged);
                return Err(persistence_error(*bucket, "write", &err));
            }
            staged.push((*bucket, tmp, path));
        }
        for (index, (bucket, tmp, path)) in staged.iter().enumerate() {
            if let Err(err) = fs::rename(tmp, path) {
                discard_staged(&staged[index..]);
                if index > 0 {
                    tracing::warn!(%bucket, committed = index, "batch partially renamed");
                }
                return Err(persistence_error(*bucket, "rename", &err));
            }
        }
        Ok(())
    }
}

fn persistence_error(bucket: Bucket, action: &str, err: &std::io::Error) -> CoreError {
    CoreError::Persistence(format!("failed to {action} bucket `{bucket}`: {err}"))
}

fn discard_staged(staged: &[(Bucket, PathBuf, PathBuf)]) {
    for (_, tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
