use crate::error::DealerError;
use crate::types::listing::UploadedFile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Tag prefixed to every generated file name (the upload form field).
const FIELD_TAG: &str = "imagens";
const MAX_EXT_LEN: usize = 10;
const MAX_NAME_ATTEMPTS: usize = 16;

static NAME_SEQ: AtomicU64 = AtomicU64::new(0);

/// A payload persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Forward-slash path relative to the web root, e.g. `assets/img/motos/imagens-…jpg`.
    pub path_ref: String,
    pub fs_path: PathBuf,
}

/// Writes uploaded images under `<assets_dir>/<upload_subdir>`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    assets_dir: PathBuf,
    url_prefix: String,
    upload_subdir: String,
}

impl ImageStore {
    pub fn new(assets_dir: impl Into<PathBuf>, upload_subdir: impl AsRef<str>) -> Self {
        let upload_subdir = upload_subdir
            .as_ref()
            .replace('\\', "/")
            .trim_matches('/')
            .to_string();
        Self {
            assets_dir: assets_dir.into(),
            url_prefix: "assets".to_string(),
            upload_subdir,
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_subdir
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.assets_dir.clone(), |acc, seg| acc.join(seg))
    }

    /// Persist every file or none: on the first failure, files already
    /// written by this batch are removed and the error is returned.
    pub async fn ingest(&self, files: &[UploadedFile]) -> Result<Vec<StoredImage>, DealerError> {
        let dir = self.upload_dir();
        fs::create_dir_all(&dir).await?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.write_one(&dir, file).await {
                Ok(img) => stored.push(img),
                Err(e) => {
                    warn!(
                        file = %file.file_name,
                        error = %e,
                        written = stored.len(),
                        "image batch failed; discarding written files"
                    );
                    self.discard(&stored).await;
                    return Err(e);
                }
            }
        }
        debug!(count = stored.len(), dir = %dir.display(), "images ingested");
        Ok(stored)
    }

    /// Best-effort removal of files written by a request that did not commit.
    pub async fn discard(&self, images: &[StoredImage]) {
        for img in images {
            if let Err(e) = fs::remove_file(&img.fs_path).await {
                warn!(path = %img.fs_path.display(), error = %e, "failed to remove uncommitted image");
            }
        }
    }

    async fn write_one(&self, dir: &Path, file: &UploadedFile) -> Result<StoredImage, DealerError> {
        let ext = sanitized_extension(&file.file_name);
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = generate_name(ext.as_deref());
            let fs_path = dir.join(&name);
            let mut handle = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&fs_path)
                .await
            {
                Ok(h) => h,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = write_all(&mut handle, &file.bytes).await {
                drop(handle);
                let _ = fs::remove_file(&fs_path).await;
                return Err(e.into());
            }
            return Ok(StoredImage {
                path_ref: self.path_ref(&name),
                fs_path,
            });
        }
        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not allocate a unique image file name",
        )
        .into())
    }

    fn path_ref(&self, name: &str) -> String {
        if self.upload_subdir.is_empty() {
            format!("{}/{}", self.url_prefix, name)
        } else {
            format!("{}/{}/{}", self.url_prefix, self.upload_subdir, name)
        }
    }
}

async fn write_all(handle: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    handle.write_all(bytes).await?;
    handle.flush().await
}

fn generate_name(ext: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = NAME_SEQ.fetch_add(1, Ordering::Relaxed);
    match ext {
        Some(ext) => format!("{FIELD_TAG}-{millis}-{seq}.{ext}"),
        None => format!("{FIELD_TAG}-{millis}-{seq}"),
    }
}

fn sanitized_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > MAX_EXT_LEN || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_assets(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        std::env::temp_dir().join(format!("mybmotos-assets-{tag}-{}-{nanos}", std::process::id()))
    }

    fn upload(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(sanitized_extension("foto.JPG").as_deref(), Some("jpg"));
        assert_eq!(sanitized_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(sanitized_extension("noext"), None);
        assert_eq!(sanitized_extension("evil.p/hp"), None);
        assert_eq!(sanitized_extension("weird.j pg"), None);
    }

    #[tokio::test]
    async fn colliding_names_produce_distinct_files() {
        let root = temp_assets("collide");
        let store = ImageStore::new(&root, "img/motos");

        let stored = store
            .ingest(&[upload("moto.jpg", b"first"), upload("moto.jpg", b"second")])
            .await
            .unwrap();

        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].path_ref, stored[1].path_ref);
        for img in &stored {
            assert!(img.path_ref.starts_with("assets/img/motos/imagens-"));
            assert!(img.path_ref.ends_with(".jpg"));
            assert!(!img.path_ref.contains('\\'));
        }
        assert_eq!(std::fs::read(&stored[0].fs_path).unwrap(), b"first");
        assert_eq!(std::fs::read(&stored[1].fs_path).unwrap(), b"second");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn creating_directory_is_idempotent() {
        let root = temp_assets("idem");
        let store = ImageStore::new(&root, "/img/motos/");
        store.ingest(&[upload("a.png", b"a")]).await.unwrap();
        store.ingest(&[upload("b.png", b"b")]).await.unwrap();
        assert_eq!(std::fs::read_dir(store.upload_dir()).unwrap().count(), 2);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn unwritable_destination_fails_whole_batch() {
        let root = temp_assets("blocked");
        std::fs::create_dir_all(&root).unwrap();
        // A regular file where the upload directory should be.
        std::fs::write(root.join("img"), b"not a dir").unwrap();
        let store = ImageStore::new(&root, "img/motos");

        let res = store.ingest(&[upload("a.jpg", b"a")]).await;
        assert!(matches!(res, Err(DealerError::Io(_))));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn discard_removes_files() {
        let root = temp_assets("discard");
        let store = ImageStore::new(&root, "img/motos");
        let stored = store.ingest(&[upload("a.jpg", b"a")]).await.unwrap();
        store.discard(&stored).await;
        assert!(!stored[0].fs_path.exists());

        let _ = std::fs::remove_dir_all(&root);
    }
}
