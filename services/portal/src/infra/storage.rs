use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use tokio::fs;
use uuid::Uuid;

use crate::domain::repository::DocumentStorage;
use crate::error::PortalError;

/// Stores uploads on local disk as `<root>/<application id>/<file name>`.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn application_dir(&self, application_id: Uuid) -> PathBuf {
        self.root.join(application_id.to_string())
    }

    fn file_path(&self, application_id: Uuid, file_name: &str) -> Result<PathBuf, PortalError> {
        if file_name.is_empty()
            || file_name.starts_with('.')
            || file_name.contains(['/', '\\'])
            || file_name.contains("..")
        {
            return Err(PortalError::InvalidInput("invalid file name".to_owned()));
        }
        let target = self.application_dir(application_id).join(file_name);
        ensure_within(&self.root, &target)
    }
}

/// Reject any path that would resolve outside `base`.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, PortalError> {
    let relative = target.strip_prefix(base).unwrap_or(target);
    let mut resolved = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(PortalError::InvalidInput("path traversal detected".to_owned()));
            }
        }
    }
    Ok(resolved)
}

impl DocumentStorage for LocalDocumentStorage {
    async fn store(
        &self,
        application_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), PortalError> {
        let path = self.file_path(application_id, file_name)?;
        let dir = self.application_dir(application_id);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create upload dir {}", dir.display()))?;

        // Write then rename so a half-written file is never served.
        let partial = path.with_extension("part");
        fs::write(&partial, bytes)
            .await
            .with_context(|| format!("write upload {}", partial.display()))?;
        fs::rename(&partial, &path)
            .await
            .with_context(|| format!("move upload into place {}", path.display()))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(())
    }

    async fn remove(&self, application_id: Uuid, file_name: &str) -> Result<(), PortalError> {
        let path = self.file_path(application_id, file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove upload {}", path.display()))
                .into()),
        }
    }

    async fn remove_application(&self, application_id: Uuid) -> Result<(), PortalError> {
        let dir = self.application_dir(application_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove upload dir {}", dir.display()))
                .into()),
        }
    }
}
