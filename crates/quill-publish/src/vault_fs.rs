//! Filesystem-backed vault

use async_trait::async_trait;
use quill_core::{Vault, VaultError, VaultFile, VaultResult};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// A directory of notes, with an optional active document
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    active: Option<VaultFile>,
}

impl FsVault {
    /// Vault rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: None,
        }
    }

    /// Set the active document
    pub fn with_active(mut self, file: VaultFile) -> Self {
        self.active = Some(file);
        self
    }

    /// Vault root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Vault-relative file for a path under the root
    pub fn file_for(&self, path: &Path) -> Option<VaultFile> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let relative = relative.to_str()?;
        (!relative.is_empty()).then(|| VaultFile::new(relative))
    }

    fn absolute(&self, file: &VaultFile) -> PathBuf {
        self.root.join(file.path())
    }

    async fn is_file(&self, relative: &str) -> bool {
        tokio::fs::metadata(self.root.join(relative))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}

fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

#[async_trait]
impl Vault for FsVault {
    async fn resolve_link(&self, name: &str, source_path: &str) -> Option<VaultFile> {
        let name = name.trim().trim_start_matches('/');
        if name.is_empty() || name.split('/').any(|part| part == "..") {
            return None;
        }

        let mut candidates = vec![name.to_string()];
        if VaultFile::new(name).extension().is_empty() {
            candidates.push(format!("{name}.md"));
        }

        let source_dir = VaultFile::new(source_path).parent().to_string();
        let mut dirs = vec![source_dir];
        if !dirs[0].is_empty() {
            dirs.push(String::new());
        }

        for dir in &dirs {
            for candidate in &candidates {
                let relative = join_relative(dir, candidate);
                if self.is_file(&relative).await {
                    return Some(VaultFile::new(relative));
                }
            }
        }
        None
    }

    async fn list_files(&self) -> Vec<VaultFile> {
        let root = self.root.clone();
        let walked = tokio::task::spawn_blocking(move || {
            WalkDir::new(&root)
                .into_iter()
                .filter_entry(|entry| !is_hidden(entry))
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| {
                    let relative = entry.path().strip_prefix(&root).ok()?;
                    relative.to_str().map(VaultFile::new)
                })
                .collect::<Vec<_>>()
        })
        .await;

        match walked {
            Ok(files) => files,
            Err(e) => {
                debug!("Vault listing failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn read_binary(&self, file: &VaultFile) -> VaultResult<Vec<u8>> {
        match tokio::fs::read(self.absolute(file)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(VaultError::NotFound(file.path().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn read_text(&self, file: &VaultFile) -> VaultResult<String> {
        match tokio::fs::read_to_string(self.absolute(file)).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(VaultError::NotFound(file.path().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_text(&self, file: &VaultFile, content: &str) -> VaultResult<()> {
        tokio::fs::write(self.absolute(file), content).await?;
        Ok(())
    }

    fn active_document(&self) -> Option<VaultFile> {
        self.active.clone()
    }
}
