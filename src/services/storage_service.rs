//! Blob store de recibos
//!
//! Contrato mínimo que el core necesita: `store(file) -> url` y
//! `remove(url)` best-effort. La implementación es disco local; la firma
//! permite cambiarla por un bucket sin tocar los controllers.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
        }
    }

    /// Guardar un recibo y devolver su URL (ruta relativa servible)
    pub async fn store_receipt(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot create upload dir: {}", e)))?;

        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();

        let name = format!("receipt-{}{}", Uuid::new_v4(), ext);
        let path = self.root.join(&name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Cannot store receipt: {}", e)))?;

        Ok(path.to_string_lossy().replace('\\', "/"))
    }

    /// Borrado best-effort: un fallo se loggea pero nunca bloquea al caller.
    /// Rechaza rutas fuera del directorio de uploads.
    pub async fn remove(&self, url: &str) {
        let path = Path::new(url);

        if url.contains("..") || !path.starts_with(&self.root) {
            tracing::warn!("Refusing to remove receipt outside upload dir: {}", url);
            return;
        }

        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Could not remove receipt '{}': {}", url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> StorageService {
        let dir = std::env::temp_dir().join(format!("receipts-test-{}", Uuid::new_v4()));
        StorageService::new(dir.to_str().unwrap())
    }

    #[tokio::test]
    async fn test_store_and_remove_roundtrip() {
        let storage = temp_storage();
        let url = storage.store_receipt("nota.JPG", b"fake image").await.unwrap();

        assert!(url.ends_with(".jpg"));
        assert!(url.contains("receipt-"));
        assert!(tokio::fs::metadata(&url).await.is_ok());

        storage.remove(&url).await;
        assert!(tokio::fs::metadata(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_refuses_paths_outside_root() {
        let storage = temp_storage();
        let outside = std::env::temp_dir().join(format!("keep-{}", Uuid::new_v4()));
        tokio::fs::write(&outside, b"do not delete").await.unwrap();

        storage.remove(outside.to_str().unwrap()).await;
        assert!(tokio::fs::metadata(&outside).await.is_ok());

        tokio::fs::remove_file(&outside).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_without_extension() {
        let storage = temp_storage();
        let url = storage.store_receipt("recibo", b"data").await.unwrap();
        assert!(!url.ends_with('.'));
        storage.remove(&url).await;
    }
}
