use crate::{LocalStorage, Storage, StorageResult};
use bodyscan_core::StorageConfig;
use std::sync::Arc;

/// Create the storage backend described by configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(
        config.local_storage_path.clone(),
        config.local_storage_base_url.clone(),
    )
    .await?;

    tracing::info!(
        path = %config.local_storage_path,
        base_url = %config.local_storage_base_url,
        "Storage backend initialized"
    );

    Ok(Arc::new(storage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_storage_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/uploads");
        let config = StorageConfig {
            local_storage_path: root.to_string_lossy().to_string(),
            local_storage_base_url: "/uploads".to_string(),
        };

        let storage = create_storage(&config).await.unwrap();
        assert!(root.exists());
        assert_eq!(storage.backend_name(), "local");
        assert_eq!(storage.url_for("photos/a.jpg"), "/uploads/photos/a.jpg");
    }
}
