use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use models::Laboratory;

use crate::errors::ServiceError;
use crate::storage::JsonMapStore;

/// Persistence boundary for laboratory records.
///
/// `save` is the sole id authority: it assigns the next free id when the
/// entity carries none and overwrites the stored record otherwise.
#[async_trait]
pub trait LaboratoryRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Laboratory>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Laboratory>, ServiceError>;
    async fn find_by_analysis_type(
        &self,
        analysis_type: &str,
    ) -> Result<Vec<Laboratory>, ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn save(&self, laboratory: Laboratory) -> Result<Laboratory, ServiceError>;
    async fn delete(&self, laboratory: &Laboratory) -> Result<(), ServiceError>;
}

/// JSON-file-backed repository implementation.
#[derive(Clone)]
pub struct JsonFileLaboratoryRepository {
    store: Arc<JsonMapStore<i64, Laboratory>>,
}

impl JsonFileLaboratoryRepository {
    /// Initialize the repository, creating the backing file if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let store = JsonMapStore::<i64, Laboratory>::new(path).await?;
        Ok(Self { store })
    }
}

#[async_trait]
impl LaboratoryRepository for JsonFileLaboratoryRepository {
    async fn find_all(&self) -> Result<Vec<Laboratory>, ServiceError> {
        let mut labs: Vec<Laboratory> =
            self.store.list().await.into_iter().map(|(_, v)| v).collect();
        labs.sort_by_key(|lab| lab.id);
        Ok(labs)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Laboratory>, ServiceError> {
        Ok(self.store.get(&id).await)
    }

    async fn find_by_analysis_type(
        &self,
        analysis_type: &str,
    ) -> Result<Vec<Laboratory>, ServiceError> {
        let mut labs: Vec<Laboratory> = self
            .store
            .list()
            .await
            .into_iter()
            .map(|(_, v)| v)
            .filter(|lab| lab.analysis_type.as_deref() == Some(analysis_type))
            .collect();
        labs.sort_by_key(|lab| lab.id);
        Ok(labs)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.store.contains_key(&id).await)
    }

    async fn save(&self, mut laboratory: Laboratory) -> Result<Laboratory, ServiceError> {
        self.store
            .update_map(move |map| {
                let id = match laboratory.id {
                    Some(id) => id,
                    None => {
                        let next = map.keys().max().copied().unwrap_or(0) + 1;
                        laboratory.id = Some(next);
                        next
                    }
                };
                map.insert(id, laboratory.clone());
                Ok(laboratory)
            })
            .await
    }

    async fn delete(&self, laboratory: &Laboratory) -> Result<(), ServiceError> {
        let Some(id) = laboratory.id else {
            return Ok(());
        };
        self.store.remove(&id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(name: &str, analysis_type: &str) -> Laboratory {
        Laboratory {
            id: None,
            name: name.into(),
            capacity: 10,
            status: "ACTIVO".into(),
            analysis_type: Some(analysis_type.into()),
            description: None,
            location: None,
            image: "assets/img/lab_clinico.png".into(),
        }
    }

    async fn temp_repo() -> JsonFileLaboratoryRepository {
        let path = std::env::temp_dir().join(format!("labs_{}.json", uuid::Uuid::new_v4()));
        JsonFileLaboratoryRepository::new(path)
            .await
            .expect("repo init")
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let repo = temp_repo().await;

        let first = repo.save(lab("Lab A", "clinico")).await.expect("save");
        let second = repo.save(lab("Lab B", "educativo")).await.expect("save");
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(repo.exists_by_id(1).await.expect("exists"));

        let all = repo.find_all().await.expect("find_all");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, Some(1));
    }

    #[tokio::test]
    async fn save_with_id_overwrites() {
        let repo = temp_repo().await;

        let stored = repo.save(lab("Lab A", "clinico")).await.expect("save");
        let mut changed = stored.clone();
        changed.name = "Lab A renamed".into();
        let saved = repo.save(changed).await.expect("save");
        assert_eq!(saved.id, stored.id);

        let found = repo
            .find_by_id(stored.id.expect("id"))
            .await
            .expect("find")
            .expect("present");
        assert_eq!(found.name, "Lab A renamed");
        assert_eq!(repo.find_all().await.expect("find_all").len(), 1);
    }

    #[tokio::test]
    async fn type_query_is_exact_match() {
        let repo = temp_repo().await;
        repo.save(lab("Lab A", "clinico")).await.expect("save");
        repo.save(lab("Lab B", "Clinico")).await.expect("save");

        let matches = repo
            .find_by_analysis_type("clinico")
            .await
            .expect("query");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Lab A");
        assert!(repo
            .find_by_analysis_type("quimico")
            .await
            .expect("query")
            .is_empty());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = temp_repo().await;
        let stored = repo.save(lab("Lab A", "clinico")).await.expect("save");

        repo.delete(&stored).await.expect("delete");
        assert!(!repo.exists_by_id(stored.id.expect("id")).await.expect("exists"));
        assert!(repo
            .find_by_id(stored.id.expect("id"))
            .await
            .expect("find")
            .is_none());
    }
}
