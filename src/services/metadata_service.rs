// src/services/metadata_service.rs

use std::{sync::Arc, time::Duration};

use crate::{
    common::{cache::TtlCache, error::AppError},
    db::MetadataStore,
    models::metadata::{ReferenceKind, ReferenceList, Transporter},
};

#[derive(Clone)]
pub struct MetadataService {
    store: Arc<dyn MetadataStore>,
    lists: TtlCache<ReferenceKind, ReferenceList>,
    transporters: TtlCache<i64, Option<Transporter>>,
}

impl MetadataService {
    pub fn new(store: Arc<dyn MetadataStore>, ttl: Duration) -> Self {
        Self {
            store,
            lists: TtlCache::new(ttl),
            transporters: TtlCache::new(ttl),
        }
    }

    pub async fn list(&self, kind: ReferenceKind) -> Result<ReferenceList, AppError> {
        if let Some(list) = self.lists.get(&kind).await {
            return Ok(list);
        }

        let list = self.store.list(kind).await?;
        tracing::debug!("Metadados {:?} carregados ({} registros)", kind, list.len());
        self.lists.insert(kind, list.clone()).await;
        Ok(list)
    }

    /// `None` também é cacheado: cliente sem histórico não consulta o banco a cada tela.
    pub async fn customer_transporter(&self, customer_id: i64) -> Result<Option<Transporter>, AppError> {
        if let Some(cached) = self.transporters.get(&customer_id).await {
            return Ok(cached);
        }

        let transporter = self.store.customer_transporter(customer_id).await?;
        self.transporters.insert(customer_id, transporter.clone()).await;
        Ok(transporter)
    }

    pub async fn refresh(&self, kind: Option<ReferenceKind>) {
        match kind {
            Some(kind) => self.lists.invalidate(&kind).await,
            None => {
                self.lists.clear().await;
                self.transporters.clear().await;
            }
        }
        tracing::info!("Cache de metadados limpo ({:?})", kind);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::memory::MemoryMetadataStore;

    fn service(store: Arc<MemoryMetadataStore>) -> MetadataService {
        MetadataService::new(store, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn second_read_comes_from_cache() {
        let store = Arc::new(MemoryMetadataStore::new());
        let service = service(store.clone());

        let first = service.list(ReferenceKind::PaymentTerms).await.unwrap();
        let second = service.list(ReferenceKind::PaymentTerms).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn refresh_forces_reload() {
        let store = Arc::new(MemoryMetadataStore::new());
        let service = service(store.clone());

        service.list(ReferenceKind::Nops).await.unwrap();
        service.list(ReferenceKind::Transporters).await.unwrap();

        service.refresh(Some(ReferenceKind::Nops)).await;
        service.list(ReferenceKind::Nops).await.unwrap();
        service.list(ReferenceKind::Transporters).await.unwrap();
        assert_eq!(store.calls(), 3);

        service.refresh(None).await;
        service.list(ReferenceKind::Transporters).await.unwrap();
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn customer_transporter_uses_history() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).and_then(|x| x.and_hms_opt(9, 0, 0)).unwrap();
        let store = Arc::new(
            MemoryMetadataStore::new()
                .with_usage(701546, 7, day(1))
                .with_usage(701546, 9, day(2))
                .with_usage(701546, 9, day(3)),
        );
        let service = service(store.clone());

        let transporter = service.customer_transporter(701546).await.unwrap();
        assert_eq!(transporter.map(|t| t.id), Some(9));
        assert_eq!(service.customer_transporter(1).await.unwrap(), None);

        // Ambos os resultados (inclusive o vazio) ficaram em cache
        service.customer_transporter(701546).await.unwrap();
        service.customer_transporter(1).await.unwrap();
        assert_eq!(store.calls(), 2);
    }
}
