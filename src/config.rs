// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{AuditRepository, LeadRepository, MetadataRepository},
    services::{
        auth::TokenValidator,
        lead_service::LeadService,
        metadata_service::MetadataService,
        pricing::{PriceSource, PricingClient},
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PRICING_TIMEOUT_SECS: u64 = 30;
const DEFAULT_METADATA_TTL_SECS: u64 = 300;

/// Configuração lida do ambiente (.env incluído).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub pricing_url: Option<String>,
    pub pricing_timeout: Duration,
    pub metadata_ttl: Duration,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a partir de qualquer fonte chave -> valor (o ambiente, ou um mapa nos testes).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} inválido: '{}'", key, raw)),
                None => Ok(default),
            }
        };

        let db_max_connections = u32::try_from(number("DB_MAX_CONNECTIONS", u64::from(DEFAULT_MAX_CONNECTIONS))?)
            .context("DB_MAX_CONNECTIONS fora do intervalo")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            db_max_connections,
            pricing_url: lookup("PRICING_URL").filter(|v| !v.trim().is_empty()),
            pricing_timeout: Duration::from_secs(number("PRICING_TIMEOUT_SECS", DEFAULT_PRICING_TIMEOUT_SECS)?),
            metadata_ttl: Duration::from_secs(number("METADATA_TTL_SECS", DEFAULT_METADATA_TTL_SECS)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub token_validator: TokenValidator,
    pub lead_service: LeadService,
    pub metadata_service: MetadataService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let db_pool = MySqlPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar no MySQL")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let pricing: Option<Arc<dyn PriceSource>> = match &settings.pricing_url {
            Some(url) => Some(Arc::new(PricingClient::new(url.as_str(), settings.pricing_timeout)?)),
            None => {
                tracing::warn!("PRICING_URL não definida: itens sem preço serão recusados");
                None
            }
        };

        let lead_service = LeadService::new(
            Arc::new(LeadRepository::new(db_pool.clone())),
            Arc::new(AuditRepository::new(db_pool.clone())),
            pricing,
        );
        let metadata_service = MetadataService::new(Arc::new(MetadataRepository::new(db_pool)), settings.metadata_ttl);

        Ok(Self::from_parts(&settings, lead_service, metadata_service))
    }

    pub fn from_parts(settings: &Settings, lead_service: LeadService, metadata_service: MetadataService) -> Self {
        Self {
            token_validator: TokenValidator::new(&settings.jwt_secret),
            lead_service,
            metadata_service,
            i18n_store: Arc::new(I18nStore::default()),
        }
    }
}
