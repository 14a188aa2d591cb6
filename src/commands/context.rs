use std::sync::Arc;

use crate::config::JournalConfig;
use crate::db::Database;
use crate::insights::{AnthropicNarrativeService, InsightError, NarrativeService, UnconfiguredNarrativeService};

/// Everything a command needs: the store, the narrative backend and the
/// loaded configuration.
pub struct AppContext {
    pub db: Arc<Database>,
    pub narrative: Arc<dyn NarrativeService>,
    pub config: JournalConfig,
}

impl AppContext {
    pub fn new(db: Arc<Database>, narrative: Arc<dyn NarrativeService>, config: JournalConfig) -> Self {
        Self { db, narrative, config }
    }

    /// Wire the Anthropic backend from `config.narrative` and the
    /// `ANTHROPIC_API_KEY` environment variable.
    pub fn with_anthropic(db: Arc<Database>, config: JournalConfig) -> Result<Self, InsightError> {
        let narrative = AnthropicNarrativeService::from_env(&config.narrative)?;
        log::info!("Narrative backend: {} ({})", narrative.name(), config.narrative.model);
        Ok(Self::new(db, Arc::new(narrative), config))
    }

    /// Like [`AppContext::with_anthropic`], but a missing or unusable key
    /// only disables the analyses. Store, dashboard and ledger keep working.
    pub fn from_config(db: Arc<Database>, config: JournalConfig) -> Self {
        match Self::with_anthropic(Arc::clone(&db), config.clone()) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("Narrative analysis disabled: {}", e);
                let reason = match e {
                    InsightError::Config(reason) => reason,
                    other => other.to_string(),
                };
                Self::new(db, Arc::new(UnconfiguredNarrativeService::new(reason)), config)
            }
        }
    }
}
