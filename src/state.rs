use std::sync::Arc;

use crate::config::AppConfig;
use crate::recognition::{GeminiClient, Recognizer};
use crate::store::{MemStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub recognizer: Arc<dyn Recognizer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let pg = PgStore::connect(url).await?;
                pg.migrate().await?;
                tracing::info!("using postgres store");
                Arc::new(pg)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; entries live in memory only");
                Arc::new(MemStore::new())
            }
        };

        let recognizer =
            Arc::new(GeminiClient::new(config.gemini.clone())?) as Arc<dyn Recognizer>;

        Ok(Self {
            config,
            store,
            recognizer,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        store: Arc<dyn Store>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            config,
            store,
            recognizer,
        }
    }

    /// In-memory state with a canned recognizer; no env or network access.
    pub fn fake() -> Self {
        use crate::recognition::{NutritionEstimate, RecognitionError};
        use bytes::Bytes;

        struct StubRecognizer;

        #[async_trait::async_trait]
        impl Recognizer for StubRecognizer {
            async fn analyze(
                &self,
                _image: Bytes,
                _mime: &str,
            ) -> Result<NutritionEstimate, RecognitionError> {
                Ok(NutritionEstimate {
                    name: "Rice".into(),
                    calories: 130.0,
                    protein: 2.7,
                    carbs: 28.0,
                    fat: 0.3,
                    confidence: 0.95,
                })
            }
        }

        Self {
            config: Arc::new(AppConfig::test_default()),
            store: Arc::new(MemStore::new()),
            recognizer: Arc::new(StubRecognizer),
        }
    }
}
