use finsight::config::{AppConfig, ModelConfig};
use finsight::error::AppError;
use finsight::health::{
    BusinessMetrics, ChatNarrator, HealthEngine, LogisticModel, ModelError, SliderMap,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) type Engine = HealthEngine<LogisticModel, ChatNarrator>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_model(config: &ModelConfig) -> Result<LogisticModel, ModelError> {
    match &config.path {
        Some(path) => LogisticModel::from_path(path),
        None => LogisticModel::bundled(),
    }
}

/// Reads a `{"Feature_Name": ["slider_key", ...]}` table, or falls back to the
/// standard one.
pub(crate) fn load_slider_map(config: &ModelConfig) -> Result<SliderMap, AppError> {
    match &config.slider_map {
        Some(path) => {
            let raw: BTreeMap<String, Vec<String>> = read_json(path)?;
            let map = SliderMap::from_names(&raw)?;
            info!(path = %path.display(), "loaded slider mapping table");
            Ok(map)
        }
        None => Ok(SliderMap::standard()),
    }
}

/// Loads the distress model and narrator once; the engine is shared read-only afterwards.
pub(crate) fn build_engine(config: &AppConfig) -> Result<Engine, AppError> {
    let model = load_model(&config.model)?;
    let slider_map = load_slider_map(&config.model)?;
    let narrator = ChatNarrator::new(config.narrator.clone())?;

    if !narrator.is_configured() {
        warn!("GROQ_API_KEY not set; explanations will use fallback text");
    }
    info!(model = model.name(), narrator = %config.narrator.model, "scoring engine initialised");

    Ok(HealthEngine::new(Arc::new(model), Arc::new(narrator), slider_map))
}

pub(crate) fn read_json<T, P>(path: P) -> Result<T, AppError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn describe(metrics: &BusinessMetrics) -> String {
    format!("{} ({})", metrics.sector_label(), metrics.currency_label())
}
