use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        catalog::DishCatalog,
        encoder::{Encodable, OneHotEncoder},
        features::NUMERICAL_COLUMNS,
        recommendations::RecommendationPipeline,
        scorer::{LogisticRegression, Scorable},
    },
};

/// Reads and deserializes a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Malformed JSON in {}", path.display()))
}

/// Verifies the scorer consumes exactly what the encoder and the numerical
/// columns produce
pub fn check_compatible(encoder: &dyn Encodable, scorer: &dyn Scorable) -> Result<()> {
    let produced = NUMERICAL_COLUMNS.len() + encoder.output_width();
    match scorer.n_features() {
        Some(expected) if expected != produced => bail!(
            "Model expects {} features but the encoder pipeline produces {}",
            expected,
            produced
        ),
        _ => Ok(()),
    }
}

/// Loads the catalog and fitted artifacts named in `config` and wires them
/// into a pipeline
pub fn build_pipeline(config: &Config) -> Result<RecommendationPipeline> {
    let catalog = DishCatalog::load(&config.catalog_path)?;
    let encoder = OneHotEncoder::load(&config.encoder_path)?;
    let scorer = LogisticRegression::load(&config.model_path)?;

    check_compatible(&encoder, &scorer)?;

    if catalog.is_empty() {
        tracing::warn!("Dish catalog is empty, so every slot gets the placeholder");
    }

    let pipeline =
        RecommendationPipeline::new(Arc::new(catalog), Arc::new(encoder), Arc::new(scorer));
    Ok(pipeline.with_top_k(config.top_k))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn test_compatible_widths() {
        let encoder = OneHotEncoder::new(vec![vocab(2); 7]).unwrap();
        let scorer = LogisticRegression::new(vec![0.0; 6 + 14], 0.0).unwrap();
        assert!(check_compatible(&encoder, &scorer).is_ok());
    }

    #[test]
    fn test_incompatible_widths() {
        let encoder = OneHotEncoder::new(vec![vocab(2); 7]).unwrap();
        let scorer = LogisticRegression::new(vec![0.0; 14], 0.0).unwrap();
        let err = check_compatible(&encoder, &scorer).unwrap_err();
        assert!(err.to_string().contains("expects 14 features"));
    }

    #[test]
    fn test_read_json_reports_malformed_file() {
        let path = std::env::temp_dir().join(format!("artifact-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{not json").unwrap();
        let result: Result<serde_json::Value> = read_json(&path);
        std::fs::remove_file(&path).ok();
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Malformed JSON"));
    }

    #[test]
    fn test_build_pipeline_from_bundled_data() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let config: Config = envy::from_iter(vec![
            (
                "CATALOG_PATH".to_string(),
                data.join("meal_dishes.json").display().to_string(),
            ),
            (
                "ENCODER_PATH".to_string(),
                data.join("encoder.json").display().to_string(),
            ),
            (
                "MODEL_PATH".to_string(),
                data.join("model.json").display().to_string(),
            ),
        ])
        .unwrap();

        let pipeline = build_pipeline(&config).unwrap();
        assert_eq!(pipeline.top_k(), 5);
    }
}
