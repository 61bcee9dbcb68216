use crate::error::CartResult;
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub matching: MatchConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// 匹配阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 低于该相关度的候选直接丢弃
    pub relevance_floor: f64,
    /// TEXT_ONLY 胜出者低于该相关度时需人工复核
    pub review_threshold: f64,
    /// 精确尺寸的相对容差
    pub size_tolerance: f64,
    pub max_query_words: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            relevance_floor: 0.3,
            review_threshold: 0.6,
            size_tolerance: 0.01,
            max_query_words: 5,
        }
    }
}

/// 编排层参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 每个检索词最多取多少条结果
    pub search_limit: usize,
    /// 同时处理的清单行数
    pub concurrency: usize,
    pub dry_run: bool,
    pub report_path: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            concurrency: 1,
            dry_run: true,
            report_path: "artifacts/run_report.json".to_string(),
        }
    }
}

impl AppConfig {
    /// 默认值 <- 可选配置文件 cart-matcher.{toml,json,yaml} <- 环境变量 CART__SECTION__KEY
    pub fn load() -> CartResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("cart-matcher").required(false))
            .add_source(
                config::Environment::with_prefix("CART")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<AppConfig>()?)
    }

    /// 从环境变量加载配置，失败时回退到默认值
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.matching.relevance_floor, 0.3);
        assert_eq!(config.matching.review_threshold, 0.6);
        assert_eq!(config.matching.size_tolerance, 0.01);
        assert_eq!(config.pipeline.search_limit, 5);
        assert!(config.pipeline.dry_run);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"matching": {"relevance_floor": 0.4}}"#).unwrap();
        assert_eq!(config.matching.relevance_floor, 0.4);
        assert_eq!(config.matching.review_threshold, 0.6);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
