use crate::domain::model::{ClonePolicy, CloneOptions, DEFAULT_MAX_DEPTH};
use crate::utils::error::{Result, UtilsError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deepest nesting the JSON parser accepts; a larger limit could never be reached from JSON input.
pub const MAX_DEPTH_LIMIT: usize = DEFAULT_MAX_DEPTH;
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilsConfig {
    pub clone: CloneConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CloneConfig {
    pub policy: ClonePolicy,
    pub max_depth: usize,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            policy: ClonePolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl UtilsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UtilsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UtilsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOG_LEVEL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UtilsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_range("clone.max_depth", self.clone.max_depth, 1, MAX_DEPTH_LIMIT)?;
        validation::validate_non_empty_string("logging.level", &self.logging.level)?;
        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;
        Ok(())
    }

    pub fn clone_options(&self) -> CloneOptions {
        CloneOptions {
            policy: self.clone.policy,
            max_depth: self.clone.max_depth,
        }
    }

    /// 以命令列參數覆蓋檔案設定
    pub fn clone_options_with(
        &self,
        policy: Option<ClonePolicy>,
        max_depth: Option<usize>,
    ) -> Result<CloneOptions> {
        let max_depth = max_depth.unwrap_or(self.clone.max_depth);
        validation::validate_range("max_depth", max_depth, 1, MAX_DEPTH_LIMIT)?;
        Ok(CloneOptions {
            policy: policy.unwrap_or(self.clone.policy),
            max_depth,
        })
    }
}

impl Validate for UtilsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
