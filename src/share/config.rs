//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有可调参数集中到 `ShareConfig`：上传端点、搜索前缀、超时、体积上限、
//! 兜底文件名。`Default` 即生产可用配置。
//!
//! ## 实现思路
//!
//! - 支持从 JSON 文件加载，未出现的字段使用默认值（`#[serde(default)]`）。
//! - `validate` 做范围检查，宿主在构建流水线前调用。
//! - `upload_endpoint` 将基础地址与上传路径拼接为完整 URL。

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::rewrite::SEARCH_BY_URL_PREFIX;
use super::ShareError;

/// 临时文件托管服务基础地址。
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://tmpfiles.org/";
/// 上传接口相对路径。
pub const DEFAULT_UPLOAD_PATH: &str = "api/v1/upload";
/// 无法解析显示名时使用的文件名。
pub const FALLBACK_FILE_NAME: &str = "uploaded_image";

/// 分享流程配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    /// 托管服务基础地址（以 `/` 结尾）。
    pub upload_base_url: String,
    /// 上传接口路径，相对于 `upload_base_url`。
    pub upload_path: String,
    /// 以图搜图链接前缀。
    pub search_url_prefix: String,
    /// 上传请求整体超时（秒）。
    pub request_timeout: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout: u64,
    /// 允许上传的最大字节数。
    pub max_file_size: u64,
    /// 兜底显示名。
    pub fallback_file_name: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            search_url_prefix: SEARCH_BY_URL_PREFIX.to_string(),
            request_timeout: 60,
            connect_timeout: 10,
            max_file_size: 100 * 1024 * 1024,
            fallback_file_name: FALLBACK_FILE_NAME.to_string(),
        }
    }
}

impl ShareConfig {
    /// 从 JSON 文件加载配置。
    pub fn load_from_file(path: &Path) -> Result<Self, ShareError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ShareError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str::<Self>(&content).map_err(|e| {
            ShareError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e))
        })?;

        log::debug!("⚙️ 已加载配置文件 - {}", path.display());
        Ok(config)
    }

    /// 拼接完整上传地址。
    pub fn upload_endpoint(&self) -> Result<reqwest::Url, ShareError> {
        let base = reqwest::Url::parse(&self.upload_base_url)
            .map_err(|e| ShareError::InvalidConfig(format!("invalid upload_base_url: {}", e)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ShareError::InvalidConfig(
                "upload_base_url must use http or https".to_string(),
            ));
        }

        base.join(&self.upload_path)
            .map_err(|e| ShareError::InvalidConfig(format!("invalid upload_path: {}", e)))
    }

    /// 校验参数范围。
    pub fn validate(&self) -> Result<(), ShareError> {
        self.upload_endpoint()?;

        if !self.search_url_prefix.starts_with("https://")
            && !self.search_url_prefix.starts_with("http://")
        {
            return Err(ShareError::InvalidConfig(
                "search_url_prefix must be an http(s) URL".to_string(),
            ));
        }
        if !(1..=600).contains(&self.request_timeout) {
            return Err(ShareError::InvalidConfig(
                "request_timeout must be between 1 and 600 seconds".to_string(),
            ));
        }
        if !(1..=120).contains(&self.connect_timeout) {
            return Err(ShareError::InvalidConfig(
                "connect_timeout must be between 1 and 120 seconds".to_string(),
            ));
        }
        if self.connect_timeout > self.request_timeout {
            return Err(ShareError::InvalidConfig(
                "connect_timeout cannot exceed request_timeout".to_string(),
            ));
        }
        if self.max_file_size == 0 {
            return Err(ShareError::InvalidConfig("max_file_size must be positive".to_string()));
        }
        if self.fallback_file_name.trim().is_empty() {
            return Err(ShareError::InvalidConfig(
                "fallback_file_name cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = ShareConfig::default();

        config.validate().expect("default config should validate");
        assert_eq!(
            config.upload_endpoint().expect("endpoint").as_str(),
            "https://tmpfiles.org/api/v1/upload"
        );
    }

    #[test]
    fn partial_json_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        write!(file, r#"{{ "upload_base_url": "http://127.0.0.1:9000/", "request_timeout": 5 }}"#)
            .expect("write config failed");

        let config = ShareConfig::load_from_file(file.path()).expect("load config failed");

        assert_eq!(config.upload_base_url, "http://127.0.0.1:9000/");
        assert_eq!(config.request_timeout, 5);
        assert_eq!(config.upload_path, DEFAULT_UPLOAD_PATH);
        assert_eq!(config.fallback_file_name, FALLBACK_FILE_NAME);
        assert_eq!(
            config.upload_endpoint().expect("endpoint").as_str(),
            "http://127.0.0.1:9000/api/v1/upload"
        );
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file failed");
        write!(file, "{{ not json").expect("write config failed");

        let result = ShareConfig::load_from_file(file.path());

        assert!(matches!(result, Err(ShareError::InvalidConfig(_))));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("create temp dir failed");

        let result = ShareConfig::load_from_file(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(ShareError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = ShareConfig::default();
        config.connect_timeout = 0;
        assert!(matches!(config.validate(), Err(ShareError::InvalidConfig(_))));

        let mut config = ShareConfig::default();
        config.connect_timeout = 90;
        config.request_timeout = 30;
        assert!(matches!(config.validate(), Err(ShareError::InvalidConfig(_))));

        let mut config = ShareConfig::default();
        config.upload_base_url = "ftp://tmpfiles.org/".to_string();
        assert!(matches!(config.validate(), Err(ShareError::InvalidConfig(_))));

        let mut config = ShareConfig::default();
        config.fallback_file_name = "  ".to_string();
        assert!(matches!(config.validate(), Err(ShareError::InvalidConfig(_))));
    }
}
