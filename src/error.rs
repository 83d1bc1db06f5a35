//! 宿主级错误类型
//!
//! # 设计思路
//!
//! 分享流程内部的失败已经在流水线边界转换为 `FlowOutcome::Error`，
//! 这里只承载流程之外的失败：配置加载与校验、流水线构建。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - `ShareError` 在这里按配置 / 其他两类上转，库内部不依赖 `AppError`。

use crate::share::ShareError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 配置无效或无法解析
    #[error("invalid configuration: {0}")]
    Config(String),

    /// 分享流水线无法构建
    #[error("{0}")]
    Share(ShareError),
}

impl From<ShareError> for AppError {
    fn from(error: ShareError) -> Self {
        match error {
            ShareError::InvalidConfig(message) => Self::Config(message),
            other => Self::Share(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_surface_as_config() {
        let err = AppError::from(ShareError::InvalidConfig("request_timeout".into()));

        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "invalid configuration: request_timeout");
    }

    #[test]
    fn other_share_errors_are_wrapped() {
        let err = AppError::from(ShareError::TransportFailure("HTTP 500".into()));

        assert!(matches!(err, AppError::Share(ShareError::TransportFailure(_))));
    }
}
