//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 分享流程中所有失败来源收敛到单一枚举 `ShareError`，并在流水线边界统一
//! 转换为 `FlowOutcome::Error`，不会继续向上传播。
//!
//! `Display` 输出即用户可见文案（稳定、小写），展示层原样渲染；
//! `code()` / `stage()` 提供稳定标识，便于日志与机器消费。

/// 分享流程统一错误类型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// 分享的文本为空或全是空白。
    #[error("shared text was empty")]
    EmptyInput,

    /// 分享类型既不是纯文本也不是图片（附带声明的 MIME 类型）。
    #[error("unsupported content type")]
    UnsupportedType(Option<String>),

    /// 声明为图片分享，但没有可解析的资源引用。
    #[error("failed to get image uri")]
    MissingResource,

    /// 资源引用无法打开读取。
    #[error("cannot read file")]
    UnreadableResource,

    /// 读取到的字节超过上传上限。
    #[error("file too large")]
    ResourceTooLarge { limit: u64 },

    /// 上传在网络 / HTTP 层失败，或响应体无法解析。
    #[error("upload failed: {0}")]
    TransportFailure(String),

    /// 上传请求成功返回，但 `status` 字段不是 `"success"`（附带原始 status）。
    #[error("upload failed")]
    RemoteRejected(String),

    /// 配置无效或无法加载。
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 状态单元已处于终态，拒绝再次处理。
    #[error("flow already finished")]
    AlreadyFinished,

    /// 其他意外错误，消息原样透传。
    #[error("{0}")]
    Unexpected(String),
}

impl ShareError {
    /// 稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::UnsupportedType(_) => "unsupported_type",
            Self::MissingResource => "missing_resource",
            Self::UnreadableResource => "unreadable_resource",
            Self::ResourceTooLarge { .. } => "resource_too_large",
            Self::TransportFailure(_) => "transport_failure",
            Self::RemoteRejected(_) => "remote_rejected",
            Self::InvalidConfig(_) => "invalid_config",
            Self::AlreadyFinished => "already_finished",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// 出错所在阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::UnsupportedType(_) | Self::MissingResource => "classify",
            Self::UnreadableResource | Self::ResourceTooLarge { .. } => "read",
            Self::TransportFailure(_) | Self::RemoteRejected(_) => "upload",
            Self::InvalidConfig(_) => "config",
            Self::AlreadyFinished => "flow",
            Self::Unexpected(_) => "unknown",
        }
    }
}

impl From<std::io::Error> for ShareError {
    fn from(error: std::io::Error) -> Self {
        Self::Unexpected(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages_are_stable() {
        assert_eq!(ShareError::EmptyInput.to_string(), "shared text was empty");
        assert_eq!(
            ShareError::UnsupportedType(Some("application/pdf".into())).to_string(),
            "unsupported content type"
        );
        assert_eq!(ShareError::UnreadableResource.to_string(), "cannot read file");
        assert_eq!(ShareError::RemoteRejected("error".into()).to_string(), "upload failed");
        assert_eq!(
            ShareError::TransportFailure("HTTP 502".into()).to_string(),
            "upload failed: HTTP 502"
        );
    }

    #[test]
    fn unexpected_passes_message_through_verbatim() {
        let err = ShareError::from(std::io::Error::other("disk vanished"));

        assert_eq!(err.to_string(), "disk vanished");
        assert_eq!(err.code(), "unexpected");
    }

    #[test]
    fn stages_group_errors_by_flow_step() {
        assert_eq!(ShareError::MissingResource.stage(), "classify");
        assert_eq!(ShareError::ResourceTooLarge { limit: 1 }.stage(), "read");
        assert_eq!(ShareError::RemoteRejected("error".into()).stage(), "upload");
        assert_eq!(ShareError::InvalidConfig("x".into()).stage(), "config");
        assert_eq!(ShareError::AlreadyFinished.stage(), "flow");
    }

    #[test]
    fn already_finished_has_its_own_code() {
        assert_eq!(ShareError::AlreadyFinished.to_string(), "flow already finished");
        assert_eq!(ShareError::AlreadyFinished.code(), "already_finished");
    }
}
