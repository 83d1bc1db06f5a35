//! # 分享意图识别模块
//!
//! ## 设计思路
//!
//! 外部"分享"动作被建模为 `ShareIntent`（对应 `ACTION_SEND` 及其 `EXTRA_TEXT` /
//! `EXTRA_STREAM`）。`classify` 是纯函数，不做任何 I/O，只把意图归为三种形态：
//!
//! - `Text`：纯文本且非空白
//! - `Image`：`image/*` 且携带可解析的资源引用
//! - `Unsupported`：其余情况，附带原因，供流水线给出不同的用户文案
//!
//! ## 实现思路
//!
//! MIME 比较忽略大小写与 `;` 之后的参数。资源引用优先按 URI 解析，
//! 解析不了时按本地路径处理并转换为 `file://`。

use std::path::Path;

use reqwest::Url;

use super::ShareError;

/// Android 分享动作。
pub const ACTION_SEND: &str = "android.intent.action.SEND";
/// 纯文本 MIME 类型。
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// 外部传入的分享意图。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareIntent {
    pub action: String,
    /// 声明的内容类型。
    pub mime_type: Option<String>,
    /// `EXTRA_TEXT`。
    pub text: Option<String>,
    /// `EXTRA_STREAM`：资源 URI 或本地路径。
    pub stream: Option<String>,
}

impl ShareIntent {
    /// 构造一个纯文本分享。
    pub fn send_text(text: impl Into<String>) -> Self {
        Self {
            action: ACTION_SEND.to_string(),
            mime_type: Some(MIME_TEXT_PLAIN.to_string()),
            text: Some(text.into()),
            stream: None,
        }
    }

    /// 构造一个资源分享。
    pub fn send_stream(mime_type: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            action: ACTION_SEND.to_string(),
            mime_type: Some(mime_type.into()),
            text: None,
            stream: Some(stream.into()),
        }
    }
}

/// 归类后的分享内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharePayload {
    /// 非空白文本（原样保留，不做 trim）。
    Text(String),
    /// 图片资源引用及声明的 MIME 类型。
    Image { uri: Url, mime_type: Option<String> },
    /// 无法处理的分享。
    Unsupported(UnsupportedReason),
}

/// `Unsupported` 的具体原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    EmptyText,
    MissingResource,
    ContentType(Option<String>),
}

impl From<UnsupportedReason> for ShareError {
    fn from(reason: UnsupportedReason) -> Self {
        match reason {
            UnsupportedReason::EmptyText => ShareError::EmptyInput,
            UnsupportedReason::MissingResource => ShareError::MissingResource,
            UnsupportedReason::ContentType(mime) => ShareError::UnsupportedType(mime),
        }
    }
}

/// 识别分享意图。
pub fn classify(intent: &ShareIntent) -> SharePayload {
    if intent.action != ACTION_SEND {
        log::debug!("忽略非分享动作：{}", intent.action);
        return SharePayload::Unsupported(UnsupportedReason::ContentType(
            intent.mime_type.clone(),
        ));
    }

    let Some(kind) = intent.mime_type.as_deref().map(base_mime_type) else {
        return SharePayload::Unsupported(UnsupportedReason::ContentType(None));
    };

    if kind == MIME_TEXT_PLAIN {
        return match intent.text.as_deref() {
            Some(text) if !text.trim().is_empty() => SharePayload::Text(text.to_string()),
            _ => SharePayload::Unsupported(UnsupportedReason::EmptyText),
        };
    }

    if kind.starts_with("image/") {
        return match intent.stream.as_deref().and_then(parse_resource_ref) {
            Some(uri) => SharePayload::Image {
                uri,
                mime_type: intent.mime_type.clone(),
            },
            None => SharePayload::Unsupported(UnsupportedReason::MissingResource),
        };
    }

    SharePayload::Unsupported(UnsupportedReason::ContentType(intent.mime_type.clone()))
}

/// 解析资源引用：URI 或本地路径。
pub fn parse_resource_ref(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // 单字母 scheme 是 Windows 盘符，按路径处理
    if let Ok(uri) = Url::parse(raw) {
        if uri.scheme().len() > 1 {
            return Some(uri);
        }
    }

    let path = std::path::absolute(Path::new(raw)).ok()?;
    Url::from_file_path(path).ok()
}

fn base_mime_type(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
