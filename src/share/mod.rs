//! # 分享处理模块（share）
//!
//! ## 设计思路
//!
//! 该模块将"意图识别 → 资源读取 → 上传 → 链接改写 → 终态输出"按职责拆分为多个子模块：
//!
//! - `intent`：分享意图建模与纯函数归类
//! - `resource`：资源解析器接缝（打开流、显示名、MIME）
//! - `upload`：上传协作方与 tmpfiles.org 客户端
//! - `rewrite`：托管链接 / 搜索链接的纯字符串变换
//! - `outcome`：流程状态与终态保护
//! - `pipeline`：统一编排
//! - `config/error`：配置与错误模型
//!
//! ## 调用链
//!
//! ```text
//! ShareIntent
//!    ↓
//! intent::classify（Text / Image / Unsupported）
//!    ↓
//! SharePipeline::resolve_with
//!    ├─ 文本：rewrite::search_url_for_text
//!    └─ 图片：Loading
//!         ├─ resource（打开 + 读完 + 显示名 + MIME）
//!         ├─ upload（multipart POST）
//!         └─ rewrite::search_url_for_hosted
//!    ↓
//! FlowOutcome::Success(search_url) | FlowOutcome::Error(message)
//! ```

mod config;
mod error;
mod intent;
mod outcome;
mod pipeline;
mod resource;
pub mod rewrite;
mod upload;

pub use config::{DEFAULT_UPLOAD_BASE_URL, DEFAULT_UPLOAD_PATH, FALLBACK_FILE_NAME, ShareConfig};
pub use error::ShareError;
pub use intent::{
    ACTION_SEND, MIME_TEXT_PLAIN, ShareIntent, SharePayload, UnsupportedReason, classify,
    parse_resource_ref,
};
pub use outcome::{FlowOutcome, FlowState};
pub use pipeline::SharePipeline;
pub use resource::{FileResolver, ResourceResolver};
pub use upload::{
    FORM_FIELD_FILE, STATUS_SUCCESS, TmpFilesUploader, UploadFile, UploadResponse,
    UploadResponseData, UploadResult, Uploader,
};
