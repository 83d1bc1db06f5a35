//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `SharePipeline` 只负责流程编排，不关心资源从哪里来、上传到哪里去：
//! 两个协作方（`Uploader` / `ResourceResolver`）通过泛型注入。
//!
//! 处理链路：
//! 1. 文本：编码 → 拼接 → `Success`（不发出 `Loading`，无网络）
//! 2. 图片：`Loading` → 打开并读完资源 → 显示名 / MIME → 上传 → 改写链接 → `Success`
//! 3. 无法处理：直接 `Error`
//!
//! ## 实现思路
//!
//! - 所有 `ShareError` 在 `resolve_with` 边界转换为 `FlowOutcome::Error`，不向外传播。
//! - 资源流在读取函数内获取、读完并释放，上传时已不再持有。
//! - 记录 `read/upload/total` 阶段耗时，便于诊断。

use std::time::Instant;

use reqwest::Url;
use tokio::io::AsyncReadExt;

use super::intent::{SharePayload, classify};
use super::resource::{FileResolver, ResourceResolver, sniff_mime_type};
use super::rewrite::{redact_url_for_log, search_url_for_hosted, search_url_for_text};
use super::upload::{TmpFilesUploader, UploadFile, UploadResult, Uploader};
use super::{FlowOutcome, FlowState, ShareConfig, ShareError, ShareIntent};

const BUFFER_INITIAL_CAPACITY: usize = 64 * 1024;
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// 分享处理流水线。
pub struct SharePipeline<U, R> {
    uploader: U,
    resolver: R,
    config: ShareConfig,
}

impl SharePipeline<TmpFilesUploader, FileResolver> {
    /// 使用真实上传客户端与本地文件解析器构建流水线。
    ///
    /// 构建前先校验配置，无效配置返回 `ShareError::InvalidConfig`。
    pub fn from_config(config: ShareConfig) -> Result<Self, ShareError> {
        config.validate()?;
        let uploader = TmpFilesUploader::new(&config)?;
        Ok(Self::new(uploader, FileResolver, config))
    }
}

impl<U, R> SharePipeline<U, R>
where
    U: Uploader,
    R: ResourceResolver,
{
    pub fn new(uploader: U, resolver: R, config: ShareConfig) -> Self {
        Self {
            uploader,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    /// 识别并处理一次分享，返回终态。
    pub async fn handle_intent(&self, intent: &ShareIntent) -> FlowOutcome {
        self.resolve(classify(intent)).await
    }

    /// 同 `handle_intent`，并把状态变化发布到 `state`。
    pub async fn handle_intent_with(&self, intent: &ShareIntent, state: &FlowState) -> FlowOutcome {
        self.resolve_with(classify(intent), state).await
    }

    /// 处理已归类的分享内容，返回终态。
    pub async fn resolve(&self, payload: SharePayload) -> FlowOutcome {
        let state = FlowState::new();
        self.resolve_with(payload, &state).await
    }

    /// 处理已归类的分享内容，并把状态变化发布到 `state`。
    ///
    /// `state` 已处于终态时不做任何处理，返回 `Error("flow already finished")`，
    /// `state` 保持原终态不变。每次调用应使用新的 `FlowState`。
    pub async fn resolve_with(&self, payload: SharePayload, state: &FlowState) -> FlowOutcome {
        if state.current().is_terminal() {
            log::warn!("⚠️ 流程已结束，忽略重复处理");
            return FlowOutcome::from(ShareError::AlreadyFinished);
        }

        let result = match payload {
            SharePayload::Text(text) => self.resolve_text(&text),
            SharePayload::Image { uri, mime_type } => {
                state.transition(FlowOutcome::Loading);
                self.upload_image(&uri, mime_type.as_deref()).await
            }
            SharePayload::Unsupported(reason) => Err(reason.into()),
        };

        let outcome = match result {
            Ok(search_url) => FlowOutcome::Success(search_url),
            Err(err) => {
                log::warn!(
                    "❌ 分享处理失败 - code={} stage={} message={}",
                    err.code(),
                    err.stage(),
                    err
                );
                FlowOutcome::from(err)
            }
        };

        state.transition(outcome.clone());
        outcome
    }

    fn resolve_text(&self, text: &str) -> Result<String, ShareError> {
        if text.trim().is_empty() {
            return Err(ShareError::EmptyInput);
        }

        log::info!("🔗 文本分享，直接生成搜索链接");
        Ok(search_url_for_text(&self.config.search_url_prefix, text))
    }

    async fn upload_image(&self, uri: &Url, declared_mime: Option<&str>) -> Result<String, ShareError> {
        log::info!("🖼️ 开始处理图片分享 - {}", redact_url_for_log(uri.as_str()));
        let total_start = Instant::now();

        let read_start = Instant::now();
        let bytes = self.read_resource(uri).await?;
        let file_name = self
            .resolver
            .display_name(uri)
            .await
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.config.fallback_file_name.clone());
        let mime_type = self.resolve_mime_type(uri, declared_mime, &bytes).await;
        let read_elapsed = read_start.elapsed();

        let upload_start = Instant::now();
        let result = self
            .uploader
            .upload(UploadFile {
                bytes,
                mime_type,
                file_name,
            })
            .await?;
        let upload_elapsed = upload_start.elapsed();

        let hosted_url = match result {
            UploadResult::Success { hosted_url } => hosted_url,
            UploadResult::Failure { reason } => return Err(ShareError::RemoteRejected(reason)),
        };

        let search_url = search_url_for_hosted(&self.config.search_url_prefix, &hosted_url);

        log::info!(
            "✅ 图片分享处理完成 - read={}ms upload={}ms total={}ms",
            read_elapsed.as_millis(),
            upload_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(search_url)
    }

    /// 打开资源并一次读完，超过上限立即失败。
    async fn read_resource(&self, uri: &Url) -> Result<Vec<u8>, ShareError> {
        let Some(mut stream) = self.resolver.open(uri).await else {
            return Err(ShareError::UnreadableResource);
        };

        let limit = self.config.max_file_size;
        let mut bytes = Vec::with_capacity(BUFFER_INITIAL_CAPACITY);
        (&mut stream)
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .await?;
        drop(stream);

        if bytes.len() as u64 > limit {
            return Err(ShareError::ResourceTooLarge { limit });
        }

        log::debug!("📁 资源读取完成 - {} bytes", bytes.len());
        Ok(bytes)
    }

    /// MIME 优先级：解析器 → 分享声明 → 文件头识别 → 二进制兜底。
    async fn resolve_mime_type(&self, uri: &Url, declared: Option<&str>, bytes: &[u8]) -> String {
        if let Some(mime) = self.resolver.mime_type(uri).await.filter(|m| is_concrete_mime(m)) {
            return mime;
        }

        if let Some(mime) = declared.filter(|m| is_concrete_mime(m)) {
            return mime.to_string();
        }

        sniff_mime_type(bytes)
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string()
    }
}

/// `type/subtype` 形式且不含通配符。
fn is_concrete_mime(mime: &str) -> bool {
    let base = mime.split(';').next().unwrap_or_default().trim();
    match base.split_once('/') {
        Some((kind, subtype)) => {
            !kind.is_empty()
                && !subtype.is_empty()
                && !base.contains('*')
                && base
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b"/+-.".contains(&b))
        }
        None => false,
    }
}
