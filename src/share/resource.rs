//! # 资源读取模块
//!
//! ## 设计思路
//!
//! `ResourceResolver` 是"内容解析器"接缝：把资源 URI 打开为异步字节流，
//! 并尽力提供显示名与 MIME 类型。流水线只依赖该 trait，测试可注入桩实现。
//!
//! `open` 返回 `None` 表示资源无法打开（对应 `cannot read file`），
//! 打开成功之后的读取错误由流水线按意外错误处理。
//!
//! ## 实现思路
//!
//! `FileResolver` 面向本地文件系统：仅识别 `file://`，显示名取文件名，
//! MIME 类型通过 `infer` 读取文件头判断（放在 `spawn_blocking` 中执行）。

use std::future::Future;

use reqwest::Url;
use tokio::io::AsyncRead;

/// 资源解析器。
pub trait ResourceResolver: Send + Sync {
    /// 打开后的字节流类型。
    type Stream: AsyncRead + Unpin + Send;

    /// 打开资源；无法打开时返回 `None`。
    fn open(&self, uri: &Url) -> impl Future<Output = Option<Self::Stream>> + Send;

    /// 资源显示名（尽力而为）。
    fn display_name(&self, uri: &Url) -> impl Future<Output = Option<String>> + Send;

    /// 资源 MIME 类型（尽力而为）。
    fn mime_type(&self, uri: &Url) -> impl Future<Output = Option<String>> + Send;
}

/// 本地文件解析器。
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

impl ResourceResolver for FileResolver {
    type Stream = tokio::fs::File;

    async fn open(&self, uri: &Url) -> Option<Self::Stream> {
        if uri.scheme() != "file" {
            log::warn!("⚠️ 不支持的资源 scheme：{}", uri.scheme());
            return None;
        }

        let path = uri.to_file_path().ok()?;
        match tokio::fs::File::open(&path).await {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("⚠️ 无法打开资源 {}：{}", path.display(), e);
                None
            }
        }
    }

    async fn display_name(&self, uri: &Url) -> Option<String> {
        if uri.scheme() != "file" {
            return None;
        }

        let path = uri.to_file_path().ok()?;
        path.file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
    }

    async fn mime_type(&self, uri: &Url) -> Option<String> {
        if uri.scheme() != "file" {
            return None;
        }

        let path = uri.to_file_path().ok()?;
        let sniffed = tokio::task::spawn_blocking(move || infer::get_from_path(path))
            .await
            .ok()?
            .ok()??;

        Some(sniffed.mime_type().to_string())
    }
}

/// 从字节内容猜测 MIME 类型。
pub(crate) fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}
