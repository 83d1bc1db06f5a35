//! # URL 变换模块
//!
//! ## 设计思路
//!
//! 托管链接到最终搜索链接之间的每一步都是纯字符串函数，顺序固定：
//!
//! 1. `to_direct_download`：`tmpfiles.org/` → `tmpfiles.org/dl/`（仅替换首次出现）
//! 2. `force_https`：仅当字符串以 `http://` 开头时替换为 `https://`
//! 3. `compose_search_url`：拼接到以图搜图前缀之后
//!
//! 文本分享则先做 form-urlencoded 编码（与 Java `URLEncoder` 一致），再拼接。
//! 托管链接本身视为 URL 安全，不做二次编码。

/// 以图搜图（按 URL 搜索）入口前缀。
pub const SEARCH_BY_URL_PREFIX: &str = "https://lens.google.com/uploadbyurl?url=";

const HOST_PAGE_MARKER: &str = "tmpfiles.org/";
const HOST_DIRECT_MARKER: &str = "tmpfiles.org/dl/";

/// 将文本按 UTF-8 做 form-urlencoded 编码（空格编码为 `+`）。
pub fn encode_query_value(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// 将托管页面链接改写为直链下载地址。
///
/// 只替换第一次出现的 `tmpfiles.org/`。
pub fn to_direct_download(hosted_url: &str) -> String {
    hosted_url.replacen(HOST_PAGE_MARKER, HOST_DIRECT_MARKER, 1)
}

/// 强制使用 HTTPS。
///
/// 只处理前导 `http://`，已是 `https://` 或其他形式时原样返回。
pub fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

/// 拼接最终搜索链接，`value` 不再做编码。
pub fn compose_search_url(prefix: &str, value: &str) -> String {
    format!("{}{}", prefix, value)
}

/// 文本分享：编码后拼接。
pub fn search_url_for_text(prefix: &str, text: &str) -> String {
    compose_search_url(prefix, &encode_query_value(text))
}

/// 图片分享：托管链接 → 直链 → HTTPS → 拼接。
pub fn search_url_for_hosted(prefix: &str, hosted_url: &str) -> String {
    let direct = to_direct_download(hosted_url);
    let secure = force_https(&direct);
    compose_search_url(prefix, &secure)
}

/// 日志脱敏：去掉 query 与 fragment。
pub(crate) fn redact_url_for_log(url: &str) -> String {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return "<invalid-url>".to_string();
    };

    let host = parsed.host_str().unwrap_or("<unknown-host>");
    let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

    format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
}
