//! # 上传模块
//!
//! ## 设计思路
//!
//! `Uploader` 是唯一的网络协作方：输入字节、MIME 类型、文件名，输出托管链接或失败。
//! 结果分两层：
//!
//! - `Err(ShareError::TransportFailure)`：网络不可达、非 2xx、响应体无法解析
//! - `Ok(UploadResult::Failure)`：响应结构正确，但 `status != "success"`
//!
//! ## 实现思路
//!
//! `TmpFilesUploader` 使用 reqwest 发送 multipart 表单（字段名 `file`），
//! 超时由配置决定，不做重试。响应按 `{status, data: {url}}` 解析，未知字段忽略。

use std::future::Future;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::rewrite::redact_url_for_log;
use super::{ShareConfig, ShareError};

/// 上传状态字段的成功值。
pub const STATUS_SUCCESS: &str = "success";
/// multipart 字段名。
pub const FORM_FIELD_FILE: &str = "file";

/// 待上传文件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

/// 托管服务响应体。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<UploadResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponseData {
    pub url: String,
}

/// 上传结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success { hosted_url: String },
    Failure { reason: String },
}

impl UploadResponse {
    /// 按 `status` 字段转换为上传结果。
    ///
    /// 成功但缺少 `data.url` 视为响应格式错误。
    pub fn into_result(self) -> Result<UploadResult, ShareError> {
        if self.status != STATUS_SUCCESS {
            return Ok(UploadResult::Failure {
                reason: self.status,
            });
        }

        match self.data {
            Some(data) if !data.url.trim().is_empty() => Ok(UploadResult::Success {
                hosted_url: data.url,
            }),
            _ => Err(ShareError::TransportFailure(
                "malformed response: missing data.url".to_string(),
            )),
        }
    }
}

/// 上传协作方。
pub trait Uploader: Send + Sync {
    fn upload(
        &self,
        file: UploadFile,
    ) -> impl Future<Output = Result<UploadResult, ShareError>> + Send;
}

/// tmpfiles.org 上传客户端。
pub struct TmpFilesUploader {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    request_timeout: u64,
}

impl TmpFilesUploader {
    pub fn new(config: &ShareConfig) -> Result<Self, ShareError> {
        let endpoint = config.upload_endpoint()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| ShareError::TransportFailure(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            request_timeout: config.request_timeout,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    fn map_reqwest_error(&self, e: reqwest::Error) -> ShareError {
        let err_msg = e
            .to_string()
            .replace(self.endpoint.as_str(), &redact_url_for_log(self.endpoint.as_str()));

        if e.is_timeout() {
            ShareError::TransportFailure(format!("timed out after {}s", self.request_timeout))
        } else if e.is_connect() {
            ShareError::TransportFailure(format!("cannot connect: {}", err_msg))
        } else {
            ShareError::TransportFailure(format!("request failed: {}", err_msg))
        }
    }

    fn status_message(code: u16) -> &'static str {
        match code {
            400 => "bad request",
            403 => "forbidden",
            404 => "not found",
            413 => "payload too large",
            429 => "too many requests",
            500..=599 => "server error",
            _ => "request failed",
        }
    }
}

impl Uploader for TmpFilesUploader {
    async fn upload(&self, file: UploadFile) -> Result<UploadResult, ShareError> {
        log::info!(
            "📤 开始上传 - 文件: {} 类型: {} 大小: {} bytes",
            file.file_name,
            file.mime_type,
            file.bytes.len()
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|e| ShareError::TransportFailure(format!("invalid MIME type: {}", e)))?;
        let form = Form::new().part(FORM_FIELD_FILE, part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShareError::TransportFailure(format!(
                "HTTP {}: {}",
                status.as_u16(),
                Self::status_message(status.as_u16())
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let parsed = serde_json::from_slice::<UploadResponse>(&body)
            .map_err(|e| ShareError::TransportFailure(format!("malformed response: {}", e)))?;

        log::debug!("📥 上传响应 status={}", parsed.status);

        let result = parsed.into_result()?;
        if let UploadResult::Success { hosted_url } = &result {
            log::info!("✅ 上传成功 - {}", redact_url_for_log(hosted_url));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// 读取完整 HTTP 请求（头 + Content-Length 指定的正文）。
    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = stream.read(&mut chunk).expect("read request failed");
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buffer);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    });

                match content_length {
                    Some(len) if buffer.len() >= header_end + 4 + len => break,
                    None if text.trim_end().ends_with("--") => break,
                    _ => {}
                }
            }
        }

        String::from_utf8_lossy(&buffer).to_string()
    }

    /// 启动只响应一次的本地 HTTP 服务，返回基础地址与请求文本。
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let request = read_request(&mut stream);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response failed");
            stream.flush().expect("flush failed");

            request
        });

        (format!("http://127.0.0.1:{}/", addr.port()), server)
    }

    fn uploader_for(base_url: String) -> TmpFilesUploader {
        let config = ShareConfig {
            upload_base_url: base_url,
            request_timeout: 5,
            connect_timeout: 2,
            ..ShareConfig::default()
        };
        TmpFilesUploader::new(&config).expect("uploader init failed")
    }

    fn sample_file() -> UploadFile {
        UploadFile {
            bytes: b"\x89PNG fake bytes".to_vec(),
            mime_type: "image/png".to_string(),
            file_name: "cat.png".to_string(),
        }
    }

    #[tokio::test]
    async fn upload_posts_multipart_file_field_and_parses_success() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"status":"success","data":{"url":"http://tmpfiles.org/123/cat.png","extra":1},"other":true}"#,
        );
        let uploader = uploader_for(base);

        let result = uploader.upload(sample_file()).await;
        let request = server.join().expect("server thread failed");

        assert_eq!(
            result,
            Ok(UploadResult::Success {
                hosted_url: "http://tmpfiles.org/123/cat.png".to_string()
            })
        );
        assert!(request.starts_with("POST /api/v1/upload "));
        assert!(request.contains("multipart/form-data; boundary="));
        assert!(request.contains(r#"name="file"; filename="cat.png""#));
        assert!(request.contains("Content-Type: image/png"));
        assert!(request.contains("PNG fake bytes"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure_result() {
        let (base, server) = serve_once("200 OK", r#"{"status":"error","message":"quota"}"#);
        let uploader = uploader_for(base);

        let result = uploader.upload(sample_file()).await;
        server.join().expect("server thread failed");

        assert_eq!(
            result,
            Ok(UploadResult::Failure {
                reason: "error".to_string()
            })
        );
    }

    #[tokio::test]
    async fn http_error_status_is_transport_failure() {
        let (base, server) = serve_once("503 Service Unavailable", "{}");
        let uploader = uploader_for(base);

        let result = uploader.upload(sample_file()).await;
        server.join().expect("server thread failed");

        assert_eq!(
            result,
            Err(ShareError::TransportFailure("HTTP 503: server error".to_string()))
        );
    }

    #[tokio::test]
    async fn malformed_body_is_transport_failure() {
        let (base, server) = serve_once("200 OK", "<html>oops</html>");
        let uploader = uploader_for(base);

        let result = uploader.upload(sample_file()).await;
        server.join().expect("server thread failed");

        assert!(matches!(result, Err(ShareError::TransportFailure(msg)) if msg.starts_with("malformed response")));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let uploader = uploader_for(format!("http://127.0.0.1:{}/", port));
        let result = uploader.upload(sample_file()).await;

        assert!(matches!(result, Err(ShareError::TransportFailure(_))));
    }

    #[test]
    fn success_without_url_is_malformed() {
        let response: UploadResponse =
            serde_json::from_str(r#"{"status":"success"}"#).expect("parse failed");

        assert!(matches!(
            response.into_result(),
            Err(ShareError::TransportFailure(_))
        ));
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let uploader = uploader_for("https://tmpfiles.org/".to_string());

        assert_eq!(uploader.endpoint().as_str(), "https://tmpfiles.org/api/v1/upload");
    }
}
