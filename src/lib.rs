//! # 以图搜图分享助手 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            宿主（分享目标 / 命令行 main.rs）               │
//! │                                                          │
//! │  ShareIntent ──► SharePipeline ──► FlowOutcome           │
//! │                        │          （由宿主打开或展示）    │
//! └────────────────────────┼─────────────────────────────────┘
//!                          ↕
//! ┌────────────────────────┼─────────────────────────────────┐
//! │                    share 模块                             │
//! │                                                          │
//! │  intent ── 分享意图归类（纯函数）                          │
//! │  resource ─ 资源解析器（本地文件 / 可注入桩）              │
//! │  upload ── 临时文件托管上传（reqwest multipart）           │
//! │  rewrite ─ 直链改写 · HTTPS 强制 · 搜索链接拼接            │
//! │  outcome ─ Idle → Loading → Success | Error               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 宿主级错误类型 `AppError`（配置 / 流程构建） |
//! | [`share`] | 分享意图识别、上传与搜索链接生成 |

pub mod error;
pub mod share;
