//! # 流程状态模块
//!
//! ## 设计思路
//!
//! `FlowOutcome` 是一次调用唯一带生命周期的状态：
//!
//! ```text
//! Idle ──► Loading ──► Success | Error     （图片分享）
//! Idle ──────────────► Success | Error     （文本分享 / 无法处理）
//! ```
//!
//! 进入终态后不再变化；新的调用创建新的 `FlowState`，不复用、不保留历史。
//!
//! ## 实现思路
//!
//! `FlowState` 基于 `tokio::sync::watch`，任意数量的观察者可订阅最新状态。
//! 状态迁移在 `send_if_modified` 内原子校验，终态之后的迁移一律拒绝。
//! 可选的同步观察回调会按顺序收到每一次被接受的迁移。

use serde::Serialize;
use tokio::sync::watch;

use super::ShareError;

/// 流程状态。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FlowOutcome {
    #[default]
    Idle,
    Loading,
    /// 最终搜索链接。
    Success(String),
    /// 用户可见错误文案。
    Error(String),
}

impl FlowOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    pub fn search_url(&self) -> Option<&str> {
        match self {
            Self::Success(url) => Some(url),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// 是否允许从 `self` 迁移到 `next`。
    pub fn can_transition_to(&self, next: &FlowOutcome) -> bool {
        match (self, next) {
            (Self::Idle, Self::Loading) => true,
            (Self::Idle | Self::Loading, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl From<ShareError> for FlowOutcome {
    fn from(error: ShareError) -> Self {
        Self::Error(error.to_string())
    }
}

type Observer = Box<dyn Fn(&FlowOutcome) + Send + Sync>;

/// 单次调用的状态单元。
pub struct FlowState {
    tx: watch::Sender<FlowOutcome>,
    observer: Option<Observer>,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FlowOutcome::Idle);
        Self { tx, observer: None }
    }

    /// 附带同步观察回调，按顺序接收每一次被接受的迁移。
    pub fn with_observer<F>(observer: F) -> Self
    where
        F: Fn(&FlowOutcome) + Send + Sync + 'static,
    {
        Self {
            observer: Some(Box::new(observer)),
            ..Self::new()
        }
    }

    /// 订阅状态变化。
    pub fn subscribe(&self) -> watch::Receiver<FlowOutcome> {
        self.tx.subscribe()
    }

    /// 当前状态快照。
    pub fn current(&self) -> FlowOutcome {
        self.tx.borrow().clone()
    }

    /// 尝试迁移状态，被拒绝时返回 `false`。
    pub fn transition(&self, next: FlowOutcome) -> bool {
        let mut rejected_from = None;
        let accepted = self.tx.send_if_modified(|current| {
            if current.can_transition_to(&next) {
                *current = next.clone();
                true
            } else {
                rejected_from = Some(current.clone());
                false
            }
        });

        if accepted {
            if let Some(observer) = &self.observer {
                observer(&next);
            }
        } else if let Some(from) = rejected_from {
            log::warn!("⚠️ 拒绝状态迁移：{:?} -> {:?}", from, next);
        }

        accepted
    }
}
