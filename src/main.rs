//! # 以图搜图分享助手 — 宿主入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 分享参数对应 `ACTION_SEND` 意图：`--type` / `--text` / `--stream`。
//! 标准输出只写结果（搜索链接或 JSON），日志走标准错误。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use picsearch::error::AppError;
use picsearch::share::{ACTION_SEND, FlowOutcome, MIME_TEXT_PLAIN, ShareConfig, ShareIntent, SharePipeline};

#[derive(Debug, Parser)]
#[command(name = "picsearch", version, about = "Turn a shared image or URL into a reverse image search link")]
struct Cli {
    /// 分享内容类型（如 text/plain、image/png）；只给 --text 时默认为 text/plain
    #[arg(long = "type", value_name = "MIME")]
    mime_type: Option<String>,

    /// 分享的文本（EXTRA_TEXT）
    #[arg(long)]
    text: Option<String>,

    /// 分享的资源 URI 或本地路径（EXTRA_STREAM），须同时给出 --type
    #[arg(long, value_name = "URI", requires = "mime_type")]
    stream: Option<String>,

    /// 意图动作
    #[arg(long, default_value = ACTION_SEND)]
    action: String,

    /// JSON 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 以 JSON 输出终态
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_intent(&self) -> ShareIntent {
        let mime_type = self.mime_type.clone().or_else(|| {
            (self.text.is_some() && self.stream.is_none()).then(|| MIME_TEXT_PLAIN.to_string())
        });

        ShareIntent {
            action: self.action.clone(),
            mime_type,
            text: self.text.clone(),
            stream: self.stream.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let outcome = match run(&cli).await {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("启动失败: {err}");
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(2);
            }
        }
    }

    match &outcome {
        FlowOutcome::Success(url) => {
            if !cli.json {
                println!("{url}");
            }
            ExitCode::SUCCESS
        }
        FlowOutcome::Error(message) => {
            if !cli.json {
                eprintln!("Error: {message}");
            }
            ExitCode::from(1)
        }
        FlowOutcome::Idle | FlowOutcome::Loading => {
            log::error!("流程未到达终态: {outcome:?}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: &Cli) -> Result<FlowOutcome, AppError> {
    let config = match &cli.config {
        Some(path) => ShareConfig::load_from_file(path)?,
        None => ShareConfig::default(),
    };
    let pipeline = SharePipeline::from_config(config)?;
    log::info!("setup: pipeline ready");

    Ok(pipeline.handle_intent(&cli.to_intent()).await)
}
