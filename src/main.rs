// ==========================================
// 题库导入引擎 - 命令行入口
// ==========================================
// 子命令:
// - parse:    识别格式并输出解析汇总（或 JSON / 审核 CSV）
// - import:   解析 → 审核（排除指定题目）→ 逐条提交到 SQLite
// - template: 输出带表头的 CSV 导入模板
// ==========================================

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use question_importer::config::{BuilderConfig, ConfigManager, ImportConfigReader};
use question_importer::importer::{
    read_text, read_text_file, template, FormatDetector, ImportError,
};
use question_importer::repository::QuestionRepositoryImpl;
use question_importer::session::{ImportSession, ParseOutcome, SessionState};
use question_importer::{db, i18n, logging};
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "question-importer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "题库导入引擎: 自动识别 JSON / CSV / TSV / 纯文本题目", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// 以 JSON 格式输出日志
    #[arg(long, global = true)]
    log_json: bool,

    /// 界面语言（zh-CN / en）
    #[arg(long, global = true, default_value = "zh-CN")]
    locale: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 解析输入并输出汇总（不落库）
    Parse {
        /// 输入文件路径，"-" 表示标准输入
        input: String,

        /// 输出解析后的题目 JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,

        /// 输出审核用 CSV
        #[arg(long)]
        csv: bool,

        /// 读取导入配置的数据库（缺省使用内置默认配置）
        #[arg(long)]
        db: Option<String>,
    },

    /// 解析并提交到题库
    Import {
        /// 输入文件路径，"-" 表示标准输入
        input: String,

        /// 数据库路径（缺省为用户数据目录）
        #[arg(long)]
        db: Option<String>,

        /// 排除的题目序号（1 起始，逗号分隔，如 "1,3"）
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<usize>,

        /// 单条提交超时（毫秒，缺省读取配置）
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// 输出 CSV 导入模板
    Template,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::set_locale(&cli.locale);

    match cli.command {
        Commands::Parse {
            input,
            json,
            csv,
            db,
        } => run_parse(&input, json, csv, db.as_deref()).await,
        Commands::Import {
            input,
            db,
            exclude,
            timeout_ms,
        } => {
            let db_path = db.unwrap_or_else(db::default_db_path);
            run_import(&input, &db_path, &exclude, timeout_ms).await
        }
        Commands::Template => {
            template::write_csv_template(io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 读取输入（文件或标准输入）
fn read_input(input: &str) -> anyhow::Result<String> {
    let text = if input == "-" {
        read_text(io::stdin().lock())
    } else {
        read_text_file(input)
    };
    text.map_err(|e| match e {
        ImportError::FileNotFound(_) => {
            anyhow!(i18n::t_with_args("import.file_not_found", &[("path", input)]))
        }
        other => anyhow!(i18n::t_with_args(
            "import.decode_failed",
            &[("error", other.to_string().as_str())]
        )),
    })
}

/// 读取导入配置与提交超时
async fn load_config(db_path: &str) -> anyhow::Result<(BuilderConfig, Duration)> {
    let manager = ConfigManager::new(db_path).map_err(|e| anyhow!("打开配置失败: {}", e))?;
    let config = manager
        .load_builder_config()
        .await
        .map_err(|e| anyhow!("读取导入配置失败: {}", e))?;
    let timeout_ms = manager
        .get_commit_timeout_ms()
        .await
        .map_err(|e| anyhow!("读取提交超时失败: {}", e))?;
    Ok((config, Duration::from_millis(timeout_ms)))
}

async fn run_parse(
    input: &str,
    json: bool,
    csv: bool,
    db_path: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let text = read_input(input)?;
    let config = match db_path {
        Some(path) => load_config(path).await?.0,
        None => BuilderConfig::default(),
    };

    let report = FormatDetector::new(config).detect(&text);
    if report.questions.is_empty() {
        eprintln!("{}", i18n::t("import.nothing_detected"));
        return Ok(ExitCode::from(2));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report.questions)?);
    } else if csv {
        template::write_review_csv(io::stdout(), &report.questions)?;
    } else {
        let summary =
            question_importer::ImportSummary::from_questions(&report.questions, report.dropped);
        println!("{}", i18n::parse_summary_message(report.format, &summary));
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_import(
    input: &str,
    db_path: &str,
    exclude: &[usize],
    timeout_ms: Option<u64>,
) -> anyhow::Result<ExitCode> {
    let (config, configured_timeout) = load_config(db_path).await?;
    let timeout = timeout_ms
        .map(Duration::from_millis)
        .unwrap_or(configured_timeout);

    let text = read_input(input)?;
    let mut session = ImportSession::new(config).with_commit_timeout(timeout);

    let summary = match session.load_text(&text)? {
        ParseOutcome::Detected(summary) => summary,
        ParseOutcome::NothingDetected => {
            eprintln!("{}", i18n::t("import.nothing_detected"));
            return Ok(ExitCode::from(2));
        }
    };
    if let Some(format) = session.detected_format() {
        println!("{}", i18n::parse_summary_message(format, &summary));
    }

    session.begin_review()?;
    for &number in exclude {
        if number == 0 {
            bail!("题目序号从 1 开始");
        }
        session
            .exclude(number - 1)
            .with_context(|| format!("无法排除第 {} 题", number))?;
    }
    if !exclude.is_empty() {
        println!(
            "{}",
            i18n::t_with_args("import.excluded", &[("count", exclude.len().to_string().as_str())])
        );
    }

    // Ctrl-C 时停止发送剩余记录
    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let repo = QuestionRepositoryImpl::new(db_path)?;
    let report = session.commit(&repo).await?;

    println!("{}", i18n::commit_summary_message(&report));
    for failure in &report.failures {
        println!("{}", i18n::commit_failure_message(failure));
    }
    info!(session_id = %session.session_id(), state = %session.state(), db_path, "导入结束");

    Ok(match session.state() {
        SessionState::Done => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    })
}
