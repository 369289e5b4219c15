//! wxvault 命令行入口
//!
//! 界面层只做参数解析、档案选择与结果展示；捕获/恢复的阻塞文件操作
//! 统一放到 blocking 线程执行。同一时刻只应有一个操作在进行，
//! 引擎不做内部加锁。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use wxvault::{
    AppSpec, CfprefsStore, LocationRegistry, ProfileStore, RestoreEngine, Settings,
    ShellProcessControl, SnapshotEngine,
};

#[derive(Parser)]
#[command(name = "wxvault", version, about = "桌面应用状态档案管理：完整快照与一键切换")]
struct Cli {
    /// 档案根目录（默认 ~/.wxvault/profiles）
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// 目标应用 ID（内置：wechat）
    #[arg(long, global = true, default_value = "wechat")]
    app: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出全部档案
    List,
    /// 从当前现场状态创建新档案
    Create {
        /// 档案名称（与现有档案大小写不敏感地唯一）
        name: String,
    },
    /// 删除档案（按 id 或名称）
    Delete { profile: String },
    /// 切换到指定档案，并重新启动目标应用
    Switch {
        profile: String,
        /// 切换完成后不重新启动应用
        #[arg(long)]
        no_relaunch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = wxvault::logging::init()?;
    let cli = Cli::parse();

    let home = dirs::home_dir().context("无法获取用户主目录")?;
    let settings = Settings::load(&home);
    let app = AppSpec::by_id(&cli.app)
        .with_context(|| format!("未知的目标应用: {}", cli.app))?;
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| settings.effective_profiles_root(&home));

    // 文件复制与键值读写都是阻塞调用，移出异步运行时的工作线程
    tokio::task::spawn_blocking(move || run(cli.command, app, home, root, settings))
        .await
        .context("阻塞任务执行失败")?
}

fn run(
    command: Commands,
    app: AppSpec,
    home: PathBuf,
    root: PathBuf,
    settings: Settings,
) -> Result<()> {
    let store = ProfileStore::open(root)?;
    let registry = LocationRegistry::for_app(&app, &home);
    let kv = CfprefsStore::new(app.primary_domain());

    match command {
        Commands::List => {
            let mut profiles = store.list()?;
            // 枚举顺序不稳定，展示层负责排序
            profiles.sort_by(|a, b| a.display_name.cmp(&b.display_name));
            for p in profiles {
                println!("{}\t{}", p.id, p.display_name);
            }
        }
        Commands::Create { name } => {
            let profile = store.create(&name)?;
            SnapshotEngine::new(&registry, &kv)
                .capture(&profile)
                .context("捕获失败，该档案内容不完整，建议删除后重试")?;
            println!("已创建档案: {} ({})", profile.display_name, profile.id);
        }
        Commands::Delete { profile } => {
            let p = store.find(&profile)?;
            store.delete(&p)?;
            println!("已删除档案: {}", p.display_name);
        }
        Commands::Switch {
            profile,
            no_relaunch,
        } => {
            let p = store.find(&profile)?;
            let process =
                ShellProcessControl::new(&app, Duration::from_millis(settings.exit_wait_ms));
            let relaunch = settings.relaunch_after_switch && !no_relaunch;
            RestoreEngine::new(&registry, &kv).switch(&p, &process, relaunch)?;
            println!("已切换到档案: {}", p.display_name);
        }
    }
    Ok(())
}
