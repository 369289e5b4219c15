//! 进程协调：切换前结束目标应用，完成后重新启动
//!
//! 结束与启动都是尽力而为：结束失败只告警不中止（与仍在运行的进程
//! 竞争恢复是已接受的风险）。等待退出采用轮询探测而非固定延时，
//! 上限可配置。

use std::process::Command;
use std::time::{Duration, Instant};

use crate::models::app::AppSpec;

/// 进程控制接口；引擎经由此接缝与真实进程隔离
pub trait ProcessControl {
    /// 尽力结束目标进程，并在限定时间内等待其退出
    fn terminate_and_wait(&self);
    /// 重新启动目标应用（fire-and-forget）
    fn launch(&self);
}

/// 基于 pkill/pgrep 与启动命令的真实实现
pub struct ShellProcessControl {
    process_name: String,
    launch_command: Vec<String>,
    exit_wait: Duration,
    poll_interval: Duration,
}

impl ShellProcessControl {
    pub fn new(app: &AppSpec, exit_wait: Duration) -> Self {
        Self {
            process_name: app.process_name.clone(),
            launch_command: app.launch_command.clone(),
            exit_wait,
            poll_interval: Duration::from_millis(200),
        }
    }

    fn is_running(&self) -> bool {
        Command::new("pgrep")
            .args(["-x", &self.process_name])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl ProcessControl for ShellProcessControl {
    fn terminate_and_wait(&self) {
        match Command::new("pkill")
            .args(["-x", &self.process_name])
            .status()
        {
            Ok(status) if status.success() => {
                tracing::info!("已请求结束进程: {}", self.process_name);
            }
            Ok(_) => {
                tracing::debug!("目标进程未在运行: {}", self.process_name);
                return;
            }
            Err(e) => {
                // 结束失败不致命，继续执行切换
                tracing::warn!("结束进程失败（忽略，继续切换）: {e}");
                return;
            }
        }

        let deadline = Instant::now() + self.exit_wait;
        while Instant::now() < deadline {
            if !self.is_running() {
                tracing::debug!("进程 {} 已退出", self.process_name);
                return;
            }
            std::thread::sleep(self.poll_interval);
        }
        tracing::warn!(
            "进程 {} 在 {:?} 内未退出，清理阶段可能与其竞争",
            self.process_name,
            self.exit_wait
        );
    }

    fn launch(&self) {
        let Some((cmd, args)) = self.launch_command.split_first() else {
            return;
        };
        match Command::new(cmd).args(args).spawn() {
            Ok(_) => tracing::info!("已启动应用: {}", self.process_name),
            Err(e) => tracing::warn!("启动应用失败: {e}"),
        }
    }
}

/// 不做任何事的协调器（测试与无进程管理的场景）
pub struct NoopProcessControl;

impl ProcessControl for NoopProcessControl {
    fn terminate_and_wait(&self) {}
    fn launch(&self) {}
}
