/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// 日志句柄，配置加载后用来调整级别
pub struct LogHandle {
    reload: Option<reload::Handle<EnvFilter, Registry>>,
    /// 设置了 `RUST_LOG` 时以环境变量为准
    from_env: bool,
}

/// 默认过滤规则
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("classroom_ai={}", level)
}

/// 初始化全局日志
///
/// 在加载配置之前调用，先使用 `RUST_LOG` 或 info 级别。
/// 日志写到 stderr，不与终端交互输出混在一起。
/// 重复调用不会报错（测试中可能被多次调用）。
pub fn init() -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_directive(false)), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .is_ok();

    LogHandle {
        reload: installed.then_some(handle),
        from_env,
    }
}

impl LogHandle {
    /// 按配置切换 debug / info 级别
    pub fn apply_verbosity(&self, verbose: bool) {
        if self.from_env {
            return;
        }
        let Some(handle) = &self.reload else {
            return;
        };
        if let Err(e) = handle.reload(EnvFilter::new(default_directive(verbose))) {
            warn!("⚠️ 日志级别切换失败: {}", e);
        }
    }

    /// 本次调用是否安装了全局日志
    pub fn is_installed(&self) -> bool {
        self.reload.is_some()
    }
}

/// 记录程序启动信息
///
/// # 参数
/// - `app_name`: 应用名称
/// - `model`: 使用的模型（相册应用为 `None`）
pub fn log_startup(app_name: &str, model: Option<&str>) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", app_name);
    if let Some(model) = model {
        info!("🤖 使用模型: {}", model);
    }
    info!(
        "🕒 启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段分隔
pub fn log_section(title: &str) {
    info!("\n{}", "─".repeat(60));
    info!("{}", title);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "classroom_ai=info");
        assert_eq!(default_directive(true), "classroom_ai=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let first = init();
        let second = init();
        // 全局日志只能安装一次
        assert!(!(first.is_installed() && second.is_installed()));
        first.apply_verbosity(true);
        second.apply_verbosity(false);
        tracing::debug!("日志初始化测试");
    }

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("대한민국헌법", 4), "대한민국...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
