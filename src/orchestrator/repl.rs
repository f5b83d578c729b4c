//! 终端交互循环 - 编排层
//!
//! 三个应用共用：逐行读取标准输入，交给各自的处理器，打印结果。
//! 以 `:` 开头的行是命令，其余是正文（答案、提问）。
//!
//! 一次操作失败只影响这一次：打印错误后继续读下一行。

use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

use crate::error::{AppResult, ValidationError};

/// 处理一行输入后的去向
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// 打印输出（可以为空）后继续
    Continue(String),
    /// 退出循环
    Quit,
}

impl Step {
    pub fn say(text: impl Into<String>) -> Self {
        Step::Continue(text.into())
    }
}

/// 一行输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// `:name arg...`
    Command { name: &'a str, arg: &'a str },
    /// 普通文本
    Text(&'a str),
}

/// 解析一行输入，命令名不含前导 `:`，参数去除首尾空白
pub fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.strip_prefix(':') {
        Some(rest) => {
            let (name, arg) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            Input::Command {
                name,
                arg: arg.trim(),
            }
        }
        None => Input::Text(trimmed),
    }
}

/// 解析数字参数
pub fn parse_number<T: FromStr>(arg: &str) -> Result<T, ValidationError> {
    arg.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber(arg.trim().to_string()))
}

/// 把 `a,b c` 形式的参数拆成列表
pub fn parse_list(arg: &str) -> Vec<&str> {
    arg.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 各应用的处理器
#[async_trait]
pub trait CommandHandler: Send {
    /// 输入提示符
    fn prompt(&self) -> String;

    /// 处理一行（已去除首尾空白，且非空）
    async fn handle_line(&mut self, line: &str) -> AppResult<Step>;
}

/// 运行交互循环，直到 `Quit` 或标准输入结束
pub async fn run<H: CommandHandler>(handler: &mut H, intro: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    if !intro.is_empty() {
        writeln!(stdout, "{}", intro)?;
    }

    loop {
        write!(stdout, "{}", handler.prompt())?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("标准输入结束");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handler.handle_line(line).await {
            Ok(Step::Continue(output)) => {
                if !output.is_empty() {
                    writeln!(stdout, "{}", output)?;
                }
            }
            Ok(Step::Quit) => break,
            Err(e) if e.is_user_facing() => writeln!(stdout, "⚠️ {}", e)?,
            Err(e) => {
                error!("❌ 操作失败: {}", e);
                writeln!(stdout, "❌ {}", e)?;
            }
        }
    }

    writeln!(stdout, "안녕히 가세요!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_with_argument() {
        assert_eq!(
            parse_input(":bank  3 "),
            Input::Command {
                name: "bank",
                arg: "3"
            }
        );
        assert_eq!(
            parse_input(":ask 제1조는 무엇인가요?"),
            Input::Command {
                name: "ask",
                arg: "제1조는 무엇인가요?"
            }
        );
    }

    #[test]
    fn test_parse_bare_command_and_text() {
        assert_eq!(
            parse_input(":next"),
            Input::Command {
                name: "next",
                arg: ""
            }
        );
        assert_eq!(parse_input("  대한민국은 민주공화국이다 "), Input::Text("대한민국은 민주공화국이다"));
    }

    #[test]
    fn test_parse_number_and_list() {
        assert_eq!(parse_number::<usize>(" 15 "), Ok(15));
        assert_eq!(
            parse_number::<usize>("열"),
            Err(ValidationError::InvalidNumber("열".to_string()))
        );
        assert_eq!(parse_list("풍경, 여행  거리"), vec!["풍경", "여행", "거리"]);
        assert!(parse_list(" , ").is_empty());
    }
}
