//! PDF 出题与评价应用 - 编排层
//!
//! ## 职责
//!
//! 1. **会话持有**：唯一持有 `ExamSession`，重置时整体重建
//! 2. **命令分发**：把终端命令映射到 `ExamFlow` 和会话操作
//! 3. **界面文字**：题目、进度、结果、题库的显示文本
//!
//! 不做业务判断，状态规则全部在会话里。

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::clients::LanguageModel;
use crate::config::Config;
use crate::error::{AppResult, SessionError, ValidationError};
use crate::models::{format_elapsed, Difficulty};
use crate::orchestrator::repl::{parse_input, parse_number, CommandHandler, Input, Step};
use crate::utils::log_section;
use crate::workflow::{export_problem_bank, ExamFlow, ExamSession, ExamSettings};

/// 自由提问记录显示的条数
const RECENT_CHAT_COUNT: usize = 3;

pub const EXAM_HELP: &str = "\
📚 사용 방법
  (일반 텍스트)        현재 문제의 답안에 이어서 입력
  :start [파일|URL]   문제 생성 (생략하면 처음 지정한 파일)
  :difficulty 하|중|상 난이도 선택 (문제 생성 전)
  :count 5|10|15|20   문제 개수 선택 (문제 생성 전)
  :show               현재 문제 보기
  :clear              현재 답안 지우기
  :hint               힌트 받기
  :submit             답안 제출 및 평가
  :next / :prev       다음 / 이전 문제
  :status             진행 상황
  :results            최종 결과 (모든 문제 평가 후)
  :bank [번호|next|prev] 문제 은행 복습
  :export [파일]      문제 은행을 JSON으로 저장
  :ask <질문>         무엇이든 물어보기
  :chats              최근 질문과 답변
  :restart            처음부터 다시 시작
  :quit               종료";

/// 出题应用
pub struct ExamApp {
    flow: ExamFlow,
    session: ExamSession,
    source: String,
    export_path: PathBuf,
}

impl ExamApp {
    /// # 参数
    /// - `source`: 默认的 PDF 路径或链接，`:start` 不带参数时使用
    pub fn new(llm: Arc<dyn LanguageModel>, config: &Config, source: impl Into<String>) -> Self {
        Self {
            flow: ExamFlow::new(llm, config),
            session: ExamSession::new(ExamSettings::from_config(config)),
            source: source.into(),
            export_path: PathBuf::from(&config.problem_bank_export_file),
        }
    }

    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    pub fn intro(&self) -> String {
        format!(
            "📄 PDF 기반 문제 생성 및 평가\n문서: {}\n{}\n\n:start 를 입력하면 문제를 생성합니다. (:help 도움말)",
            self.source,
            render_settings(&self.session)
        )
    }

    async fn start(&mut self, arg: &str) -> AppResult<Step> {
        if !arg.is_empty() {
            self.source = arg.to_string();
        }

        log_section(&format!("🎯 开始出题: {}", self.source));
        let count = self.flow.prepare(&mut self.session, &self.source).await?;
        if count == 0 {
            return Ok(Step::say(
                "문제를 생성하지 못했습니다. :restart 후 다른 파일로 다시 시도해주세요.",
            ));
        }

        Ok(Step::say(format!(
            "✅ {}개의 문제가 생성되었습니다.\n\n{}",
            count,
            render_question(&self.session)
        )))
    }

    fn append_answer(&mut self, text: &str) -> AppResult<Step> {
        let current = self
            .session
            .answer(self.session.current_index())
            .ok_or(SessionError::NotReady)?;
        let updated = if current.is_empty() {
            text.to_string()
        } else {
            format!("{}\n{}", current, text)
        };
        self.session.update_answer(updated)?;
        Ok(Step::say(""))
    }

    async fn submit(&mut self) -> AppResult<Step> {
        let evaluation = self.flow.submit(&mut self.session).await?;
        let index = self.session.current_index();

        let next = if self.session.all_evaluated() {
            "🎉 모든 문제의 평가가 끝났습니다. :results 로 결과를 확인하세요."
        } else if self.session.can_advance() {
            "다음 문제로 가려면 :next 를 입력하세요."
        } else {
            ""
        };

        Ok(Step::say(format!(
            "🤖 AI 평가\n{}\n\n⏱️ 소요 시간: {}\n{}",
            evaluation,
            format_elapsed(self.session.elapsed_secs(index).unwrap_or(0.0)),
            next
        )))
    }

    fn bank(&mut self, arg: &str) -> AppResult<Step> {
        if self.session.problem_bank().is_empty() {
            return Ok(Step::say("문제 은행이 비어 있습니다."));
        }

        match arg {
            "" => {}
            "next" => {
                self.session.bank_next();
            }
            "prev" => {
                self.session.bank_prev();
            }
            n => {
                self.session.bank_jump(parse_number(n)?);
            }
        }

        Ok(Step::say(render_bank_entry(&self.session)))
    }

    fn export(&mut self, arg: &str) -> AppResult<Step> {
        let path = if arg.is_empty() {
            self.export_path.clone()
        } else {
            PathBuf::from(arg)
        };
        let count = export_problem_bank(&self.session, &path)?;
        Ok(Step::say(format!(
            "💾 문제 {}개를 {} 에 저장했습니다.",
            count,
            path.display()
        )))
    }

    async fn ask(&mut self, question: &str) -> AppResult<Step> {
        let answer = self.flow.ask(&mut self.session, question).await?;
        Ok(Step::say(format!("💬 {}", answer)))
    }

    fn restart(&mut self) -> Step {
        self.session.reset();
        info!("🔄 考试会话已重置");
        Step::say(format!(
            "🔄 처음부터 다시 시작합니다.\n{}",
            render_settings(&self.session)
        ))
    }
}

#[async_trait]
impl CommandHandler for ExamApp {
    fn prompt(&self) -> String {
        if self.session.is_ready() && !self.session.is_empty() {
            format!(
                "[{}/{}] > ",
                self.session.current_index() + 1,
                self.session.len()
            )
        } else {
            "시험 준비 > ".to_string()
        }
    }

    async fn handle_line(&mut self, line: &str) -> AppResult<Step> {
        let (name, arg) = match parse_input(line) {
            Input::Text(text) => return self.append_answer(text),
            Input::Command { name, arg } => (name, arg),
        };

        match name {
            "start" => self.start(arg).await,
            "difficulty" => {
                let difficulty: Difficulty = arg.parse()?;
                self.session.set_difficulty(difficulty)?;
                Ok(Step::say(render_settings(&self.session)))
            }
            "count" => {
                self.session.set_num_questions(parse_number(arg)?)?;
                Ok(Step::say(render_settings(&self.session)))
            }
            "show" => Ok(Step::say(render_question(&self.session))),
            "clear" => {
                self.session.update_answer(String::new())?;
                Ok(Step::say("답안을 지웠습니다."))
            }
            "hint" => {
                let hint = self.flow.hint(&self.session).await?;
                Ok(Step::say(format!("💡 힌트\n{}", hint)))
            }
            "submit" => self.submit().await,
            "next" => {
                self.session.advance()?;
                Ok(Step::say(render_question(&self.session)))
            }
            "prev" => {
                self.session.retreat()?;
                Ok(Step::say(render_question(&self.session)))
            }
            "status" => Ok(Step::say(render_status(&self.session))),
            "results" => {
                self.session.show_results()?;
                Ok(Step::say(render_results(&self.session)))
            }
            "bank" => self.bank(arg),
            "export" => self.export(arg),
            "ask" => self.ask(arg).await,
            "chats" => Ok(Step::say(render_recent_chats(&self.session))),
            "restart" => Ok(self.restart()),
            "help" => Ok(Step::say(EXAM_HELP)),
            "quit" | "exit" => Ok(Step::Quit),
            other => Err(ValidationError::UnknownCommand(format!(":{}", other)).into()),
        }
    }
}

// ========== 显示文字 ==========

pub fn render_settings(session: &ExamSession) -> String {
    let settings = session.settings();
    format!(
        "⚙️ 난이도: {} ({}) / 문제 개수: {}",
        settings.difficulty,
        settings.difficulty.description(),
        settings.num_questions
    )
}

pub fn render_question(session: &ExamSession) -> String {
    let index = session.current_index();
    let Some(question) = session.current_question() else {
        return "아직 문제가 생성되지 않았습니다.".to_string();
    };

    let answer = session.answer(index).unwrap_or_default();
    let mut out = format!(
        "📝 문제 {}/{} (난이도: {})\n{}\n\n✍️ 내 답: {}",
        index + 1,
        session.len(),
        session.settings().difficulty,
        question,
        if answer.trim().is_empty() {
            "(미입력)"
        } else {
            answer
        }
    );

    if let Some(evaluation) = session.evaluation(index) {
        out.push_str(&format!(
            "\n\n🤖 AI 평가\n{}\n⏱️ 소요 시간: {}",
            evaluation,
            format_elapsed(session.elapsed_secs(index).unwrap_or(0.0))
        ));
    }
    out
}

pub fn render_status(session: &ExamSession) -> String {
    let progress = session.progress();
    format!(
        "📊 진행 상황\n- 평가 완료: {}/{}\n- 답변 작성: {}/{}\n- 진행률: {:.0}%\n{}",
        progress.evaluated,
        progress.total,
        progress.answered,
        progress.total,
        progress.ratio() * 100.0,
        render_settings(session)
    )
}

pub fn render_results(session: &ExamSession) -> String {
    let summary = session.summary();
    let mut out = format!(
        "🏁 최종 결과\n- 총 문제 수: {}\n- 답변한 문제: {}\n- 총 소요 시간: {}분",
        summary.total_questions,
        summary.answered,
        summary.total_minutes()
    );

    for (i, question) in session.questions().iter().enumerate() {
        out.push_str(&format!(
            "\n\n[문제 {}] {}\n내 답: {}\n소요 시간: {}\n{}",
            i + 1,
            question,
            session.answer(i).unwrap_or_default(),
            format_elapsed(session.elapsed_secs(i).unwrap_or(0.0)),
            session.evaluation(i).unwrap_or_default()
        ));
    }
    out
}

pub fn render_bank_entry(session: &ExamSession) -> String {
    match session.current_bank_entry() {
        Some((number, entry)) => format!(
            "📚 문제 은행 {}/{}\n문제: {}\n내 답: {}\nAI 평가:\n{}",
            number,
            session.problem_bank().len(),
            entry.question,
            entry.answer,
            entry.evaluation
        ),
        None => "문제 은행이 비어 있습니다.".to_string(),
    }
}

pub fn render_recent_chats(session: &ExamSession) -> String {
    let chats = session.recent_chats(RECENT_CHAT_COUNT);
    if chats.is_empty() {
        return "아직 질문이 없습니다. :ask <질문> 으로 물어보세요.".to_string();
    }

    chats
        .iter()
        .map(|c| format!("Q: {}\nA: {}", c.question, c.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}
