//! 相册应用 - 编排层
//!
//! 持有相册存储、当前筛选条件和添加表单草稿。
//! 每次显示都重新读取文档，不缓存相册内容。

use async_trait::async_trait;

use crate::error::{AppResult, ValidationError};
use crate::models::{Photo, PhotoDraft, PhotoType};
use crate::orchestrator::repl::{parse_input, parse_list, parse_number, CommandHandler, Input, Step};
use crate::services::photo_gallery::{distinct_types, distinct_years_desc, summary_line};
use crate::services::photo_repository::current_year;
use crate::services::{PhotoFilter, PhotoRepository};
use crate::utils::truncate_text;

/// 列表中链接的最大显示长度（data URL 很长）
const URL_PREVIEW_CHARS: usize = 60;

pub const PHOTO_HELP: &str = "\
🖼️ 사용 방법
  :list                    사진 목록 (현재 필터 적용)
  :filter types 풍경,여행  사진 종류로 필터 (하나라도 일치)
  :filter years 2023,2024  촬영 연도로 필터
  :filter clear            필터 해제
  :options                 필터에 쓸 수 있는 종류와 연도
  :name <이름>             새 사진 이름
  :types <종류1,종류2>     새 사진 종류 (최대 2개)
  :year <연도>             새 사진 촬영 연도
  :url <주소>              새 사진 주소
  :example                 예시 사진으로 채우기
  :draft                   입력 중인 사진 정보
  :add                     사진 추가
  :delete <ID>             사진 삭제
  :reset                   기본 사진으로 초기화
  :quit                    종료";

/// 相册应用
pub struct PhotoApp<R: PhotoRepository> {
    repo: R,
    filter: PhotoFilter,
    draft: PhotoDraft,
}

impl<R: PhotoRepository> PhotoApp<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            filter: PhotoFilter::default(),
            draft: PhotoDraft::blank(current_year()),
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn draft(&self) -> &PhotoDraft {
        &self.draft
    }

    pub fn filter(&self) -> &PhotoFilter {
        &self.filter
    }

    fn list(&self) -> AppResult<Step> {
        let album = self.repo.load()?;
        let shown = self.filter.apply(&album.photos);

        let mut lines: Vec<String> = shown.iter().map(|p| render_photo(p)).collect();
        if lines.is_empty() {
            lines.push("표시할 사진이 없습니다.".to_string());
        }
        lines.push(summary_line(album.photos.len(), shown.len()));
        Ok(Step::say(lines.join("\n")))
    }

    fn options(&self) -> AppResult<Step> {
        let album = self.repo.load()?;
        let types: Vec<&str> = distinct_types(&album.photos)
            .into_iter()
            .map(PhotoType::label)
            .collect();
        let years: Vec<String> = distinct_years_desc(&album.photos)
            .into_iter()
            .map(|y| y.to_string())
            .collect();
        Ok(Step::say(format!(
            "사진 종류: {}\n촬영 연도: {}",
            types.join(", "),
            years.join(", ")
        )))
    }

    fn set_filter(&mut self, arg: &str) -> AppResult<Step> {
        let (kind, values) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
        match kind {
            "clear" => self.filter = PhotoFilter::default(),
            "types" => self.filter.types = parse_types(values)?,
            "years" => {
                self.filter.years = parse_list(values)
                    .into_iter()
                    .map(parse_number::<i32>)
                    .collect::<Result<_, _>>()?;
            }
            other => {
                return Err(ValidationError::UnknownCommand(format!(":filter {}", other)).into())
            }
        }
        self.list()
    }

    fn add(&mut self) -> AppResult<Step> {
        let photo = self.repo.add(self.draft.clone())?;
        self.draft = PhotoDraft::blank(current_year());
        Ok(Step::say(format!("✅ 사진이 추가되었습니다.\n{}", render_photo(&photo))))
    }

    fn delete(&mut self, arg: &str) -> AppResult<Step> {
        let id: u64 = parse_number(arg)?;
        let message = if self.repo.delete(id)? {
            format!("🗑️ {}번 사진을 삭제했습니다.", id)
        } else {
            format!("{}번 사진이 없습니다.", id)
        };
        Ok(Step::say(message))
    }

    fn reset(&mut self) -> AppResult<Step> {
        self.repo.reset()?;
        self.filter = PhotoFilter::default();
        Ok(Step::say("🔄 기본 사진으로 초기화했습니다."))
    }
}

#[async_trait]
impl<R: PhotoRepository + Send> CommandHandler for PhotoApp<R> {
    fn prompt(&self) -> String {
        "사진 > ".to_string()
    }

    async fn handle_line(&mut self, line: &str) -> AppResult<Step> {
        let (name, arg) = match parse_input(line) {
            Input::Command { name, arg } => (name, arg),
            Input::Text(text) => return Err(ValidationError::UnknownCommand(text.to_string()).into()),
        };

        match name {
            "list" => self.list(),
            "options" => self.options(),
            "filter" => self.set_filter(arg),
            "name" => {
                self.draft.name = arg.to_string();
                Ok(Step::say(render_draft(&self.draft)))
            }
            "types" => {
                self.draft.types = parse_types(arg)?;
                Ok(Step::say(render_draft(&self.draft)))
            }
            "year" => {
                self.draft.year = parse_number(arg)?;
                Ok(Step::say(render_draft(&self.draft)))
            }
            "url" => {
                self.draft.url = arg.to_string();
                Ok(Step::say(render_draft(&self.draft)))
            }
            "example" => {
                self.draft = PhotoDraft::example(current_year());
                Ok(Step::say(render_draft(&self.draft)))
            }
            "draft" => Ok(Step::say(render_draft(&self.draft))),
            "add" => self.add(),
            "delete" => self.delete(arg),
            "reset" => self.reset(),
            "help" => Ok(Step::say(PHOTO_HELP)),
            "quit" | "exit" => Ok(Step::Quit),
            other => Err(ValidationError::UnknownCommand(format!(":{}", other)).into()),
        }
    }
}

/// 解析分类列表，遇到未知分类立即报错
fn parse_types(arg: &str) -> Result<Vec<PhotoType>, ValidationError> {
    parse_list(arg)
        .into_iter()
        .map(|s| PhotoType::from_label(s).ok_or_else(|| ValidationError::UnknownPhotoType(s.to_string())))
        .collect()
}

fn join_types(types: &[PhotoType]) -> String {
    types.iter().map(|t| t.label()).collect::<Vec<_>>().join(", ")
}

pub fn render_photo(photo: &Photo) -> String {
    format!(
        "#{} {} [{}] {}년 {}",
        photo.id,
        photo.name,
        join_types(&photo.types),
        photo.year,
        truncate_text(&photo.url, URL_PREVIEW_CHARS)
    )
}

pub fn render_draft(draft: &PhotoDraft) -> String {
    format!(
        "📝 새 사진\n- 이름: {}\n- 종류: {}\n- 연도: {}\n- 주소: {}",
        draft.name,
        join_types(&draft.types),
        draft.year,
        truncate_text(&draft.url, URL_PREVIEW_CHARS)
    )
}
