//! 集成测试共用的假模型和 PDF 构造工具

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use classroom_ai::clients::LanguageModel;
use classroom_ai::error::{AppResult, LlmError};
use classroom_ai::models::ChatRequest;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// 按顺序返回预设回复的假模型
///
/// - 回复为 `None` 时模拟一次调用失败
/// - 嵌入向量按关键词命中情况生成，便于控制检索结果
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
    keywords: Vec<String>,
    embed_inputs: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(Into::into)).collect()),
            requests: Mutex::new(Vec::new()),
            keywords: Vec::new(),
            embed_inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn push_reply(&self, reply: Option<&str>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(reply.map(str::to_string));
    }

    /// 已收到的聊天请求
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// 已收到的嵌入输入
    pub fn embed_inputs(&self) -> Vec<String> {
        self.embed_inputs.lock().unwrap().clone()
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut v: Vec<f32> = self
            .keywords
            .iter()
            .map(|k| if text.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect();
        // 避免零向量
        v.push(0.01);
        v
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest) -> AppResult<String> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front().flatten() {
            Some(reply) => Ok(reply),
            None => Err(LlmError::EmptyResponse { model }.into()),
        }
    }

    async fn embed(&self, _model: &str, inputs: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.embed_inputs
            .lock()
            .unwrap()
            .extend(inputs.iter().cloned());
        Ok(inputs.iter().map(|i| self.vector_for(i)).collect())
    }
}

/// 构造每页一段 ASCII 文字的 PDF
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// 把 PDF 写入临时目录，返回路径字符串
pub fn write_pdf(dir: &std::path::Path, name: &str, pages: &[&str]) -> String {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path.display().to_string()
}
