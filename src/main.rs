use std::sync::Arc;

use anyhow::Result;
use classroom_ai::clients::{LanguageModel, OpenAiClient};
use classroom_ai::config::Config;
use classroom_ai::orchestrator::{self, ConstitutionApp, ExamApp, PhotoApp};
use classroom_ai::services::JsonPhotoRepository;
use classroom_ai::utils::{logging, log_startup};

const USAGE: &str = "\
사용법:
  classroom_ai exam <PDF 파일 또는 URL>   PDF 기반 문제 생성 및 평가
  classroom_ai photos                     사진 앨범
  classroom_ai constitution [모델]        헌법 Q&A 챗봇 (gpt-4o-mini | gpt-3.5-turbo-0125)";

#[tokio::main]
async fn main() -> Result<()> {
    // 先初始化日志，配置加载过程的输出也能看到
    let log = logging::init();

    // 加载配置
    let config = Config::load()?;
    log.apply_verbosity(config.verbose_logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("exam") => {
            let Some(source) = args.get(1) else {
                exit_with_usage();
            };
            log_startup("PDF 出题与评价", Some(&config.exam_model));
            let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(&config)?);
            let mut app = ExamApp::new(llm, &config, source.as_str());
            let intro = app.intro();
            orchestrator::run(&mut app, &intro).await?;
        }
        Some("photos") => {
            log_startup("相册", None);
            let mut app = PhotoApp::new(JsonPhotoRepository::new(&config.photos_file));
            orchestrator::run(&mut app, "🖼️ 사진 앨범 (:help 도움말, :list 목록)").await?;
        }
        Some("constitution") => {
            let model = config.select_rag_model(args.get(1).map(String::as_str))?;
            log_startup("宪法问答", Some(&model));
            let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(&config)?);
            let mut app = ConstitutionApp::initialize(llm, &config, &model).await?;
            let intro = app.intro();
            orchestrator::run(&mut app, &intro).await?;
        }
        _ => exit_with_usage(),
    }

    Ok(())
}

fn exit_with_usage() -> ! {
    eprintln!("{}", USAGE);
    std::process::exit(2);
}
