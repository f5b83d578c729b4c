use classroom_ai::error::{AppError, ValidationError};
use classroom_ai::models::{PhotoDraft, PhotoType};
use classroom_ai::orchestrator::{CommandHandler, PhotoApp, Step};
use classroom_ai::services::photo_repository::{current_year, default_album};
use classroom_ai::services::{JsonPhotoRepository, PhotoRepository};

fn repo_in(dir: &tempfile::TempDir) -> JsonPhotoRepository {
    JsonPhotoRepository::new(dir.path().join("photos.json"))
}

fn draft(name: &str, types: Vec<PhotoType>, url: &str) -> PhotoDraft {
    PhotoDraft {
        name: name.to_string(),
        types,
        year: 2023,
        url: url.to_string(),
    }
}

#[test]
fn test_missing_file_loads_defaults_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    let album = repo.load().unwrap();
    assert_eq!(album, default_album().unwrap());
    assert!(!repo.path().exists());
}

#[test]
fn test_add_assigns_next_id_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    let photo = repo
        .add(draft(" 제주 바다 ", vec![PhotoType::Travel, PhotoType::Landscape], "http://img/1"))
        .unwrap();
    assert_eq!(photo.id, 5);
    assert_eq!(photo.name, "제주 바다");

    let album = repo.load().unwrap();
    assert_eq!(album.photos.len(), 5);
    assert_eq!(album.photos.last(), Some(&photo));

    let second = repo
        .add(draft("골목", vec![PhotoType::Street], "http://img/2"))
        .unwrap();
    assert_eq!(second.id, 6);
}

#[test]
fn test_invalid_add_does_not_touch_document() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.add(draft("첫 사진", vec![PhotoType::Food], "http://img/1"))
        .unwrap();
    let before = std::fs::read_to_string(repo.path()).unwrap();

    for bad in [
        draft("", vec![PhotoType::Food], "http://img"),
        draft("이름", vec![], "http://img"),
        draft("이름", vec![PhotoType::Food], ""),
    ] {
        let err = repo.add(bad).unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingPhotoFields)
        ));
        assert_eq!(err.to_string(), "모든 필드를 채워주세요.");
    }

    let too_many = draft(
        "이름",
        vec![PhotoType::Food, PhotoType::Street, PhotoType::Sports],
        "http://img",
    );
    assert!(repo.add(too_many).is_err());

    assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), before);
}

#[test]
fn test_invalid_add_on_fresh_album_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    assert!(repo.add(draft("", vec![], "")).is_err());
    assert!(!repo.path().exists());
}

#[test]
fn test_delete_keeps_order_of_others() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);

    assert!(repo.delete(2).unwrap());
    let ids: Vec<u64> = repo.load().unwrap().photos.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);

    // 不存在的 ID 不做修改
    let before = std::fs::read_to_string(repo.path()).unwrap();
    assert!(!repo.delete(42).unwrap());
    assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), before);

    // ID 取最大值 + 1，而不是填补空缺
    let photo = repo
        .add(draft("새 사진", vec![PhotoType::Other], "http://img"))
        .unwrap();
    assert_eq!(photo.id, 5);
}

#[test]
fn test_reset_restores_default_set() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo_in(&dir);
    repo.delete(1).unwrap();
    repo.delete(3).unwrap();

    repo.reset().unwrap();
    assert!(!repo.path().exists());
    assert_eq!(repo.load().unwrap(), default_album().unwrap());

    // 没有文件时重置也不报错
    repo.reset().unwrap();
}

fn say(step: Step) -> String {
    match step {
        Step::Continue(text) => text,
        Step::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn test_photo_app_commands() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = PhotoApp::new(repo_in(&dir));

    let listed = say(app.handle_line(":list").await.unwrap());
    assert!(listed.ends_with("총 4 장의 사진이 있습니다. 현재 4 장이 표시되고 있습니다."));

    let filtered = say(app.handle_line(":filter types 접사").await.unwrap());
    assert!(filtered.contains("꽃 클로즈업"));
    assert!(filtered.ends_with("현재 1 장이 표시되고 있습니다."));
    say(app.handle_line(":filter clear").await.unwrap());
    assert!(app.filter().types.is_empty());

    // 表单不完整时不保存
    say(app.handle_line(":name 빈 사진").await.unwrap());
    assert!(app.handle_line(":add").await.is_err());
    assert_eq!(app.repo().load().unwrap().photos.len(), 4);

    say(app.handle_line(":example").await.unwrap());
    assert_eq!(app.draft().year, current_year());
    let added = say(app.handle_line(":add").await.unwrap());
    assert!(added.contains("#5 아름다운 자연 풍경 [풍경]"));
    assert!(app.draft().name.is_empty());

    let deleted = say(app.handle_line(":delete 5").await.unwrap());
    assert!(deleted.contains("5번 사진을 삭제했습니다"));
    assert!(app.handle_line(":delete abc").await.is_err());
    assert!(app.handle_line(":types 우주").await.is_err());

    say(app.handle_line(":reset").await.unwrap());
    assert!(!app.repo().path().exists());
    assert_eq!(app.handle_line(":quit").await.unwrap(), Step::Quit);
}
