mod common;

use common::{MockBackend, PASSWORD, USER};
use std::sync::Arc;
use std::time::Duration;
use texton_core::api::{AppConfig, AppContext, MemoryStore, SaveStatus};

async fn signed_in(backend: Arc<MockBackend>) -> AppContext {
    let ctx = AppContext::new(AppConfig::default(), Arc::new(MemoryStore::new()), backend);
    ctx.auth().login(USER, PASSWORD, None).await.unwrap();
    ctx
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn typing_burst_is_saved_once_after_the_delay() {
    let backend = Arc::new(MockBackend::new(false));
    let id = backend.add_file("draft.txt", "hello");
    let ctx = signed_in(backend.clone()).await;
    let tasks = ctx.start_background();

    ctx.files().open(id).await.unwrap();
    settle().await;
    for text in ["hello ", "hello w", "hello wo", "hello world"] {
        ctx.editor().set_editor_content(text).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(ctx.editor().save_status().await, SaveStatus::Unsaved);
    assert!(backend.saves().is_empty());

    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(backend.saves(), vec![(id, "hello world".to_string())]);
    assert_eq!(ctx.editor().save_status().await, SaveStatus::Saved);
    tasks.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn switching_files_drops_the_pending_edit() {
    let backend = Arc::new(MockBackend::new(false));
    let a = backend.add_file("a.txt", "aaa");
    let b = backend.add_file("b.txt", "bbb");
    let ctx = signed_in(backend.clone()).await;
    let tasks = ctx.start_background();

    ctx.files().open(a).await.unwrap();
    settle().await;
    ctx.editor().set_editor_content("aaa!").await;
    settle().await;
    ctx.files().open(b).await.unwrap();
    settle().await;
    assert_eq!(ctx.editor().editor_content().await, "bbb");

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(backend.saves().is_empty());
    assert_eq!(backend.content(a).as_deref(), Some("aaa"));
    assert_eq!(ctx.editor().save_status().await, SaveStatus::Saved);
    tasks.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn manual_save_with_autosave_disabled() {
    let backend = Arc::new(MockBackend::new(false));
    let id = backend.add_file("a.txt", "one");
    let ctx = signed_in(backend.clone()).await;
    ctx.settings().update(|s| s.auto_save = false).await;
    let tasks = ctx.start_background();

    ctx.files().open(id).await.unwrap();
    settle().await;
    ctx.editor().set_editor_content("two").await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(backend.saves().is_empty());
    assert_eq!(ctx.editor().save_status().await, SaveStatus::Unsaved);

    tasks.autosave.save_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(backend.content(id).as_deref(), Some("two"));
    assert_eq!(ctx.editor().save_status().await, SaveStatus::Saved);
    tasks.shutdown().await;
}
