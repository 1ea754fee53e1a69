//! Content and admin flows against a file-backed local store.

use std::sync::Arc;

use breathship::{
    defaults, AdminConsole, AdminGate, ContentResolver, LocalStore, RefreshBus, SessionStore,
    Testimonial,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Arc<LocalStore> {
    Arc::new(LocalStore::open(dir.path().join("store.db")).unwrap())
}

#[tokio::test]
async fn test_update_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut resolver = ContentResolver::new(open(&dir), RefreshBus::default());
        resolver.resolve().await;
        let outcome = resolver.update("hero_text", "Breathe with us").await;
        assert!(outcome.success, "{:?}", outcome.message);
        assert_eq!(resolver.text("hero_text"), "Breathe with us");
    }

    let mut reopened = ContentResolver::new(open(&dir), RefreshBus::default());
    let view = reopened.resolve().await;
    assert_eq!(view.content["hero_text"], "Breathe with us");
    assert!(view.error.is_none());
}

#[tokio::test]
async fn test_update_refreshes_other_resolvers() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);
    let bus = RefreshBus::default();

    let mut editor = ContentResolver::new(source.clone(), bus.clone());
    let mut page = ContentResolver::new(source, bus);
    editor.resolve().await;
    page.resolve().await;
    let before = page.fingerprint();

    assert!(editor.update("main_quote", "Slow is smooth").await.success);

    assert!(page.apply_pending_refreshes().await);
    assert_eq!(page.text("main_quote"), "Slow is smooth");
    assert_ne!(page.fingerprint(), before);
    assert!(!page.apply_pending_refreshes().await);
}

#[tokio::test]
async fn test_export_then_import_restores_values() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);
    let bus = RefreshBus::default();
    let mut resolver = ContentResolver::new(source, bus);
    resolver.resolve().await;

    resolver.update("hero_text", "Exported value").await;
    let path = resolver
        .export_to(Some(&dir.path().join("content.json")))
        .await
        .unwrap();
    let snapshot = std::fs::read_to_string(&path).unwrap();

    resolver.update("hero_text", "Changed later").await;
    let report = resolver.import_snapshot(&snapshot).await.unwrap();

    assert_eq!(report.applied, defaults::content_fields().len());
    assert_eq!(report.skipped, 0);
    assert_eq!(resolver.text("hero_text"), "Exported value");
}

#[tokio::test]
async fn test_import_rejects_non_array() {
    let dir = TempDir::new().unwrap();
    let mut resolver = ContentResolver::new(open(&dir), RefreshBus::default());
    let err = resolver.import_snapshot("{\"hero_text\": 1}").await.unwrap_err();
    assert!(err.to_string().contains("import"));
}

#[tokio::test]
async fn test_admin_console_edits_visible_to_stores() {
    let dir = TempDir::new().unwrap();
    let source = open(&dir);
    let bus = RefreshBus::default();

    let mut console = AdminConsole::new(source.clone(), bus, AdminGate::new("4321"));
    assert!(!console.unlock("0000").is_success());
    assert!(console.unlock("4321").is_success());

    let draft = Testimonial {
        name: "Priya".to_string(),
        text: "I sleep better than I have in years.".to_string(),
        is_featured: true,
        ..Testimonial::default()
    };
    assert!(console.create_testimonial(&draft).await.is_success());
    assert!(console.delete_session("1").await.is_success());

    let mut sessions = SessionStore::new(source);
    let remaining = sessions.load().await;
    assert_eq!(remaining.len(), defaults::sessions().len() - 1);
    assert!(remaining.iter().all(|s| s.id != "1"));

    let testimonials = console.testimonials().await;
    assert_eq!(testimonials.len(), defaults::testimonials().len() + 1);
    assert!(testimonials.iter().any(|t| t.name == "Priya"));
}
