mod common;

use linkhub::application::services::{CodeGenerator, CreateShortLink};
use linkhub::domain::entities::NewShortLink;
use linkhub::domain::repositories::LinkRepository;
use linkhub::utils::code_generator::ALPHABET;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Barrier;

fn new_link(code: &str, alias: Option<&str>) -> NewShortLink {
    NewShortLink {
        code: code.to_string(),
        alias: alias.map(str::to_string),
        target_url: "https://example.com".to_string(),
        description: None,
        tags: Vec::new(),
        expires_at: None,
    }
}

#[tokio::test]
async fn test_generated_codes_avoid_taken_names() {
    let ctx = common::create_test_context();
    ctx.store
        .create(new_link("abc123", Some("nextjs")))
        .await
        .unwrap();

    let generator = CodeGenerator::new(ctx.store.clone());

    for _ in 0..100 {
        let code = generator.generate(6).await.unwrap();
        assert_ne!(code, "abc123");
        assert_ne!(code, "nextjs");
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
    }
}

#[tokio::test]
async fn test_created_links_never_share_names() {
    let ctx = common::create_test_context();
    let mut names = HashSet::new();

    for i in 0..200 {
        let link =
            common::create_test_link(&ctx.state, &format!("https://example.com/{i}"), None).await;
        assert!(names.insert(link.code));
    }

    assert_eq!(ctx.state.link_service.count_links().await.unwrap(), 200);
}

#[tokio::test]
async fn test_code_and_alias_share_namespace() {
    let ctx = common::create_test_context();
    ctx.store.create(new_link("abc123", None)).await.unwrap();

    let err = ctx
        .store
        .create(new_link("zzz999", Some("abc123")))
        .await
        .unwrap_err();
    assert!(err.is_conflict_on("alias"));

    // The failed insert left no trace of its code.
    assert!(!ctx.store.name_exists("zzz999").await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_alias_claims_have_one_winner() {
    const CONTENDERS: usize = 16;

    let ctx = common::create_test_context();
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = ctx.state.link_service.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                service
                    .create_short_link(CreateShortLink {
                        target_url: format!("https://example.com/{i}"),
                        alias: Some("launch".to_string()),
                        ..Default::default()
                    })
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                winners += 1;
                assert_eq!(link.alias.as_deref(), Some("launch"));
            }
            Err(e) => assert!(e.is_conflict_on("alias"), "unexpected error: {e:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(ctx.state.link_service.count_links().await.unwrap(), 1);
}
