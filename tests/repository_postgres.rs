//! Postgres repository tests. Run with `DATABASE_URL` set and `--ignored`.

use chrono::{Duration, Utc};
use linkhub::application::services::{CreateShortLink, LinkService};
use linkhub::domain::click_event::ClickTarget;
use linkhub::domain::clock::{Clock, SystemClock};
use linkhub::domain::entities::{
    ListPagePatch, NewListItem, NewListPage, NewShortLink, ShortLinkPatch,
};
use linkhub::domain::repositories::{
    AnalyticsRepository, ClickRepository, LinkRepository, ListRepository,
};
use linkhub::infrastructure::persistence::{
    PgAnalyticsRepository, PgClickRepository, PgLinkRepository, PgListRepository,
};
use sqlx::PgPool;
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

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_by_either_name(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link("abc123", Some("nextjs"))).await.unwrap();

    assert_eq!(link.click_count, 0);
    assert!(link.active);
    let by_code = repo.find_by_code_or_alias("abc123").await.unwrap().unwrap();
    let by_alias = repo.find_by_code_or_alias("nextjs").await.unwrap().unwrap();
    assert_eq!(by_code.id, link.id);
    assert_eq!(by_alias.id, link.id);
    assert!(repo.find_by_code_or_alias("other").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_alias_cannot_reuse_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("abc123", None)).await.unwrap();

    let err = repo
        .create(new_link("zzz999", Some("abc123")))
        .await
        .unwrap_err();

    assert!(err.is_conflict_on("alias"));
    assert!(!repo.name_exists("zzz999").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_code_conflicts_on_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.create(new_link("abc123", None)).await.unwrap();

    let err = repo.create(new_link("abc123", None)).await.unwrap_err();

    assert!(err.is_conflict_on("code"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_and_delete(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.create(new_link("abc123", Some("promo"))).await.unwrap();

    let updated = repo
        .update(
            link.id,
            ShortLinkPatch {
                active: Some(false),
                description: Some(Some("paused".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.active);
    assert_eq!(updated.description.as_deref(), Some("paused"));
    assert_eq!(updated.target_url, "https://example.com");

    let deleted = repo.delete(link.id).await.unwrap();
    assert!(deleted.is_some());
    assert!(!repo.name_exists("promo").await.unwrap());
    assert!(repo.delete(link.id).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_items_append_in_order(pool: PgPool) {
    let repo = PgListRepository::new(Arc::new(pool));
    let page = repo
        .create_page(NewListPage {
            title: "Creator".to_string(),
            slug: "creator".to_string(),
            description: None,
        })
        .await
        .unwrap();

    for title in ["Blog", "Shop", "Podcast"] {
        repo.add_item(NewListItem {
            list_page_id: page.id,
            title: title.to_string(),
            target_url: "https://example.com".to_string(),
            visible: true,
        })
        .await
        .unwrap();
    }

    let items = repo.list_items(page.id).await.unwrap();
    let positions: Vec<i32> = items.iter().map(|i| i.position).collect();
    assert_eq!(positions, [0, 1, 2]);
    assert_eq!(items[1].title, "Shop");

    assert!(repo.delete_page(page.id).await.unwrap());
    assert!(repo.list_items(page.id).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_add_item_to_missing_page(pool: PgPool) {
    let repo = PgListRepository::new(Arc::new(pool));

    let err = repo
        .add_item(NewListItem {
            list_page_id: 404,
            title: "Blog".to_string(),
            target_url: "https://example.com".to_string(),
            visible: true,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_click_and_analytics(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool.clone());
    let analytics = PgAnalyticsRepository::new(pool.clone());

    let hot = links.create(new_link("hot111", None)).await.unwrap();
    let cold = links.create(new_link("cold22", None)).await.unwrap();
    let now = Utc::now();

    for _ in 0..3 {
        assert!(
            clicks
                .record_click(ClickTarget::ShortLink(hot.id), now)
                .await
                .unwrap()
        );
    }
    clicks
        .record_click(ClickTarget::ShortLink(cold.id), now - Duration::days(1))
        .await
        .unwrap();
    assert!(
        !clicks
            .record_click(ClickTarget::ShortLink(9_999), now)
            .await
            .unwrap()
    );

    let overview = analytics.overview().await.unwrap();
    assert_eq!(overview.total_short_links, 2);
    assert_eq!(overview.short_link_clicks, 4);

    let daily = analytics
        .daily_clicks(now - Duration::days(2), now)
        .await
        .unwrap();
    assert_eq!(daily.iter().map(|d| d.count).sum::<i64>(), 4);

    let top = analytics.top_short_links(1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, hot.id);
    assert_eq!(top[0].click_count, 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_alias_claims_have_one_winner(pool: PgPool) {
    const CONTENDERS: usize = 8;

    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = Arc::new(LinkService::new(repo.clone(), clock));
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = service.clone();
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
            Ok(_) => winners += 1,
            Err(e) => assert!(e.is_conflict_on("alias"), "unexpected error: {e:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_tags_persist_and_replace(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let mut input = new_link("abc123", None);
    input.tags = vec!["dev".to_string(), "github".to_string()];

    let link = repo.create(input).await.unwrap();
    assert_eq!(link.tags, vec!["dev", "github"]);

    let updated = repo
        .update(link.id, ShortLinkPatch { active: Some(false), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.tags, vec!["dev", "github"]);

    let updated = repo
        .update(link.id, ShortLinkPatch { tags: Some(Vec::new()), ..Default::default() })
        .await
        .unwrap();
    assert!(updated.tags.is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_pages_and_update_page(pool: PgPool) {
    let repo = PgListRepository::new(Arc::new(pool));
    let first = repo
        .create_page(NewListPage {
            title: "First".to_string(),
            slug: "first".to_string(),
            description: Some("hello".to_string()),
        })
        .await
        .unwrap();
    repo.add_item(NewListItem {
        list_page_id: first.id,
        title: "Blog".to_string(),
        target_url: "https://blog.example".to_string(),
        visible: true,
    })
    .await
    .unwrap();
    let second = repo
        .create_page(NewListPage {
            title: "Second".to_string(),
            slug: "second".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let pages = repo.list_pages(0, 10).await.unwrap();
    let summary: Vec<(i64, i64)> = pages.iter().map(|s| (s.page.id, s.item_count)).collect();
    assert_eq!(summary, vec![(second.id, 0), (first.id, 1)]);
    assert_eq!(repo.count_pages().await.unwrap(), 2);

    let err = repo
        .update_page(first.id, ListPagePatch { slug: Some("second".to_string()), ..Default::default() })
        .await
        .unwrap_err();
    assert!(err.is_conflict_on("slug"));

    let updated = repo
        .update_page(
            first.id,
            ListPagePatch {
                slug: Some("renamed".to_string()),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.slug, "renamed");
    assert_eq!(updated.title, "First");
    assert!(updated.description.is_none());

    assert!(repo
        .update_page(9999, ListPagePatch::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_click_history_outlives_deleted_link(pool: PgPool) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(pool.clone());
    let clicks = PgClickRepository::new(pool.clone());
    let analytics = PgAnalyticsRepository::new(pool);

    let link = links.create(new_link("abc123", None)).await.unwrap();
    let now = Utc::now();
    assert!(clicks.record_click(ClickTarget::ShortLink(link.id), now).await.unwrap());
    links.delete(link.id).await.unwrap();

    let days = analytics
        .daily_clicks(now - Duration::days(1), now + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(days.iter().map(|d| d.count).sum::<i64>(), 1);
    assert!(!clicks.record_click(ClickTarget::ShortLink(link.id), now).await.unwrap());
}
