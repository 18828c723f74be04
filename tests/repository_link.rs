//! PostgreSQL link repository tests. Need `DATABASE_URL`; run with `--ignored`.

use chrono::{NaiveDate, TimeZone, Utc};
use linkstat::domain::entities::{BrowserName, ClickSample, DeviceClass, NewShortLink};
use linkstat::domain::repositories::LinkRepository;
use linkstat::error::AppError;
use linkstat::infrastructure::persistence::PgLinkRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(code: &str, owner: &str) -> NewShortLink {
    NewShortLink {
        short_code: code.to_string(),
        original_url: "https://example.com".to_string(),
        owner_id: owner.to_string(),
        expiration_date: None,
    }
}

fn sample(device: DeviceClass, browser: BrowserName) -> ClickSample {
    ClickSample {
        at: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        device,
        browser,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(NewShortLink {
            expiration_date: NaiveDate::from_ymd_opt(2030, 1, 31),
            ..new_link("test123", "alice")
        })
        .await
        .unwrap();

    assert_eq!(link.short_code, "test123");
    assert_eq!(link.owner_id, "alice");
    assert_eq!(link.clicks, 0);
    assert_eq!(link.expiration_date, NaiveDate::from_ymd_opt(2030, 1, 31));
    assert!(link.analytics.timestamps.is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup", "alice")).await.unwrap();
    let result = repo.insert(new_link("dup", "bob")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
    assert_eq!(repo.find_by_code("dup").await.unwrap().unwrap().owner_id, "alice");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_code("notfound").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_click_updates_analytics(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let link = repo.insert(new_link("clicks", "alice")).await.unwrap();

    repo.record_click(link.id, &sample(DeviceClass::Mobile, BrowserName::Chrome))
        .await
        .unwrap();
    let updated = repo
        .record_click(link.id, &sample(DeviceClass::Desktop, BrowserName::InternetExplorer))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.clicks, 2);
    assert_eq!(updated.analytics.timestamps.len(), 2);
    assert_eq!(updated.analytics.devices[&DeviceClass::Mobile], 1);
    assert_eq!(updated.analytics.devices[&DeviceClass::Desktop], 1);
    assert_eq!(updated.analytics.browsers[&BrowserName::InternetExplorer], 1);
    assert_eq!(
        updated.analytics.timestamps[0],
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    );
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_record_click_unknown_id(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let result = repo
        .record_click(9999, &sample(DeviceClass::Desktop, BrowserName::Other))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_clicks_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let id = repo.insert(new_link("busy", "alice")).await.unwrap().id;

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let repo = repo.clone();
            let browser = if i % 2 == 0 {
                BrowserName::Firefox
            } else {
                BrowserName::Safari
            };
            tokio::spawn(async move {
                repo.record_click(id, &sample(DeviceClass::Desktop, browser))
                    .await
                    .unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let link = repo.find_by_code("busy").await.unwrap().unwrap();
    assert_eq!(link.clicks, 50);
    assert_eq!(link.analytics.timestamps.len(), 50);
    assert_eq!(link.analytics.device_total(), 50);
    assert_eq!(link.analytics.browser_total(), 50);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_and_count_by_owner(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    for code in ["a1", "a2", "a3"] {
        repo.insert(new_link(code, "alice")).await.unwrap();
    }
    repo.insert(new_link("b1", "bob")).await.unwrap();

    let page = repo.list_by_owner("alice", 0, 2).await.unwrap();
    let codes: Vec<_> = page.iter().map(|l| l.short_code.as_str()).collect();

    assert_eq!(codes, vec!["a3", "a2"]);
    assert_eq!(repo.count_by_owner("alice").await.unwrap(), 3);
    assert_eq!(repo.count_by_owner("carol").await.unwrap(), 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
