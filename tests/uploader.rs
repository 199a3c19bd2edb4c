mod common;

use common::{dead_url, FakeWebhook};
use finsight::config::SummaryRequest;
use finsight::models::{Amount, SelectedFile, SubmitStatus};
use finsight::storage::{IdentityStore, KeyValueStore, MemoryStore, ResultCache, DEFAULT_IDENTITY};
use finsight::summary::{Summarizer, SUMMARY_FAILURE_MESSAGE};
use finsight::uploader::{Uploader, DASHBOARD_PATH, FAILURE_MESSAGE, SUCCESS_MESSAGE};
use finsight::webhook::WebhookClient;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Harness {
    uploader: Uploader,
    cache: ResultCache,
    identity: IdentityStore,
}

fn harness(upload_url: String, summary_url: String) -> Harness {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let cache = ResultCache::new(Arc::clone(&store));
    let identity = IdentityStore::new(store);
    let webhook = WebhookClient::new(upload_url, summary_url, SummaryRequest::Queries);
    let uploader = Uploader::new(
        webhook,
        cache.clone(),
        identity.clone(),
        Duration::from_millis(2000),
    );
    Harness {
        uploader,
        cache,
        identity,
    }
}

fn receipts(count: usize) -> Vec<SelectedFile> {
    (0..count)
        .map(|i| {
            SelectedFile::new(format!("receipt-{i}.pdf"), vec![b'x'; 10 + i])
                .with_content_type("application/pdf")
        })
        .collect()
}

#[tokio::test]
async fn failed_upload_keeps_selection_and_retry_succeeds() {
    let fake = FakeWebhook::start().await;
    let h = harness(fake.url("/upload"), fake.url("/summary"));
    h.identity.set("ana@example.com").unwrap();
    h.uploader.add_files(receipts(3)).await.unwrap();

    fake.reply(500, "workflow crashed");
    let failed = h.uploader.submit().await.unwrap();
    assert_eq!(failed.status, SubmitStatus::Error);
    assert_eq!(failed.message, FAILURE_MESSAGE);
    assert_eq!(failed.redirect, None);
    assert_eq!(failed.files_remaining, 3);
    assert_eq!(h.uploader.selection().await.count, 3);
    assert_eq!(h.cache.get(), None);

    let result = json!({
        "vendorTotals": [{ "vendor": "Acme", "total": 10 }],
        "textSummary": "Three receipts from Acme."
    });
    fake.reply(200, result.to_string());
    let ok = h.uploader.submit().await.unwrap();
    assert_eq!(ok.status, SubmitStatus::Success);
    assert_eq!(ok.message, SUCCESS_MESSAGE);
    assert_eq!(ok.redirect.as_deref(), Some(DASHBOARD_PATH));
    assert_eq!(ok.redirect_after_ms, Some(2000));
    assert_eq!(h.cache.get(), Some(result));
    assert_eq!(h.uploader.selection().await.count, 0);

    let uploads = fake.uploads();
    assert_eq!(uploads.len(), 2);
    for upload in uploads {
        assert_eq!(
            upload.file_names,
            vec!["receipt-0.pdf", "receipt-1.pdf", "receipt-2.pdf"]
        );
        assert_eq!(upload.file_sizes, vec![10, 11, 12]);
        assert_eq!(upload.file_count.as_deref(), Some("3"));
        assert_eq!(upload.user_id.as_deref(), Some("ana@example.com"));
    }
}

#[tokio::test]
async fn empty_selection_sends_nothing() {
    let fake = FakeWebhook::start().await;
    let h = harness(fake.url("/upload"), fake.url("/summary"));

    let err = h.uploader.submit().await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "No files");
    assert!(fake.uploads().is_empty());
}

#[tokio::test]
async fn unreachable_webhook_is_a_retryable_failure() {
    let h = harness(dead_url(), dead_url());
    h.uploader.add_files(receipts(2)).await.unwrap();

    let outcome = h.uploader.submit().await.unwrap();
    assert_eq!(outcome.status, SubmitStatus::Error);
    assert_eq!(outcome.files_remaining, 2);
    assert!(!h.uploader.is_uploading());
}

#[tokio::test]
async fn success_without_json_leaves_cache_alone() {
    let fake = FakeWebhook::start().await;
    let h = harness(fake.url("/upload"), fake.url("/summary"));
    h.cache.put(&json!({ "summary": "previous" })).unwrap();
    h.uploader.add_files(receipts(1)).await.unwrap();

    fake.reply(200, "Workflow was started");
    let outcome = h.uploader.submit().await.unwrap();
    assert_eq!(outcome.status, SubmitStatus::Success);
    assert_eq!(h.cache.get(), Some(json!({ "summary": "previous" })));

    let upload = &fake.uploads()[0];
    assert_eq!(upload.user_id.as_deref(), Some(DEFAULT_IDENTITY));
}

#[tokio::test]
async fn selection_is_frozen_while_uploading() {
    let fake = FakeWebhook::start().await;
    fake.delay(Duration::from_millis(300));
    let h = harness(fake.url("/upload"), fake.url("/summary"));
    h.uploader.add_files(receipts(2)).await.unwrap();

    let (first, (second, added, cleared)) = tokio::join!(h.uploader.submit(), async {
        sleep(Duration::from_millis(50)).await;
        (
            h.uploader.submit().await,
            h.uploader.add_files(receipts(1)).await,
            h.uploader.clear_files().await,
        )
    });

    assert_eq!(first.unwrap().status, SubmitStatus::Success);
    assert_eq!(second.unwrap_err().status, StatusCode::CONFLICT);
    assert_eq!(added.unwrap_err().status, StatusCode::CONFLICT);
    assert_eq!(cleared.unwrap_err().status, StatusCode::CONFLICT);
    assert_eq!(fake.uploads().len(), 1);
    assert!(!h.uploader.is_uploading());
}

#[tokio::test]
async fn too_many_files_rejected_whole() {
    let fake = FakeWebhook::start().await;
    let h = harness(fake.url("/upload"), fake.url("/summary"));
    h.uploader.add_files(receipts(19)).await.unwrap();

    let err = h.uploader.add_files(receipts(2)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.message, "Maximum 20 files allowed");
    assert_eq!(h.uploader.selection().await.count, 19);

    assert_eq!(h.uploader.add_files(receipts(1)).await.unwrap().count, 20);
}

#[tokio::test]
async fn summary_regeneration_caches_result() {
    let fake = FakeWebhook::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let cache = ResultCache::new(Arc::clone(&store));
    let identity = IdentityStore::new(store);
    identity.set("ana@example.com").unwrap();
    let summarizer = Summarizer::new(
        WebhookClient::new(fake.url("/upload"), fake.url("/summary"), SummaryRequest::Queries),
        cache.clone(),
        identity,
    );

    fake.reply(200, json!({ "human_summary": "Tax is 8%.", "totalTax": 12 }).to_string());
    let view = summarizer.regenerate().await.unwrap();
    assert_eq!(view.summary_text, "Tax is 8%.");
    assert_eq!(view.metrics.total_tax, Amount::Number(12.0));
    assert!(cache.get().is_some());

    let sent = fake.summaries();
    assert_eq!(sent[0]["userId"], "ana@example.com");
    assert_eq!(sent[0]["queries"][0], "total_by_vendor");

    fake.reply(503, "");
    let err = summarizer.regenerate().await.unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_GATEWAY);
    assert_eq!(err.message, SUMMARY_FAILURE_MESSAGE);
    assert_eq!(cache.get().unwrap()["human_summary"], "Tax is 8%.");
}

#[tokio::test]
async fn summary_regeneration_is_single_flight() {
    let fake = FakeWebhook::start().await;
    fake.delay(Duration::from_millis(300));
    fake.reply(200, json!({ "summary": "Only one request." }).to_string());
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let summarizer = Summarizer::new(
        WebhookClient::new(fake.url("/upload"), fake.url("/summary"), SummaryRequest::Queries),
        ResultCache::new(Arc::clone(&store)),
        IdentityStore::new(store),
    );

    let (first, second) = tokio::join!(summarizer.regenerate(), async {
        sleep(Duration::from_millis(50)).await;
        summarizer.regenerate().await
    });

    assert_eq!(first.unwrap().summary_text, "Only one request.");
    let err = second.unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(err.message, "Summary already in progress");
    assert_eq!(fake.summaries().len(), 1);

    // The guard is released once the first call finishes.
    fake.delay(Duration::ZERO);
    assert!(summarizer.regenerate().await.is_ok());
    assert_eq!(fake.summaries().len(), 2);
}

#[tokio::test]
async fn summary_action_variant_body() {
    let fake = FakeWebhook::start().await;
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let summarizer = Summarizer::new(
        WebhookClient::new(fake.url("/upload"), fake.url("/summary"), SummaryRequest::Action),
        ResultCache::new(Arc::clone(&store)),
        IdentityStore::new(store),
    );

    fake.reply(200, "\"Plain text summary\"");
    let view = summarizer.regenerate().await.unwrap();
    assert_eq!(view.summary_text, "Plain text summary");
    assert_eq!(fake.summaries()[0], json!({ "action": "get-summary" }));
}
