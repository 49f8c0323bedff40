//! Document lifecycle against an instrumented store

use pretty_assertions::assert_eq;
use quote_document::{
    ClauseList, CommitOutcome, DocumentError, DocumentStore, OwnerId, QuotePatch, TrackedQuote,
};
use quote_test_utils::{sample_snapshot, valid_draft, RecordingStore, StoreCalls};

#[tokio::test]
async fn edit_commit_reload() {
    let store = RecordingStore::new();
    let doc = store.create(valid_draft("u1")).await.unwrap();
    let mut quote = TrackedQuote::new(doc.clone());

    let mut terms = ClauseList::new();
    terms.add("Payment within 30 days");
    terms.add("Prices in USD");

    quote.apply_local_change(QuotePatch::new().with_table(sample_snapshot()));
    quote.apply_local_change(QuotePatch::new().with_terms(terms.to_text()));
    assert_eq!(quote.commit(&store).await.unwrap(), CommitOutcome::Written);

    let reloaded = store.get(&doc.id).await.unwrap();
    assert_eq!(reloaded.table_snapshot, sample_snapshot());
    assert_eq!(reloaded.terms_clauses(), terms);
    assert_eq!(reloaded.created_at, doc.created_at);
    assert!(reloaded.updated_at > doc.updated_at);
    assert_eq!(store.calls().update, 1);
}

#[tokio::test]
async fn empty_buffer_never_reaches_store() {
    let store = RecordingStore::new();
    let doc = store.create(valid_draft("u1")).await.unwrap();
    let mut quote = TrackedQuote::new(doc);

    assert_eq!(quote.commit(&store).await.unwrap(), CommitOutcome::Unchanged);
    assert_eq!(quote.commit(&store).await.unwrap(), CommitOutcome::Unchanged);
    assert_eq!(
        store.calls(),
        StoreCalls {
            create: 1,
            ..StoreCalls::default()
        }
    );
}

#[tokio::test]
async fn failed_update_can_be_retried() {
    let store = RecordingStore::new();
    let doc = store.create(valid_draft("u1")).await.unwrap();
    let mut quote = TrackedQuote::new(doc);
    quote.apply_local_change(QuotePatch::new().with_logo(Some("data:image/png;base64,AA==".into())));

    store.fail_next_updates(1);
    let err = quote.commit(&store).await.unwrap_err();
    assert!(matches!(err, DocumentError::Persistence(_)));
    assert!(quote.has_pending_changes());

    assert_eq!(quote.commit(&store).await.unwrap(), CommitOutcome::Written);
    assert_eq!(store.written_patches().len(), 1);
    assert_eq!(
        quote.document().logo.as_deref(),
        Some("data:image/png;base64,AA==")
    );
}

#[tokio::test]
async fn foreign_owner_is_unauthorized() {
    let store = RecordingStore::new();
    let doc = store.create(valid_draft("owner")).await.unwrap();
    let fetched = store.get(&doc.id).await.unwrap();
    assert_eq!(
        fetched.authorize(&OwnerId::new("intruder")),
        Err(DocumentError::Unauthorized)
    );
}
