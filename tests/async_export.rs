//! Integration tests for the async session facade

use agreekit::pdf::NoopPdfAssembler;
use agreekit::rasterize::NoopRasterizer;
use agreekit::{DraftField, ExportPipeline, Session, TemplateOptions};
use chrono::NaiveDate;

fn noop_session() -> Session {
    let pipeline = ExportPipeline::new(
        Box::new(NoopRasterizer::new()),
        Box::new(NoopPdfAssembler::new()),
    );
    Session::new(
        pipeline,
        TemplateOptions {
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        },
    )
}

#[tokio::test]
async fn session_round_trips_field_updates() {
    let session = noop_session();

    let snapshot = session.update(DraftField::Name, "Jane Doe").await.unwrap();
    assert_eq!(snapshot.name, "Jane Doe");

    session
        .update(DraftField::Email, "jane@example.com")
        .await
        .unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.name, "Jane Doe");
    assert_eq!(snapshot.email, "jane@example.com");

    session.close().await.unwrap();
}

#[tokio::test]
async fn session_rerenders_after_every_update() {
    let session = noop_session();

    let markup = session.markup().await.unwrap();
    assert!(markup.contains("(Pending Signature)"));

    session.update(DraftField::Name, "Jane Doe").await.unwrap();
    let markup = session.markup().await.unwrap();
    assert!(markup.contains("Jane_Doe_Accepted"));

    session.close().await.unwrap();
}

#[tokio::test]
async fn session_export_resolves_with_artifact_path() {
    let session = noop_session();
    session.update(DraftField::Name, "Jane Doe").await.unwrap();

    let path = session.export().await.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "Global_U_Agreement_Jane_Doe.pdf"
    );

    session.close().await.unwrap();
}
