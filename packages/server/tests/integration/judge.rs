use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use uzcode_server::entity::submission;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn standalone_judge_returns_analysis_without_recording() {
    let app = TestApp::spawn().await;
    app.judge.push_analysis("Accepted", "Yaxshi yechim");

    let res = app
        .post_without_token(
            routes::JUDGE,
            &json!({"code": "print(1)", "problem": "two-sum"}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["submission_status"], "Processed");
    assert_eq!(res.body["analysis"]["status"], "Accepted");
    assert_eq!(res.body["analysis"]["critique"], "Yaxshi yechim");
    assert_eq!(submission::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn standalone_judge_only_knows_the_slug() {
    let app = TestApp::spawn().await;
    app.judge.push_analysis("Accepted", "ok");

    app.post_without_token(
        routes::JUDGE,
        &json!({"code": "print(1)", "problem": "two-sum"}),
    )
    .await;

    let prompt = app.judge.prompt(0);
    assert!(prompt.contains("Problem Slug: two-sum"), "{prompt}");
    assert!(!prompt.contains("Problem Title:"));
}

#[tokio::test]
async fn standalone_judge_does_not_need_a_cached_problem() {
    let app = TestApp::spawn().await;
    app.judge.push_analysis("Wrong Answer", "Xato");

    let res = app
        .post_without_token(
            routes::JUDGE,
            &json!({"code": "print(1)", "problem": "never-cached"}),
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["analysis"]["status"], "Wrong Answer");
}

#[tokio::test]
async fn sentinel_from_the_judge_is_a_failure() {
    let app = TestApp::spawn().await;
    for _ in 0..3 {
        app.judge.push_status(500, "boom");
    }

    let res = app
        .post_without_token(
            routes::JUDGE,
            &json!({"code": "print(1)", "problem": "two-sum"}),
        )
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "JUDGE_FAILED");
    assert!(
        res.body["detail"]
            .as_str()
            .unwrap()
            .contains("API call failed after 3 attempts")
    );
}

#[tokio::test]
async fn empty_code_is_rejected_before_calling_the_judge() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::JUDGE, &json!({"code": "", "problem": "two-sum"}))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(app.judge.calls(), 0);
}
