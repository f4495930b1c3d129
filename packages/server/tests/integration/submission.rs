use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use uzcode_server::entity::{submission, user};

use crate::common::{TestApp, routes};

async fn stored(app: &TestApp, id: i64) -> submission::Model {
    submission::Entity::find_by_id(id as i32)
        .one(&app.db)
        .await
        .unwrap()
        .expect("submission row should exist")
}

mod judging {
    use super::*;

    #[tokio::test]
    async fn accepted_solution_is_recorded_with_the_verdict() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", Some("Given an array of integers..."))
            .await;
        app.judge.push_analysis("Accepted", "Yechim to'g'ri");

        let res = app.submit(&token, "two-sum", "class Solution: pass").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Submission processed successfully.");
        assert_eq!(res.body["status"], "Accepted");
        assert_eq!(res.body["analysis"]["status"], "Accepted");
        assert_eq!(res.body["analysis"]["critique"], "Yechim to'g'ri");
        assert_eq!(res.body["analysis"]["timeComplexity"], "O(n)");

        let id = res.body["submission_id"].as_i64().unwrap();
        let row = stored(&app, id).await;
        assert_eq!(row.status, "Accepted");
        assert_eq!(row.language, "Python");
        assert_eq!(row.code, "class Solution: pass");
        assert_eq!(row.analysis_json()["critique"], "Yechim to'g'ri");
    }

    #[tokio::test]
    async fn judge_prompt_carries_the_cached_problem() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", Some("Given an array of integers..."))
            .await;
        app.judge.push_analysis("Accepted", "ok");

        app.submit(&token, "two-sum", "print(42)").await;

        let prompt = app.judge.prompt(0);
        assert!(prompt.contains("Problem Title: Two Sum"));
        assert!(prompt.contains("Difficulty: Easy"));
        assert!(prompt.contains("Given an array of integers..."));
        assert!(prompt.contains("print(42)"));
    }

    #[tokio::test]
    async fn any_verdict_from_the_judge_is_stored_verbatim() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_analysis("Time Limit Exceeded", "Juda sekin");

        let res = app.submit(&token, "two-sum", "while True: pass").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "Time Limit Exceeded");
        let row = stored(&app, res.body["submission_id"].as_i64().unwrap()).await;
        assert_eq!(row.status, "Time Limit Exceeded");
    }

    #[tokio::test]
    async fn verdict_named_like_a_lifecycle_status_is_stored_as_unknown() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_analysis("Failed", "Yechim noto'g'ri");

        let res = app.submit(&token, "two-sum", "return -1").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "Unknown");
        assert_eq!(res.body["analysis"]["status"], "Failed");

        let row = stored(&app, res.body["submission_id"].as_i64().unwrap()).await;
        assert_eq!(row.status, "Unknown");
        assert_eq!(row.analysis_json()["critique"], "Yechim noto'g'ri");
    }

    #[tokio::test]
    async fn transient_judge_failure_is_retried() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_status(503, "overloaded");
        app.judge.push_analysis("Accepted", "ok");

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "Accepted");
        assert_eq!(app.judge.calls(), 2);
    }
}

mod judge_failures {
    use super::*;

    #[tokio::test]
    async fn exhausted_retries_mark_the_submission_failed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        for _ in 0..3 {
            app.judge.push_status(500, "internal");
        }

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "JUDGE_FAILED");
        let detail = res.body["detail"].as_str().unwrap();
        assert!(detail.contains("API call failed after 3 attempts"), "{detail}");
        assert_eq!(app.judge.calls(), 3);

        let rows = submission::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "Failed");
        assert_eq!(rows[0].analysis_json()["status"], "API_CALL_FAILED");
    }

    #[tokio::test]
    async fn rejected_api_key_is_reported_as_unauthorized() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        for _ in 0..3 {
            app.judge.push_status(403, "PERMISSION_DENIED");
        }

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 401, "{}", res.text);
        assert_eq!(res.body["code"], "JUDGE_UNAUTHORIZED");

        let rows = submission::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows[0].status, "Failed");
    }

    #[tokio::test]
    async fn unreadable_judge_output_marks_the_submission_failed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        for _ in 0..3 {
            app.judge.push_text("this is not json");
        }

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 500, "{}", res.text);
        let detail = res.body["detail"].as_str().unwrap();
        assert!(detail.contains("failed to process structured output"), "{detail}");

        let rows = submission::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows[0].status, "Failed");
        assert_eq!(rows[0].analysis_json()["status"], "Error");
    }

    #[tokio::test]
    async fn sentinel_verdict_from_the_model_counts_as_failure() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_analysis("Error", "Kod tahlil qilinmadi");

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "JUDGE_FAILED");
        assert_eq!(app.judge.calls(), 1);

        let rows = submission::Entity::find().all(&app.db).await.unwrap();
        assert_eq!(rows[0].status, "Failed");
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn unknown_problem_is_rejected_without_creating_a_row() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;

        let res = app.submit(&token, "no-such-problem", "print(1)").await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert!(res.body["detail"].as_str().unwrap().contains("no-such-problem"));
        assert_eq!(submission::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(app.judge.calls(), 0);
    }

    #[tokio::test]
    async fn empty_code_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;

        let res = app.submit(&token, "two-sum", "   ").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(submission::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_problem_field_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;

        let res = app
            .post_with_token(routes::SUBMISSIONS, &json!({"code": "print(1)"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn submission_requires_a_token() {
        let app = TestApp::spawn().await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;

        let res = app
            .post_without_token(
                routes::SUBMISSIONS,
                &json!({"code": "print(1)", "problem": "two-sum"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn token_of_a_deleted_user_cannot_submit() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        user::Entity::delete_many().exec(&app.db).await.unwrap();

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNKNOWN_CALLER");
        assert_eq!(app.judge.calls(), 0);
    }
}

mod retrieval {
    use super::*;

    #[tokio::test]
    async fn owner_can_read_their_submission() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_analysis("Wrong Answer", "Xato javob");
        let created = app.submit(&token, "two-sum", "return 0").await;
        let id = created.body["submission_id"].as_i64().unwrap();

        let res = app.get_with_token(&routes::submission(id), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.id(), id);
        assert_eq!(res.body["problem_slug"], "two-sum");
        assert_eq!(res.body["status"], "Wrong Answer");
        assert_eq!(res.body["code"], "return 0");
        assert_eq!(res.body["language"], "Python");
        assert_eq!(res.body["analysis"]["critique"], "Xato javob");
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn unknown_submission_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alisher", "securepass").await;

        let res = app.get_with_token(&routes::submission(9999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn another_users_submission_looks_missing() {
        let app = TestApp::spawn().await;
        let owner = app.create_authenticated_user("alisher", "securepass").await;
        let other = app.create_authenticated_user("bobur", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        app.judge.push_analysis("Accepted", "ok");
        let created = app.submit(&owner, "two-sum", "print(1)").await;
        let id = created.body["submission_id"].as_i64().unwrap();

        let res = app.get_with_token(&routes::submission(id), &other).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["detail"], "Submission not found.");
    }
}

mod system_errors {
    use std::sync::{Arc, OnceLock};

    use async_trait::async_trait;
    use sea_orm::{ConnectionTrait, DatabaseConnection, QuerySelect};
    use serde_json::Value;
    use uzcode_server::judge::{GenerativeTransport, TransportError};

    use super::*;
    use crate::common::ScriptedTransport;

    /// Replies like a normal judge but drops the `analysis` column first, so
    /// recording the outcome fails while the status column still works.
    #[derive(Default)]
    struct ColumnDroppingTransport {
        replies: ScriptedTransport,
        db: OnceLock<DatabaseConnection>,
    }

    #[async_trait]
    impl GenerativeTransport for ColumnDroppingTransport {
        async fn generate(&self, body: &Value) -> Result<String, TransportError> {
            if let Some(db) = self.db.get() {
                db.execute_unprepared("ALTER TABLE submission DROP COLUMN analysis")
                    .await
                    .expect("Failed to drop analysis column");
            }
            self.replies.generate(body).await
        }
    }

    #[tokio::test]
    async fn failed_outcome_write_marks_the_submission_system_error() {
        let transport = Arc::new(ColumnDroppingTransport::default());
        transport.replies.push_analysis("Accepted", "ok");
        let app = TestApp::spawn_with_judge_transport(
            transport.clone(),
            Arc::new(ScriptedTransport::default()),
        )
        .await;
        let token = app.create_authenticated_user("alisher", "securepass").await;
        app.seed_problem("two-sum", "Two Sum", "Easy", None).await;
        assert!(transport.db.set(app.db.clone()).is_ok());

        let res = app.submit(&token, "two-sum", "print(1)").await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert_eq!(res.body["detail"], "An unexpected error occurred");

        let statuses: Vec<String> = submission::Entity::find()
            .select_only()
            .column(submission::Column::Status)
            .into_tuple()
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(statuses, vec!["System Error".to_string()]);
    }
}
