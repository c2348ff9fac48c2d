use serde_json::json;
use server::entity::user;

use crate::helpers::*;

mod create {
    use super::*;

    #[tokio::test]
    async fn new_account_gets_the_user_role() {
        let db = mock_db()
            .append_query_results([Vec::<user::Model>::new()])
            .append_query_results([vec![user_row("jane@example.com", "s3cure_pass", "user")]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_json(
                routes::USER_CREATE,
                &json!({"name": "Jane", "email": "jane@example.com", "password": "s3cure_pass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["email"], "jane@example.com");
        assert_eq!(res.body["user"]["role"], "user");
        assert!(res.body["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn email_can_only_be_used_once() {
        let db = mock_db()
            .append_query_results([vec![user_row("jane@example.com", "s3cure_pass", "user")]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_json(
                routes::USER_CREATE,
                &json!({"name": "Jane", "email": "JANE@example.com", "password": "another_pass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.error(), "This email is already in use!");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::USER_CREATE,
                &json!({"name": "Jane", "email": "jane@example.com", "password": "short"}),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
    }
}

mod sign_in {
    use super::*;

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::USER_SIGN_IN, &json!({"email": "jane@example.com"}), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "email/password missing!");
    }

    #[tokio::test]
    async fn wrong_password_is_a_mismatch() {
        let db = mock_db()
            .append_query_results([vec![user_row("jane@example.com", "s3cure_pass", "user")]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_json(
                routes::USER_SIGN_IN,
                &json!({"email": "jane@example.com", "password": "wrong_pass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Email/Password mismatch!");
    }

    #[tokio::test]
    async fn unknown_email_is_a_mismatch() {
        let db = mock_db()
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_json(
                routes::USER_SIGN_IN,
                &json!({"email": "nobody@example.com", "password": "whatever1"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Email/Password mismatch!");
    }

    #[tokio::test]
    async fn token_from_sign_in_passes_is_auth() {
        let admin = user_row("admin@example.com", "admin_pass", "admin");
        let db = mock_db()
            .append_query_results([vec![admin.clone()], vec![admin.clone()]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_json(
                routes::USER_SIGN_IN,
                &json!({"email": "Admin@Example.com", "password": "admin_pass"}),
                None,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["role"], "admin");
        let token = res.body["user"]["token"].as_str().unwrap().to_string();

        let me = app.get(routes::USER_IS_AUTH, Some(&token)).await;

        assert_eq!(me.status, 200, "{}", me.text);
        assert_eq!(me.body["user"]["id"], admin.id.to_string());
        assert_eq!(me.body["user"]["email"], "admin@example.com");
    }

    #[tokio::test]
    async fn is_auth_needs_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::USER_IS_AUTH, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Invalid token!");
    }
}
