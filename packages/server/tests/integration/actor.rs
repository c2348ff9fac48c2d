use common::storage::MediaKind;

use crate::helpers::*;

mod authorization {
    use super::*;

    #[tokio::test]
    async fn listing_actors_without_a_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ACTOR_LIST, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Invalid token!");
    }

    #[tokio::test]
    async fn a_forged_token_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = server::utils::jwt::sign("x", "admin", "some-other-secret", 1).unwrap();

        let res = app.get(routes::ACTOR_LIST, Some(&forged)).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "Invalid token!");
    }

    #[tokio::test]
    async fn regular_users_cannot_create_actors() {
        let app = TestApp::spawn().await;
        let token = user_token(uuid::Uuid::now_v7());

        let res = app
            .post_form(routes::ACTOR_CREATE, actor_form("Tom Hanks"), &token)
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "unauthorized access!");
    }

    #[tokio::test]
    async fn latest_uploads_are_public() {
        let db = mock_db()
            .append_query_results([vec![actor_row("Tom Hanks", None), actor_row("Meg Ryan", None)]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app.get(routes::ACTOR_LATEST, None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body.as_array().map(Vec::len), Some(2));
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn admin_creates_an_actor_with_an_avatar() {
        let avatar = media_ref("images/tom.jpg");
        let db = mock_db()
            .append_query_results([vec![actor_row("Tom Hanks", Some(&avatar))]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let form = actor_form("Tom Hanks").part(
            "avatar",
            file_part("tom.jpg", "image/jpeg", b"\xFF\xD8\xFFJPEG"),
        );
        let res = app.post_form(routes::ACTOR_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Tom Hanks");
        assert_eq!(res.body["gender"], "male");
        assert!(res.body["avatar"].as_str().is_some_and(|url| !url.is_empty()));
        assert_eq!(app.media_count(MediaKind::Image), 1);
    }

    #[tokio::test]
    async fn creating_without_an_avatar_stores_nothing() {
        let db = mock_db()
            .append_query_results([vec![actor_row("Meg Ryan", None)]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .post_form(routes::ACTOR_CREATE, actor_form("Meg Ryan"), &admin_token())
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["avatar"].is_null());
        assert_eq!(app.media_count(MediaKind::Image), 0);
    }

    #[tokio::test]
    async fn non_image_avatar_is_rejected() {
        let app = TestApp::spawn().await;

        let form = actor_form("Tom Hanks").part(
            "avatar",
            file_part("notes.txt", "text/plain", b"not an image"),
        );
        let res = app.post_form(routes::ACTOR_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Supports only image files!");
        assert_eq!(app.media_count(MediaKind::Image), 0);
    }

    #[tokio::test]
    async fn name_is_required() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new()
            .text("about", "Someone")
            .text("gender", "female");
        let res = app.post_form(routes::ACTOR_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Actor name is missing!");
    }

    #[tokio::test]
    async fn gender_must_be_known() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new()
            .text("name", "Tom Hanks")
            .text("about", "Someone")
            .text("gender", "robot");
        let res = app.post_form(routes::ACTOR_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Gender must be male, female or other!");
    }
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn malformed_id_is_an_invalid_request() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::actor_single("not-an-id"), None).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.text, r#"{"error":"Invalid Request!"}"#);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let db = mock_db()
            .append_query_results([Vec::<server::entity::actor::Model>::new()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .get(&routes::actor_single(&uuid::Uuid::now_v7().to_string()), None)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Invalid Request!, actor not found");
    }

    #[tokio::test]
    async fn admin_pages_through_actors() {
        let db = mock_db()
            .append_query_results([vec![actor_row("Tom Hanks", None)]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .get(&format!("{}?pageNo=3&limit=1", routes::ACTOR_LIST), Some(&admin_token()))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["profiles"][0]["name"], "Tom Hanks");
    }

    #[tokio::test]
    async fn page_past_the_last_is_an_empty_list() {
        let db = mock_db()
            .append_query_results([Vec::<server::entity::actor::Model>::new()])
            .into_connection();
        let app = TestApp::spawn_with(db.clone()).await;

        let res = app
            .get(&format!("{}?pageNo=3&limit=1", routes::ACTOR_LIST), Some(&admin_token()))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body, serde_json::json!({ "profiles": [] }));

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = log[0].statements()[0].to_string();
        assert!(sql.contains("LIMIT 1 OFFSET 3"), "{sql}");
    }

    #[tokio::test]
    async fn search_requires_a_name() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?name=%20", routes::ACTOR_SEARCH), Some(&admin_token()))
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn search_returns_matches() {
        let db = mock_db()
            .append_query_results([vec![actor_row("Tom Hanks", None)]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .get(&format!("{}?name=tom%20hanks", routes::ACTOR_SEARCH), Some(&admin_token()))
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body[0]["name"], "Tom Hanks");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn new_avatar_replaces_the_old_one() {
        let old = media_ref("images/old.jpg");
        let existing = actor_row("Tom Hanks", Some(&old));
        let mut updated = existing.clone();
        updated.name = "Thomas Hanks".into();
        let db = mock_db()
            .append_query_results([vec![existing.clone()], vec![updated]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;
        app.put(&old);

        let form = actor_form("Thomas Hanks").part(
            "avatar",
            file_part("new.png", "image/png", b"\x89PNG"),
        );
        let res = app
            .post_form(&routes::actor_update(&existing.id.to_string()), form, &admin_token())
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["name"], "Thomas Hanks");
        assert!(!app.media_path(&old.public_id).exists());
        assert_eq!(app.media_count(MediaKind::Image), 1);
    }

    #[tokio::test]
    async fn update_fails_when_old_avatar_is_gone() {
        let old = media_ref("images/missing.jpg");
        let existing = actor_row("Tom Hanks", Some(&old));
        let db = mock_db()
            .append_query_results([vec![existing.clone()]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let form = actor_form("Tom Hanks").part(
            "avatar",
            file_part("new.png", "image/png", b"\x89PNG"),
        );
        let res = app
            .post_form(&routes::actor_update(&existing.id.to_string()), form, &admin_token())
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.error(), "Could not remove image from the cloud!");
        assert_eq!(app.media_count(MediaKind::Image), 0);
    }
}

mod remove {
    use super::*;

    #[tokio::test]
    async fn removing_an_actor_deletes_its_avatar() {
        let avatar = media_ref("images/tom.jpg");
        let existing = actor_row("Tom Hanks", Some(&avatar));
        let db = mock_db()
            .append_query_results([vec![existing.clone()]])
            .append_exec_results([exec_ok()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;
        app.put(&avatar);

        let res = app
            .delete(&routes::actor(&existing.id.to_string()), &admin_token())
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Record removed successfully.");
        assert!(!app.media_path(&avatar.public_id).exists());
    }

    #[tokio::test]
    async fn record_stays_when_the_avatar_cannot_be_removed() {
        let avatar = media_ref("images/missing.jpg");
        let existing = actor_row("Tom Hanks", Some(&avatar));
        // No exec result queued: a DELETE statement would fail with a 500.
        let db = mock_db()
            .append_query_results([vec![existing.clone()]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .delete(&routes::actor(&existing.id.to_string()), &admin_token())
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.error(), "Could not remove image from the cloud!");
    }

    #[tokio::test]
    async fn removing_an_unknown_actor_is_not_found() {
        let db = mock_db()
            .append_query_results([Vec::<server::entity::actor::Model>::new()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .delete(&routes::actor(&uuid::Uuid::now_v7().to_string()), &admin_token())
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.error(), "Invalid Request!, record not found");
    }
}
