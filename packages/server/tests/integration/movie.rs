use common::storage::MediaKind;
use reqwest::multipart::Form;
use server::entity::movie;

use crate::helpers::*;

mod trailer {
    use super::*;

    #[tokio::test]
    async fn uploaded_trailer_can_be_streamed_back() {
        let app = TestApp::spawn().await;

        let form = Form::new().part("video", file_part("trailer.mp4", "video/mp4", b"MP4DATA"));
        let res = app
            .post_form(routes::MOVIE_UPLOAD_TRAILER, form, &admin_token())
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let public_id = res.body["public_id"].as_str().unwrap().to_string();
        let url = res.body["url"].as_str().unwrap();
        assert!(public_id.starts_with("videos/"));
        assert!(url.ends_with(&public_id));

        let media = app
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to fetch media");
        assert_eq!(media.status(), 200);
        assert_eq!(media.headers()["content-type"], "video/mp4");
        assert_eq!(media.bytes().await.unwrap().as_ref(), b"MP4DATA");
    }

    #[tokio::test]
    async fn images_are_not_trailers() {
        let app = TestApp::spawn().await;

        let form = Form::new().part("video", file_part("poster.png", "image/png", b"\x89PNG"));
        let res = app
            .post_form(routes::MOVIE_UPLOAD_TRAILER, form, &admin_token())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Supports only video files!");
        assert_eq!(app.media_count(MediaKind::Video), 0);
    }

    #[tokio::test]
    async fn a_video_part_is_required() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::MOVIE_UPLOAD_TRAILER, Form::new(), &admin_token())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Video file is missing!");
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn admin_creates_a_movie_with_a_poster() {
        let trailer = media_ref("videos/forrest.mp4");
        let db = mock_db()
            .append_query_results([vec![movie_row("Forrest Gump", None, &trailer)]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let form = movie_form("Forrest Gump", &trailer)
            .part("poster", file_part("poster.png", "image/png", b"\x89PNG"));
        let res = app.post_form(routes::MOVIE_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["movie"]["title"], "Forrest Gump");
        assert!(res.body["movie"]["id"].is_string());
        assert_eq!(app.media_count(MediaKind::Image), 1);
    }

    #[tokio::test]
    async fn title_is_required() {
        let app = TestApp::spawn().await;

        let form = movie_form("   ", &media_ref("videos/t.mp4"));
        let res = app.post_form(routes::MOVIE_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Movie title is missing!");
    }

    #[tokio::test]
    async fn trailer_cannot_point_at_an_image() {
        let app = TestApp::spawn().await;
        let avatar = media_ref("images/tom.jpg");
        app.put(&avatar);

        let form = movie_form("Forrest Gump", &avatar);
        let res = app.post_form(routes::MOVIE_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Invalid trailer info!");
        assert!(app.media_path(&avatar.public_id).exists());
    }

    #[tokio::test]
    async fn unknown_genres_are_rejected() {
        let app = TestApp::spawn().await;

        let form = movie_form("Forrest Gump", &media_ref("videos/t.mp4"))
            .text("genres", r#"["Cooking"]"#);
        let res = app.post_form(routes::MOVIE_CREATE, form, &admin_token()).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.error(), "Invalid genres!");
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn latest_uploads_are_public_list_items() {
        let trailer = media_ref("videos/t.mp4");
        let db = mock_db()
            .append_query_results([vec![
                movie_row("Forrest Gump", None, &trailer),
                movie_row("Cast Away", None, &trailer),
            ]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app.get(routes::MOVIE_LATEST, None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let movies = res.body.as_array().unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0]["status"], "public");
        assert_eq!(movies[0]["genres"][0], "Drama");
    }

    #[tokio::test]
    async fn listing_movies_is_admin_only() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::MOVIE_LIST, None).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn single_movie_uses_the_wire_field_names() {
        let row = movie_row("Forrest Gump", None, &media_ref("videos/t.mp4"));
        let db = mock_db().append_query_results([vec![row.clone()]]).into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app.get(&routes::movie_single(&row.id.to_string()), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["storyLine"], "Life is like a box of chocolates.");
        assert_eq!(res.body["releaseDate"], "1994-07-06");
        assert_eq!(res.body["type"], "Film");
        assert!(res.body["director"].is_null());
        assert_eq!(res.body["trailer"], "http://media.test/videos/t.mp4");
    }

    #[tokio::test]
    async fn single_movie_with_unknown_id_is_not_found() {
        let db = mock_db()
            .append_query_results([Vec::<movie::Model>::new()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;

        let res = app
            .get(&routes::movie_single(&uuid::Uuid::now_v7().to_string()), None)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn for_update_requires_admin() {
        let app = TestApp::spawn().await;
        let token = user_token(uuid::Uuid::now_v7());

        let res = app
            .get(&routes::movie_for_update(&uuid::Uuid::now_v7().to_string()), Some(&token))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.error(), "unauthorized access!");
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn switching_trailers_removes_the_old_object() {
        let old_trailer = media_ref("videos/old.mp4");
        let new_trailer = media_ref("videos/new.mp4");
        let existing = movie_row("Forrest Gump", None, &old_trailer);
        let mut updated = existing.clone();
        updated.trailer_public_id = new_trailer.public_id.clone();
        updated.trailer_url = new_trailer.url.clone();
        let db = mock_db()
            .append_query_results([vec![existing.clone()], vec![updated]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;
        app.put(&old_trailer);
        app.put(&new_trailer);

        let res = app
            .patch_form(
                &format!("/api/movie/update/{}", existing.id),
                movie_form("Forrest Gump", &new_trailer),
                &admin_token(),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["trailer"], new_trailer.url);
        assert!(!app.media_path(&old_trailer.public_id).exists());
        assert!(app.media_path(&new_trailer.public_id).exists());
    }
}

mod remove {
    use super::*;

    #[tokio::test]
    async fn removing_a_movie_deletes_poster_and_trailer() {
        let poster = media_ref("images/poster.png");
        let trailer = media_ref("videos/t.mp4");
        let existing = movie_row("Forrest Gump", Some(&poster), &trailer);
        let db = mock_db()
            .append_query_results([vec![existing.clone()]])
            .append_exec_results([exec_ok()])
            .into_connection();
        let app = TestApp::spawn_with(db).await;
        app.put(&poster);
        app.put(&trailer);

        let res = app
            .delete(&routes::movie(&existing.id.to_string()), &admin_token())
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(!app.media_path(&poster.public_id).exists());
        assert!(!app.media_path(&trailer.public_id).exists());
    }

    #[tokio::test]
    async fn missing_trailer_blocks_removal() {
        let poster = media_ref("images/poster.png");
        let trailer = media_ref("videos/gone.mp4");
        let existing = movie_row("Forrest Gump", Some(&poster), &trailer);
        let db = mock_db()
            .append_query_results([vec![existing.clone()]])
            .into_connection();
        let app = TestApp::spawn_with(db).await;
        app.put(&poster);

        let res = app
            .delete(&routes::movie(&existing.id.to_string()), &admin_token())
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(res.error(), "Could not remove trailer from cloud!");
    }
}
