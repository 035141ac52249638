use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn valid_message_body() -> Value {
    json!({
        "name": "Yasmine Said",
        "email": "yasmine@example.com",
        "subject": "Accommodation question",
        "message": "Is on-campus housing available for visiting teams?",
    })
}

mod message_submission {
    use super::*;

    #[tokio::test]
    async fn visitor_can_send_a_message() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::CONTACT_MESSAGES, &valid_message_body())
            .await;

        assert_eq!(res.status, 201, "Message failed: {}", res.text);
        assert_eq!(res.body["status"], "new");
        assert_eq!(res.body["subject"], "Accommodation question");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected() {
        let app = TestApp::spawn().await;

        let mut body = valid_message_body();
        body["subject"] = json!("   ");

        let res = app
            .post_without_token(routes::CONTACT_MESSAGES, &body)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "All fields are required");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let app = TestApp::spawn().await;

        let mut body = valid_message_body();
        body["email"] = json!("yasmine@@example.com");

        let res = app
            .post_without_token(routes::CONTACT_MESSAGES, &body)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Invalid email address");
    }
}

mod message_handling {
    use super::*;

    #[tokio::test]
    async fn listing_requires_contact_manage_permission() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let anonymous = app.get_without_token(routes::CONTACT_MESSAGES).await;
        assert_eq!(anonymous.status, 401);

        let denied = app.get_with_token(routes::CONTACT_MESSAGES, &token).await;
        assert_eq!(denied.status, 403);
        assert_eq!(denied.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn manager_can_list_messages() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        for subject in ["First question", "Second question"] {
            let mut body = valid_message_body();
            body["subject"] = json!(subject);
            let res = app
                .post_without_token(routes::CONTACT_MESSAGES, &body)
                .await;
            assert_eq!(res.status, 201, "Message failed: {}", res.text);
        }

        let res = app.get_with_token(routes::CONTACT_MESSAGES, &admin).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn manager_can_mark_a_message_as_read() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let created = app
            .post_without_token(routes::CONTACT_MESSAGES, &valid_message_body())
            .await;
        assert_eq!(created.status, 201, "Message failed: {}", created.text);

        let res = app
            .patch_with_token(
                &routes::contact_message_status(created.id()),
                &json!({"status": "read"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200, "Status update failed: {}", res.text);
        assert_eq!(res.body["status"], "read");
    }

    #[tokio::test]
    async fn participant_cannot_change_message_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let created = app
            .post_without_token(routes::CONTACT_MESSAGES, &valid_message_body())
            .await;
        assert_eq!(created.status, 201, "Message failed: {}", created.text);

        let res = app
            .patch_with_token(
                &routes::contact_message_status(created.id()),
                &json!({"status": "read"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let created = app
            .post_without_token(routes::CONTACT_MESSAGES, &valid_message_body())
            .await;
        assert_eq!(created.status, 201, "Message failed: {}", created.text);

        let res = app
            .patch_with_token(
                &routes::contact_message_status(created.id()),
                &json!({"status": "spam"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Invalid status");
    }

    #[tokio::test]
    async fn status_change_on_missing_message_returns_not_found() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let res = app
            .patch_with_token(
                &routes::contact_message_status(9999),
                &json!({"status": "read"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Message not found");
    }
}
