use serde_json::{Value, json};

use crate::common::{TestApp, routes};

fn valid_contest_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Annual programming contest",
        "start_date": "2099-06-01T09:00:00Z",
        "end_date": "2099-06-03T18:00:00Z",
    })
}

fn valid_event_body(title: &str, day: i32) -> Value {
    json!({
        "title": title,
        "description": "Details to follow",
        "start_time": "2099-06-01T09:00:00Z",
        "end_time": "2099-06-01T10:00:00Z",
        "day": day,
        "location": "Main Hall",
        "event_type": "ceremony",
    })
}

mod contest_creation {
    use super::*;

    #[tokio::test]
    async fn organizer_can_create_a_contest() {
        let app = TestApp::spawn().await;
        let organizer = app
            .create_user_with_role("orga", "securepass", "organizer")
            .await;

        let res = app
            .post_with_token(routes::CONTESTS, &valid_contest_body("ACPC 2025"), &organizer)
            .await;

        assert_eq!(res.status, 201, "Contest creation failed: {}", res.text);
        assert_eq!(res.body["name"], "ACPC 2025");
        assert_eq!(res.body["is_active"], false);
        assert!(res.body["max_teams"].is_null());
    }

    #[tokio::test]
    async fn participant_cannot_create_a_contest() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(routes::CONTESTS, &valid_contest_body("ACPC 2025"), &token)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn creation_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::CONTESTS, &valid_contest_body("ACPC 2025"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn end_date_must_follow_start_date() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let mut body = valid_contest_body("ACPC 2025");
        body["end_date"] = json!("2099-05-01T00:00:00Z");

        let res = app.post_with_token(routes::CONTESTS, &body, &admin).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Contest end date must be after start date");
    }

    #[tokio::test]
    async fn registration_window_must_be_ordered() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let mut body = valid_contest_body("ACPC 2025");
        body["registration_start"] = json!("2099-03-01T00:00:00Z");
        body["registration_end"] = json!("2099-02-01T00:00:00Z");

        let res = app.post_with_token(routes::CONTESTS, &body, &admin).await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Registration end must not be before registration start"
        );
    }

    #[tokio::test]
    async fn max_teams_must_be_positive() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let mut body = valid_contest_body("ACPC 2025");
        body["max_teams"] = json!(0);

        let res = app.post_with_token(routes::CONTESTS, &body, &admin).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Maximum teams must be a positive number");
    }
}

mod contest_queries {
    use super::*;

    #[tokio::test]
    async fn contests_are_listed_publicly() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        app.create_contest(&admin, "Qualifiers", None, None, None)
            .await;
        app.create_contest(&admin, "Finals", None, None, Some(20))
            .await;

        let res = app.get_without_token(routes::CONTESTS).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn get_contest_returns_schedule_in_order() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let late = app
            .post_with_token(
                &routes::contest_schedule(contest_id),
                &valid_event_body("Award ceremony", 2),
                &admin,
            )
            .await;
        assert_eq!(late.status, 201, "Event creation failed: {}", late.text);
        let early = app
            .post_with_token(
                &routes::contest_schedule(contest_id),
                &valid_event_body("Opening ceremony", 1),
                &admin,
            )
            .await;
        assert_eq!(early.status, 201, "Event creation failed: {}", early.text);

        let res = app.get_without_token(&routes::contest(contest_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "ACPC 2025");
        let schedule = res.body["schedule"].as_array().unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule[0]["title"], "Opening ceremony");
        assert_eq!(schedule[1]["title"], "Award ceremony");
    }

    #[tokio::test]
    async fn missing_contest_returns_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::contest(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Contest not found");
    }
}

mod active_contest {
    use super::*;

    #[tokio::test]
    async fn no_active_contest_returns_not_found() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        app.create_contest(&admin, "Dormant Contest", None, None, None)
            .await;

        let res = app.get_without_token(routes::ACTIVE_CONTEST).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "No active contest found");
    }

    #[tokio::test]
    async fn active_contest_is_returned_with_schedule() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let mut body = valid_contest_body("ACPC 2025");
        body["is_active"] = json!(true);
        let created = app.post_with_token(routes::CONTESTS, &body, &admin).await;
        assert_eq!(created.status, 201, "Contest creation failed: {}", created.text);

        let event = app
            .post_with_token(
                &routes::contest_schedule(created.id()),
                &valid_event_body("Opening ceremony", 1),
                &admin,
            )
            .await;
        assert_eq!(event.status, 201, "Event creation failed: {}", event.text);

        let res = app.get_without_token(routes::ACTIVE_CONTEST).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], created.id());
        assert_eq!(res.body["is_active"], true);
        assert_eq!(res.body["schedule"].as_array().unwrap().len(), 1);
    }
}

mod contest_updates {
    use super::*;

    #[tokio::test]
    async fn organizer_can_update_contest_fields() {
        let app = TestApp::spawn().await;
        let organizer = app
            .create_user_with_role("orga", "securepass", "organizer")
            .await;
        let contest_id = app
            .create_contest(&organizer, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .patch_with_token(
                &routes::contest(contest_id),
                &json!({"name": "ACPC 2025 Finals", "max_teams": 10}),
                &organizer,
            )
            .await;

        assert_eq!(res.status, 200, "Update failed: {}", res.text);
        assert_eq!(res.body["name"], "ACPC 2025 Finals");
        assert_eq!(res.body["max_teams"], 10);
    }

    #[tokio::test]
    async fn empty_update_payload_is_a_no_op() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .patch_with_token(&routes::contest(contest_id), &json!({}), &admin)
            .await;

        assert_eq!(res.status, 200, "Update failed: {}", res.text);
        assert_eq!(res.body["name"], "ACPC 2025");
    }

    #[tokio::test]
    async fn update_cannot_invert_the_dates() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .patch_with_token(
                &routes::contest(contest_id),
                &json!({"end_date": "1999-01-01T00:00:00Z"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Contest end date must be after start date");
    }

    #[tokio::test]
    async fn participant_cannot_update_a_contest() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .patch_with_token(
                &routes::contest(contest_id),
                &json!({"name": "Hijacked"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod schedule_management {
    use super::*;

    #[tokio::test]
    async fn organizer_can_add_and_remove_events() {
        let app = TestApp::spawn().await;
        let organizer = app
            .create_user_with_role("orga", "securepass", "organizer")
            .await;
        let contest_id = app
            .create_contest(&organizer, "ACPC 2025", None, None, None)
            .await;

        let event = app
            .post_with_token(
                &routes::contest_schedule(contest_id),
                &valid_event_body("Lunch break", 1),
                &organizer,
            )
            .await;
        assert_eq!(event.status, 201, "Event creation failed: {}", event.text);
        assert_eq!(event.body["title"], "Lunch break");

        let removed = app
            .delete_with_token(
                &routes::contest_schedule_event(contest_id, event.id()),
                &organizer,
            )
            .await;
        assert_eq!(removed.status, 204, "Event removal failed: {}", removed.text);

        let contest = app.get_without_token(&routes::contest(contest_id)).await;
        assert!(contest.body["schedule"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn event_requires_a_known_type() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let mut body = valid_event_body("After party", 1);
        body["event_type"] = json!("party");

        let res = app
            .post_with_token(&routes::contest_schedule(contest_id), &body, &admin)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Invalid event type");
    }

    #[tokio::test]
    async fn removing_a_missing_event_returns_not_found() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .delete_with_token(&routes::contest_schedule_event(contest_id, 9999), &admin)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Schedule event not found");
    }

    #[tokio::test]
    async fn participant_cannot_manage_the_schedule() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let contest_id = app
            .create_contest(&admin, "ACPC 2025", None, None, None)
            .await;

        let res = app
            .post_with_token(
                &routes::contest_schedule(contest_id),
                &valid_event_body("Opening ceremony", 1),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}
