use serde_json::{Value, json};

use crate::common::{TestApp, routes};

/// Baseline create-team payload with a full roster of three.
fn valid_team_body(name: &str) -> Value {
    json!({
        "name": name,
        "university": "Cairo University",
        "coach_name": "Dr. Hala Mostafa",
        "coach_email": "hala.mostafa@example.edu",
        "coach_phone": "+20-100-555-0100",
        "members": [
            {
                "name": "Layla Hassan",
                "email": "layla@example.edu",
                "student_id": "20231042",
                "year": 3,
                "major": "Computer Science",
            },
            {
                "name": "Karim Adel",
                "email": "karim@example.edu",
                "student_id": "20231043",
                "year": 2,
                "major": "Computer Science",
            },
            {
                "name": "Nour Ibrahim",
                "email": "nour@example.edu",
                "student_id": "20231044",
                "year": 4,
                "major": "Computer Engineering",
            },
        ],
    })
}

mod team_creation {
    use super::*;

    #[tokio::test]
    async fn team_is_created_with_roster_and_pending_status() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_with_token(routes::TEAMS, &valid_team_body("Falcons"), &token)
            .await;

        assert_eq!(res.status, 201, "Team creation failed: {}", res.text);
        assert_eq!(res.body["name"], "Falcons");
        assert_eq!(res.body["university"], "Cairo University");
        assert_eq!(res.body["status"], "pending");
        let members = res.body["members"].as_array().unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0]["role"], "captain");
        assert_eq!(members[1]["role"], "member");
        assert_eq!(members[2]["role"], "member");
    }

    #[tokio::test]
    async fn team_requires_exactly_three_members() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut body = valid_team_body("Falcons");
        body["members"].as_array_mut().unwrap().pop();

        let res = app.post_with_token(routes::TEAMS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Team must have exactly 3 members");
    }

    #[tokio::test]
    async fn four_members_are_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut body = valid_team_body("Falcons");
        let extra = body["members"][0].clone();
        body["members"].as_array_mut().unwrap().push(extra);

        let res = app.post_with_token(routes::TEAMS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Team must have exactly 3 members");
    }

    #[tokio::test]
    async fn blank_team_information_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut body = valid_team_body("Falcons");
        body["university"] = json!("   ");

        let res = app.post_with_token(routes::TEAMS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "All team information fields are required");
    }

    #[tokio::test]
    async fn blank_member_information_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut body = valid_team_body("Falcons");
        body["members"][1]["email"] = json!("");

        let res = app.post_with_token(routes::TEAMS, &body, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "All member information is required");
    }

    #[tokio::test]
    async fn creation_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::TEAMS, &valid_team_body("Falcons"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn failed_creation_leaves_no_partial_team() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let mut body = valid_team_body("Falcons");
        body["members"].as_array_mut().unwrap().pop();
        let res = app.post_with_token(routes::TEAMS, &body, &token).await;
        assert_eq!(res.status, 400);

        let list = app.get_without_token(routes::TEAMS).await;
        assert_eq!(list.body["pagination"]["total"], 0);
    }
}

mod team_queries {
    use super::*;

    #[tokio::test]
    async fn teams_are_listed_publicly_as_summaries() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        app.create_team(&token, "Falcons").await;
        app.create_team(&token, "Owls").await;

        let res = app.get_without_token(routes::TEAMS).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert!(data[0]["members"].is_null());
        assert!(data[0]["id"].is_number());
        assert!(data[0]["status"].is_string());
    }

    #[tokio::test]
    async fn get_team_returns_roster_publicly() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let res = app.get_without_token(&routes::team(team_id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Falcons");
        let members = res.body["members"].as_array().unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[0]["role"], "captain");
    }

    #[tokio::test]
    async fn missing_team_returns_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::team(9999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Team not found");
    }

    #[tokio::test]
    async fn my_teams_returns_only_the_callers_teams() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        app.create_team(&alice, "Falcons").await;
        app.create_team(&bob, "Owls").await;

        let res = app.get_with_token(routes::MY_TEAMS, &alice).await;

        assert_eq!(res.status, 200);
        let teams = res.body.as_array().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0]["name"], "Falcons");
        assert_eq!(teams[0]["members"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn my_teams_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::MY_TEAMS).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod team_review {
    use super::*;

    #[tokio::test]
    async fn manager_can_approve_a_team() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let res = app
            .patch_with_token(
                &routes::team_status(team_id),
                &json!({"status": "approved"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 200, "Status update failed: {}", res.text);
        assert_eq!(res.body["status"], "approved");
    }

    #[tokio::test]
    async fn owner_cannot_review_their_own_team() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let res = app
            .patch_with_token(
                &routes::team_status(team_id),
                &json!({"status": "approved"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let res = app
            .patch_with_token(
                &routes::team_status(team_id),
                &json!({"status": "maybe"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Invalid status");
    }

    #[tokio::test]
    async fn review_of_missing_team_returns_not_found() {
        let app = TestApp::spawn().await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let res = app
            .patch_with_token(
                &routes::team_status(9999),
                &json!({"status": "approved"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Team not found");
    }
}

mod roster_changes {
    use super::*;

    fn new_member() -> Value {
        json!({
            "name": "Salma Tarek",
            "email": "salma@example.edu",
            "student_id": "20231099",
            "year": 2,
            "major": "Computer Science",
        })
    }

    #[tokio::test]
    async fn owner_can_refill_the_roster_after_a_removal() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let team = app.get_without_token(&routes::team(team_id)).await;
        let member_id = team.body["members"][2]["id"].as_i64().unwrap() as i32;

        let removed = app
            .delete_with_token(&routes::team_member(team_id, member_id), &token)
            .await;
        assert_eq!(removed.status, 204, "Removal failed: {}", removed.text);

        let added = app
            .post_with_token(&routes::team_members(team_id), &new_member(), &token)
            .await;
        assert_eq!(added.status, 201, "Add member failed: {}", added.text);
        assert_eq!(added.body["role"], "member");

        let after = app.get_without_token(&routes::team(team_id)).await;
        assert_eq!(after.body["members"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn full_roster_cannot_take_a_fourth_member() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let res = app
            .post_with_token(&routes::team_members(team_id), &new_member(), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "Team already has 3 members (maximum limit)"
        );
    }

    #[tokio::test]
    async fn non_owner_cannot_modify_the_roster() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let team_id = app.create_team(&alice, "Falcons").await;

        let res = app
            .post_with_token(&routes::team_members(team_id), &new_member(), &bob)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
        assert_eq!(res.body["message"], "You can only manage your own team");
    }

    #[tokio::test]
    async fn team_manager_can_modify_any_roster() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&alice, "Falcons").await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;

        let team = app.get_without_token(&routes::team(team_id)).await;
        let member_id = team.body["members"][1]["id"].as_i64().unwrap() as i32;

        let res = app
            .delete_with_token(&routes::team_member(team_id, member_id), &admin)
            .await;

        assert_eq!(res.status, 204, "Removal failed: {}", res.text);
    }

    #[tokio::test]
    async fn removing_a_missing_member_returns_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let res = app
            .delete_with_token(&routes::team_member(team_id, 9999), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["message"], "Team member not found");
    }
}

mod team_deletion {
    use super::*;

    #[tokio::test]
    async fn owner_can_delete_their_team() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_team(&token, "Falcons").await;

        let res = app.delete_with_token(&routes::team(team_id), &token).await;
        assert_eq!(res.status, 204, "Deletion failed: {}", res.text);

        let after = app.get_without_token(&routes::team(team_id)).await;
        assert_eq!(after.status, 404);
    }

    #[tokio::test]
    async fn deleting_a_team_removes_its_registrations() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;
        let team_id = app.create_approved_team(&token, "Falcons").await;
        let admin = app
            .create_user_with_role("admin", "securepass", "admin")
            .await;
        let contest_id = app
            .create_contest(
                &admin,
                "ACPC 2025",
                Some("2000-01-01T00:00:00Z"),
                Some("2099-01-01T00:00:00Z"),
                None,
            )
            .await;

        let registration = app
            .post_with_token(
                routes::REGISTRATIONS,
                &json!({"team": team_id, "contest": contest_id}),
                &token,
            )
            .await;
        assert_eq!(
            registration.status, 201,
            "Registration failed: {}",
            registration.text
        );

        let res = app.delete_with_token(&routes::team(team_id), &token).await;
        assert_eq!(res.status, 204, "Deletion failed: {}", res.text);

        let after = app
            .get_without_token(&routes::registration(registration.id()))
            .await;
        assert_eq!(after.status, 404);
        assert_eq!(after.body["message"], "Registration not found");
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_a_team() {
        let app = TestApp::spawn().await;
        let alice = app.create_authenticated_user("alice", "securepass").await;
        let bob = app.create_authenticated_user("bob", "securepass").await;
        let team_id = app.create_team(&alice, "Falcons").await;

        let res = app.delete_with_token(&routes::team(team_id), &bob).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["message"], "You can only manage your own team");
    }
}
