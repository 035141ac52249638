pub mod contact_message;
pub mod contest;
pub mod contest_registration;
pub mod guide;
pub mod role;
pub mod role_permission;
pub mod schedule_event;
pub mod team;
pub mod team_member;
pub mod user;
pub mod volunteer_application;
