pub mod auth;
pub mod contact;
pub mod contest;
pub mod guide;
pub mod registration;
pub mod team;
pub mod volunteer;
