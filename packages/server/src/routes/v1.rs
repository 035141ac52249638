use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/teams", team_routes())
        .nest("/contests", contest_routes())
        .nest("/contest-registrations", registration_routes())
        .nest("/volunteer-applications", volunteer_routes())
        .nest("/contact-messages", contact_routes())
        .nest("/guide", guide_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn team_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::team::list_teams,
            handlers::team::create_team
        ))
        .routes(routes!(handlers::team::my_teams))
        .routes(routes!(
            handlers::team::get_team,
            handlers::team::delete_team
        ))
        .routes(routes!(handlers::team::update_team_status))
        .routes(routes!(handlers::team::add_team_member))
        .routes(routes!(handlers::team::remove_team_member))
}

fn contest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::contest::list_contests,
            handlers::contest::create_contest
        ))
        .routes(routes!(handlers::contest::get_active_contest))
        .routes(routes!(
            handlers::contest::get_contest,
            handlers::contest::update_contest
        ))
        .routes(routes!(handlers::contest::add_schedule_event))
        .routes(routes!(handlers::contest::remove_schedule_event))
}

fn registration_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::registration::list_registrations,
            handlers::registration::create_registration
        ))
        .routes(routes!(
            handlers::registration::get_registration,
            handlers::registration::update_registration
        ))
}

fn volunteer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::volunteer::list_volunteer_applications,
            handlers::volunteer::create_volunteer_application
        ))
        .routes(routes!(
            handlers::volunteer::get_volunteer_application,
            handlers::volunteer::update_volunteer_application,
            handlers::volunteer::delete_volunteer_application
        ))
        .routes(routes!(
            handlers::volunteer::update_volunteer_application_status
        ))
}

fn contact_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::contact::list_contact_messages,
            handlers::contact::create_contact_message
        ))
        .routes(routes!(handlers::contact::update_contact_message_status))
}

fn guide_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::guide::get_guide,
        handlers::guide::put_guide
    ))
}
