use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{contest_registration, role, role_permission};

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &["admin", "organizer", "participant"];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: all permissions
    ("admin", "team:manage"),
    ("admin", "contest:manage"),
    ("admin", "registration:manage"),
    ("admin", "volunteer:manage"),
    ("admin", "contact:manage"),
    ("admin", "content:manage"),
    // Organizer: everything except overriding team ownership
    ("organizer", "contest:manage"),
    ("organizer", "registration:manage"),
    ("organizer", "volunteer:manage"),
    ("organizer", "contact:manage"),
    ("organizer", "content:manage"),
    // Participants hold no standing permissions; ownership checks cover them
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Seed roles
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => roles_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    // Seed role-permission mappings
    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => perms_inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we create
/// them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One registration per (team, contest). The registration endpoint relies
    // on this to close the race between its duplicate pre-check and insert,
    // so startup fails if the index cannot be created.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("uq_contest_registration_team_contest")
        .table(contest_registration::Entity)
        .col(contest_registration::Column::TeamId)
        .col(contest_registration::Column::ContestId)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured unique index uq_contest_registration_team_contest exists");

    // Composite index for capacity counts:
    // SELECT COUNT(*) FROM contest_registration
    //   WHERE contest_id = ? AND status IN ('pending', 'approved')
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_contest_registration_contest_status")
        .table(contest_registration::Entity)
        .col(contest_registration::Column::ContestId)
        .col(contest_registration::Column::Status)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_contest_registration_contest_status exists");
        }
        Err(e) => {
            tracing::warn!(
                "Failed to create index idx_contest_registration_contest_status: {}",
                e
            );
        }
    }

    Ok(())
}
