use sea_orm::*;
use tracing::info;

use crate::config::AdminAccountConfig;
use crate::entity::user;
use crate::utils::hash;

/// Make sure the configured admin account exists and has admin rights.
///
/// An existing account with the same email is promoted; its password is left
/// untouched.
pub async fn ensure_admin(db: &DatabaseConnection, admin: &AdminAccountConfig) -> Result<(), DbErr> {
    let email = admin.email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;

    match existing {
        Some(u) if u.is_admin => {}
        Some(u) => {
            let mut active: user::ActiveModel = u.into();
            active.is_admin = Set(true);
            active.update(db).await?;
            info!("Promoted {} to admin", email);
        }
        None => {
            let password = hash::hash_password(&admin.password)
                .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;
            let model = user::ActiveModel {
                name: Set(admin.name.clone()),
                email: Set(email.clone()),
                password: Set(password),
                is_admin: Set(true),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };

            let result = user::Entity::insert(model)
                .on_conflict(
                    sea_orm::sea_query::OnConflict::column(user::Column::Email)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await;

            match result {
                Ok(_) => info!("Seeded admin account {}", email),
                Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
