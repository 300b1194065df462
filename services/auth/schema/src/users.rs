use sea_orm::entity::prelude::*;

/// Credential record. `password` holds an Argon2 PHC string and stays NULL until the
/// account owner creates one (social accounts may never have one).
///
/// `status` / `role` are `u8` wire values of the domain enums.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password: Option<String>,
    pub status: i16,
    pub role: i16,
    pub provider: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub email_verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
