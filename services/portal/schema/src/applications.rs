use sea_orm::entity::prelude::*;

/// Admission application. Enum-valued columns hold SCREAMING_SNAKE_CASE text
/// (`"DRAFT"`, `"FEMALE"`, `"WASSCE"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub application_number: String,
    // personal
    pub first_name: String,
    pub surname: String,
    pub gender: String,
    pub date_of_birth: chrono::NaiveDate,
    pub email: String,
    pub telephone: String,
    pub nationality: String,
    pub address: String,
    pub gps_address: Option<String>,
    // guardian
    pub guardian_name: String,
    pub guardian_occupation: String,
    pub guardian_telephone: String,
    // education
    pub highest_education: String,
    pub year_completed: i32,
    // program
    pub program_type: String,
    pub specific_program: String,
    pub status: String,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
