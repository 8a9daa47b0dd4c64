//! Category translation entity - Localised display name of a category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category translation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_translations")]
pub struct Model {
    /// Unique identifier for the translation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// ID of the translated category
    pub category_id: Uuid,
    /// Language code (e.g. `"en"`, `"hr"`)
    pub language: String,
    /// Display name in that language
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each translation belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
