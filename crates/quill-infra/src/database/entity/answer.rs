//! Forum answer entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub forum_post_id: i32,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::forum_post::Entity",
        from = "Column::ForumPostId",
        to = "super::forum_post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    ForumPost,
}

impl Related<super::forum_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForumPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Answer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            forum_post_id: model.forum_post_id,
            user_id: model.user_id,
            description: model.description,
            created_at: model.created_at.into(),
        }
    }
}
