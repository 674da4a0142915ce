use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ForumPosts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumPosts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumPosts::UserId).uuid().not_null())
                    .col(ColumnDef::new(ForumPosts::Title).string().not_null())
                    .col(ColumnDef::new(ForumPosts::Description).text().not_null())
                    .col(
                        ColumnDef::new(ForumPosts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_posts_user")
                            .from(ForumPosts::Table, ForumPosts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Answers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Answers::ForumPostId).integer().not_null())
                    .col(ColumnDef::new(Answers::UserId).uuid().not_null())
                    .col(ColumnDef::new(Answers::Description).text().not_null())
                    .col(
                        ColumnDef::new(Answers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_forum_post")
                            .from(Answers::Table, Answers::ForumPostId)
                            .to(ForumPosts::Table, ForumPosts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Answers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumPosts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ForumPosts {
    Table,
    Id,
    UserId,
    Title,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Answers {
    Table,
    Id,
    ForumPostId,
    UserId,
    Description,
    CreatedAt,
}
