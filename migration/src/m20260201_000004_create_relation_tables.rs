use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_table::Users;
use crate::m20260201_000003_create_recipe_tables::Recipes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The composite primary key is the uniqueness guard for toggles.
        for (table, fk_user, fk_recipe) in [
            (RecipeRelations::FavoriteRecipes, "fk_favorite_recipes_user_id", "fk_favorite_recipes_recipe_id"),
            (RecipeRelations::ShoppingRecipes, "fk_shopping_recipes_user_id", "fk_shopping_recipes_recipe_id"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(ColumnDef::new(RecipeRelations::UserId).big_integer().not_null())
                        .col(ColumnDef::new(RecipeRelations::RecipeId).big_integer().not_null())
                        .col(ColumnDef::new(RecipeRelations::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                        .primary_key(Index::create().col(RecipeRelations::UserId).col(RecipeRelations::RecipeId))
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_user)
                                .from(table, RecipeRelations::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk_recipe)
                                .from(table, RecipeRelations::RecipeId)
                                .to(Recipes::Table, Recipes::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(FollowUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FollowUsers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(FollowUsers::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(FollowUsers::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .primary_key(Index::create().col(FollowUsers::UserId).col(FollowUsers::AuthorId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_users_user_id")
                            .from(FollowUsers::Table, FollowUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_users_author_id")
                            .from(FollowUsers::Table, FollowUsers::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FollowUsers::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(RecipeRelations::ShoppingRecipes).to_owned()).await?;
        manager.drop_table(Table::drop().table(RecipeRelations::FavoriteRecipes).to_owned()).await
    }
}

#[derive(Iden, Clone, Copy)]
enum RecipeRelations {
    FavoriteRecipes,
    ShoppingRecipes,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum FollowUsers {
    Table,
    UserId,
    AuthorId,
    CreatedAt,
}
