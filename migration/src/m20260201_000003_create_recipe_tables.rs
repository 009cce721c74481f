use sea_orm_migration::prelude::*;

use crate::m20220101_000001_create_table::Users;
use crate::m20260201_000002_create_catalog_tables::{Ingredients, Tags};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipes::Id).big_integer().not_null().auto_increment().primary_key())
                    // Recipes outlive their author
                    .col(ColumnDef::new(Recipes::AuthorId).big_integer().null())
                    .col(ColumnDef::new(Recipes::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Recipes::Image).text().not_null())
                    .col(ColumnDef::new(Recipes::Text).text().not_null())
                    .col(ColumnDef::new(Recipes::CookingTime).integer().not_null())
                    .col(ColumnDef::new(Recipes::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipes_author_id")
                            .from(Recipes::Table, Recipes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipes_created_at")
                    .table(Recipes::Table)
                    .col(Recipes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RecipeTags::RecipeId).big_integer().not_null())
                    .col(ColumnDef::new(RecipeTags::TagId).big_integer().not_null())
                    .primary_key(Index::create().col(RecipeTags::RecipeId).col(RecipeTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_recipe_id")
                            .from(RecipeTags::Table, RecipeTags::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_tags_tag_id")
                            .from(RecipeTags::Table, RecipeTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No unique (recipe, ingredient) constraint; the writer merges duplicates.
        manager
            .create_table(
                Table::create()
                    .table(IngredientAmounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IngredientAmounts::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(IngredientAmounts::RecipeId).big_integer().not_null())
                    .col(ColumnDef::new(IngredientAmounts::IngredientId).big_integer().not_null())
                    .col(ColumnDef::new(IngredientAmounts::Amount).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredient_amounts_recipe_id")
                            .from(IngredientAmounts::Table, IngredientAmounts::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ingredient_amounts_ingredient_id")
                            .from(IngredientAmounts::Table, IngredientAmounts::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredient_amounts_recipe_id")
                    .table(IngredientAmounts::Table)
                    .col(IngredientAmounts::RecipeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(IngredientAmounts::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(RecipeTags::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Recipes::Table).to_owned()).await
    }
}

#[derive(Iden)]
pub enum Recipes {
    Table,
    Id,
    AuthorId,
    Name,
    Image,
    Text,
    CookingTime,
    CreatedAt,
}

#[derive(Iden)]
enum RecipeTags {
    Table,
    RecipeId,
    TagId,
}

#[derive(Iden)]
enum IngredientAmounts {
    Table,
    Id,
    RecipeId,
    IngredientId,
    Amount,
}
