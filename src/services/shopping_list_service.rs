use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::*;

use crate::entities::{ingredient, ingredient_amount, recipe, shopping_recipe};

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl ShoppingListItem {
    pub fn to_line(&self) -> String {
        format!("{} - {} {}", capitalize(&self.name), self.total_amount, self.measurement_unit)
    }
}

pub struct ShoppingListService;

impl ShoppingListService {
    /// Sums the ingredients of every recipe in `user_id`'s cart, one item per
    /// (name, unit) pair, ordered by name ignoring case.
    pub async fn aggregate<C>(db: &C, user_id: i64) -> Result<Vec<ShoppingListItem>, DbErr>
    where
        C: ConnectionTrait,
    {
        ingredient_amount::Entity::find()
            .select_only()
            .column_as(ingredient::Column::Name, "name")
            .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
            .column_as(
                Expr::col((ingredient_amount::Entity, ingredient_amount::Column::Amount)).sum(),
                "total_amount",
            )
            .join(JoinType::InnerJoin, ingredient_amount::Relation::Ingredient.def())
            .join(JoinType::InnerJoin, ingredient_amount::Relation::Recipe.def())
            .join(JoinType::InnerJoin, recipe::Relation::ShoppingRecipe.def())
            .filter(shopping_recipe::Column::UserId.eq(user_id))
            .group_by(ingredient::Column::Name)
            .group_by(ingredient::Column::MeasurementUnit)
            .order_by_asc(SimpleExpr::from(Func::lower(Expr::col((
                ingredient::Entity,
                ingredient::Column::Name,
            )))))
            .order_by_asc(ingredient::Column::MeasurementUnit)
            .into_model::<ShoppingListItem>()
            .all(db)
            .await
    }

    /// Plain-text body of the cart download. An empty list renders as "".
    pub fn render(items: &[ShoppingListItem]) -> String {
        items.iter().map(|item| format!("{}\n", item.to_line())).collect()
    }

    pub async fn export<C>(db: &C, user_id: i64) -> Result<String, DbErr>
    where
        C: ConnectionTrait,
    {
        let items = Self::aggregate(db, user_id).await?;
        tracing::info!("Shopping list exported for user {} ({} lines)", user_id, items.len());
        Ok(Self::render(&items))
    }
}

/// Uppercases the first character only; the rest is left as stored.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize("salt"), "Salt");
        assert_eq!(capitalize("black PEPPER"), "Black PEPPER");
        assert_eq!(capitalize("яблоко"), "Яблоко");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn renders_one_line_per_item() {
        let body = ShoppingListService::render(&[item("salt", "g", 15), item("Milk", "ml", 200)]);
        assert_eq!(body, "Salt - 15 g\nMilk - 200 ml\n");
    }

    #[test]
    fn empty_list_renders_empty_body() {
        assert_eq!(ShoppingListService::render(&[]), "");
    }
}
