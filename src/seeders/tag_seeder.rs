use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use slug::slugify;

use crate::entities::tag;
use crate::seeders::SeedError;

const DEFAULT_TAGS: [(&str, &str); 3] = [
    ("Breakfast", "#E26C2D"),
    ("Lunch", "#49B64E"),
    ("Dinner", "#8775D2"),
];

pub async fn seed_tags(db: &DatabaseConnection) -> Result<(), SeedError> {
    for (name, color) in DEFAULT_TAGS {
        let slug = slugify(name);
        let exists = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug.as_str()))
            .one(db)
            .await?;

        if exists.is_none() {
            let new_tag = tag::ActiveModel {
                name: Set(name.to_string()),
                color: Set(color.to_string()),
                slug: Set(slug),
                ..Default::default()
            };
            new_tag.insert(db).await?;
            tracing::info!("Seeded tag: {}", name);
        }
    }

    Ok(())
}
