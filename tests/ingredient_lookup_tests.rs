mod common;

use common::*;
use foodgram::error::AppError;
use foodgram::models::catalog_model::{CreateIngredientRequest, CreateTagRequest};
use foodgram::services::ingredient_service::IngredientService;
use foodgram::services::tag_service::TagService;

fn names(items: &[foodgram::models::catalog_model::IngredientResponse]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn earlier_match_ranks_first() {
    let db = setup_db().await;
    create_ingredient(&db, "Grape", "pcs").await;
    create_ingredient(&db, "Apple", "pcs").await;
    create_ingredient(&db, "Salt", "g").await;

    let found = IngredientService::search(&db, Some("ap")).await.unwrap();
    assert_eq!(names(&found), vec!["Apple", "Grape"]);
}

#[tokio::test]
async fn ties_break_by_name_and_search_ignores_case() {
    let db = setup_db().await;
    create_ingredient(&db, "milk chocolate", "g").await;
    create_ingredient(&db, "Milk", "ml").await;
    create_ingredient(&db, "buttermilk", "ml").await;

    let found = IngredientService::search(&db, Some("MILK")).await.unwrap();
    assert_eq!(names(&found), vec!["Milk", "milk chocolate", "buttermilk"]);
}

#[tokio::test]
async fn without_term_everything_is_listed_by_name() {
    let db = setup_db().await;
    create_ingredient(&db, "salt", "g").await;
    create_ingredient(&db, "apple", "pcs").await;

    let all = IngredientService::search(&db, None).await.unwrap();
    assert_eq!(names(&all), vec!["apple", "salt"]);

    let blank = IngredientService::search(&db, Some("  ")).await.unwrap();
    assert_eq!(blank.len(), 2);
}

#[tokio::test]
async fn like_wildcards_match_literally() {
    let db = setup_db().await;
    create_ingredient(&db, "50% cream", "ml").await;
    create_ingredient(&db, "cream", "ml").await;

    let found = IngredientService::search(&db, Some("%")).await.unwrap();
    assert_eq!(names(&found), vec!["50% cream"]);
}

#[tokio::test]
async fn cyrillic_search_ignores_case() {
    let db = setup_db().await;
    create_ingredient(&db, "Яблоко", "шт").await;
    create_ingredient(&db, "Груша", "шт").await;

    let lower = IngredientService::search(&db, Some("яб")).await.unwrap();
    assert_eq!(names(&lower), vec!["Яблоко"]);

    let upper = IngredientService::search(&db, Some("Яб")).await.unwrap();
    assert_eq!(names(&upper), vec!["Яблоко"]);

    let inner = IngredientService::search(&db, Some("ША")).await.unwrap();
    assert_eq!(names(&inner), vec!["Груша"]);
}

#[tokio::test]
async fn catalog_writes_require_staff() {
    let db = setup_db().await;
    let user = create_user(&db, "cook", false).await;
    let staff = create_user(&db, "admin", true).await;

    let req = || CreateIngredientRequest {
        name: "Saffron".to_string(),
        measurement_unit: "g".to_string(),
    };
    let err = IngredientService::create(&db, &user, req()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(..)));

    let created = IngredientService::create(&db, &staff, req()).await.unwrap();
    assert_eq!(IngredientService::get(&db, created.id).await.unwrap().name, "Saffron");

    let tag = TagService::create(
        &db,
        &staff,
        CreateTagRequest {
            name: "Late Snack".to_string(),
            color: "#abcdef".to_string(),
            slug: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(tag.slug, "late-snack");
    assert_eq!(tag.color, "#ABCDEF");
    assert_eq!(TagService::get_by_slug(&db, "late-snack").await.unwrap().id, tag.id);

    let err = TagService::create(
        &db,
        &staff,
        CreateTagRequest {
            name: "Another".to_string(),
            color: "#000".to_string(),
            slug: Some("late-snack".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref d) if d[0].field == "slug"));
}
