mod common;

use common::*;
use foodgram::config::AnonymousFilterPolicy;
use foodgram::entities::{favorite_recipe, shopping_recipe};
use foodgram::error::AppError;
use foodgram::services::recipe_filter::RecipeFilter;
use foodgram::services::recipe_service::RecipeService;

fn query(raw: &[(&str, &str)]) -> RecipeFilter {
    let pairs: Vec<(String, String)> = raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    RecipeFilter::from_query(&pairs).unwrap()
}

fn ids(page: &foodgram::models::pagination_model::Page<foodgram::models::recipe_model::RecipeResponse>) -> Vec<i64> {
    page.data.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn tag_filter_is_or_across_slugs_without_duplicates() {
    let db = setup_db().await;
    let cfg = test_config();
    let author = create_user(&db, "chef", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;
    let breakfast = create_tag(&db, "Breakfast", "breakfast").await;
    let lunch = create_tag(&db, "Lunch", "lunch").await;
    let dinner = create_tag(&db, "Dinner", "dinner").await;

    let both = create_recipe(&db, &author, "Both", &[(salt.id, 1)], &[breakfast.id, lunch.id]).await;
    let only_lunch = create_recipe(&db, &author, "Lunch only", &[(salt.id, 1)], &[lunch.id]).await;
    let only_dinner = create_recipe(&db, &author, "Dinner only", &[(salt.id, 1)], &[dinner.id]).await;
    let untagged = create_recipe(&db, &author, "Untagged", &[(salt.id, 1)], &[]).await;

    let filter = query(&[("tags", "breakfast"), ("tags", "lunch")]);
    let page = RecipeService::list(&db, &cfg, &filter, None).await.unwrap();

    let found = ids(&page);
    assert_eq!(found, vec![only_lunch.id, both.id]);
    assert_eq!(page.meta.total, 2);
    assert!(!found.contains(&only_dinner.id));
    assert!(!found.contains(&untagged.id));
}

#[tokio::test]
async fn newest_recipes_come_first_and_author_filter_matches_exactly() {
    let db = setup_db().await;
    let cfg = test_config();
    let alice = create_user(&db, "alice", false).await;
    let bob = create_user(&db, "bob", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;

    let first = create_recipe(&db, &alice, "First", &[(salt.id, 1)], &[]).await;
    let second = create_recipe(&db, &bob, "Second", &[(salt.id, 1)], &[]).await;
    let third = create_recipe(&db, &alice, "Third", &[(salt.id, 1)], &[]).await;

    let all = RecipeService::list(&db, &cfg, &RecipeFilter::default(), None).await.unwrap();
    assert_eq!(ids(&all), vec![third.id, second.id, first.id]);

    let author_id = alice.id.to_string();
    let by_alice = query(&[("author", author_id.as_str())]);
    let page = RecipeService::list(&db, &cfg, &by_alice, None).await.unwrap();
    assert_eq!(ids(&page), vec![third.id, first.id]);
}

#[tokio::test]
async fn relation_filters_use_the_viewer_and_compose() {
    let db = setup_db().await;
    let cfg = test_config();
    let author = create_user(&db, "chef", false).await;
    let viewer = create_user(&db, "viewer", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;

    let fav = create_recipe(&db, &author, "Fav", &[(salt.id, 1)], &[]).await;
    let both = create_recipe(&db, &author, "Both", &[(salt.id, 1)], &[]).await;
    let _plain = create_recipe(&db, &author, "Plain", &[(salt.id, 1)], &[]).await;

    RecipeService::add_relation::<favorite_recipe::Entity>(&db, viewer.id, fav.id).await.unwrap();
    RecipeService::add_relation::<favorite_recipe::Entity>(&db, viewer.id, both.id).await.unwrap();
    RecipeService::add_relation::<shopping_recipe::Entity>(&db, viewer.id, both.id).await.unwrap();

    let favorites = query(&[("is_favorited", "1")]);
    let page = RecipeService::list(&db, &cfg, &favorites, Some(viewer.id)).await.unwrap();
    assert_eq!(ids(&page), vec![both.id, fav.id]);
    assert!(page.data.iter().all(|r| r.is_favorited));

    let fav_and_cart = query(&[("is_favorited", "true"), ("is_in_shopping_cart", "1")]);
    let page = RecipeService::list(&db, &cfg, &fav_and_cart, Some(viewer.id)).await.unwrap();
    assert_eq!(ids(&page), vec![both.id]);
    assert!(page.data[0].is_in_shopping_cart);

    // Another user's favorites are empty.
    let page = RecipeService::list(&db, &cfg, &favorites, Some(author.id)).await.unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn anonymous_relation_filter_follows_configured_policy() {
    let db = setup_db().await;
    let mut cfg = test_config();
    let author = create_user(&db, "chef", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;
    create_recipe(&db, &author, "Soup", &[(salt.id, 1)], &[]).await;

    let favorites = query(&[("is_favorited", "1")]);

    let page = RecipeService::list(&db, &cfg, &favorites, None).await.unwrap();
    assert_eq!(page.data.len(), 1);

    cfg.anonymous_filter_policy = AnonymousFilterPolicy::Reject;
    let err = RecipeService::list(&db, &cfg, &favorites, None).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized("AUTH_REQUIRED", _)));
}

#[tokio::test]
async fn pagination_clamps_limit_and_links_pages() {
    let db = setup_db().await;
    let cfg = test_config();
    let author = create_user(&db, "chef", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;
    for i in 0..5 {
        create_recipe(&db, &author, &format!("Recipe {}", i), &[(salt.id, 1)], &[]).await;
    }

    let filter = query(&[("page", "2"), ("limit", "2")]);
    let page = RecipeService::list(&db, &cfg, &filter, None).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.total, 5);
    assert_eq!(page.meta.next, Some(3));
    assert_eq!(page.meta.previous, Some(1));

    let zero = query(&[("limit", "0")]);
    let page = RecipeService::list(&db, &cfg, &zero, None).await.unwrap();
    assert_eq!(page.meta.limit, 1);
    assert_eq!(page.data.len(), 1);
}

#[tokio::test]
async fn page_beyond_the_addressable_range_is_a_field_error() {
    let db = setup_db().await;
    let cfg = test_config();
    let author = create_user(&db, "chef", false).await;
    let salt = create_ingredient(&db, "salt", "g").await;
    create_recipe(&db, &author, "Only", &[(salt.id, 1)], &[]).await;

    let huge = u64::MAX.to_string();
    let filter = query(&[("page", huge.as_str())]);
    let err = RecipeService::list(&db, &cfg, &filter, None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref d) if d[0].field == "page"));

    let filter = query(&[("page", huge.as_str()), ("limit", "1")]);
    let err = RecipeService::list(&db, &cfg, &filter, None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref d) if d[0].field == "page"));
}
