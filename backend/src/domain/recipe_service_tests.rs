//! Tests for the recipe service.

use std::sync::{Arc, Mutex};

use super::*;
use crate::domain::ports::{
    MockImageStore, MockIngredientRepository, MockRecipeRepository, MockTagRepository,
};
use crate::domain::{
    CookingTime, ErrorCode, ImagePath, Ingredient, LabelName, Price, RecipeFields, RecipeTitle,
    Tag,
};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

const OWNER: UserId = UserId::new(1);

type Service = RecipeService<
    MockRecipeRepository,
    MockTagRepository,
    MockIngredientRepository,
    MockImageStore,
>;

struct Mocks {
    recipes: MockRecipeRepository,
    tags: MockTagRepository,
    ingredients: MockIngredientRepository,
    images: MockImageStore,
}

impl Mocks {
    fn new() -> Self {
        Self {
            recipes: MockRecipeRepository::new(),
            tags: MockTagRepository::new(),
            ingredients: MockIngredientRepository::new(),
            images: MockImageStore::new(),
        }
    }

    fn build(self) -> Service {
        RecipeService::new(
            Arc::new(self.recipes),
            Arc::new(self.tags),
            Arc::new(self.ingredients),
            Arc::new(self.images),
        )
    }
}

#[fixture]
fn fields() -> RecipeFields {
    RecipeFields {
        title: RecipeTitle::new("Sample recipe").expect("valid title"),
        time_minutes: CookingTime::new(10).expect("valid time"),
        price: Price::new(Decimal::from(5)).expect("valid price"),
        link: None,
    }
}

fn tag(id: i64) -> Tag {
    Tag::new(
        TagId::new(id),
        OWNER,
        LabelName::new(format!("tag {id}")).expect("valid name"),
    )
}

fn ingredient(id: i64) -> Ingredient {
    Ingredient::new(
        IngredientId::new(id),
        OWNER,
        LabelName::new(format!("ingredient {id}")).expect("valid name"),
    )
}

fn recipe_with(id: i64, fields: RecipeFields, tags: &[i64], ingredients: &[i64]) -> Recipe {
    Recipe::new(
        RecipeId::new(id),
        OWNER,
        fields,
        None,
        tags.iter().copied().map(tag).collect(),
        ingredients.iter().copied().map(ingredient).collect(),
    )
}

fn tags_owning(ids: &'static [i64]) -> MockTagRepository {
    let mut tags = MockTagRepository::new();
    tags.expect_find_owned().returning(move |_, requested| {
        Ok(requested
            .iter()
            .filter(|id| ids.contains(&id.get()))
            .map(|id| tag(id.get()))
            .collect())
    });
    tags
}

fn ingredients_owning(ids: &'static [i64]) -> MockIngredientRepository {
    let mut ingredients = MockIngredientRepository::new();
    ingredients
        .expect_find_owned()
        .returning(move |_, requested| {
            Ok(requested
                .iter()
                .filter(|id| ids.contains(&id.get()))
                .map(|id| ingredient(id.get()))
                .collect())
        });
    ingredients
}

#[rstest]
#[tokio::test]
async fn create_deduplicates_and_attaches_owned_labels(fields: RecipeFields) {
    let mut mocks = Mocks::new();
    mocks.tags = tags_owning(&[1, 2]);
    mocks.ingredients = ingredients_owning(&[5]);
    mocks
        .recipes
        .expect_insert()
        .withf(|_, _, tag_ids, ingredient_ids| {
            *tag_ids == [TagId::new(2), TagId::new(1)] && *ingredient_ids == [IngredientId::new(5)]
        })
        .times(1)
        .returning(|owner, fields, tag_ids, ingredient_ids| {
            Ok(Recipe::new(
                RecipeId::new(10),
                owner,
                fields.clone(),
                None,
                tag_ids.iter().map(|id| tag(id.get())).collect(),
                ingredient_ids.iter().map(|id| ingredient(id.get())).collect(),
            ))
        });
    let service = mocks.build();

    let draft = RecipeDraft {
        fields,
        tag_ids: vec![TagId::new(2), TagId::new(1), TagId::new(2)],
        ingredient_ids: vec![IngredientId::new(5)],
    };
    let recipe = service.create(OWNER, draft).await.expect("recipe created");

    assert_eq!(recipe.tags().len(), 2);
    assert_eq!(recipe.ingredients().len(), 1);
}

#[rstest]
#[tokio::test]
async fn create_rejects_labels_the_owner_does_not_have(fields: RecipeFields) {
    let mut mocks = Mocks::new();
    mocks.tags = tags_owning(&[1]);
    mocks.recipes.expect_insert().never();
    let service = mocks.build();

    let draft = RecipeDraft {
        fields,
        tag_ids: vec![TagId::new(1), TagId::new(7)],
        ingredient_ids: vec![],
    };
    let err = service
        .create(OWNER, draft)
        .await
        .expect_err("foreign tag rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "tags", "code": "unknown_tag", "ids": [7] }))
    );
}

#[rstest]
#[tokio::test]
async fn create_without_labels_skips_ownership_lookups(fields: RecipeFields) {
    let mut mocks = Mocks::new();
    mocks.tags.expect_find_owned().never();
    mocks.ingredients.expect_find_owned().never();
    mocks
        .recipes
        .expect_insert()
        .returning(|owner, fields, _, _| {
            Ok(Recipe::new(RecipeId::new(1), owner, fields.clone(), None, vec![], vec![]))
        });
    let service = mocks.build();

    let draft = RecipeDraft {
        fields,
        tag_ids: vec![],
        ingredient_ids: vec![],
    };
    service.create(OWNER, draft).await.expect("recipe created");
}

#[rstest]
#[tokio::test]
async fn partial_update_keeps_unmentioned_fields_and_associations(fields: RecipeFields) {
    let current = recipe_with(4, fields.clone(), &[1], &[2]);
    let captured: Arc<Mutex<Option<RecipeUpdate>>> = Arc::default();
    let sink = Arc::clone(&captured);

    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks
        .recipes
        .expect_update()
        .times(1)
        .returning(move |owner, id, update| {
            *sink.lock().expect("lock") = Some(update.clone());
            Ok(Some(Recipe::new(
                id,
                owner,
                update.fields.clone(),
                None,
                vec![tag(1)],
                vec![ingredient(2)],
            )))
        });
    let service = mocks.build();

    let patch = RecipePatch {
        title: Some(RecipeTitle::new("New title").expect("valid title")),
        ..RecipePatch::default()
    };
    let recipe = service
        .update_partial(OWNER, RecipeId::new(4), patch)
        .await
        .expect("updated");

    assert_eq!(recipe.title().as_str(), "New title");
    let update = captured.lock().expect("lock").clone().expect("update sent");
    assert_eq!(update.fields.time_minutes, fields.time_minutes);
    assert_eq!(update.fields.price, fields.price);
    assert_eq!(update.tag_ids, None);
    assert_eq!(update.ingredient_ids, None);
}

#[rstest]
#[tokio::test]
async fn full_update_clears_omitted_associations(fields: RecipeFields) {
    let current = recipe_with(4, fields.clone(), &[1, 2], &[3]);
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks
        .recipes
        .expect_update()
        .withf(|_, _, update| {
            update.tag_ids.as_deref() == Some(&[][..])
                && update.ingredient_ids.as_deref() == Some(&[][..])
        })
        .times(1)
        .returning(|owner, id, update| {
            Ok(Some(Recipe::new(
                id,
                owner,
                update.fields.clone(),
                None,
                vec![],
                vec![],
            )))
        });
    let service = mocks.build();

    let replacement = RecipeReplacement {
        fields,
        tag_ids: None,
        ingredient_ids: None,
    };
    let recipe = service
        .update_full(OWNER, RecipeId::new(4), replacement)
        .await
        .expect("replaced");

    assert!(recipe.tags().is_empty());
    assert!(recipe.ingredients().is_empty());
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_recipe_is_not_found() {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_find().returning(|_, _| Ok(None));
    mocks.recipes.expect_update().never();
    let service = mocks.build();

    let err = service
        .update_partial(OWNER, RecipeId::new(99), RecipePatch::default())
        .await
        .expect_err("missing recipe");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn attach_image_stores_bytes_under_a_fresh_name(fields: RecipeFields) {
    let current = recipe_with(3, fields, &[], &[]);
    let stored_path: Arc<Mutex<Option<ImagePath>>> = Arc::default();
    let sink = Arc::clone(&stored_path);

    let mut mocks = Mocks::new();
    let found = current.clone();
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(found.clone())));
    mocks
        .images
        .expect_store()
        .withf(|_, bytes| bytes == b"jpeg-bytes")
        .times(1)
        .returning(move |path, _| {
            *sink.lock().expect("lock") = Some(path.clone());
            Ok(())
        });
    mocks
        .recipes
        .expect_set_image()
        .times(1)
        .returning(move |owner, id, path| {
            Ok(Some(Recipe::new(
                id,
                owner,
                current.fields().clone(),
                Some(path.clone()),
                vec![],
                vec![],
            )))
        });
    let service = mocks.build();

    let upload = ImageUpload {
        filename: "photo.jpg".to_owned(),
        bytes: b"jpeg-bytes".to_vec(),
    };
    let recipe = service
        .attach_image(OWNER, RecipeId::new(3), upload)
        .await
        .expect("image attached");

    let path = stored_path.lock().expect("lock").clone().expect("stored");
    assert!(path.as_str().starts_with("uploads/recipe/"));
    assert!(path.as_str().ends_with(".jpg"));
    assert_eq!(recipe.image(), Some(&path));
}

#[rstest]
#[tokio::test]
async fn attach_image_rejects_empty_uploads() {
    let mut mocks = Mocks::new();
    mocks.images.expect_store().never();
    let service = mocks.build();

    let upload = ImageUpload {
        filename: "photo.jpg".to_owned(),
        bytes: Vec::new(),
    };
    let err = service
        .attach_image(OWNER, RecipeId::new(3), upload)
        .await
        .expect_err("empty upload");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn attach_image_to_foreign_recipe_writes_nothing() {
    let mut mocks = Mocks::new();
    mocks.recipes.expect_find().returning(|_, _| Ok(None));
    mocks.images.expect_store().never();
    let service = mocks.build();

    let upload = ImageUpload {
        filename: "photo.png".to_owned(),
        bytes: vec![1, 2, 3],
    };
    let err = service
        .attach_image(OWNER, RecipeId::new(3), upload)
        .await
        .expect_err("not owned");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_recipes(
    #[case] existed: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_delete()
        .times(1)
        .returning(move |_, _| Ok(existed));
    let service = mocks.build();

    let result = service.delete(OWNER, RecipeId::new(5)).await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn list_maps_connection_failures_to_service_unavailable() {
    let mut mocks = Mocks::new();
    mocks
        .recipes
        .expect_list()
        .returning(|_, _| Err(RecipeRepositoryError::connection("pool exhausted")));
    let service = mocks.build();

    let err = service
        .list(OWNER, RecipeFilter::default())
        .await
        .expect_err("connection failure");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
