//! PostgreSQL-backed `RecipeRepository` implementation.
//!
//! Recipe rows and their junction rows are written in one transaction. Reads
//! fetch the recipe rows first and then resolve every tag and ingredient for
//! the whole page with one join per junction table.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError, RecipeUpdate};
use crate::domain::{
    CookingTime, ImagePath, Ingredient, IngredientId, LabelName, Price, Recipe, RecipeFields,
    RecipeFilter, RecipeId, RecipeLink, RecipeTitle, Tag, TagId, UserId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeChangeset, RecipeIngredientRow, RecipeRow, RecipeTagRow,
    TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

/// A recipe row together with its resolved association rows.
#[derive(Debug)]
struct RecipeBundle {
    row: RecipeRow,
    tags: Vec<TagRow>,
    ingredients: Vec<IngredientRow>,
}

fn stored<T, E: std::fmt::Display>(
    result: Result<T, E>,
    column: &str,
) -> Result<T, RecipeRepositoryError> {
    result.map_err(|err| RecipeRepositoryError::query(format!("stored {column} invalid: {err}")))
}

fn row_to_fields(row: &RecipeRow) -> Result<RecipeFields, RecipeRepositoryError> {
    Ok(RecipeFields {
        title: stored(RecipeTitle::new(&row.title), "title")?,
        time_minutes: stored(CookingTime::new(i64::from(row.time_minutes)), "time_minutes")?,
        price: stored(Price::new(row.price), "price")?,
        link: row
            .link
            .as_deref()
            .map(|link| stored(RecipeLink::new(link), "link"))
            .transpose()?,
    })
}

fn bundle_to_recipe(bundle: RecipeBundle) -> Result<Recipe, RecipeRepositoryError> {
    let RecipeBundle {
        row,
        tags: tag_rows,
        ingredients: ingredient_rows,
    } = bundle;
    let fields = row_to_fields(&row)?;
    let tags = tag_rows
        .into_iter()
        .map(|tag| {
            Ok(Tag::new(
                TagId::new(tag.id),
                UserId::new(tag.user_id),
                stored(LabelName::new(&tag.name), "tag name")?,
            ))
        })
        .collect::<Result<Vec<_>, RecipeRepositoryError>>()?;
    let ingredients = ingredient_rows
        .into_iter()
        .map(|ingredient| {
            Ok(Ingredient::new(
                IngredientId::new(ingredient.id),
                UserId::new(ingredient.user_id),
                stored(LabelName::new(&ingredient.name), "ingredient name")?,
            ))
        })
        .collect::<Result<Vec<_>, RecipeRepositoryError>>()?;

    Ok(Recipe::new(
        RecipeId::new(row.id),
        UserId::new(row.user_id),
        fields,
        row.image.map(ImagePath::from_stored),
        tags,
        ingredients,
    ))
}

fn changeset(fields: &RecipeFields) -> RecipeChangeset<'_> {
    RecipeChangeset {
        title: fields.title.as_str(),
        time_minutes: fields.time_minutes.minutes(),
        price: fields.price.amount(),
        link: fields.link.as_ref().map(RecipeLink::as_str),
    }
}

/// Attach association rows to each recipe row, preserving row order.
async fn load_bundles(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> QueryResult<Vec<RecipeBundle>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

    let tag_links: Vec<(i64, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .load(conn)
        .await?;
    let ingredient_links: Vec<(i64, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .select((recipe_ingredients::recipe_id, IngredientRow::as_select()))
        .load(conn)
        .await?;

    let mut tags_by_recipe: HashMap<i64, Vec<TagRow>> = HashMap::new();
    for (recipe_id, tag) in tag_links {
        tags_by_recipe.entry(recipe_id).or_default().push(tag);
    }
    let mut ingredients_by_recipe: HashMap<i64, Vec<IngredientRow>> = HashMap::new();
    for (recipe_id, ingredient) in ingredient_links {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(ingredient);
    }

    Ok(rows
        .into_iter()
        .map(|row| RecipeBundle {
            tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
            ingredients: ingredients_by_recipe.remove(&row.id).unwrap_or_default(),
            row,
        })
        .collect())
}

async fn load_bundle(conn: &mut AsyncPgConnection, row: RecipeRow) -> QueryResult<RecipeBundle> {
    load_bundles(conn, vec![row])
        .await?
        .pop()
        .ok_or(DieselError::NotFound)
}

async fn replace_tags(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tag_ids: &[TagId],
) -> QueryResult<()> {
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    insert_tags(conn, recipe_id, tag_ids).await
}

async fn insert_tags(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tag_ids: &[TagId],
) -> QueryResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<RecipeTagRow> = tag_ids
        .iter()
        .map(|tag_id| RecipeTagRow {
            recipe_id,
            tag_id: tag_id.get(),
        })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

async fn replace_ingredients(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    ingredient_ids: &[IngredientId],
) -> QueryResult<()> {
    diesel::delete(
        recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
    )
    .execute(conn)
    .await?;
    insert_ingredients(conn, recipe_id, ingredient_ids).await
}

async fn insert_ingredients(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    ingredient_ids: &[IngredientId],
) -> QueryResult<()> {
    if ingredient_ids.is_empty() {
        return Ok(());
    }
    let links: Vec<RecipeIngredientRow> = ingredient_ids
        .iter()
        .map(|ingredient_id| RecipeIngredientRow {
            recipe_id,
            ingredient_id: ingredient_id.get(),
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(
        &self,
        owner: UserId,
        fields: &RecipeFields,
        tag_ids: &[TagId],
        ingredient_ids: &[IngredientId],
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewRecipeRow {
            user_id: owner.get(),
            title: fields.title.as_str(),
            time_minutes: fields.time_minutes.minutes(),
            price: fields.price.amount(),
            link: fields.link.as_ref().map(RecipeLink::as_str),
        };

        let bundle = conn
            .transaction(|tx| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(tx)
                        .await?;
                    insert_tags(tx, row.id, tag_ids).await?;
                    insert_ingredients(tx, row.id, ingredient_ids).await?;
                    load_bundle(tx, row).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        bundle_to_recipe(bundle)
    }

    async fn list(
        &self,
        owner: UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::user_id.eq(owner.get()))
            .into_boxed();
        if let Some(wanted) = filter.tags() {
            let tag_ids: Vec<i64> = wanted.iter().map(|id| id.get()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_tags::table
                        .filter(recipe_tags::tag_id.eq_any(tag_ids))
                        .select(recipe_tags::recipe_id),
                ),
            );
        }
        if let Some(wanted) = filter.ingredients() {
            let ingredient_ids: Vec<i64> = wanted.iter().map(|id| id.get()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_ingredients::table
                        .filter(recipe_ingredients::ingredient_id.eq_any(ingredient_ids))
                        .select(recipe_ingredients::recipe_id),
                ),
            );
        }

        let rows: Vec<RecipeRow> = query
            .order(recipes::id.desc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let bundles = load_bundles(&mut conn, rows)
            .await
            .map_err(map_diesel_error)?;
        bundles.into_iter().map(bundle_to_recipe).collect()
    }

    async fn find(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = recipes::table
            .filter(recipes::id.eq(id.get()))
            .filter(recipes::user_id.eq(owner.get()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = found else {
            return Ok(None);
        };
        let bundle = load_bundle(&mut conn, row)
            .await
            .map_err(map_diesel_error)?;
        bundle_to_recipe(bundle).map(Some)
    }

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        update: &RecipeUpdate,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = changeset(&update.fields);

        let bundle = conn
            .transaction(|tx| {
                async move {
                    let updated: Option<RecipeRow> = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::user_id.eq(owner.get())),
                    )
                    .set((&changes, recipes::updated_at.eq(diesel::dsl::now)))
                    .returning(RecipeRow::as_returning())
                    .get_result(tx)
                    .await
                    .optional()?;
                    let Some(row) = updated else {
                        return Ok(None);
                    };
                    if let Some(tag_ids) = &update.tag_ids {
                        replace_tags(tx, row.id, tag_ids).await?;
                    }
                    if let Some(ingredient_ids) = &update.ingredient_ids {
                        replace_ingredients(tx, row.id, ingredient_ids).await?;
                    }
                    let loaded = load_bundle(tx, row).await?;
                    Ok::<_, DieselError>(Some(loaded))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        bundle.map(bundle_to_recipe).transpose()
    }

    async fn set_image(
        &self,
        owner: UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated: Option<RecipeRow> = diesel::update(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(owner.get())),
        )
        .set((
            recipes::image.eq(image.as_str()),
            recipes::updated_at.eq(diesel::dsl::now),
        ))
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        let Some(row) = updated else {
            return Ok(None);
        };
        let bundle = load_bundle(&mut conn, row)
            .await
            .map_err(map_diesel_error)?;
        bundle_to_recipe(bundle).map(Some)
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Junction rows go with the recipe via ON DELETE CASCADE.
        let deleted = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(owner.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
