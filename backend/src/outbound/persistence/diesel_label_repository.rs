//! PostgreSQL-backed tag and ingredient repositories.
//!
//! Both tables share a shape (`id`, `user_id`, `name`) and a junction table
//! linking them to recipes, so a single macro generates both adapters.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    IngredientRepository, LabelListing, LabelRepositoryError, TagRepository,
};
use crate::domain::{Ingredient, IngredientId, LabelName, Tag, TagId, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, recipe_ingredients, recipe_tags, tags};

fn map_pool_error(error: PoolError) -> LabelRepositoryError {
    map_basic_pool_error(error, LabelRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LabelRepositoryError {
    map_basic_diesel_error(
        error,
        LabelRepositoryError::query,
        LabelRepositoryError::connection,
    )
}

fn stored_name(name: &str) -> Result<LabelName, LabelRepositoryError> {
    LabelName::new(name)
        .map_err(|err| LabelRepositoryError::query(format!("stored name invalid: {err}")))
}

macro_rules! diesel_label_repository {
    (
        $(#[$meta:meta])*
        $repo:ident: $port:ident<$entity:ident, $id:ident> {
            table: $table:ident,
            row: $row:ident,
            new_row: $new_row:ident,
            junction: $junction:ident::$junction_col:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a repository drawing connections from `pool`.
            #[must_use]
            pub const fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        impl TryFrom<$row> for $entity {
            type Error = LabelRepositoryError;

            fn try_from(row: $row) -> Result<Self, Self::Error> {
                Ok(<$entity>::new(
                    $id::new(row.id),
                    UserId::new(row.user_id),
                    stored_name(&row.name)?,
                ))
            }
        }

        #[async_trait]
        impl $port for $repo {
            async fn create(
                &self,
                owner: UserId,
                name: &LabelName,
            ) -> Result<$entity, LabelRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: $row = diesel::insert_into($table::table)
                    .values(&$new_row {
                        user_id: owner.get(),
                        name: name.as_str(),
                    })
                    .returning($row::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                row.try_into()
            }

            async fn list(
                &self,
                owner: UserId,
                listing: LabelListing,
            ) -> Result<Vec<$entity>, LabelRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let mut query = $table::table
                    .filter($table::user_id.eq(owner.get()))
                    .into_boxed();
                if listing.assigned_only {
                    query = query.filter(
                        $table::id.eq_any($junction::table.select($junction::$junction_col)),
                    );
                }
                let rows: Vec<$row> = query
                    .order(($table::name.desc(), $table::id.desc()))
                    .select($row::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter().map(<$entity>::try_from).collect()
            }

            async fn find_owned(
                &self,
                owner: UserId,
                ids: &[$id],
            ) -> Result<Vec<$entity>, LabelRepositoryError> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .filter($table::user_id.eq(owner.get()))
                    .filter($table::id.eq_any(raw_ids))
                    .order($table::id.asc())
                    .select($row::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter().map(<$entity>::try_from).collect()
            }
        }
    };
}

diesel_label_repository! {
    /// Diesel-backed implementation of the tag repository port.
    DieselTagRepository: TagRepository<Tag, TagId> {
        table: tags,
        row: TagRow,
        new_row: NewTagRow,
        junction: recipe_tags::tag_id,
    }
}

diesel_label_repository! {
    /// Diesel-backed implementation of the ingredient repository port.
    DieselIngredientRepository: IngredientRepository<Ingredient, IngredientId> {
        table: ingredients,
        row: IngredientRow,
        new_row: NewIngredientRow,
        junction: recipe_ingredients::ingredient_id,
    }
}
