//! Tag and ingredient registry services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    IngredientCatalog, IngredientRepository, LabelListing, LabelRepositoryError, TagCatalog,
    TagRepository,
};
use crate::domain::{DomainError, Ingredient, LabelName, Tag, UserId};

pub(crate) fn map_label_error(error: LabelRepositoryError) -> DomainError {
    match error {
        LabelRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("label repository unavailable: {message}"))
        }
        LabelRepositoryError::Query { message } => {
            DomainError::internal(format!("label repository error: {message}"))
        }
    }
}

/// Generate a registry service over one label repository port.
macro_rules! label_service {
    (
        $(#[$meta:meta])*
        pub struct $service:ident: $catalog:ident<$entity:ident> over $repo:ident {
            create: $create:ident,
            list: $list:ident,
            kind: $kind:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $service<R> {
            repo: Arc<R>,
        }

        impl<R> $service<R> {
            /// Build the service over a shared repository.
            #[must_use]
            pub const fn new(repo: Arc<R>) -> Self {
                Self { repo }
            }
        }

        #[async_trait]
        impl<R> $catalog for $service<R>
        where
            R: $repo,
        {
            async fn $create(
                &self,
                owner: UserId,
                name: LabelName,
            ) -> Result<$entity, DomainError> {
                let created = self
                    .repo
                    .create(owner, &name)
                    .await
                    .map_err(map_label_error)?;
                debug!(user_id = %owner, label_id = %created.id(), kind = $kind, "label created");
                Ok(created)
            }

            async fn $list(
                &self,
                owner: UserId,
                listing: LabelListing,
            ) -> Result<Vec<$entity>, DomainError> {
                self.repo
                    .list(owner, listing)
                    .await
                    .map_err(map_label_error)
            }
        }
    };
}

label_service! {
    /// Tag registry backed by a [`TagRepository`].
    pub struct TagService: TagCatalog<Tag> over TagRepository {
        create: create_tag,
        list: list_tags,
        kind: "tag",
    }
}

label_service! {
    /// Ingredient registry backed by an [`IngredientRepository`].
    pub struct IngredientService: IngredientCatalog<Ingredient> over IngredientRepository {
        create: create_ingredient,
        list: list_ingredients,
        kind: "ingredient",
    }
}
