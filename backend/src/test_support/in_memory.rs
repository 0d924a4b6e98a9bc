//! One in-memory store implementing every driven port.
//!
//! Identifiers come from a single counter shared by all tables, so ids are
//! unique across users, tags, ingredients and recipes. Ordering matches the
//! Diesel adapters: labels by name then id, both descending; recipes by id
//! descending.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AuthTokenRepository, ImageStore, ImageStoreError, IngredientRepository, LabelListing,
    LabelRepositoryError, RecipeRepository, RecipeRepositoryError, RecipeUpdate, TagRepository,
    TokenRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Email, ImagePath, Ingredient, IngredientId, LabelName, NewUser, Recipe, RecipeFields,
    RecipeFilter, RecipeId, Tag, TagId, TokenDigest, User, UserId,
};

struct StoredRecipe {
    owner: UserId,
    fields: RecipeFields,
    image: Option<ImagePath>,
    tags: BTreeSet<TagId>,
    ingredients: BTreeSet<IngredientId>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<UserId, User>,
    tokens: HashMap<TokenDigest, UserId>,
    tags: BTreeMap<TagId, Tag>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    images: BTreeMap<String, Vec<u8>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email() == email && Some(user.id()) != except)
    }

    fn assemble(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        Recipe::new(
            id,
            stored.owner,
            stored.fields.clone(),
            stored.image.clone(),
            stored
                .tags
                .iter()
                .filter_map(|tag_id| self.tags.get(tag_id).cloned())
                .collect(),
            stored
                .ingredients
                .iter()
                .filter_map(|ingredient_id| self.ingredients.get(ingredient_id).cloned())
                .collect(),
        )
    }

    fn owned_recipe(&self, owner: UserId, id: RecipeId) -> Option<Recipe> {
        self.recipes
            .get(&id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| self.assemble(id, stored))
    }

    fn tag_assigned(&self, id: TagId) -> bool {
        self.recipes.values().any(|recipe| recipe.tags.contains(&id))
    }

    fn ingredient_assigned(&self, id: IngredientId) -> bool {
        self.recipes
            .values()
            .any(|recipe| recipe.ingredients.contains(&id))
    }
}

/// Shared in-memory backing for users, tokens, labels, recipes and images.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("in-memory store mutex poisoned"),
        }
    }

    /// Bytes written to `path` by the image store, if any.
    #[must_use]
    pub fn image(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().images.get(path).cloned()
    }

    /// Number of stored recipes across all owners.
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.lock().recipes.len()
    }

    /// Number of live tokens; login rotation keeps one per user.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.lock().tokens.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if tables.email_taken(&user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.to_string()));
        }
        let id = UserId::new(tables.next_id());
        let created = User::from_new(id, user.clone());
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&user.id()) {
            return Ok(false);
        }
        if tables.email_taken(user.email(), Some(user.id())) {
            return Err(UserPersistenceError::duplicate_email(user.email().to_string()));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(true)
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn replace_for_user(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError> {
        let mut tables = self.lock();
        tables.tokens.retain(|_, owner| *owner != user_id);
        tables.tokens.insert(digest.clone(), user_id);
        Ok(())
    }

    async fn find_user_id(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, TokenRepositoryError> {
        Ok(self.lock().tokens.get(digest).copied())
    }
}

fn sort_labels<T>(labels: &mut [T], key: impl Fn(&T) -> (String, i64)) {
    labels.sort_by_key(|label| std::cmp::Reverse(key(label)));
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn create(&self, owner: UserId, name: &LabelName) -> Result<Tag, LabelRepositoryError> {
        let mut tables = self.lock();
        let tag = Tag::new(TagId::new(tables.next_id()), owner, name.clone());
        tables.tags.insert(tag.id(), tag.clone());
        Ok(tag)
    }

    async fn list(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Tag>, LabelRepositoryError> {
        let tables = self.lock();
        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .filter(|tag| tag.owner() == owner)
            .filter(|tag| !listing.assigned_only || tables.tag_assigned(tag.id()))
            .cloned()
            .collect();
        sort_labels(&mut tags, |tag| (tag.name().to_string(), tag.id().get()));
        Ok(tags)
    }

    async fn find_owned(
        &self,
        owner: UserId,
        ids: &[TagId],
    ) -> Result<Vec<Tag>, LabelRepositoryError> {
        let tables = self.lock();
        Ok(ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| tables.tags.get(id))
            .filter(|tag| tag.owner() == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IngredientRepository for InMemoryStore {
    async fn create(
        &self,
        owner: UserId,
        name: &LabelName,
    ) -> Result<Ingredient, LabelRepositoryError> {
        let mut tables = self.lock();
        let ingredient = Ingredient::new(IngredientId::new(tables.next_id()), owner, name.clone());
        tables.ingredients.insert(ingredient.id(), ingredient.clone());
        Ok(ingredient)
    }

    async fn list(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Ingredient>, LabelRepositoryError> {
        let tables = self.lock();
        let mut ingredients: Vec<Ingredient> = tables
            .ingredients
            .values()
            .filter(|ingredient| ingredient.owner() == owner)
            .filter(|ingredient| {
                !listing.assigned_only || tables.ingredient_assigned(ingredient.id())
            })
            .cloned()
            .collect();
        sort_labels(&mut ingredients, |ingredient| {
            (ingredient.name().to_string(), ingredient.id().get())
        });
        Ok(ingredients)
    }

    async fn find_owned(
        &self,
        owner: UserId,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, LabelRepositoryError> {
        let tables = self.lock();
        Ok(ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| tables.ingredients.get(id))
            .filter(|ingredient| ingredient.owner() == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn insert(
        &self,
        owner: UserId,
        fields: &RecipeFields,
        tag_ids: &[TagId],
        ingredient_ids: &[IngredientId],
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut tables = self.lock();
        let id = RecipeId::new(tables.next_id());
        let stored = StoredRecipe {
            owner,
            fields: fields.clone(),
            image: None,
            tags: tag_ids.iter().copied().collect(),
            ingredients: ingredient_ids.iter().copied().collect(),
        };
        let recipe = tables.assemble(id, &stored);
        tables.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn list(
        &self,
        owner: UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let tables = self.lock();
        Ok(tables
            .recipes
            .iter()
            .rev()
            .filter(|(_, stored)| stored.owner == owner)
            .map(|(id, stored)| tables.assemble(*id, stored))
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    async fn find(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(self.lock().owned_recipe(owner, id))
    }

    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        update: &RecipeUpdate,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut tables = self.lock();
        let Some(stored) = tables
            .recipes
            .get_mut(&id)
            .filter(|stored| stored.owner == owner)
        else {
            return Ok(None);
        };
        stored.fields = update.fields.clone();
        if let Some(tag_ids) = &update.tag_ids {
            stored.tags = tag_ids.iter().copied().collect();
        }
        if let Some(ingredient_ids) = &update.ingredient_ids {
            stored.ingredients = ingredient_ids.iter().copied().collect();
        }
        Ok(tables.owned_recipe(owner, id))
    }

    async fn set_image(
        &self,
        owner: UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut tables = self.lock();
        let Some(stored) = tables
            .recipes
            .get_mut(&id)
            .filter(|stored| stored.owner == owner)
        else {
            return Ok(None);
        };
        stored.image = Some(image.clone());
        Ok(tables.owned_recipe(owner, id))
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut tables = self.lock();
        let owned = tables
            .recipes
            .get(&id)
            .is_some_and(|stored| stored.owner == owner);
        if owned {
            tables.recipes.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl ImageStore for InMemoryStore {
    async fn store(&self, path: &ImagePath, bytes: &[u8]) -> Result<(), ImageStoreError> {
        self.lock()
            .images
            .insert(path.as_str().to_owned(), bytes.to_vec());
        Ok(())
    }
}
