//! Diesel adapters against embedded PostgreSQL.
//!
//! Each test provisions its own database cloned from a migrated template.
//! The steps run synchronously and drive async repository calls through a
//! per-test Tokio runtime, because the embedded cluster must not be started
//! from inside a runtime.

use pg_embedded_setup_unpriv::TemporaryDatabase;
use recipe_backend::domain::ports::{
    AuthTokenRepository, DatabasePing, IngredientRepository, LabelListing, RecipeRepository,
    RecipeRepositoryError, RecipeUpdate, TagRepository, UserPersistenceError, UserRepository,
};
use recipe_backend::domain::{
    AuthToken, CookingTime, Credentials, DisplayName, Email, ImagePath, IngredientId, LabelName,
    NewUser, Permissions, Price, RecipeFields, RecipeFilter, RecipeLink, RecipeTitle, TagId,
    UserId,
};
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselDatabasePing, DieselIngredientRepository,
    DieselRecipeRepository, DieselTagRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

mod support;

use support::embedded_postgres::execute_sql;
use support::{handle_cluster_setup_failure, provision_template_database, shared_cluster};

struct Db {
    runtime: Runtime,
    url: String,
    users: DieselUserRepository,
    tokens: DieselAuthTokenRepository,
    tags: DieselTagRepository,
    ingredients: DieselIngredientRepository,
    recipes: DieselRecipeRepository,
    _database: TemporaryDatabase,
}

impl Db {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn user(&self, email: &str) -> UserId {
        let new_user = NewUser {
            email: Email::parse(email).expect("valid email"),
            name: DisplayName::new("Cook").expect("valid name"),
            credentials: Credentials::unusable(),
            permissions: Permissions::default(),
        };
        self.block_on(self.users.insert(&new_user))
            .expect("user inserted")
            .id()
    }

    fn tag(&self, owner: UserId, raw: &str) -> TagId {
        let name = LabelName::new(raw).expect("valid name");
        self.block_on(TagRepository::create(&self.tags, owner, &name))
            .expect("tag created")
            .id()
    }

    fn ingredient(&self, owner: UserId, raw: &str) -> IngredientId {
        let name = LabelName::new(raw).expect("valid name");
        self.block_on(IngredientRepository::create(&self.ingredients, owner, &name))
            .expect("ingredient created")
            .id()
    }
}

fn setup() -> Result<Db, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster)?;
    let url = database.url().to_string();
    let config = PoolConfig::new(&url).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(Db {
        runtime,
        url,
        users: DieselUserRepository::new(pool.clone()),
        tokens: DieselAuthTokenRepository::new(pool.clone()),
        tags: DieselTagRepository::new(pool.clone()),
        ingredients: DieselIngredientRepository::new(pool.clone()),
        recipes: DieselRecipeRepository::new(pool),
        _database: database,
    })
}

#[fixture]
fn database() -> Option<Db> {
    match setup() {
        Ok(db) => Some(db),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn fields(title: &str) -> RecipeFields {
    RecipeFields {
        title: RecipeTitle::new(title).expect("title"),
        time_minutes: CookingTime::new(10).expect("time"),
        price: Price::new(Decimal::from(5)).expect("price"),
        link: None,
    }
}

#[rstest]
fn users_are_unique_by_email_and_updatable(database: Option<Db>) {
    let Some(db) = database else { return };
    let id = db.user("Cook@Example.com");

    let email = Email::parse("Cook@example.com").expect("valid email");
    let found = db
        .block_on(db.users.find_by_email(&email))
        .expect("lookup")
        .expect("user present");
    assert_eq!(found.id(), id);

    let duplicate = NewUser {
        email,
        name: DisplayName::default(),
        credentials: Credentials::unusable(),
        permissions: Permissions::default(),
    };
    let err = db
        .block_on(db.users.insert(&duplicate))
        .expect_err("duplicate email");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));

    let renamed = found.with_name(DisplayName::new("Head cook").expect("valid name"));
    assert!(db.block_on(db.users.update(&renamed)).expect("update"));
    let reloaded = db
        .block_on(db.users.find_by_id(id))
        .expect("lookup")
        .expect("user present");
    assert_eq!(reloaded.name().as_str(), "Head cook");
}

#[rstest]
fn issuing_a_token_revokes_the_previous_one(database: Option<Db>) {
    let Some(db) = database else { return };
    let user = db.user("token@example.com");
    let first = AuthToken::generate().digest();
    let second = AuthToken::generate().digest();

    db.block_on(db.tokens.replace_for_user(user, &first))
        .expect("first token");
    db.block_on(db.tokens.replace_for_user(user, &second))
        .expect("second token");

    assert_eq!(db.block_on(db.tokens.find_user_id(&first)).expect("lookup"), None);
    assert_eq!(
        db.block_on(db.tokens.find_user_id(&second)).expect("lookup"),
        Some(user)
    );
}

#[rstest]
fn labels_are_scoped_ordered_and_filterable_by_assignment(database: Option<Db>) {
    let Some(db) = database else { return };
    let owner = db.user("labels@example.com");
    let other = db.user("other@example.com");
    let breakfast = db.tag(owner, "Breakfast");
    let vegan = db.tag(owner, "Vegan");
    db.tag(other, "Foreign");

    let all = db
        .block_on(TagRepository::list(&db.tags, owner, LabelListing::default()))
        .expect("list");
    let names: Vec<_> = all.iter().map(|tag| tag.name().as_str()).collect();
    assert_eq!(names, ["Vegan", "Breakfast"]);

    db.block_on(db.recipes.insert(owner, &fields("Toast"), &[breakfast], &[]))
        .expect("recipe");
    db.block_on(db.recipes.insert(owner, &fields("Porridge"), &[breakfast], &[]))
        .expect("recipe");

    let assigned = db
        .block_on(TagRepository::list(
            &db.tags,
            owner,
            LabelListing {
                assigned_only: true,
            },
        ))
        .expect("list");
    assert_eq!(
        assigned.iter().map(|tag| tag.id()).collect::<Vec<_>>(),
        [breakfast]
    );

    let owned = db
        .block_on(TagRepository::find_owned(
            &db.tags,
            owner,
            &[vegan, TagId::new(vegan.get() + 1_000)],
        ))
        .expect("find owned");
    assert_eq!(owned.len(), 1);
}

#[rstest]
fn recipe_filters_match_any_within_and_all_across(database: Option<Db>) {
    let Some(db) = database else { return };
    let owner = db.user("filters@example.com");
    let a = db.tag(owner, "A");
    let b = db.tag(owner, "B");
    let salt = db.ingredient(owner, "Salt");

    let r1 = db
        .block_on(db.recipes.insert(owner, &fields("r1"), &[a], &[salt]))
        .expect("r1");
    let r2 = db
        .block_on(db.recipes.insert(owner, &fields("r2"), &[b], &[]))
        .expect("r2");
    db.block_on(db.recipes.insert(owner, &fields("r3"), &[], &[]))
        .expect("r3");

    let by_tags = db
        .block_on(
            db.recipes
                .list(owner, &RecipeFilter::default().with_tags([a, b])),
        )
        .expect("list");
    assert_eq!(
        by_tags.iter().map(|recipe| recipe.id()).collect::<Vec<_>>(),
        [r2.id(), r1.id()]
    );

    let narrowed = db
        .block_on(db.recipes.list(
            owner,
            &RecipeFilter::default()
                .with_tags([a, b])
                .with_ingredients([salt]),
        ))
        .expect("list");
    assert_eq!(
        narrowed.iter().map(|recipe| recipe.id()).collect::<Vec<_>>(),
        [r1.id()]
    );
}

#[rstest]
fn updates_replace_only_supplied_associations(database: Option<Db>) {
    let Some(db) = database else { return };
    let owner = db.user("updates@example.com");
    let tag = db.tag(owner, "Soup");
    let leek = db.ingredient(owner, "Leek");
    let recipe = db
        .block_on(db.recipes.insert(owner, &fields("Soup"), &[tag], &[leek]))
        .expect("recipe");

    let mut changed = fields("Leek soup");
    changed.link = Some(RecipeLink::new("https://example.com/soup").expect("link"));
    let kept = db
        .block_on(db.recipes.update(
            owner,
            recipe.id(),
            &RecipeUpdate {
                fields: changed.clone(),
                tag_ids: None,
                ingredient_ids: Some(Vec::new()),
            },
        ))
        .expect("update")
        .expect("recipe present");
    assert_eq!(kept.title().as_str(), "Leek soup");
    assert_eq!(kept.tags().len(), 1);
    assert!(kept.ingredients().is_empty());
    assert_eq!(
        kept.link().map(RecipeLink::as_str),
        Some("https://example.com/soup")
    );

    let stranger = db.user("stranger@example.com");
    let foreign = db
        .block_on(db.recipes.update(
            stranger,
            recipe.id(),
            &RecipeUpdate {
                fields: changed,
                tag_ids: None,
                ingredient_ids: None,
            },
        ))
        .expect("update");
    assert!(foreign.is_none());
}

#[rstest]
fn images_and_deletes_are_owner_scoped(database: Option<Db>) {
    let Some(db) = database else { return };
    let owner = db.user("images@example.com");
    let stranger = db.user("nosy@example.com");
    let recipe = db
        .block_on(db.recipes.insert(owner, &fields("Cake"), &[], &[]))
        .expect("recipe");
    let path = ImagePath::from_stored("uploads/recipe/cake.png");

    let foreign = db
        .block_on(db.recipes.set_image(stranger, recipe.id(), &path))
        .expect("set image");
    assert!(foreign.is_none());

    let updated = db
        .block_on(db.recipes.set_image(owner, recipe.id(), &path))
        .expect("set image")
        .expect("recipe present");
    assert_eq!(updated.image(), Some(&path));

    assert!(!db
        .block_on(db.recipes.delete(stranger, recipe.id()))
        .expect("delete"));
    assert!(db
        .block_on(db.recipes.delete(owner, recipe.id()))
        .expect("delete"));
    assert!(db
        .block_on(db.recipes.find(owner, recipe.id()))
        .expect("find")
        .is_none());
}

#[rstest]
fn missing_tables_surface_as_query_errors(database: Option<Db>) {
    let Some(db) = database else { return };
    let owner = db.user("broken@example.com");
    execute_sql(&db.url, "DROP TABLE recipes CASCADE;").expect("drop succeeds");

    let err = db
        .block_on(db.recipes.list(owner, &RecipeFilter::default()))
        .expect_err("query fails");
    assert!(matches!(err, RecipeRepositoryError::Query { .. }));
}

#[rstest]
fn ping_and_migrations_see_a_ready_database(database: Option<Db>) {
    let Some(db) = database else { return };
    let checker = DieselDatabasePing::new(db.url.clone());
    db.block_on(checker.ping()).expect("database reachable");

    let applied = db
        .block_on(run_migrations(&db.url))
        .expect("migrations run");
    assert_eq!(applied, 0, "template already carries every migration");
}
