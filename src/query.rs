use diesel::prelude::*;

use crate::error::ApiError;
use crate::models::{
    Ingredient, IngredientLine, InventoryChanges, InventoryItem, InventoryPatch,
    InventorySubmission, NewInventoryItem, NewRecipe, Recipe, RecipeDetail,
};
use crate::schema::{ingredients, inventory, recipes};

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::Integer,
    "Rowid of the most recent insert on this connection"
);

pub fn list_inventory(conn: &SqliteConnection) -> QueryResult<Vec<InventoryItem>> {
    inventory::table.order(inventory::id).load(conn)
}

pub fn find_inventory(conn: &SqliteConnection, item_id: i32) -> QueryResult<Option<InventoryItem>> {
    inventory::table.find(item_id).first(conn).optional()
}

pub fn find_inventory_by_name(
    conn: &SqliteConnection,
    item_name: &str,
) -> QueryResult<Option<InventoryItem>> {
    inventory::table
        .filter(inventory::name.eq(item_name))
        .first(conn)
        .optional()
}

fn inventory_named(conn: &SqliteConnection, item_name: &str) -> Result<InventoryItem, ApiError> {
    find_inventory_by_name(conn, item_name)?
        .ok_or_else(|| ApiError::NotFound(format!("Inventory item {}", item_name)))
}

pub fn create_inventory(
    conn: &SqliteConnection,
    submission: InventorySubmission,
) -> Result<InventoryItem, ApiError> {
    let (item_name, quantity, unit) = match submission {
        InventorySubmission {
            name: Some(name),
            quantity: Some(quantity),
            unit: Some(unit),
        } => (name, quantity.to_text(), unit),
        _ => return Err(ApiError::MissingFields),
    };

    let item = conn.transaction::<_, diesel::result::Error, _>(|| {
        diesel::insert_into(inventory::table)
            .values(&NewInventoryItem {
                name: &item_name,
                quantity: &quantity,
                unit: &unit,
            })
            .execute(conn)?;
        let new_id = diesel::select(last_insert_rowid).get_result::<i32>(conn)?;
        inventory::table.find(new_id).first(conn)
    })?;
    Ok(item)
}

/// Applies only the keys present in `patch`; renaming is allowed.
pub fn update_inventory(
    conn: &SqliteConnection,
    item_name: &str,
    patch: InventoryPatch,
) -> Result<InventoryItem, ApiError> {
    let item = inventory_named(conn, item_name)?;
    let changes = InventoryChanges::from(patch);
    if changes.is_empty() {
        return Ok(item);
    }
    diesel::update(&item).set(&changes).execute(conn)?;
    Ok(inventory::table.find(item.id).first(conn)?)
}

pub fn delete_inventory(conn: &SqliteConnection, item_name: &str) -> Result<(), ApiError> {
    let item = inventory_named(conn, item_name)?;
    diesel::delete(&item).execute(conn)?;
    Ok(())
}

pub fn list_recipes(conn: &SqliteConnection) -> QueryResult<Vec<Recipe>> {
    recipes::table.order(recipes::id).load(conn)
}

fn recipe_named(conn: &SqliteConnection, recipe_name: &str) -> Result<Recipe, ApiError> {
    recipes::table
        .filter(recipes::name.eq(recipe_name))
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe {}", recipe_name)))
}

/// Inserts a recipe row and reads back its generated id.
pub fn insert_recipe(conn: &SqliteConnection, new_recipe: &NewRecipe) -> QueryResult<Recipe> {
    diesel::insert_into(recipes::table)
        .values(new_recipe)
        .execute(conn)?;
    let new_id = diesel::select(last_insert_rowid).get_result::<i32>(conn)?;
    Ok(Recipe {
        id: new_id,
        name: new_recipe.name.to_string(),
        guide: new_recipe.guide.to_string(),
        url: new_recipe.url.to_string(),
    })
}

pub fn ingredients_of(conn: &SqliteConnection, recipe: &Recipe) -> QueryResult<Vec<Ingredient>> {
    Ingredient::belonging_to(recipe)
        .order(ingredients::id)
        .load(conn)
}

pub fn find_recipe_by_name(
    conn: &SqliteConnection,
    recipe_name: &str,
) -> Result<RecipeDetail, ApiError> {
    let recipe = recipe_named(conn, recipe_name)?;
    let lines = ingredients_of(conn, &recipe)?
        .into_iter()
        .map(IngredientLine::from)
        .collect();
    Ok(RecipeDetail {
        recipe,
        ingredients: lines,
    })
}

pub fn recipe_ingredients(
    conn: &SqliteConnection,
    recipe_name: &str,
) -> Result<Vec<Ingredient>, ApiError> {
    let recipe = recipe_named(conn, recipe_name)?;
    Ok(ingredients_of(conn, &recipe)?)
}

/// Removes the recipe and, first, every ingredient pointing at it.
pub fn delete_recipe(conn: &SqliteConnection, recipe_id: i32) -> Result<(), ApiError> {
    conn.immediate_transaction::<_, ApiError, _>(|| {
        let recipe: Recipe = recipes::table
            .find(recipe_id)
            .first(conn)
            .optional()?
            .ok_or_else(|| ApiError::NotFound(format!("Recipe {}", recipe_id)))?;
        diesel::delete(Ingredient::belonging_to(&recipe)).execute(conn)?;
        diesel::delete(&recipe).execute(conn)?;
        Ok(())
    })
}

pub fn list_ingredients(conn: &SqliteConnection) -> QueryResult<Vec<Ingredient>> {
    ingredients::table.order(ingredients::id).load(conn)
}
