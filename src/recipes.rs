//! Saving a recipe: the recipe row, its ingredient rows and every inventory
//! change they cause are committed together or not at all.

use diesel::prelude::*;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{
    IngredientSubmission, InventoryItem, NewIngredient, NewRecipe, Recipe, RecipeSubmission,
    RequestedIngredient,
};
use crate::query;
use crate::reconcile::{reconcile, InventoryUpdate, Reconciliation};
use crate::schema::ingredients;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddedIngredient {
    pub name: String,
    pub quantity: i32,
    pub unit: String,
}

/// Response body of a successful recipe save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCreated {
    pub id: i32,
    pub name: String,
    pub guide: String,
    pub url: String,
    pub ingredients: Vec<AddedIngredient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inventory_updates: Vec<InventoryUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted_ingredients: Vec<InventoryItem>,
}

impl RecipeCreated {
    fn new(recipe: Recipe) -> Self {
        RecipeCreated {
            id: recipe.id,
            name: recipe.name,
            guide: recipe.guide,
            url: recipe.url,
            ingredients: Vec::new(),
            inventory_updates: Vec::new(),
            deleted_ingredients: Vec::new(),
        }
    }

    fn record(&mut self, outcome: Reconciliation) {
        match outcome {
            Reconciliation::NoMatch => {}
            Reconciliation::Decremented(update) => self.inventory_updates.push(update),
            Reconciliation::Exhausted(item) | Reconciliation::InsufficientDeleted(item) => {
                self.deleted_ingredients.push(item)
            }
        }
    }
}

/// Creates a recipe and draws its ingredients from the pantry.
///
/// `name` and `guide` are required. Ingredient entries lacking a name,
/// quantity or unit are skipped. Any failure rolls back the recipe row,
/// the ingredient rows and all inventory changes.
pub fn create_recipe(
    conn: &SqliteConnection,
    submission: RecipeSubmission,
) -> Result<RecipeCreated, ApiError> {
    let (name, guide) = match (submission.name, submission.guide) {
        (Some(name), Some(guide)) => (name, guide),
        _ => return Err(ApiError::MissingFields),
    };
    let url = submission.url.unwrap_or_default();
    let requested: Vec<RequestedIngredient> = submission
        .ingredients
        .unwrap_or_default()
        .into_iter()
        .filter_map(IngredientSubmission::complete)
        .collect();

    let result = conn.immediate_transaction::<_, ApiError, _>(|| {
        let recipe = query::insert_recipe(
            conn,
            &NewRecipe {
                name: &name,
                guide: &guide,
                url: &url,
            },
        )?;
        let mut created = RecipeCreated::new(recipe);

        for ingredient in &requested {
            let outcome = reconcile(conn, &ingredient.name, &ingredient.quantity)?;
            created.record(outcome);

            let quantity = ingredient
                .quantity
                .as_whole()
                .ok_or_else(|| ApiError::InvalidQuantityFormat(ingredient.name.clone()))?;
            diesel::insert_into(ingredients::table)
                .values(&NewIngredient {
                    name: &ingredient.name,
                    quantity,
                    unit: &ingredient.unit,
                    recipe_id: created.id,
                })
                .execute(conn)?;
            created.ingredients.push(AddedIngredient {
                name: ingredient.name.clone(),
                quantity,
                unit: ingredient.unit.clone(),
            });
        }
        Ok(created)
    });

    match &result {
        Ok(created) => log::info!(
            "saved recipe {:?} (id {}) with {} ingredients",
            created.name,
            created.id,
            created.ingredients.len()
        ),
        Err(err) => log::warn!("recipe {:?} rolled back: {}", name, err),
    }
    result
}
