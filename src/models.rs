use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::{ingredients, inventory, recipes};

/// A pantry stock entry. `name` is unique, `quantity` is kept as text.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize, Deserialize)]
#[table_name = "inventory"]
pub struct InventoryItem {
    pub id: i32,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

#[derive(Debug, Insertable)]
#[table_name = "inventory"]
pub struct NewInventoryItem<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub unit: &'a str,
}

#[derive(Debug, Default, AsChangeset)]
#[table_name = "inventory"]
pub struct InventoryChanges {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl InventoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none() && self.unit.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Serialize, Deserialize)]
#[table_name = "recipes"]
pub struct Recipe {
    pub id: i32,
    pub name: String,
    pub guide: String,
    pub url: String,
}

#[derive(Debug, Insertable)]
#[table_name = "recipes"]
pub struct NewRecipe<'a> {
    pub name: &'a str,
    pub guide: &'a str,
    pub url: &'a str,
}

/// A recipe line item. The parent is reached through `recipe_id` only.
#[derive(
    Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Serialize, Deserialize,
)]
#[belongs_to(Recipe)]
#[table_name = "ingredients"]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit: String,
    pub recipe_id: i32,
}

#[derive(Debug, Insertable)]
#[table_name = "ingredients"]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub quantity: i32,
    pub unit: &'a str,
    pub recipe_id: i32,
}

/// Ingredient as listed under its recipe (no back reference).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientLine {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub unit: String,
}

impl From<Ingredient> for IngredientLine {
    fn from(ingredient: Ingredient) -> Self {
        IngredientLine {
            id: ingredient.id,
            name: ingredient.name,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<IngredientLine>,
}

/// A quantity as clients send it: either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

impl Quantity {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Quantity::Number(n) => n.as_f64(),
            Quantity::Text(s) => parse_quantity(s),
        }
    }

    /// Textual form used when the quantity is stored in the inventory table.
    pub fn to_text(&self) -> String {
        match self {
            Quantity::Number(n) => n.to_string(),
            Quantity::Text(s) => s.clone(),
        }
    }

    /// Integer form stored on ingredient rows; rounds to the nearest whole unit.
    pub fn as_whole(&self) -> Option<i32> {
        if let Quantity::Number(n) = self {
            if let Some(v) = n.as_i64() {
                return i32::try_from(v).ok();
            }
        }
        self.as_f64()
            .map(f64::round)
            .filter(|v| *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX))
            .map(|v| v as i32)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::Number(value.into())
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Quantity::Text(value.to_string())
    }
}

pub fn parse_quantity(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Float text that always carries a fractional part (`3.0`, `2.5`).
///
/// Very large or small values use a signed, two-digit exponent (`1e+16`, `1e-05`).
pub fn format_quantity(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => text,
        },
        None => text,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InventorySubmission {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
}

impl From<InventoryPatch> for InventoryChanges {
    fn from(patch: InventoryPatch) -> Self {
        InventoryChanges {
            name: patch.name,
            quantity: patch.quantity.map(|q| q.to_text()),
            unit: patch.unit,
        }
    }
}

/// Body of `POST /addRecipes`. `url` defaults to "" and `ingredients` to none.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeSubmission {
    pub name: Option<String>,
    pub guide: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_ingredients")]
    pub ingredients: Option<Vec<IngredientSubmission>>,
}

/// A non-list `ingredients` counts as absent; list entries that are not
/// well-typed objects are dropped instead of failing the request.
fn lenient_ingredients<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<IngredientSubmission>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(entries)) => entries,
        _ => return Ok(None),
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
    ))
}

/// Entries missing any of the three keys are skipped, not rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientSubmission {
    pub name: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestedIngredient {
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

impl IngredientSubmission {
    pub fn complete(self) -> Option<RequestedIngredient> {
        Some(RequestedIngredient {
            name: self.name?,
            quantity: self.quantity?,
            unit: self.unit?,
        })
    }
}
