use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::db::{self, DbPool};
use crate::error::ApiError;
use crate::models::{InventoryPatch, InventorySubmission, RecipeSubmission};
use crate::{query, recipes};

/// Registers every endpoint plus the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(index)
        .service(get_inventory)
        .service(get_inventory_item)
        .service(get_inventory_item_by_name)
        .service(add_inventory)
        .service(update_inventory)
        .service(delete_inventory)
        .service(get_recipes)
        .service(get_recipe_ingredients)
        .service(get_recipe)
        .service(add_recipe)
        .service(delete_recipe)
        .service(get_ingredients);
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidPayload(err.to_string()).into())
}

//creates the tables on first call, like a health check
#[get("/")]
async fn index(pool: web::Data<DbPool>) -> HttpResponse {
    let result = web::block(move || -> Result<(), ApiError> {
        let conn = pool.get()?;
        db::init_schema(&conn)?;
        Ok(())
    })
    .await
    .map_err(ApiError::from)
    .and_then(|r| r);

    match result {
        Ok(()) => {
            log::info!("database reachable, tables ready");
            HttpResponse::Ok().body("Pantry API is live!")
        }
        Err(e) => {
            log::error!("database check failed: {}", e);
            HttpResponse::InternalServerError()
                .body(format!("Error connecting to database: {}", e))
        }
    }
}

#[get("/inventory")]
async fn get_inventory(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let items = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        Ok(query::list_inventory(&conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/inventory/{id}")]
async fn get_inventory_item(
    item_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let item_id = item_id.into_inner();
    let item = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::find_inventory(&conn, item_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Inventory item {}", item_id)))
    })
    .await??;
    Ok(HttpResponse::Ok().json(item))
}

#[get("/inventory/name/{name}")]
async fn get_inventory_item_by_name(
    item_name: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let item_name = item_name.into_inner();
    let item = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::find_inventory_by_name(&conn, &item_name)?
            .ok_or_else(|| ApiError::NotFound(format!("Inventory item {}", item_name)))
    })
    .await??;
    Ok(HttpResponse::Ok().json(item))
}

#[post("/addInventory")]
async fn add_inventory(
    body: web::Json<InventorySubmission>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let item = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::create_inventory(&conn, body.into_inner())
    })
    .await??;
    Ok(HttpResponse::Created().json(item))
}

#[put("/updateInventory/{name}")]
async fn update_inventory(
    item_name: web::Path<String>,
    body: web::Json<InventoryPatch>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let item = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::update_inventory(&conn, &item_name, body.into_inner())
    })
    .await??;
    Ok(HttpResponse::Ok().json(item))
}

#[delete("/deleteInventory/{name}")]
async fn delete_inventory(
    item_name: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let item_name = item_name.into_inner();
    let deleted = item_name.clone();
    web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::delete_inventory(&conn, &deleted)
    })
    .await??;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Inventory item {} deleted", item_name)
    })))
}

#[get("/recipes")]
async fn get_recipes(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let all = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        Ok(query::list_recipes(&conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(all))
}

#[get("/recipes/{name}")]
async fn get_recipe(
    recipe_name: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let detail = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::find_recipe_by_name(&conn, &recipe_name)
    })
    .await??;
    Ok(HttpResponse::Ok().json(detail))
}

#[get("/recipes/{name}/ingredients")]
async fn get_recipe_ingredients(
    recipe_name: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let lines = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::recipe_ingredients(&conn, &recipe_name)
    })
    .await??;
    Ok(HttpResponse::Ok().json(lines))
}

//called when the user saves a recipe
#[post("/addRecipes")]
async fn add_recipe(
    body: web::Json<RecipeSubmission>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let created = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        recipes::create_recipe(&conn, body.into_inner())
    })
    .await??;
    Ok(HttpResponse::Created().json(created))
}

#[delete("/recipes/{id}")]
async fn delete_recipe(
    recipe_id: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, ApiError> {
    let recipe_id = recipe_id.into_inner();
    web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        query::delete_recipe(&conn, recipe_id)
    })
    .await??;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Recipe {} deleted", recipe_id)
    })))
}

#[get("/ingredients")]
async fn get_ingredients(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let all = web::block(move || -> Result<_, ApiError> {
        let conn = pool.get()?;
        Ok(query::list_ingredients(&conn)?)
    })
    .await??;
    Ok(HttpResponse::Ok().json(all))
}
