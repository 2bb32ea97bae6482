table! {
    inventory (id) {
        id -> Integer,
        name -> Text,
        quantity -> Text,
        unit -> Text,
    }
}

table! {
    recipes (id) {
        id -> Integer,
        name -> Text,
        guide -> Text,
        url -> Text,
    }
}

table! {
    ingredients (id) {
        id -> Integer,
        name -> Text,
        quantity -> Integer,
        unit -> Text,
        recipe_id -> Integer,
    }
}

joinable!(ingredients -> recipes (recipe_id));

allow_tables_to_appear_in_same_query!(inventory, recipes, ingredients);
