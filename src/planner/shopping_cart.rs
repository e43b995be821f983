// src/planner/shopping_cart.rs — Shopping-cart instruction, output schema, and output types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::meal_plan::MealPlan;
use super::{lenient, TaskOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    pub id: String,
    pub meal_plan_id: String,
    #[serde(deserialize_with = "lenient::count")]
    pub total_items: u32,
    pub total_cost: f64,
    pub currency: String,
    pub supermarket: String,
    pub country: String,
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub delivery_fee: Option<f64>,
    #[serde(default)]
    pub estimated_delivery_time: Option<String>,
    pub subtotal: f64,
    #[serde(default)]
    pub tax: Option<f64>,
    pub grand_total: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub screenshots: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub product_url: String,
    pub category: String,
    #[serde(default)]
    pub nutritional_info: Option<ItemNutrition>,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.total_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemNutrition {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
}

impl TaskOutput for ShoppingCart {
    const KIND: &'static str = "shopping cart";

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("missing id".into());
        }
        if self.supermarket.trim().is_empty() {
            return Err("missing supermarket".into());
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(format!("item {} has no name", i + 1));
            }
            if item.price < 0.0 {
                return Err(format!("item {} has a negative price", i + 1));
            }
        }
        Ok(())
    }
}

/// Instruction text for a shopping-cart task. Deterministic for a given input.
pub fn build_shopping_cart_instruction(plan: &MealPlan, supermarket: &str, country: &str) -> String {
    format!(
        "You are an expert grocery shopper. Create a detailed shopping cart for this meal plan.\n\n\
         Meal Plan: \"{title}\"\n\
         Supermarket: {supermarket}\n\
         Country: {country}\n\n\
         Instructions:\n\
         1. Visit the {supermarket} website in {country}\n\
         2. Search for each ingredient from the meal plan\n\
         3. Find the best matching products with current prices\n\
         4. Create a comprehensive shopping cart with:\n   \
            - Exact product matches\n   \
            - Current prices\n   \
            - Product images\n   \
            - Direct purchase links\n   \
            - Nutritional information when available\n   \
            - Proper quantities for {people} people for {days} days\n\n\
         Research Requirements:\n\
         - Use the actual {supermarket} website\n\
         - Find real products currently available\n\
         - Include high-quality product images\n\
         - Get accurate current prices\n\
         - Create direct links to product pages\n\
         - Calculate totals and delivery fees\n\n\
         Be thorough and create a complete, realistic shopping cart that the user can \
         immediately use to purchase items.\n",
        title = plan.title,
        supermarket = supermarket,
        country = country,
        people = plan.people,
        days = plan.days,
    )
}

/// JSON Schema the remote agent is asked to fill for a shopping cart.
pub fn shopping_cart_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "mealPlanId": { "type": "string" },
                "totalItems": { "type": "number" },
                "totalCost": { "type": "number" },
                "currency": { "type": "string" },
                "supermarket": { "type": "string" },
                "country": { "type": "string" },
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "quantity": { "type": "string" },
                            "unit": { "type": "string" },
                            "price": { "type": "number" },
                            "totalPrice": { "type": "number" },
                            "imageUrl": { "type": "string" },
                            "productUrl": { "type": "string" },
                            "category": { "type": "string" },
                            "nutritionalInfo": {
                                "type": "object",
                                "properties": {
                                    "calories": { "type": "number" },
                                    "protein": { "type": "number" },
                                    "carbs": { "type": "number" },
                                    "fat": { "type": "number" }
                                }
                            }
                        },
                        "required": ["id", "name", "quantity", "price", "productUrl", "category"]
                    }
                },
                "deliveryFee": { "type": "number" },
                "estimatedDeliveryTime": { "type": "string" },
                "subtotal": { "type": "number" },
                "tax": { "type": "number" },
                "grandTotal": { "type": "number" },
                "screenshots": { "type": "array", "items": { "type": "string" } },
                "createdAt": { "type": "string" }
            },
            "required": [
                "id", "mealPlanId", "totalItems", "totalCost", "currency", "supermarket",
                "country", "items", "subtotal", "grandTotal", "createdAt"
            ]
        })
    })
}
