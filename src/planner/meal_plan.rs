// src/planner/meal_plan.rs — Meal-plan instruction, output schema, and output types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::OnceLock;

use super::preferences::Preferences;
use super::{lenient, TaskOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default = "generate_plan_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "lenient::count")]
    pub days: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub people: u32,
    pub meals: Vec<DayMeals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
    #[serde(default = "default_difficulty", deserialize_with = "difficulty_or_default")]
    pub difficulty: String,
    #[serde(default)]
    pub estimated_cost: Option<CostRange>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub supermarkets: Vec<Supermarket>,
    #[serde(default)]
    pub nutritional_summary: Option<NutritionalSummary>,
}

fn generate_plan_id() -> String {
    format!("plan-{}", uuid::Uuid::new_v4())
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn difficulty_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_difficulty))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMeals {
    #[serde(default, deserialize_with = "lenient::count")]
    pub day: u32,
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

impl DayMeals {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Meal)> {
        [
            ("breakfast", &self.breakfast),
            ("lunch", &self.lunch),
            ("dinner", &self.dinner),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub prep_time: Option<f64>,
    #[serde(default)]
    pub cook_time: Option<f64>,
    #[serde(default)]
    pub servings: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub instructions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub tips: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub tags: Vec<String>,
}

impl Meal {
    /// Prep plus cook time in minutes, when either is known.
    pub fn total_minutes(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (p, c) => Some((p.unwrap_or(0.0) + c.unwrap_or(0.0)).round() as u32),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub unit: String,
    #[serde(default)]
    pub estimated_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub supermarket_links: Vec<SupermarketLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupermarketLink {
    pub supermarket: String,
    pub url: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supermarket {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub website: String,
    #[serde(default)]
    pub delivery_fee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalSummary {
    #[serde(default)]
    pub daily_calories: f64,
    #[serde(default)]
    pub daily_protein: f64,
    #[serde(default)]
    pub daily_carbs: f64,
    #[serde(default)]
    pub daily_fat: f64,
}

impl TaskOutput for MealPlan {
    const KIND: &'static str = "meal plan";

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("missing title".into());
        }
        if self.description.trim().is_empty() {
            return Err("missing description".into());
        }
        if self.meals.is_empty() {
            return Err("meals list is empty".into());
        }
        for (i, day) in self.meals.iter().enumerate() {
            for (slot, meal) in day.iter() {
                if meal.name.trim().is_empty() {
                    return Err(format!("day {} {} has no name", i + 1, slot));
                }
            }
        }
        Ok(())
    }
}

/// Instruction text for a meal-plan task. Deterministic for a given input.
pub fn build_meal_plan_instruction(prompt: &str, preferences: Option<&Preferences>) -> String {
    let mut out = String::from(
        "You are an expert nutritionist and meal planner. \
         Create a comprehensive meal plan based on the user's request.\n\n",
    );
    out.push_str(&format!("User Request: \"{}\"\n\n", prompt));

    let lines = preferences.map(preference_lines).unwrap_or_default();
    if !lines.is_empty() {
        out.push_str("Additional Preferences:\n");
        for line in &lines {
            out.push_str("- ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(
        "Please create a detailed meal plan that includes:\n\n\
         1. **Meal Plan Overview**: Title, description, nutritional summary\n\
         2. **Daily Meals**: Breakfast, lunch, dinner for each day with detailed recipes\n\
         3. **Ingredients**: Complete shopping list with quantities and estimated prices\n\
         4. **Nutrition**: Calorie and macronutrient breakdown per meal and daily totals\n\n\
         Focus on creating healthy, balanced meals with practical recipes. \
         Use common ingredients that are widely available. \
         Provide realistic cost estimates based on typical market prices.\n\n\
         Output Format: Provide a complete JSON structure following the specified schema.\n\
         Be thorough but practical in your meal planning approach.\n",
    );
    out
}

fn preference_lines(p: &Preferences) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(days) = p.days {
        lines.push(format!("Days: {days}"));
    }
    if let Some(people) = p.people {
        lines.push(format!("People: {people}"));
    }
    if let Some(calories) = p.calories {
        lines.push(format!("Target Calories: {calories}"));
    }
    if let Some(country) = &p.country {
        lines.push(format!("Country: {country}"));
    }
    if let Some(tags) = p.dietary_restrictions.as_ref().filter(|t| !t.is_empty()) {
        lines.push(format!("Dietary Restrictions: {}", tags.join(", ")));
    }
    if let Some(budget) = p.budget {
        lines.push(format!("Budget: ${budget}"));
    }
    lines
}

/// JSON Schema the remote agent is asked to fill for a meal plan.
pub fn meal_plan_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "title": { "type": "string" },
                "description": { "type": "string" },
                "days": { "type": "number" },
                "people": { "type": "number" },
                "totalCalories": { "type": "number" },
                "totalProtein": { "type": "number" },
                "totalCarbs": { "type": "number" },
                "totalFat": { "type": "number" },
                "difficulty": { "type": "string", "enum": ["Easy", "Medium", "Hard"] },
                "meals": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "day": { "type": "number" },
                            "breakfast": { "$ref": "#/$defs/meal" },
                            "lunch": { "$ref": "#/$defs/meal" },
                            "dinner": { "$ref": "#/$defs/meal" }
                        }
                    }
                },
                "estimatedCost": {
                    "type": "object",
                    "properties": {
                        "min": { "type": "number" },
                        "max": { "type": "number" },
                        "currency": { "type": "string" }
                    }
                },
                "supermarkets": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "country": { "type": "string" },
                            "website": { "type": "string" },
                            "deliveryFee": { "type": "number" }
                        }
                    }
                },
                "nutritionalSummary": {
                    "type": "object",
                    "properties": {
                        "dailyCalories": { "type": "number" },
                        "dailyProtein": { "type": "number" },
                        "dailyCarbs": { "type": "number" },
                        "dailyFat": { "type": "number" }
                    }
                }
            },
            "$defs": {
                "meal": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "prepTime": { "type": "number" },
                        "cookTime": { "type": "number" },
                        "servings": { "type": "number" },
                        "calories": { "type": "number" },
                        "protein": { "type": "number" },
                        "carbs": { "type": "number" },
                        "fat": { "type": "number" },
                        "ingredients": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "name": { "type": "string" },
                                    "quantity": { "type": "string" },
                                    "unit": { "type": "string" },
                                    "estimatedPrice": { "type": "number" },
                                    "supermarketLinks": {
                                        "type": "array",
                                        "items": {
                                            "type": "object",
                                            "properties": {
                                                "supermarket": { "type": "string" },
                                                "url": { "type": "string" },
                                                "price": { "type": "number" },
                                                "imageUrl": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        "instructions": { "type": "array", "items": { "type": "string" } },
                        "tips": { "type": "array", "items": { "type": "string" } },
                        "imageUrl": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "required": [
                "id", "title", "description", "days", "people", "meals",
                "estimatedCost", "supermarkets", "nutritionalSummary"
            ]
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::preferences::extract_preferences;

    #[test]
    fn test_instruction_is_deterministic() {
        let prefs = extract_preferences("4 people, 7 days, vegan, $90 budget");
        let a = build_meal_plan_instruction("vegan week", Some(&prefs));
        let b = build_meal_plan_instruction("vegan week", Some(&prefs));
        assert_eq!(a, b);
    }

    #[test]
    fn test_instruction_embeds_present_preferences_only() {
        let prefs = Preferences {
            people: Some(4),
            days: Some(7),
            ..Default::default()
        };
        let text = build_meal_plan_instruction("vegetarian plan", Some(&prefs));
        assert!(text.contains("User Request: \"vegetarian plan\""));
        assert!(text.contains("- Days: 7\n"));
        assert!(text.contains("- People: 4\n"));
        assert!(!text.contains("Target Calories"));
        assert!(!text.contains("Budget"));
        assert!(!text.contains("unspecified"));
    }

    #[test]
    fn test_instruction_omits_empty_preferences_section() {
        let empty = Preferences::default();
        let with_empty = build_meal_plan_instruction("plan", Some(&empty));
        let without = build_meal_plan_instruction("plan", None);
        assert_eq!(with_empty, without);
        assert!(!without.contains("Additional Preferences"));
    }

    #[test]
    fn test_instruction_formats_budget_and_restrictions() {
        let prefs = extract_preferences("keto and dairy-free, 150 dollars");
        let text = build_meal_plan_instruction("x", Some(&prefs));
        assert!(text.contains("- Dietary Restrictions: keto, dairy-free\n"));
        assert!(text.contains("- Budget: $150\n"));
    }

    #[test]
    fn test_schema_requires_core_fields() {
        let required = meal_plan_schema()["required"].as_array().unwrap();
        for field in ["title", "description", "days", "people", "meals"] {
            assert!(required.iter().any(|v| v == field), "missing {field}");
        }
    }

    #[test]
    fn test_parse_generates_missing_id_and_defaults() {
        let plan: MealPlan = serde_json::from_value(json!({
            "title": "Green Week",
            "description": "Plants",
            "days": 1,
            "people": 2,
            "meals": [{
                "day": 1,
                "breakfast": { "name": "Oats" },
                "lunch": { "name": "Salad" },
                "dinner": { "name": "Curry", "prepTime": 10, "cookTime": 25 }
            }]
        }))
        .unwrap();
        assert!(plan.id.starts_with("plan-"));
        assert_eq!(plan.difficulty, "Medium");
        assert_eq!(plan.meals[0].dinner.total_minutes(), Some(35));
        assert_eq!(plan.meals[0].lunch.total_minutes(), None);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_meals() {
        let plan: MealPlan = serde_json::from_value(json!({
            "title": "T", "description": "D", "days": 1, "people": 1, "meals": []
        }))
        .unwrap();
        assert_eq!(plan.validate().unwrap_err(), "meals list is empty");
    }

    #[test]
    fn test_validate_rejects_unnamed_meal() {
        let plan: MealPlan = serde_json::from_value(json!({
            "title": "T", "description": "D", "days": 1, "people": 1,
            "meals": [{
                "breakfast": { "name": "Eggs" },
                "lunch": { "name": "" },
                "dinner": { "name": "Soup" }
            }]
        }))
        .unwrap();
        assert_eq!(plan.validate().unwrap_err(), "day 1 lunch has no name");
    }
}
