// src/core/fallback.rs — Static demo meal plan shown when generation fails

use crate::planner::meal_plan::{
    CostRange, DayMeals, Ingredient, Meal, MealPlan, NutritionalSummary, Supermarket,
};

pub const DEMO_PLAN_ID: &str = "demo-meal-plan";

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_PEOPLE: u32 = 4;

// Cost range quoted for the reference size (4 people, 7 days).
const REFERENCE_PERSON_DAYS: f64 = 28.0;
const REFERENCE_COST_MIN: f64 = 120.0;
const REFERENCE_COST_MAX: f64 = 150.0;

const ROTATION: [[&str; 3]; 7] = [
    [
        "Greek Yogurt with Honey & Berries",
        "Mediterranean Quinoa Salad",
        "Grilled Salmon with Lemon & Herbs",
    ],
    [
        "Avocado Toast with Tomatoes",
        "Chickpea & Vegetable Soup",
        "Herb-Crusted Chicken with Roasted Vegetables",
    ],
    [
        "Whole Grain Toast with Hummus",
        "Greek Salad with Feta",
        "Baked Cod with Herbs",
    ],
    [
        "Oatmeal with Nuts & Berries",
        "Lentil Soup with Bread",
        "Grilled Chicken with Vegetables",
    ],
    [
        "Smoothie Bowl with Granola",
        "Quinoa & Vegetable Bowl",
        "Baked Salmon with Rice",
    ],
    [
        "Greek Yogurt Parfait",
        "Mediterranean Wrap",
        "Herb-Crusted Fish",
    ],
    [
        "Avocado & Egg Toast",
        "Chickpea Salad",
        "Grilled Vegetables & Fish",
    ],
];

fn ingredient(name: &str, quantity: &str, unit: &str, price: f64) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
        estimated_price: Some(price),
        supermarket_links: Vec::new(),
    }
}

/// Only the day-one meals carry full recipes; the rest are named only.
fn day_one_detail(slot: usize, meal: &mut Meal) {
    match slot {
        1 => {
            meal.ingredients = vec![
                ingredient("Quinoa", "1 cup", "cup", 3.50),
                ingredient("Cherry tomatoes", "2 cups", "cups", 4.00),
                ingredient("Cucumber", "1", "piece", 1.50),
                ingredient("Feta cheese", "4 oz", "oz", 3.00),
            ];
            meal.instructions = vec![
                "Cook quinoa".into(),
                "Mix all ingredients".into(),
                "Drizzle with olive oil".into(),
            ];
        }
        2 => {
            meal.ingredients = vec![
                ingredient("Salmon fillets", "1.5 lbs", "lbs", 14.00),
                ingredient("Lemon", "1", "piece", 0.75),
                ingredient("Fresh herbs", "1/4 cup", "cup", 2.50),
                ingredient("Olive oil", "2 tbsp", "tbsp", 1.00),
            ];
            meal.instructions = vec![
                "Season salmon with herbs and lemon".into(),
                "Grill 4-5 minutes per side".into(),
                "Rest before serving".into(),
            ];
        }
        _ => {}
    }
}

/// Deterministic Mediterranean plan scaled to the known people/day counts.
pub fn demo_meal_plan(people: Option<u32>, days: Option<u32>) -> MealPlan {
    let people = people.filter(|n| *n > 0).unwrap_or(DEFAULT_PEOPLE);
    let days = days.filter(|n| *n > 0).unwrap_or(DEFAULT_DAYS);

    let meals = (0..days)
        .map(|d| {
            let names = ROTATION[d as usize % ROTATION.len()];
            let mut slots: Vec<Meal> = names
                .iter()
                .enumerate()
                .map(|(slot, name)| {
                    let mut meal = Meal {
                        name: name.to_string(),
                        servings: Some(people as f64),
                        ..Default::default()
                    };
                    if d == 0 {
                        day_one_detail(slot, &mut meal);
                    }
                    meal
                })
                .collect();
            let dinner = slots.pop().unwrap_or_default();
            let lunch = slots.pop().unwrap_or_default();
            let breakfast = slots.pop().unwrap_or_default();
            DayMeals {
                day: d + 1,
                breakfast,
                lunch,
                dinner,
            }
        })
        .collect();

    let scale = (people * days) as f64 / REFERENCE_PERSON_DAYS;

    MealPlan {
        id: DEMO_PLAN_ID.to_string(),
        title: "Mediterranean Delight".to_string(),
        description: "Fresh, healthy meals inspired by Mediterranean cuisine with plenty of \
                      vegetables, fish, and olive oil."
            .to_string(),
        days,
        people,
        meals,
        total_calories: Some(2100.0),
        total_protein: Some(120.0),
        total_carbs: Some(180.0),
        total_fat: Some(70.0),
        difficulty: "Medium".to_string(),
        estimated_cost: Some(CostRange {
            min: (REFERENCE_COST_MIN * scale).round(),
            max: (REFERENCE_COST_MAX * scale).round(),
            currency: "USD".to_string(),
        }),
        supermarkets: vec![
            Supermarket {
                name: "Whole Foods".into(),
                country: "United States".into(),
                website: "https://www.wholefoodsmarket.com".into(),
                delivery_fee: Some(5.99),
            },
            Supermarket {
                name: "Kroger".into(),
                country: "United States".into(),
                website: "https://www.kroger.com".into(),
                delivery_fee: Some(4.99),
            },
            Supermarket {
                name: "Walmart".into(),
                country: "United States".into(),
                website: "https://www.walmart.com".into(),
                delivery_fee: Some(0.0),
            },
        ],
        nutritional_summary: Some(NutritionalSummary {
            daily_calories: 2100.0,
            daily_protein: 120.0,
            daily_carbs: 180.0,
            daily_fat: 70.0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::TaskOutput;

    #[test]
    fn test_defaults_to_four_people_one_week() {
        let plan = demo_meal_plan(None, None);
        assert_eq!(plan.people, 4);
        assert_eq!(plan.days, 7);
        assert_eq!(plan.meals.len(), 7);
        let cost = plan.estimated_cost.as_ref().unwrap();
        assert_eq!((cost.min, cost.max), (120.0, 150.0));
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_scales_to_requested_size() {
        let plan = demo_meal_plan(Some(2), Some(10));
        assert_eq!(plan.meals.len(), 10);
        assert_eq!(plan.meals[7].breakfast.name, plan.meals[0].breakfast.name);
        assert_eq!(plan.meals[9].day, 10);
        assert_eq!(plan.meals[0].dinner.servings, Some(2.0));
        let cost = plan.estimated_cost.as_ref().unwrap();
        assert_eq!(cost.min, (120.0_f64 * 20.0 / 28.0).round());
    }

    #[test]
    fn test_is_deterministic() {
        assert_eq!(demo_meal_plan(Some(3), Some(2)), demo_meal_plan(Some(3), Some(2)));
    }

    #[test]
    fn test_zero_counts_fall_back_to_defaults() {
        let plan = demo_meal_plan(Some(0), Some(0));
        assert_eq!((plan.people, plan.days), (4, 7));
    }

    #[test]
    fn test_day_one_has_recipes() {
        let plan = demo_meal_plan(None, Some(1));
        assert_eq!(plan.meals[0].lunch.ingredients.len(), 4);
        assert!(plan.meals[0].breakfast.ingredients.is_empty());
    }
}
