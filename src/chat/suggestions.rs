// src/chat/suggestions.rs — Canned meal-plan suggestions offered during chat

use serde::Serialize;

use super::{BudgetTier, ChatProfile};

const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSuggestion {
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub difficulty: String,
    pub sample_meals: Vec<String>,
}

fn suggestion(
    title: &str,
    description: &str,
    features: [&str; 3],
    difficulty: &str,
    sample_meals: [&str; 3],
) -> PlanSuggestion {
    PlanSuggestion {
        title: title.to_string(),
        description: description.to_string(),
        features: features.iter().map(|s| s.to_string()).collect(),
        difficulty: difficulty.to_string(),
        sample_meals: sample_meals.iter().map(|s| s.to_string()).collect(),
    }
}

/// Generic starting points, shown before anything is known.
pub fn basic_suggestions() -> Vec<PlanSuggestion> {
    vec![
        suggestion(
            "Personalized Meal Plan",
            "Customized to your specific needs and preferences",
            ["Tailored nutrition", "Personalized portions", "Preference-based"],
            "Medium",
            ["Based on your preferences", "Customized recipes", "Personalized meals"],
        ),
        suggestion(
            "Quick & Healthy",
            "30-minute meals for busy lifestyles with real-time pricing",
            ["Fast preparation", "Current market prices", "Healthy ingredients"],
            "Easy",
            ["Quick protein options", "Simple healthy sides", "Fast nutritious meals"],
        ),
        suggestion(
            "Budget-Friendly Plan",
            "Cost-effective meals with current supermarket pricing",
            ["Real-time pricing", "Budget optimization", "Affordable nutrition"],
            "Easy",
            ["Cost-effective proteins", "Budget-friendly meals", "Affordable options"],
        ),
    ]
}

/// Suggestions matched to the profile. A balanced plan is always offered;
/// at most three are returned.
pub fn personalized_suggestions(profile: &ChatProfile) -> Vec<PlanSuggestion> {
    let mut out = Vec::new();

    if profile.has_tag("vegetarian") || profile.has_tag("vegan") {
        out.push(suggestion(
            "Plant-Based Power",
            "Delicious vegetarian/vegan meals packed with nutrition",
            ["High protein plants", "Colorful vegetables", "Satisfying portions"],
            "Easy",
            ["Lentil Shepherd's Pie", "Black Bean Burgers", "Tofu Scramble"],
        ));
    }

    if profile.has_tag("keto") || profile.has_tag("low-carb") || profile.has_tag("high-protein") {
        out.push(suggestion(
            "High-Protein Focus",
            "Protein-rich meals for active lifestyles",
            ["Lean meats & fish", "Low carb options", "Muscle-building nutrition"],
            "Medium",
            ["Steak & Asparagus", "Grilled Chicken Salad", "Egg White Omelet"],
        ));
    }

    if profile.budget_tier == Some(BudgetTier::Low) {
        out.push(suggestion(
            "Budget-Friendly Nutrition",
            "Maximum nutrition for your dollar",
            ["Bulk ingredients", "Meal prep friendly", "Cost-effective proteins"],
            "Easy",
            ["Chicken & Rice", "Bean Chili", "Oatmeal & Fruit"],
        ));
    }

    out.push(suggestion(
        "Custom Balanced Plan",
        "Tailored to your specific preferences and needs",
        ["Personalized portions", "Preferred ingredients", "Flexible scheduling"],
        "Medium",
        ["Grilled Salmon", "Turkey Meatballs", "Vegetable Curry"],
    ));

    out.truncate(MAX_SUGGESTIONS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(s: &[PlanSuggestion]) -> Vec<&str> {
        s.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_empty_profile_gets_balanced_only() {
        let s = personalized_suggestions(&ChatProfile::default());
        assert_eq!(titles(&s), vec!["Custom Balanced Plan"]);
    }

    #[test]
    fn test_everything_matched_is_capped_at_three() {
        let mut profile = ChatProfile::default();
        profile.absorb("vegan keto on a budget");
        let s = personalized_suggestions(&profile);
        assert_eq!(
            titles(&s),
            vec![
                "Plant-Based Power",
                "High-Protein Focus",
                "Budget-Friendly Nutrition"
            ]
        );
    }

    #[test]
    fn test_basic_suggestions_are_three() {
        assert_eq!(basic_suggestions().len(), 3);
    }
}
