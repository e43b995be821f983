// src/planner/preferences.rs — Keyword extraction of meal-plan preferences
//
// Recognized patterns (case-insensitive):
//   people    "<n> people" | "<n> person" | "<n> ppl"
//   days      "<n> day(s)"
//   calories  "<n> calorie(s)"
//   budget    "[$]<n> dollar(s)" | "[$]<n> budget"
//   country   whole-word match against COUNTRY_KEYWORDS
//   diet      substring match against DIETARY_KEYWORDS

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("us", "United States"),
    ("united states", "United States"),
    ("uk", "United Kingdom"),
    ("united kingdom", "United Kingdom"),
    ("canada", "Canada"),
    ("australia", "Australia"),
    ("germany", "Germany"),
    ("france", "France"),
];

pub const DIETARY_KEYWORDS: &[&str] = &[
    "vegetarian",
    "vegan",
    "keto",
    "paleo",
    "gluten-free",
    "dairy-free",
    "low-carb",
    "high-protein",
];

/// Sparse preferences pulled from free text. `None` means unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<u32>,
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        *self == Preferences::default()
    }

    /// Overlay fields present in `newer` onto `self`.
    pub fn merge(&mut self, newer: Preferences) {
        if newer.people.is_some() {
            self.people = newer.people;
        }
        if newer.days.is_some() {
            self.days = newer.days;
        }
        if newer.calories.is_some() {
            self.calories = newer.calories;
        }
        if newer.country.is_some() {
            self.country = newer.country;
        }
        if let Some(tags) = newer.dietary_restrictions {
            let existing = self.dietary_restrictions.get_or_insert_with(Vec::new);
            for tag in tags {
                if !existing.contains(&tag) {
                    existing.push(tag);
                }
            }
        }
        if newer.budget.is_some() {
            self.budget = newer.budget;
        }
    }
}

struct Patterns {
    people: Regex,
    days: Regex,
    calories: Regex,
    budget: Regex,
    countries: Vec<(Regex, &'static str)>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        people: Regex::new(r"(?i)(\d+)\s*(?:people|person|ppl)").expect("valid regex"),
        days: Regex::new(r"(?i)(\d+)\s*days?").expect("valid regex"),
        calories: Regex::new(r"(?i)(\d+)\s*calories?").expect("valid regex"),
        budget: Regex::new(r"(?i)\$?(\d+)(?:\s*dollars?|\s*budget)").expect("valid regex"),
        countries: COUNTRY_KEYWORDS
            .iter()
            .map(|(kw, name)| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw)))
                    .expect("valid regex");
                (re, *name)
            })
            .collect(),
    })
}

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract preferences from free text. Pure; unmatched fields stay `None`.
pub fn extract_preferences(text: &str) -> Preferences {
    let p = patterns();
    let lower = text.to_lowercase();

    let country = p
        .countries
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, name)| name.to_string());

    let restrictions: Vec<String> = DIETARY_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    Preferences {
        people: first_number(&p.people, text),
        days: first_number(&p.days, text),
        calories: first_number(&p.calories, text),
        country,
        dietary_restrictions: if restrictions.is_empty() {
            None
        } else {
            Some(restrictions)
        },
        budget: first_number(&p.budget, text),
    }
}
