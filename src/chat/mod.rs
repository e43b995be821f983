// src/chat/mod.rs — Conversational assistant for gathering plan preferences
//
// Preferences accumulate across turns. When a completion client is present
// it writes the reply; any completion error falls back to local replies.

pub mod suggestions;

use serde::Serialize;
use std::sync::Arc;

use crate::history::HistoryMessage;
use crate::planner::preferences::{extract_preferences, Preferences};
use crate::remote::completions::CompletionApi;
use suggestions::{basic_suggestions, personalized_suggestions, PlanSuggestion};

const MEAL_PLAN_KEYWORDS: &[&str] = &[
    "meal plan",
    "meal planning",
    "diet plan",
    "weekly meal",
    "meal ideas",
    "plan for",
];

const SUGGESTION_KEYWORDS: &[&str] = &[
    "meal plan",
    "diet plan",
    "food plan",
    "nutrition plan",
    "suggest",
    "recommendation",
];

const SUPERMARKETS: &[&str] = &[
    "walmart",
    "tesco",
    "carrefour",
    "kroger",
    "target",
    "whole foods",
    "trader joe",
];

// Spaced spellings the extractor's hyphenated tags would miss.
const TAG_ALIASES: &[(&str, &str)] = &[
    ("low carb", "low-carb"),
    ("high protein", "high-protein"),
    ("gluten free", "gluten-free"),
    ("dairy free", "dairy-free"),
];

/// Does this message ask for a generated meal plan?
pub fn is_meal_plan_request(text: &str) -> bool {
    let lower = text.to_lowercase();
    MEAL_PLAN_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn wants_suggestions(text: &str) -> bool {
    let lower = text.to_lowercase();
    SUGGESTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<&ChatMessage> for HistoryMessage {
    fn from(m: &ChatMessage) -> Self {
        HistoryMessage {
            role: m.role.as_str().to_string(),
            content: m.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    High,
}

/// What the conversation has revealed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatProfile {
    pub preferences: Preferences,
    pub supermarket: Option<String>,
    pub budget_tier: Option<BudgetTier>,
}

impl ChatProfile {
    /// Fold one user message into the profile.
    pub fn absorb(&mut self, message: &str) {
        let lower = message.to_lowercase();

        let mut found = extract_preferences(message);
        let aliases: Vec<String> = TAG_ALIASES
            .iter()
            .filter(|(alias, _)| lower.contains(alias))
            .map(|(_, tag)| tag.to_string())
            .collect();
        if !aliases.is_empty() {
            found
                .dietary_restrictions
                .get_or_insert_with(Vec::new)
                .extend(aliases);
        }
        self.preferences.merge(found);

        if ["budget", "cheap", "affordable"]
            .iter()
            .any(|w| lower.contains(w))
        {
            self.budget_tier = Some(BudgetTier::Low);
        }
        if ["premium", "gourmet"].iter().any(|w| lower.contains(w)) {
            self.budget_tier = Some(BudgetTier::High);
        }

        // Last listed match wins.
        if let Some(market) = SUPERMARKETS.iter().rev().find(|m| lower.contains(*m)) {
            self.supermarket = Some(market.to_string());
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.preferences
            .dietary_restrictions
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    /// People or days known.
    pub fn has_basic_info(&self) -> bool {
        self.preferences.people.is_some() || self.preferences.days.is_some()
    }

    fn known_fields(&self) -> usize {
        let p = &self.preferences;
        [
            p.people.is_some(),
            p.days.is_some(),
            p.calories.is_some(),
            p.country.is_some(),
            p.dietary_restrictions.is_some(),
            p.budget.is_some(),
            self.supermarket.is_some(),
            self.budget_tier.is_some(),
        ]
        .iter()
        .filter(|known| **known)
        .count()
    }

    pub fn next_questions(&self) -> Vec<String> {
        let mut questions = Vec::new();
        if self.preferences.people.is_none() {
            questions.push("How many people are you planning meals for?".to_string());
        }
        if self.preferences.days.is_none() {
            questions.push("How many days would you like the meal plan to cover?".to_string());
        }
        if self.supermarket.is_none() {
            questions.push("Do you have a preferred supermarket for shopping?".to_string());
        }
        if self.known_fields() < 3 {
            questions.push(
                "Any dietary restrictions or preferences? (vegetarian, keto, etc.)".to_string(),
            );
        }
        questions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<PlanSuggestion>>,
    pub needs_more_info: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_questions: Vec<String>,
}

pub struct ChatSession {
    messages: Vec<ChatMessage>,
    profile: ChatProfile,
    completions: Option<Arc<dyn CompletionApi>>,
}

impl ChatSession {
    pub fn new(completions: Option<Arc<dyn CompletionApi>>) -> Self {
        Self {
            messages: Vec::new(),
            profile: ChatProfile::default(),
            completions,
        }
    }

    pub fn profile(&self) -> &ChatProfile {
        &self.profile
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.profile = ChatProfile::default();
    }

    /// Append an assistant line produced elsewhere (e.g. a generated plan).
    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    pub fn record_user(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.profile.absorb(&content);
        self.push(Role::User, content);
    }

    pub async fn send(&mut self, message: &str) -> ChatReply {
        self.record_user(message);

        let reply = match self.remote_reply(message).await {
            Some(reply) => reply,
            None => self.local_reply(message),
        };
        self.push(Role::Assistant, reply.message.clone());
        reply
    }

    async fn remote_reply(&self, message: &str) -> Option<ChatReply> {
        let client = self.completions.as_ref()?;
        match client.complete(&completion_prompt(message)).await {
            Ok(text) => Some(ChatReply {
                message: text,
                suggestions: wants_suggestions(message)
                    .then(|| personalized_suggestions(&self.profile)),
                needs_more_info: !self.profile.has_basic_info(),
                next_questions: Vec::new(),
            }),
            Err(e) => {
                tracing::warn!("Completion failed, answering locally: {}", e);
                None
            }
        }
    }

    fn local_reply(&self, message: &str) -> ChatReply {
        let lower = message.to_lowercase();
        if self.messages.len() <= 2 || lower.contains("diet") || lower.contains("meal plan") {
            return self.initial_reply();
        }
        if self.profile.has_basic_info() {
            return ChatReply {
                message: "Perfect! Based on your preferences, I've created tailored meal plan \
                          options for you. Each one is designed to meet your specific needs:"
                    .to_string(),
                suggestions: Some(personalized_suggestions(&self.profile)),
                needs_more_info: false,
                next_questions: Vec::new(),
            };
        }
        ChatReply {
            message: "I'd love to create the perfect meal plan for you! \
                      Could you tell me a bit more about your preferences?"
                .to_string(),
            suggestions: None,
            needs_more_info: true,
            next_questions: self.profile.next_questions(),
        }
    }

    fn initial_reply(&self) -> ChatReply {
        let people = self
            .profile
            .preferences
            .people
            .map(|n| format!("{n} {}", if n == 1 { "person" } else { "people" }))
            .unwrap_or_else(|| "your family".to_string());
        let days = self
            .profile
            .preferences
            .days
            .map(|n| format!("{n} {}", if n == 1 { "day" } else { "days" }))
            .unwrap_or_else(|| "several days".to_string());

        ChatReply {
            message: format!(
                "Great! I understand you want a meal plan for {people} for {days}. \
                 Let me create some personalized options for you based on what you've told me."
            ),
            suggestions: Some(basic_suggestions()),
            needs_more_info: !self.profile.has_basic_info(),
            next_questions: self.profile.next_questions(),
        }
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(ChatMessage { role, content });
    }
}

fn completion_prompt(message: &str) -> String {
    format!(
        "You are a helpful nutrition assistant. The user has sent the following message: \"{message}\"\n\n\
         Based on their message, provide a helpful response about nutrition, diet planning, or meal suggestions.\n\
         If they're asking about meal plans, suggest some options but don't create a full plan - \
         that will be handled separately.\n\n\
         Response format: A helpful, friendly response addressing their query about nutrition or diet.\n"
    )
}
