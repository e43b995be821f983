// src/history/mod.rs — Bounded chat, recipe, and purchase history
//
// Each list lives as one JSON array under its own key. Lists are loaded once
// on open and written back on every change. Newest entries come first.

pub mod schema;
pub mod store;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::infra::config::HistoryConfig;
use crate::infra::errors::DietAgentError;
use crate::util;
use store::KeyValueStore;

pub const CHAT_KEY: &str = "diet-agent-chat-history";
pub const RECIPE_KEY: &str = "diet-agent-recipe-history";
pub const PURCHASE_KEY: &str = "diet-agent-purchase-history";

const RECENT_CHATS: usize = 10;
const RECENT_RECIPES: usize = 20;
const RECENT_PURCHASES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Chats,
    Recipes,
    Purchases,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 3] = [
        HistoryKind::Chats,
        HistoryKind::Recipes,
        HistoryKind::Purchases,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HistoryKind::Chats => CHAT_KEY,
            HistoryKind::Recipes => RECIPE_KEY,
            HistoryKind::Purchases => PURCHASE_KEY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryKind::Chats => "Chats",
            HistoryKind::Recipes => "Recipes",
            HistoryKind::Purchases => "Purchases",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatHistoryItem {
    pub id: String,
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub query: String,
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<HistoryMessage>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub item: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeHistoryItem {
    pub id: String,
    pub title: String,
    pub saved_date: String,
    pub difficulty: String,
    pub cooking_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<RecipeIngredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Completed,
    Pending,
    Failed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistoryItem {
    pub id: String,
    pub date: String,
    pub plan: String,
    pub items: u32,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supermarket: Option<String>,
    pub status: PurchaseStatus,
}

/// Fields a caller supplies for a new chat entry; id and date are assigned.
#[derive(Debug, Clone, Default)]
pub struct NewChat {
    pub query: String,
    pub plan: String,
    pub messages: Option<Vec<HistoryMessage>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewRecipe {
    pub title: String,
    pub difficulty: String,
    pub cooking_time: String,
    pub rating: Option<f32>,
    pub tags: Vec<String>,
    pub plan_id: Option<String>,
    pub ingredients: Option<Vec<RecipeIngredient>>,
    pub instructions: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub plan: String,
    pub items: u32,
    pub total: f64,
    pub supermarket: Option<String>,
    pub status: PurchaseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryCaps {
    pub chats: usize,
    pub recipes: usize,
    pub purchases: usize,
}

impl Default for HistoryCaps {
    fn default() -> Self {
        Self {
            chats: 50,
            recipes: 100,
            purchases: 50,
        }
    }
}

impl From<&HistoryConfig> for HistoryCaps {
    fn from(cfg: &HistoryConfig) -> Self {
        Self {
            chats: cfg.max_chats,
            recipes: cfg.max_recipes,
            purchases: cfg.max_purchases,
        }
    }
}

/// Process-wide history, injected into whatever records entries.
pub struct History {
    store: Box<dyn KeyValueStore>,
    caps: HistoryCaps,
    chats: Vec<ChatHistoryItem>,
    recipes: Vec<RecipeHistoryItem>,
    purchases: Vec<PurchaseHistoryItem>,
}

impl History {
    /// Load all three lists from `store`. Unreadable lists start empty.
    pub fn load(store: Box<dyn KeyValueStore>, caps: HistoryCaps) -> Result<Self, DietAgentError> {
        let chats = load_list(store.as_ref(), CHAT_KEY)?;
        let recipes = load_list(store.as_ref(), RECIPE_KEY)?;
        let purchases = load_list(store.as_ref(), PURCHASE_KEY)?;
        Ok(Self {
            store,
            caps,
            chats,
            recipes,
            purchases,
        })
    }

    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    pub fn add_chat(&mut self, chat: NewChat) -> Result<ChatHistoryItem, DietAgentError> {
        let item = ChatHistoryItem {
            id: util::new_id(),
            date: util::today_date(),
            query: chat.query,
            plan: chat.plan,
            messages: chat.messages,
        };
        push_front_capped(&mut self.chats, item.clone(), self.caps.chats);
        save_list(self.store.as_mut(), CHAT_KEY, &self.chats)?;
        Ok(item)
    }

    pub fn add_recipe(&mut self, recipe: NewRecipe) -> Result<RecipeHistoryItem, DietAgentError> {
        let item = RecipeHistoryItem {
            id: util::new_id(),
            title: recipe.title,
            saved_date: util::today_date(),
            difficulty: recipe.difficulty,
            cooking_time: recipe.cooking_time,
            rating: recipe.rating,
            tags: recipe.tags,
            plan_id: recipe.plan_id,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
        };
        push_front_capped(&mut self.recipes, item.clone(), self.caps.recipes);
        save_list(self.store.as_mut(), RECIPE_KEY, &self.recipes)?;
        Ok(item)
    }

    pub fn add_purchase(
        &mut self,
        purchase: NewPurchase,
    ) -> Result<PurchaseHistoryItem, DietAgentError> {
        let item = PurchaseHistoryItem {
            id: util::new_id(),
            date: util::today_date(),
            plan: purchase.plan,
            items: purchase.items,
            total: purchase.total,
            supermarket: purchase.supermarket,
            status: purchase.status,
        };
        push_front_capped(&mut self.purchases, item.clone(), self.caps.purchases);
        save_list(self.store.as_mut(), PURCHASE_KEY, &self.purchases)?;
        Ok(item)
    }

    /// Clear one list, or all of them when `kind` is `None`.
    pub fn clear(&mut self, kind: Option<HistoryKind>) -> Result<(), DietAgentError> {
        for k in HistoryKind::ALL {
            if kind.is_some_and(|only| only != k) {
                continue;
            }
            match k {
                HistoryKind::Chats => self.chats.clear(),
                HistoryKind::Recipes => self.recipes.clear(),
                HistoryKind::Purchases => self.purchases.clear(),
            }
            self.store.remove(k.key())?;
        }
        Ok(())
    }

    pub fn recent_chats(&self, limit: Option<usize>) -> &[ChatHistoryItem] {
        head(&self.chats, limit.unwrap_or(RECENT_CHATS))
    }

    pub fn recent_recipes(&self, limit: Option<usize>) -> &[RecipeHistoryItem] {
        head(&self.recipes, limit.unwrap_or(RECENT_RECIPES))
    }

    pub fn recent_purchases(&self, limit: Option<usize>) -> &[PurchaseHistoryItem] {
        head(&self.purchases, limit.unwrap_or(RECENT_PURCHASES))
    }

    pub fn len(&self, kind: HistoryKind) -> usize {
        match kind {
            HistoryKind::Chats => self.chats.len(),
            HistoryKind::Recipes => self.recipes.len(),
            HistoryKind::Purchases => self.purchases.len(),
        }
    }
}


fn head<T>(items: &[T], limit: usize) -> &[T] {
    &items[..items.len().min(limit)]
}

fn push_front_capped<T>(list: &mut Vec<T>, item: T, cap: usize) {
    list.insert(0, item);
    list.truncate(cap);
}

fn load_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, DietAgentError> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(list) => Ok(list),
        Err(e) => {
            tracing::warn!(key, "Failed to load history, starting empty: {}", e);
            Ok(Vec::new())
        }
    }
}

fn save_list<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    list: &[T],
) -> Result<(), DietAgentError> {
    let json = serde_json::to_string(list).map_err(|e| DietAgentError::Other(e.into()))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use store::MemoryStore;

    fn history(caps: HistoryCaps) -> History {
        History::load(Box::new(MemoryStore::new()), caps).unwrap()
    }

    fn chat(n: usize) -> NewChat {
        NewChat {
            query: format!("query {n}"),
            plan: format!("plan {n}"),
            messages: None,
        }
    }

    #[test]
    fn test_add_chat_assigns_id_and_date() {
        let mut h = history(HistoryCaps::default());
        let item = h.add_chat(chat(1)).unwrap();
        assert_eq!(item.id.len(), 36);
        assert_eq!(item.date.len(), 10);
        assert_eq!(&item.date[4..5], "-");
        assert_eq!(h.recent_chats(None), &[item]);
    }

    #[test]
    fn test_chats_capped_newest_first() {
        let mut h = history(HistoryCaps {
            chats: 3,
            ..Default::default()
        });
        for n in 0..5 {
            h.add_chat(chat(n)).unwrap();
        }
        let queries: Vec<&str> = h.recent_chats(None).iter().map(|c| c.query.as_str()).collect();
        assert_eq!(queries, vec!["query 4", "query 3", "query 2"]);
    }

    #[test]
    fn test_default_caps() {
        let mut h = history(HistoryCaps::default());
        for n in 0..55 {
            h.add_chat(chat(n)).unwrap();
        }
        assert_eq!(h.len(HistoryKind::Chats), 50);
        assert_eq!(h.recent_chats(None).len(), 10);
        assert_eq!(h.recent_chats(Some(100)).len(), 50);
    }

    #[test]
    fn test_reload_restores_lists() {
        let mut h = history(HistoryCaps::default());
        h.add_chat(chat(1)).unwrap();
        h.add_recipe(NewRecipe {
            title: "Dal".into(),
            difficulty: "Easy".into(),
            cooking_time: "30 min".into(),
            tags: vec!["vegan".into()],
            ..Default::default()
        })
        .unwrap();
        h.add_purchase(NewPurchase {
            plan: "Veggie Week".into(),
            items: 12,
            total: 54.2,
            supermarket: Some("Tesco".into()),
            status: PurchaseStatus::Pending,
        })
        .unwrap();

        let reloaded = History::load(h.into_store(), HistoryCaps::default()).unwrap();
        assert_eq!(reloaded.recent_chats(None)[0].query, "query 1");
        assert_eq!(reloaded.recent_recipes(None)[0].title, "Dal");
        assert_eq!(
            reloaded.recent_purchases(None)[0].status,
            PurchaseStatus::Pending
        );
    }

    #[test]
    fn test_clear_one_kind_leaves_others() {
        let mut h = history(HistoryCaps::default());
        h.add_chat(chat(1)).unwrap();
        h.add_recipe(NewRecipe {
            title: "Soup".into(),
            ..Default::default()
        })
        .unwrap();

        h.clear(Some(HistoryKind::Chats)).unwrap();
        assert_eq!(h.len(HistoryKind::Chats), 0);
        assert_eq!(h.len(HistoryKind::Recipes), 1);

        let store = h.into_store();
        assert_eq!(store.get(CHAT_KEY).unwrap(), None);
        assert!(store.get(RECIPE_KEY).unwrap().is_some());
    }

    #[test]
    fn test_clear_all() {
        let mut h = history(HistoryCaps::default());
        h.add_chat(chat(1)).unwrap();
        h.add_recipe(NewRecipe::default()).unwrap();
        h.clear(None).unwrap();
        for kind in HistoryKind::ALL {
            assert_eq!(h.len(kind), 0);
        }
    }

    #[test]
    fn test_corrupt_list_loads_empty() {
        let store = MemoryStore::new()
            .with_value(CHAT_KEY, "{not json")
            .with_value(RECIPE_KEY, "[]");
        let h = History::load(Box::new(store), HistoryCaps::default()).unwrap();
        assert_eq!(h.len(HistoryKind::Chats), 0);
    }

    #[test]
    fn test_wire_names_match_stored_format() {
        let raw = r#"[{"id":"1","title":"Dal","savedDate":"2026-01-02","difficulty":"Easy",
                      "cookingTime":"30 min","tags":[],"planId":"p1"}]"#;
        let store = MemoryStore::new().with_value(RECIPE_KEY, raw);
        let h = History::load(Box::new(store), HistoryCaps::default()).unwrap();
        let r = &h.recent_recipes(None)[0];
        assert_eq!(r.saved_date, "2026-01-02");
        assert_eq!(r.plan_id.as_deref(), Some("p1"));
    }
}
