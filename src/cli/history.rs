// src/cli/history.rs — `diet-agent history`: list or clear local history

use super::{App, HistoryAction};
use crate::history::{History, HistoryKind};
use crate::util::truncate_str;

pub fn run_history(app: &App, action: Option<HistoryAction>) -> anyhow::Result<()> {
    let mut history = app.open_history()?;

    match action.unwrap_or(HistoryAction::List {
        kind: None,
        limit: None,
    }) {
        HistoryAction::List { kind, limit } => {
            let kinds = kind.map(|k| vec![k]).unwrap_or_else(|| HistoryKind::ALL.to_vec());
            for kind in kinds {
                print!("{}", list(&history, kind, limit));
            }
        }
        HistoryAction::Clear { kind } => {
            history.clear(kind)?;
            match kind {
                Some(k) => println!("Cleared {} history.", k.label()),
                None => println!("Cleared all history."),
            }
        }
    }
    Ok(())
}

/// One section of the listing. `limit` falls back to each list's default.
pub fn list(history: &History, kind: HistoryKind, limit: Option<usize>) -> String {
    let mut lines = vec![format!("{} ({})", kind.label(), history.len(kind))];
    match kind {
        HistoryKind::Chats => {
            for c in history.recent_chats(limit) {
                lines.push(format!("  {}  {}  -> {}", c.date, truncate_str(&c.query, 48), c.plan));
            }
        }
        HistoryKind::Recipes => {
            for r in history.recent_recipes(limit) {
                let rating = r.rating.map(|x| format!("  {x:.1}*")).unwrap_or_default();
                lines.push(format!(
                    "  {}  {}  [{}, {}]{}",
                    r.saved_date, r.title, r.difficulty, r.cooking_time, rating
                ));
            }
        }
        HistoryKind::Purchases => {
            for p in history.recent_purchases(limit) {
                lines.push(format!(
                    "  {}  {}  {} items  {:.2}  {}  {}",
                    p.date,
                    p.plan,
                    p.items,
                    p.total,
                    p.supermarket.as_deref().unwrap_or("-"),
                    p.status.as_str()
                ));
            }
        }
    }
    lines.push(String::new());
    lines.join("\n") + "\n"
}
