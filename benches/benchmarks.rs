// benches/benchmarks.rs — Performance benchmarks (criterion)
//
// Hot paths on every CLI invocation:
//   1. Preference extraction from free text
//   2. Request building (instruction text + schema + metadata)
//   3. Output validation of a finished task
//   4. History store open + list append

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use diet_agent::core::fallback::demo_meal_plan;
use diet_agent::core::validate::parse_task_output;
use diet_agent::history::store::SqliteStore;
use diet_agent::history::{History, HistoryCaps, NewChat};
use diet_agent::planner::meal_plan::MealPlan;
use diet_agent::planner::preferences::extract_preferences;
use diet_agent::planner::TaskPayload;
use diet_agent::remote::{Task, TaskStatus, DEFAULT_LLM};

const REQUESTS: &[&str] = &[
    "Vegetarian meal plan for 4 people for 7 days",
    "keto week, 2 people, 1800 calories, $150 budget, in Germany",
    "something cheap and quick",
    "Gluten-free and dairy-free dinners for 3 ppl over 10 days in the UK",
];

// ─── Benchmark: Preference extraction ───────────────────────────────────────

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    group.bench_function("extract_preferences_mixed", |b| {
        b.iter(|| {
            for text in REQUESTS {
                let _prefs = extract_preferences(black_box(text));
            }
        })
    });

    let long = REQUESTS.join(". ").repeat(20);
    group.bench_function("extract_preferences_long_text", |b| {
        b.iter(|| {
            let _prefs = extract_preferences(black_box(&long));
        })
    });

    group.finish();
}

// ─── Benchmark: Request building ────────────────────────────────────────────

fn bench_requests(c: &mut Criterion) {
    let prefs = extract_preferences(REQUESTS[1]);
    let plan = demo_meal_plan(None, None);
    let mut group = c.benchmark_group("requests");

    group.bench_function("meal_plan_request", |b| {
        b.iter(|| {
            let payload = TaskPayload::MealPlan {
                prompt: black_box(REQUESTS[1]),
                preferences: Some(&prefs),
            };
            let _req = payload.to_request(DEFAULT_LLM, Utc::now());
        })
    });

    group.bench_function("shopping_cart_request", |b| {
        b.iter(|| {
            let payload = TaskPayload::ShoppingCart {
                plan: black_box(&plan),
                supermarket: "Walmart",
                country: "United States",
            };
            let _req = payload.to_request(DEFAULT_LLM, Utc::now());
        })
    });

    group.finish();
}

// ─── Benchmark: Output validation ───────────────────────────────────────────

fn bench_validation(c: &mut Criterion) {
    let plan = demo_meal_plan(None, Some(14));
    let mut task = Task::new("bench", TaskStatus::Finished);
    task.output = Some(serde_json::to_string(&plan).expect("serialize plan"));

    c.bench_function("parse_meal_plan_14_days", |b| {
        b.iter(|| {
            let _plan: MealPlan = parse_task_output(black_box(&task)).expect("valid plan");
        })
    });
}

// ─── Benchmark: History ─────────────────────────────────────────────────────

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    group.bench_function("open_in_memory", |b| {
        b.iter(|| {
            let store = SqliteStore::in_memory().expect("open store");
            History::load(Box::new(store), HistoryCaps::default()).expect("load history")
        })
    });

    group.bench_function("add_chat_at_cap", |b| {
        let store = SqliteStore::in_memory().expect("open store");
        let mut history =
            History::load(Box::new(store), HistoryCaps::default()).expect("load history");
        b.iter(|| {
            history
                .add_chat(NewChat {
                    query: black_box("vegan week").to_string(),
                    plan: "Green Plate".to_string(),
                    messages: None,
                })
                .expect("add chat");
        })
    });

    group.finish();
}

// ─── Main ───────────────────────────────────────────────────────────────────

criterion_group!(
    benches,
    bench_extraction,
    bench_requests,
    bench_validation,
    bench_history,
);
criterion_main!(benches);
