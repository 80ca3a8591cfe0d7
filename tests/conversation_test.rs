// ABOUTME: Integration tests for the conversation state machine over a memory store
// ABOUTME: Walks every transition: grams, choice, none-of-these, kcal, cancel and fresh complete input
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 KBJU Diary Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use common::{candidate, chain_with, chain_without_seeds, engine_over, CountingProvider};
use kbju_diary::conversation::{ConversationEngine, ConversationState, Inbound, Reply};
use kbju_diary::database_plugins::memory::MemoryDiaryStore;
use kbju_diary::database_plugins::DiaryStore;
use kbju_diary::models::{CookingMethod, DiaryEntry, EntrySource};
use kbju_diary::providers::{LookupOutcome, NutritionProvider};

const CHAT: i64 = 1001;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

async fn say(engine: &ConversationEngine, text: &str) -> Reply {
    engine.handle_on(CHAT, Inbound::Text(text.into()), day()).await
}

async fn entries(store: &MemoryDiaryStore, chat_id: i64) -> Result<Vec<DiaryEntry>> {
    let user = store.get_or_create_user(chat_id).await?;
    Ok(store.get_entries(user.id, day()).await?)
}

fn saved(reply: Reply) -> DiaryEntry {
    match reply {
        Reply::Saved { entry, .. } => entry,
        other => panic!("expected a saved entry, got {other:?}"),
    }
}

fn approx(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap();
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

fn two_chicken_options() -> Arc<CountingProvider> {
    CountingProvider::always(
        "fake",
        LookupOutcome::Found(vec![
            candidate("fake", "Chicken breast", 120.0),
            candidate("fake", "Chicken breast, roasted", 165.0),
        ]),
    )
}

#[tokio::test]
async fn test_awaiting_grams_ignores_non_numeric_answers() -> Result<()> {
    let (engine, store) = engine_over(chain_with(Vec::new()).await?);

    let reply = say(&engine, "куриная грудка").await;
    assert_eq!(
        reply,
        Reply::AskGrams {
            title: "куриная грудка".into()
        }
    );
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingGrams);

    let reply = say(&engine, "не знаю, много").await;
    assert!(matches!(reply, Reply::AskGrams { .. }));
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingGrams);
    assert!(entries(&store, CHAT).await?.is_empty());

    let reply = say(&engine, "0").await;
    assert!(matches!(reply, Reply::AskGrams { .. }));

    // Seed hit for куриная грудка: 120 kcal per 100 g
    let entry = saved(say(&engine, "140").await);
    approx(entry.details.kcal, 168.0);
    assert_eq!(entry.details.mass_grams, Some(140.0));
    assert_eq!(entry.details.quantity_unit, "g");
    assert_eq!(entry.details.source, EntrySource::Dictionary);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    assert_eq!(entries(&store, CHAT).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_clears_pending_context() -> Result<()> {
    let (engine, store) = engine_over(chain_with(Vec::new()).await?);

    say(&engine, "куриная грудка").await;
    assert_eq!(
        engine.handle_on(CHAT, Inbound::Cancel, day()).await,
        Reply::Cancelled
    );
    assert_eq!(engine.state(CHAT), ConversationState::Idle);

    // A new complete message is a brand-new resolution
    let entry = saved(say(&engine, "rice boiled 100 g").await);
    assert_eq!(entry.details.title, "rice");
    approx(entry.details.kcal, 130.0);
    assert_eq!(entry.details.source, EntrySource::Dictionary);
    assert_eq!(entries(&store, CHAT).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_cancel_words_in_text() -> Result<()> {
    let (engine, _store) = engine_over(chain_with(Vec::new()).await?);

    say(&engine, "яйцо 2 шт").await;
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingGrams);

    assert_eq!(say(&engine, "Отмена").await, Reply::Cancelled);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_cottage_cheese_end_to_end() -> Result<()> {
    let (engine, _store) = engine_over(chain_with(Vec::new()).await?);

    let reply = say(&engine, "творог 100 г").await;

    let Reply::Saved { entry, summary } = reply else {
        panic!("expected a saved entry, got {reply:?}");
    };
    assert_eq!(entry.details.kcal, Some(121.0));
    assert_eq!(entry.details.protein, Some(17.0));
    assert_eq!(entry.details.fat, Some(5.0));
    assert_eq!(entry.details.carbs, Some(3.0));
    assert!(!entry.details.is_calories_only);
    assert_eq!(summary.kcal, 121.0);

    let Reply::Saved { summary, .. } = say(&engine, "творог 200 г").await else {
        panic!("second entry was not saved");
    };
    assert_eq!(summary.kcal, 363.0);
    assert_eq!(summary.protein, 51.0);
    Ok(())
}

#[tokio::test]
async fn test_fresh_complete_input_wins_over_pending_context() -> Result<()> {
    let (engine, _store) = engine_over(chain_with(Vec::new()).await?);

    say(&engine, "куриная грудка").await;
    let entry = saved(say(&engine, "протеиновый батончик 180 ккал").await);

    assert_eq!(entry.details.title, "протеиновый батончик");
    assert_eq!(entry.details.kcal, Some(180.0));
    assert!(entry.details.is_calories_only);
    assert_eq!(entry.details.protein, None);
    assert_eq!(entry.details.quantity_value, 1.0);
    assert_eq!(entry.details.quantity_unit, "portion");
    assert_eq!(entry.details.source, EntrySource::Manual);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_explicit_macros_with_mass_are_saved_without_lookup() -> Result<()> {
    let provider = two_chicken_options();
    let (engine, _store) = engine_over(chain_without_seeds(vec![provider.clone()]).await?);

    let entry = saved(say(&engine, "творог 200 г б 18 ж 5 у 3").await);

    assert_eq!(entry.details.protein, Some(36.0));
    assert_eq!(entry.details.fat, Some(10.0));
    assert_eq!(entry.details.carbs, Some(6.0));
    // Atwater: 18*4 + 5*9 + 3*4 = 129 per 100 g
    approx(entry.details.kcal, 258.0);
    assert_eq!(entry.details.source, EntrySource::Manual);
    assert_eq!(provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_typed_macros_are_kept_after_grams_answer() -> Result<()> {
    let provider = two_chicken_options();
    let (engine, store) = engine_over(chain_without_seeds(vec![provider.clone()]).await?);

    let reply = say(&engine, "мой батончик б 10 ж 5 у 30").await;
    assert_eq!(
        reply,
        Reply::AskGrams {
            title: "мой батончик".into()
        }
    );

    let entry = saved(say(&engine, "50").await);

    assert_eq!(entry.details.title, "мой батончик");
    assert_eq!(entry.details.mass_grams, Some(50.0));
    approx(entry.details.protein, 5.0);
    approx(entry.details.fat, 2.5);
    approx(entry.details.carbs, 15.0);
    // Atwater: 10*4 + 5*9 + 30*4 = 205 per 100 g
    approx(entry.details.kcal, 102.5);
    assert!(!entry.details.is_calories_only);
    assert_eq!(entry.details.source, EntrySource::Manual);
    assert_eq!(provider.calls(), 0);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    assert_eq!(entries(&store, CHAT).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_percent_titles_reach_seed_entries() -> Result<()> {
    let provider = two_chicken_options();
    let (engine, _store) = engine_over(chain_with(vec![provider.clone()]).await?);

    let curd = saved(say(&engine, "творог 5% 200 г").await);
    approx(curd.details.kcal, 242.0);
    approx(curd.details.protein, 34.0);
    assert_eq!(curd.details.source, EntrySource::Dictionary);

    let milk = saved(say(&engine, "молоко 2,5% 200 мл").await);
    approx(milk.details.kcal, 104.0);
    assert_eq!(milk.details.mass_grams, Some(200.0));
    assert_eq!(milk.details.source, EntrySource::Dictionary);

    assert_eq!(provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_choice_flow_persists_selected_candidate() -> Result<()> {
    let (engine, store) = engine_over(chain_without_seeds(vec![two_chicken_options()]).await?);

    let reply = say(&engine, "chicken breast 150 g").await;
    let Reply::Choose { title, options } = reply else {
        panic!("expected options, got {reply:?}");
    };
    assert_eq!(title, "chicken breast");
    assert_eq!(options.len(), 2);
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingChoice);

    let entry = saved(engine.handle_on(CHAT, Inbound::Choice(1), day()).await);
    assert_eq!(entry.details.title, "chicken breast");
    approx(entry.details.kcal, 247.5);
    approx(entry.details.protein, 15.0);
    assert_eq!(entry.details.source, EntrySource::Api);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    assert_eq!(entries(&store, CHAT).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_numeric_text_picks_an_option() -> Result<()> {
    let (engine, _store) = engine_over(chain_without_seeds(vec![two_chicken_options()]).await?);
    say(&engine, "chicken breast 100 g").await;

    let reply = say(&engine, "7").await;
    assert!(matches!(reply, Reply::Choose { .. }));
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingChoice);

    let entry = saved(say(&engine, "1").await);
    approx(entry.details.kcal, 120.0);
    Ok(())
}

#[tokio::test]
async fn test_none_of_these_asks_for_calories() -> Result<()> {
    let (engine, _store) = engine_over(chain_without_seeds(vec![two_chicken_options()]).await?);
    say(&engine, "chicken breast 150 g").await;

    let reply = engine.handle_on(CHAT, Inbound::NoneOfThese, day()).await;
    assert_eq!(
        reply,
        Reply::AskKcal {
            title: "chicken breast".into()
        }
    );
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingKcal);

    let entry = saved(say(&engine, "250").await);
    assert_eq!(entry.details.kcal, Some(250.0));
    assert!(entry.details.is_calories_only);
    assert_eq!(entry.details.quantity_value, 150.0);
    assert_eq!(entry.details.mass_grams, Some(150.0));
    assert_eq!(entry.details.fat, None);
    Ok(())
}

#[tokio::test]
async fn test_unresolved_dish_goes_straight_to_calories() -> Result<()> {
    let provider = CountingProvider::always("fake", LookupOutcome::Empty);
    let (engine, store) = engine_over(chain_without_seeds(vec![provider]).await?);

    let reply = say(&engine, "dragonfruit smoothie 200 g").await;
    assert!(matches!(reply, Reply::AskKcal { .. }));
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingKcal);

    assert!(matches!(say(&engine, "сколько?").await, Reply::AskKcal { .. }));
    assert!(entries(&store, CHAT).await?.is_empty());

    let entry = saved(say(&engine, "300 ккал").await);
    assert_eq!(entry.details.kcal, Some(300.0));
    Ok(())
}

#[tokio::test]
async fn test_preset_candidate_is_offered_as_a_choice() -> Result<()> {
    let provider = CountingProvider::always("fake", LookupOutcome::Empty);
    let (engine, _store) = engine_over(chain_without_seeds(vec![provider]).await?);

    let reply = say(&engine, "картошка жареная 200 г").await;

    let Reply::Choose { options, .. } = reply else {
        panic!("expected the preset as an option, got {reply:?}");
    };
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].title, "Картофель жареный");

    let entry = saved(engine.handle_on(CHAT, Inbound::Choice(0), day()).await);
    assert_eq!(entry.details.source, EntrySource::Preset);
    approx(entry.details.kcal, 384.0);
    Ok(())
}

#[tokio::test]
async fn test_selection_without_options_is_nothing_pending() -> Result<()> {
    let (engine, _store) = engine_over(chain_with(Vec::new()).await?);

    assert_eq!(
        engine.handle_on(CHAT, Inbound::Choice(0), day()).await,
        Reply::NothingPending
    );
    assert_eq!(
        engine.handle_on(CHAT, Inbound::NoneOfThese, day()).await,
        Reply::NothingPending
    );

    say(&engine, "куриная грудка").await;
    assert_eq!(
        engine.handle_on(CHAT, Inbound::Choice(0), day()).await,
        Reply::NothingPending
    );
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingGrams);
    Ok(())
}

#[tokio::test]
async fn test_quantity_without_title_asks_for_title() -> Result<()> {
    let (engine, _store) = engine_over(chain_with(Vec::new()).await?);

    assert_eq!(say(&engine, "150 г").await, Reply::AskTitle);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_users_do_not_share_state() -> Result<()> {
    let (engine, store) = engine_over(chain_with(Vec::new()).await?);

    say(&engine, "куриная грудка").await;
    let other = engine
        .handle_on(2002, Inbound::Text("творог 100 г".into()), day())
        .await;

    assert!(matches!(other, Reply::Saved { .. }));
    assert_eq!(engine.state(CHAT), ConversationState::AwaitingGrams);
    assert_eq!(engine.state(2002), ConversationState::Idle);
    assert!(entries(&store, CHAT).await?.is_empty());
    assert_eq!(entries(&store, 2002).await?.len(), 1);
    Ok(())
}

/// Provider that answers only after a delay
struct SlowProvider;

#[async_trait]
impl NutritionProvider for SlowProvider {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, _term: &str, _method: Option<CookingMethod>) -> LookupOutcome {
        tokio::time::sleep(Duration::from_millis(300)).await;
        LookupOutcome::Found(vec![candidate("slow", "Chicken breast", 120.0)])
    }
}

#[tokio::test]
async fn test_cancel_during_resolution_discards_the_result() -> Result<()> {
    let providers: Vec<Arc<dyn NutritionProvider>> = vec![Arc::new(SlowProvider)];
    let (engine, store) = engine_over(chain_without_seeds(providers).await?);

    let (in_flight, cancelled) = tokio::join!(say(&engine, "chicken breast 100 g"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        engine.handle_on(CHAT, Inbound::Cancel, day()).await
    });

    assert_eq!(cancelled, Reply::Cancelled);
    assert_eq!(in_flight, Reply::Discarded);
    assert_eq!(engine.state(CHAT), ConversationState::Idle);
    assert!(entries(&store, CHAT).await?.is_empty());

    // The next message starts over; the provider result was cached meanwhile
    assert!(matches!(
        say(&engine, "chicken breast 100 g").await,
        Reply::Choose { .. }
    ));
    Ok(())
}
