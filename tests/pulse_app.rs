use std::collections::HashSet;

use chrono::{ Duration, Utc };
use pulse_feed::market::walk::{ MARKET_CAP_FLOOR, TX_COUNT_MAX, TX_COUNT_MIN };
use pulse_feed::services::LeadingPrefixPolicy;
use pulse_feed::view::variant;
use pulse_feed::{ PulseApp, Scheduler, SchedulerConfig, TickEvent, TokenStatus };
use rand::rngs::StdRng;
use rand::SeedableRng;

fn app(seed: u64) -> PulseApp {
    PulseApp::with_rng(
        20,
        true,
        Box::new(LeadingPrefixPolicy::default()),
        StdRng::seed_from_u64(seed),
        Utc::now()
    )
}

#[test]
fn test_bounds_hold_after_many_ticks() {
    let mut app = app(100);
    for _ in 0..1_000 {
        app.on_market_tick();
    }

    let everything = app.store().items().iter().chain(app.new_pairs().tokens());
    for token in everything {
        assert!(token.market_cap >= MARKET_CAP_FLOOR, "{} at {}", token.id, token.market_cap);
        assert!((TX_COUNT_MIN..=TX_COUNT_MAX).contains(&token.tx_count));
    }
}

#[test]
fn test_columns_partition_the_collection() {
    let app = app(101);
    let snapshot = app.snapshot(Utc::now());

    let mut seen = HashSet::new();
    for status in [TokenStatus::Final, TokenStatus::Migrated] {
        let column = snapshot.column(status).unwrap();
        for token in column.tokens() {
            assert_eq!(token.status, status);
            assert!(seen.insert(token.id.clone()));
        }
    }
    for token in app.store().items().iter().filter(|t| t.status == TokenStatus::New) {
        assert!(seen.insert(token.id.clone()));
    }
    assert_eq!(seen.len(), app.store().len());
}

#[test]
fn test_new_pairs_insertion_scenario() {
    let mut app = app(102);
    let before: Vec<String> = app
        .new_pairs()
        .tokens()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(before.len(), 20);
    let expected: HashSet<String> = (0..20).map(|i| format!("new-{}", i)).collect();
    assert_eq!(before.iter().cloned().collect::<HashSet<_>>(), expected);

    let evicted = before[19].clone();
    let now = Utc::now() + Duration::seconds(1);
    let insertion = app.on_insertion_tick(now).unwrap();

    let after = app.new_pairs().tokens();
    assert_eq!(after.len(), 20);
    assert_eq!(after[0].id, insertion.inserted_id);
    assert!(!before.contains(&after[0].id));
    assert!(after.iter().all(|t| t.id != evicted));
    assert!(after.iter().skip(1).all(|t| t.created_at <= after[0].created_at));
}

#[test]
fn test_display_variant_stable_across_ticks() {
    let mut app = app(103);
    let id = app.store().items()[10].id.clone();
    let first = variant::select(&id);

    for _ in 0..20 {
        app.on_market_tick();
    }
    let token = app.store().items().iter().find(|t| t.id == id).unwrap();
    assert_eq!(variant::for_token(token), first);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_drives_app() {
    let mut app = app(104);
    let mut scheduler = Scheduler::new(SchedulerConfig {
        market_interval: std::time::Duration::from_secs(2),
        highlight_interval: std::time::Duration::from_secs(2),
        age_interval: std::time::Duration::from_secs(1),
        insert_min: std::time::Duration::from_secs(5),
        insert_max: std::time::Duration::from_secs(5),
        seed: Some(104),
    });
    let mut ticks = scheduler.subscribe();
    scheduler.start();

    let original: HashSet<String> = app
        .new_pairs()
        .tokens()
        .iter()
        .map(|t| t.id.clone())
        .collect();

    let mut insertions = 0;
    while insertions < 2 {
        let event = ticks.recv().await.unwrap();
        if event == TickEvent::Insertion {
            insertions += 1;
        }
        app.handle(event, Utc::now());
    }
    scheduler.stop().await;

    let current: HashSet<String> = app
        .new_pairs()
        .tokens()
        .iter()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(current.len(), 20);
    assert_eq!(current.difference(&original).count(), 2);
}
