//! Unit tests for the aggregator

use super::*;
use crate::types::{Lenient, MarketListing, OutcomeQuote};
use rust_decimal_macros::dec;

fn some<T>(value: T) -> Lenient<T> {
    Lenient(Some(value))
}

fn quote(source: &str, price: Decimal) -> Quote {
    Quote::new(source, price)
}

fn outcome(name: &str, price: Decimal, point: Option<f64>) -> Lenient<OutcomeQuote> {
    some(OutcomeQuote {
        name: some(name.to_string()),
        price: some(price),
        point: Lenient(point),
    })
}

fn bookmaker(title: &str, markets: Vec<(&str, Vec<Lenient<OutcomeQuote>>)>) -> Bookmaker {
    let listings: Vec<Lenient<MarketListing>> = markets
        .into_iter()
        .map(|(key, outcomes)| {
            some(MarketListing {
                key: some(key.to_string()),
                outcomes: some(outcomes),
            })
        })
        .collect();

    Bookmaker {
        key: some(title.to_lowercase()),
        title: some(title.to_string()),
        markets: some(listings),
    }
}

fn event(home: &str, away: &str, bookmakers: Vec<Bookmaker>) -> OddsEvent {
    OddsEvent {
        id: some(format!("{}-{}", home, away)),
        sport_key: some("basketball_nba".to_string()),
        home_team: some(home.to_string()),
        away_team: some(away.to_string()),
        commence_time: some("2026-10-20T23:30:00Z".to_string()),
        bookmakers: some(bookmakers.into_iter().map(some).collect()),
    }
}

fn h2h_book(title: &str, home: Decimal, away: Decimal) -> Bookmaker {
    bookmaker(
        title,
        vec![(
            "h2h",
            vec![outcome("Lakers", home, None), outcome("Celtics", away, None)],
        )],
    )
}

fn cfg() -> ValueConfig {
    ValueConfig::default()
}

// ---------- statistics ----------

#[test]
fn test_stats_no_value_scenario() {
    let quotes = vec![
        quote("Pinnacle", dec!(2.10)),
        quote("Bet365", dec!(2.05)),
        quote("Bovada", dec!(2.00)),
    ];
    let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();

    assert_eq!(stats.mean_price, dec!(2.05));
    assert_eq!(stats.max_price, dec!(2.10));
    assert_eq!(stats.best_sources, vec!["Pinnacle"]);
    // 2.10 is not above 2.05 * 1.04 = 2.132
    assert!(!stats.is_value);
}

#[test]
fn test_stats_value_scenario() {
    let quotes = vec![
        quote("Pinnacle", dec!(2.50)),
        quote("Bet365", dec!(2.00)),
        quote("Bovada", dec!(1.90)),
    ];
    let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();

    assert!((stats.mean_price - dec!(2.1333)).abs() < dec!(0.0001));
    assert_eq!(stats.max_price, dec!(2.50));
    assert!(stats.is_value);
    // (2.50 - 2.1333) / 2.1333 * 100 = 17.1875
    assert!((stats.value_premium_pct - dec!(17.1875)).abs() < dec!(0.001));
}

#[test]
fn test_single_quote_never_value() {
    for price in [dec!(1.01), dec!(2.0), dec!(15.5), dec!(1001)] {
        let stats = OutcomeStats::compute(&[quote("Solo", price)], dec!(1.04)).unwrap();
        assert_eq!(stats.max_price, stats.mean_price);
        assert!(!stats.is_value);
        assert_eq!(stats.value_premium_pct, Decimal::ZERO);
    }
}

#[test]
fn test_equal_prices_all_best_no_value() {
    let quotes: Vec<Quote> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|s| quote(s, dec!(1.87)))
        .collect();
    let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();

    assert!(!stats.is_value);
    assert_eq!(stats.best_sources, vec!["A", "B", "C", "D", "E"]);
}

#[test]
fn test_empty_bucket_is_none() {
    assert!(OutcomeStats::compute(&[], dec!(1.04)).is_none());
}

#[test]
fn test_overflowing_prices_are_none() {
    let huge = Decimal::from_scientific("5e28").unwrap();
    let quotes = vec![quote("A", huge), quote("B", huge)];
    assert!(OutcomeStats::compute(&quotes, dec!(1.04)).is_none());

    // mean fits, mean * threshold does not
    let quotes = vec![quote("A", Decimal::MAX)];
    assert!(OutcomeStats::compute(&quotes, dec!(1.04)).is_none());

    let stats = OutcomeStats::compute(&[quote("A", huge)], dec!(1.04)).unwrap();
    assert_eq!(stats.mean_price, huge);
    assert!(!stats.is_value);
}

#[test]
fn test_max_never_below_mean() {
    let samples = [
        vec![dec!(1.5), dec!(1.6), dec!(1.7)],
        vec![dec!(3.25), dec!(3.25), dec!(2.9), dec!(3.4)],
        vec![dec!(1.01), dec!(50)],
        vec![dec!(2.0)],
        vec![dec!(1.333), dec!(1.334), dec!(1.332), dec!(1.331), dec!(1.335)],
    ];
    for prices in samples {
        let quotes: Vec<Quote> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| quote(&format!("book{}", i), *p))
            .collect();
        let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();

        assert!(stats.max_price >= stats.mean_price);
        assert!(!stats.best_sources.is_empty());
        for source in &stats.best_sources {
            let q = quotes.iter().find(|q| &q.source == source).unwrap();
            assert_eq!(q.price, stats.max_price);
        }
    }
}

#[test]
fn test_ties_are_exact_only() {
    let quotes = vec![
        quote("A", dec!(2.10)),
        quote("B", dec!(2.100)),
        quote("C", dec!(2.099)),
    ];
    let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();
    assert_eq!(stats.best_sources, vec!["A", "B"]);
}

#[test]
fn test_custom_threshold() {
    let quotes = vec![quote("A", dec!(2.10)), quote("B", dec!(2.00))];
    // mean 2.05, premium ~2.4%
    assert!(!OutcomeStats::compute(&quotes, dec!(1.04)).unwrap().is_value);
    assert!(OutcomeStats::compute(&quotes, dec!(1.02)).unwrap().is_value);
}

#[test]
fn test_best_sources_display_truncates() {
    let quotes: Vec<Quote> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|s| quote(s, dec!(1.90)))
        .collect();
    let stats = OutcomeStats::compute(&quotes, dec!(1.04)).unwrap();

    let shown = stats.best_sources_display(3);
    assert_eq!(shown.shown, vec!["A", "B", "C"]);
    assert!(shown.has_more());
    assert_eq!(shown.to_string(), "A, B, C (+2 more)");
    // the statistic itself is untouched
    assert_eq!(stats.best_sources.len(), 5);

    let all = stats.best_sources_display(10);
    assert!(!all.has_more());
    assert_eq!(all.to_string(), "A, B, C, D, E");
}

// ---------- bucketing ----------

#[test]
fn test_buckets_filter_by_market_key() {
    let books = vec![
        bookmaker(
            "Pinnacle",
            vec![
                ("h2h", vec![outcome("Lakers", dec!(1.80), None)]),
                ("spreads", vec![outcome("Lakers", dec!(1.91), Some(-5.5))]),
            ],
        ),
        bookmaker("Bet365", vec![("spreads_h1", vec![outcome("Lakers", dec!(1.95), Some(-2.5))])]),
    ];

    let buckets = OutcomeBuckets::from_bookmakers(&books, "spreads");
    assert_eq!(buckets.len(), 1);
    let quotes = buckets.get(&OutcomeLabel::new("Lakers", Some(-5.5))).unwrap();
    assert_eq!(quotes, &[quote("Pinnacle", dec!(1.91))]);
    assert!(buckets.get(&OutcomeLabel::new("Lakers", None)).is_none());
}

#[test]
fn test_buckets_no_fuzzy_match() {
    let books = vec![bookmaker("Pinnacle", vec![("H2H", vec![outcome("Lakers", dec!(1.8), None)])])];
    assert!(OutcomeBuckets::from_bookmakers(&books, "h2h").is_empty());
}

#[test]
fn test_buckets_distinguish_points() {
    let books = vec![
        bookmaker(
            "Pinnacle",
            vec![(
                "spreads",
                vec![
                    outcome("Team A", dec!(1.91), Some(-5.5)),
                    outcome("Team B", dec!(1.91), Some(5.5)),
                ],
            )],
        ),
        bookmaker(
            "Bet365",
            vec![(
                "spreads",
                vec![
                    outcome("Team A", dec!(1.80), Some(-4.5)),
                    outcome("Team A", dec!(1.95), Some(-5.5)),
                ],
            )],
        ),
    ];

    let buckets = OutcomeBuckets::from_bookmakers(&books, "spreads");
    let labels: Vec<&str> = buckets.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["Team A (-5.5)", "Team B (5.5)", "Team A (-4.5)"]);
    assert_eq!(
        buckets.get(&OutcomeLabel::new("Team A", Some(-5.5))).unwrap().len(),
        2
    );
}

#[test]
fn test_buckets_keep_duplicates() {
    let books = vec![
        h2h_book("Pinnacle", dec!(1.80), dec!(2.10)),
        h2h_book("Pinnacle", dec!(1.82), dec!(2.05)),
    ];
    let buckets = OutcomeBuckets::from_bookmakers(&books, "h2h");
    let lakers = buckets.get(&OutcomeLabel::new("Lakers", None)).unwrap();
    assert_eq!(lakers.len(), 2);
    assert!(lakers.iter().all(|q| q.source == "Pinnacle"));
}

#[test]
fn test_buckets_skip_bad_outcomes() {
    let books = vec![bookmaker(
        "Bovada",
        vec![(
            "h2h",
            vec![
                Lenient(None),
                some(OutcomeQuote {
                    name: Lenient(None),
                    price: some(dec!(2.0)),
                    point: Lenient(None),
                }),
                some(OutcomeQuote {
                    name: some("Celtics".to_string()),
                    price: Lenient(None),
                    point: Lenient(None),
                }),
                outcome("Celtics", dec!(0), None),
                outcome("Lakers", dec!(1.75), None),
            ],
        )],
    )];

    let buckets = OutcomeBuckets::from_bookmakers(&books, "h2h");
    assert_eq!(buckets.len(), 1);
    assert_eq!(
        buckets.get(&OutcomeLabel::new("Lakers", None)).unwrap(),
        &[quote("Bovada", dec!(1.75))]
    );
}

#[test]
fn test_buckets_untitled_bookmaker_uses_key() {
    let mut book = h2h_book("Unibet", dec!(1.8), dec!(2.0));
    book.title = Lenient(None);
    let buckets = OutcomeBuckets::from_bookmakers(&[book], "h2h");
    let lakers = buckets.get(&OutcomeLabel::new("Lakers", None)).unwrap();
    assert_eq!(lakers[0].source, "unibet");
}

// ---------- events ----------

#[test]
fn test_aggregate_event_full() {
    let ev = event(
        "Lakers",
        "Celtics",
        vec![
            h2h_book("Pinnacle", dec!(2.50), dec!(1.60)),
            h2h_book("Bet365", dec!(2.00), dec!(1.65)),
            h2h_book("Bovada", dec!(1.90), dec!(1.65)),
        ],
    );

    let odds = aggregate_event(&ev, "h2h", &cfg()).unwrap();
    assert_eq!(odds.home_team, "Lakers");
    assert_eq!(odds.market_key, "h2h");
    assert_eq!(odds.outcomes.len(), 2);

    let lakers = &odds.outcomes[0];
    assert_eq!(lakers.label.as_str(), "Lakers");
    assert!(lakers.stats.is_value);
    assert_eq!(lakers.best_display.shown, vec!["Pinnacle"]);

    let celtics = &odds.outcomes[1];
    assert!(!celtics.stats.is_value);
    assert_eq!(celtics.stats.best_sources, vec!["Bet365", "Bovada"]);

    assert_eq!(odds.value_outcomes().count(), 1);
    assert_eq!(odds.pivot.rows.len(), 3);
}

#[test]
fn test_event_without_market_is_dropped() {
    let events = vec![
        event("Lakers", "Celtics", vec![h2h_book("Pinnacle", dec!(1.8), dec!(2.0))]),
        event("Heat", "Knicks", vec![h2h_book("Pinnacle", dec!(1.9), dec!(1.9))]),
    ];
    assert!(aggregate_events(&events, "totals", &cfg()).is_empty());
}

#[test]
fn test_bad_event_does_not_abort_others() {
    let mut broken = event("Heat", "Knicks", vec![h2h_book("Pinnacle", dec!(1.9), dec!(1.9))]);
    broken.commence_time = some("not a date".to_string());
    let mut nameless = event("Nets", "Bulls", vec![h2h_book("Pinnacle", dec!(1.9), dec!(1.9))]);
    nameless.home_team = Lenient(None);

    let events = vec![
        broken,
        event("Lakers", "Celtics", vec![h2h_book("Pinnacle", dec!(1.8), dec!(2.0))]),
        nameless,
    ];
    let result = aggregate_events(&events, "h2h", &cfg());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].away_team, "Celtics");
}

#[test]
fn test_aggregate_from_json() {
    let json = r#"[
        {"id": "a", "home_team": "Arsenal", "away_team": "Chelsea",
         "commence_time": "2026-10-25T15:00:00Z",
         "bookmakers": [
            {"key": "pinnacle", "title": "Pinnacle", "markets": [
                {"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": 2.1},
                    {"name": "Chelsea", "price": 3.6},
                    {"name": "Draw", "price": 3.4}
                ]}
            ]},
            {"key": "williamhill", "title": "William Hill", "markets": [
                {"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": "oops"},
                    {"name": "Chelsea", "price": 3.5},
                    {"name": "Draw", "price": 3.3}
                ]}
            ]}
         ]},
        {"id": "b", "home_team": "Leeds", "away_team": "Everton",
         "commence_time": "2026-10-25T17:30:00Z", "bookmakers": []}
    ]"#;

    let events: Vec<OddsEvent> = serde_json::from_str(json).unwrap();
    let result = aggregate_events(&events, "h2h", &cfg());
    assert_eq!(result.len(), 1);

    let arsenal = &result[0].outcomes[0];
    assert_eq!(arsenal.label.as_str(), "Arsenal");
    assert_eq!(arsenal.quotes.len(), 1);

    let pivot = &result[0].pivot;
    assert_eq!(
        pivot.price("William Hill", &OutcomeLabel::new("Chelsea", None)),
        Some(dec!(3.5))
    );
    assert_eq!(pivot.price("William Hill", &OutcomeLabel::new("Arsenal", None)), None);
}

#[test]
fn test_aggregate_skips_malformed_and_overflowing_events() {
    let json = r#"[
        null,
        {"id": "a", "home_team": "Arsenal", "away_team": "Chelsea",
         "commence_time": "2026-10-25T15:00:00Z",
         "bookmakers": [
            {"key": "pinnacle", "title": "Pinnacle", "markets": [
                {"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": 5e28},
                    {"name": "Chelsea", "price": 3.6}
                ]}
            ]},
            {"key": "betfair", "title": "Betfair", "markets": [
                {"key": "h2h", "outcomes": [
                    {"name": "Arsenal", "price": 5e28},
                    {"name": "Chelsea", "price": 3.5}
                ]}
            ]}
         ]},
        {"id": "b", "home_team": "Leeds", "away_team": "Everton",
         "commence_time": "2026-10-25T17:30:00Z",
         "bookmakers": [
            {"key": "pinnacle", "title": "Pinnacle", "markets": [
                {"key": "h2h", "outcomes": [{"name": "Leeds", "price": 5e28}]}
            ]},
            {"key": "betfair", "title": "Betfair", "markets": [
                {"key": "h2h", "outcomes": [{"name": "Leeds", "price": 5e28}]}
            ]}
         ]},
        "junk",
        {"id": "c", "home_team": "Spurs", "away_team": "Fulham",
         "commence_time": "2026-10-26T14:00:00Z",
         "bookmakers": [
            {"key": "pinnacle", "title": "Pinnacle", "markets": [
                {"key": "h2h", "outcomes": [{"name": "Spurs", "price": 1.9}]}
            ]}
         ]}
    ]"#;

    let events = crate::types::parse_events(json).unwrap();
    assert_eq!(events.len(), 3);

    let result = aggregate_events(&events, "h2h", &cfg());
    let ids: Vec<_> = result.iter().map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, vec![Some("a"), Some("c")]);

    // the overflowing outcome is dropped, its sibling survives
    let labels: Vec<&str> = result[0].outcomes.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Chelsea"]);
    assert_eq!(result[0].outcomes[0].stats.mean_price, dec!(3.55));
}

// ---------- pivot ----------

#[test]
fn test_pivot_first_quote_wins() {
    let books = vec![
        h2h_book("Pinnacle", dec!(1.80), dec!(2.10)),
        h2h_book("Pinnacle", dec!(1.82), dec!(2.05)),
        bookmaker("Bet365", vec![("h2h", vec![outcome("Celtics", dec!(2.2), None)])]),
    ];
    let buckets = OutcomeBuckets::from_bookmakers(&books, "h2h");
    let pivot = PivotTable::from_buckets(&buckets);

    assert_eq!(pivot.outcomes.len(), 2);
    assert_eq!(pivot.rows.len(), 2);
    let lakers = OutcomeLabel::new("Lakers", None);
    assert_eq!(pivot.price("Pinnacle", &lakers), Some(dec!(1.80)));
    assert_eq!(pivot.price("Bet365", &lakers), None);
    assert_eq!(
        pivot.price("Bet365", &OutcomeLabel::new("Celtics", None)),
        Some(dec!(2.2))
    );
}
