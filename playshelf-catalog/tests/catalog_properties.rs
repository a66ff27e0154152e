use playshelf_catalog::filter::{matches_featured, matches_query, matches_tag};
use playshelf_catalog::{
    Catalog, CatalogBrowser, CategoryFilter, Direction, EngineConfig, FilterCriteria, GameRecord,
    PageState, RngBundle, SortMode, Spotlight, filter, normalize_record, sort, visible,
};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

const CATEGORIES: [&str; 4] = ["Arcade", "Puzzle", "Racing", "retro"];
const TAGS: [&str; 6] = ["retro", "co-op", "logic", "fast", "Puzzle", "pixel"];
const WORDS: [&str; 8] = [
    "neon", "Drift", "orbit", "Maze", "ember", "Quartz", "lumen", "",
];

fn random_raw(rng: &mut SmallRng) -> Value {
    let tag_count = rng.gen_range(0..4);
    let tags: Vec<&str> = TAGS.choose_multiple(rng, tag_count).copied().collect();
    let title = format!(
        "{} {}",
        WORDS.choose(rng).copied().unwrap_or_default(),
        WORDS.choose(rng).copied().unwrap_or_default()
    );
    json!({
        "title": title,
        "description": WORDS.choose(rng).copied().unwrap_or_default(),
        "category": CATEGORIES.choose(rng).copied().unwrap_or_default(),
        "tags": tags,
        "featured": rng.gen_bool(0.3),
        "url": format!("https://play.example/{}", rng.r#gen::<u16>()),
    })
}

fn random_catalog(seed: u64, size: usize) -> Catalog {
    let mut rng = SmallRng::seed_from_u64(seed);
    let raw: Vec<Value> = (0..size).map(|_| random_raw(&mut rng)).collect();
    Catalog::from_raw(&raw)
}

fn random_criteria(rng: &mut SmallRng) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();
    if rng.gen_bool(0.5) {
        criteria.set_query(WORDS.choose(rng).copied().unwrap_or_default());
    }
    if rng.gen_bool(0.5) {
        criteria.category = CategoryFilter::from_label(CATEGORIES.choose(rng).copied().unwrap_or_default());
    }
    if rng.gen_bool(0.5) {
        criteria.tag = TAGS.choose(rng).map(|tag| (*tag).to_string());
    }
    criteria.featured_only = rng.gen_bool(0.3);
    criteria
}

fn ids(records: &[&GameRecord]) -> Vec<usize> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn normalizing_twice_changes_nothing() {
    let catalog = random_catalog(1, 40);
    for record in &catalog {
        let again = normalize_record(&serde_json::to_value(record).unwrap(), record.id);
        assert_eq!(&again, record);
    }
}

#[test]
fn predicate_order_does_not_matter() {
    let catalog = random_catalog(2, 60);
    let mut rng = SmallRng::seed_from_u64(20);
    for _ in 0..50 {
        let criteria = random_criteria(&mut rng);
        type Predicate<'c> = Box<dyn Fn(&GameRecord) -> bool + 'c>;
        let mut predicates: Vec<Predicate<'_>> = vec![
            Box::new(|r: &GameRecord| matches_query(r, criteria.query())),
            Box::new(|r: &GameRecord| criteria.category.matches(&r.category)),
            Box::new(|r: &GameRecord| matches_featured(r, criteria.featured_only)),
            Box::new(|r: &GameRecord| matches_tag(r, criteria.tag.as_deref())),
        ];
        predicates.shuffle(&mut rng);
        let chained: Vec<usize> = catalog
            .iter()
            .filter(|record| predicates.iter().all(|predicate| predicate(*record)))
            .map(|record| record.id)
            .collect();
        assert_eq!(chained, ids(&filter(&catalog, &criteria)));
    }
}

#[test]
fn every_match_satisfies_every_active_predicate() {
    let catalog = random_catalog(3, 60);
    let mut rng = SmallRng::seed_from_u64(30);
    for _ in 0..50 {
        let criteria = random_criteria(&mut rng);
        let matched = filter(&catalog, &criteria);
        for record in &matched {
            assert!(matches_query(record, criteria.query()));
            assert!(criteria.category.matches(&record.category));
            assert!(!criteria.featured_only || record.featured);
            if let Some(tag) = criteria.tag.as_deref() {
                assert!(record.has_tag(tag) || record.category == tag);
            }
        }
        let positions = ids(&matched);
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

#[test]
fn deterministic_modes_are_repeatable() {
    let catalog = random_catalog(4, 50);
    let all: Vec<&GameRecord> = catalog.iter().collect();
    let mut rng = SmallRng::seed_from_u64(40);
    for mode in SortMode::ALL.into_iter().filter(|mode| mode.is_deterministic()) {
        let first = sort(&all, mode, &mut rng);
        let second = sort(&all, mode, &mut rng);
        assert_eq!(ids(&first), ids(&second), "{mode} not repeatable");
    }

    let curated = sort(&all, SortMode::Curated, &mut rng);
    let boundary = curated.iter().position(|r| !r.featured).unwrap_or(curated.len());
    assert!(curated[..boundary].iter().all(|r| r.featured));
    assert!(curated[boundary..].iter().all(|r| !r.featured));
}

#[test]
fn random_mode_is_a_permutation() {
    let catalog = random_catalog(5, 30);
    let all: Vec<&GameRecord> = catalog.iter().collect();
    let mut rng = SmallRng::seed_from_u64(50);
    let mut shuffled = ids(&sort(&all, SortMode::Random, &mut rng));
    shuffled.sort_unstable();
    assert_eq!(shuffled, ids(&all));
}

#[test]
fn visible_count_grows_without_overshooting() {
    let catalog = random_catalog(6, 53);
    let all: Vec<&GameRecord> = catalog.iter().collect();
    let mut page = PageState::new(7);
    let mut previous = 0;
    for _ in 0..12 {
        let shown = visible(&all, &page).len();
        assert!(shown >= previous);
        assert!(shown <= all.len());
        assert_eq!(page.has_more(all.len()), shown < all.len());
        previous = shown;
        page = page.advance();
    }
    assert_eq!(previous, all.len());
}

#[test]
fn full_lap_returns_to_start() {
    for seed in 0..10 {
        let catalog = random_catalog(seed, 25);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut spotlight = Spotlight::init(&catalog, &mut rng);
        let start = spotlight.current_id();
        for _ in 0..spotlight.pool().len() {
            spotlight.shift(Direction::Next);
        }
        assert_eq!(spotlight.current_id(), start);
        for _ in 0..spotlight.pool().len() {
            spotlight.shift(Direction::Previous);
        }
        assert_eq!(spotlight.current_id(), start);
    }
}

#[test]
fn reset_reproduces_default_view() {
    let json = serde_json::to_string(
        &(0..40)
            .map(|i| random_raw(&mut SmallRng::seed_from_u64(i)))
            .collect::<Vec<_>>(),
    )
    .unwrap();
    let config = EngineConfig {
        page_size: 5,
        ..EngineConfig::default()
    };
    let mut browser = CatalogBrowser::new(config, RngBundle::from_user_seed(9));
    browser.load_json(&json).unwrap();
    let pristine: Vec<usize> = browser.results().items.iter().map(|r| r.id).collect();

    let mut rng = SmallRng::seed_from_u64(90);
    for _ in 0..20 {
        browser.set_criteria(random_criteria(&mut rng));
        browser.set_sort_mode(*SortMode::ALL.choose(&mut rng).unwrap());
        browser.load_more();
        browser.reset_filters();
        let view = browser.results();
        assert_eq!(view.items.iter().map(|r| r.id).collect::<Vec<_>>(), pristine);
        assert_eq!(browser.page().page_index(), 0);
        assert_eq!(view.total, 40);
    }
}
