use std::collections::HashSet;
use std::env::temp_dir;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use arrow::array::AsArray;
use arrow::datatypes::TimestampMicrosecondType;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use events_gen::error::Result;
use events_gen::events::EventCategory;
use events_gen::ids::IdPools;
use events_gen::scenario::Config;
use events_gen::scenario::EventCounts;
use events_gen::scenario::Scenario;
use events_gen::schema::COLUMN_ENTITY_ID;
use events_gen::schema::COLUMN_EVENT_CATEGORY;
use events_gen::schema::COLUMN_EVENT_NAME;
use events_gen::schema::COLUMN_EVENT_TIMESTAMP;
use events_gen::schema::COLUMN_EVENT_VALUE;
use events_gen::writer::read_partition;
use events_gen::writer::read_partition_stats;
use events_gen::writer::SUCCESS_MARKER;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn config(path: &Path, product_view: usize, order: usize, account: usize, batch_size: usize) -> Config {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    Config {
        counts: EventCounts {
            product_view,
            order,
            account,
        },
        start_date: start,
        end_date: start + Duration::days(30),
        output_location: path.to_path_buf(),
        partition_key: COLUMN_EVENT_CATEGORY.to_string(),
        batch_size,
    }
}

fn out_path() -> PathBuf {
    temp_dir().join(format!("{}", Uuid::new_v4())).join("events")
}

#[test]
fn test_small_run() -> Result<()> {
    let path = out_path();
    fs::create_dir_all(path.join("event_category=stale"))?;
    fs::write(path.join("leftover.txt"), b"old run")?;

    let cfg = config(&path, 10, 5, 5, 100);
    let window_start = cfg.start_date.timestamp_micros();
    let window_end = cfg.end_date.timestamp_micros();
    let mut scenario = Scenario::try_new(cfg, StdRng::seed_from_u64(1))?;
    let stats = scenario.run()?;

    assert_eq!(stats.batches, 3);
    assert_eq!(stats.total_rows(), 20);
    assert_eq!(stats.rows[&EventCategory::Product], 10);

    // previous contents are gone
    assert!(!path.join("event_category=stale").exists());
    assert!(!path.join("leftover.txt").exists());
    assert!(path.join(SUCCESS_MARKER).exists());

    let parts = read_partition_stats(&path, COLUMN_EVENT_CATEGORY)?;
    assert_eq!(
        parts.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["account", "order", "product"]
    );
    assert_eq!(parts["product"].rows, 10);
    assert_eq!(parts["order"].rows, 5);
    assert_eq!(parts["account"].rows, 5);

    let pools = IdPools::new()?;
    let mut account_ids = HashSet::new();
    for category in ["product", "order", "account"] {
        for batch in read_partition(&path, COLUMN_EVENT_CATEGORY, category)? {
            let schema = batch.schema();
            let col = |name: &str| batch.column(schema.index_of(name).unwrap()).clone();
            let names = col(COLUMN_EVENT_NAME);
            let names = names.as_string::<i32>();
            let categories = col(COLUMN_EVENT_CATEGORY);
            let categories = categories.as_string::<i32>();
            let values = col(COLUMN_EVENT_VALUE);
            let values = values.as_string::<i32>();
            let ids = col(COLUMN_ENTITY_ID);
            let ids = ids.as_string::<i32>();
            let ts = col(COLUMN_EVENT_TIMESTAMP);
            let ts = ts.as_primitive::<TimestampMicrosecondType>();

            for i in 0..batch.num_rows() {
                assert_eq!(categories.value(i), category);
                assert!(ts.value(i) >= window_start && ts.value(i) < window_end);
                let value: serde_json::Value = serde_json::from_str(values.value(i))?;
                assert!(value.is_object());

                match category {
                    "product" => {
                        assert_eq!(names.value(i), "product_view");
                        assert!(pools.users.contains(ids.value(i)));
                        let product_id = value["product_id"].as_str().unwrap();
                        assert!(pools.products.contains(product_id));
                    }
                    "order" => {
                        assert!(names.value(i).starts_with("order_"));
                        assert!(pools.users.contains(ids.value(i)));
                        let items = value["items"].as_array().unwrap();
                        let sum: f64 = items
                            .iter()
                            .map(|item| item["item_total"].as_f64().unwrap())
                            .sum();
                        let total = value["total_amount"].as_f64().unwrap();
                        assert!((total - sum).abs() < 0.01);
                    }
                    _ => {
                        assert!(!pools.users.contains(ids.value(i)));
                        assert!(account_ids.insert(ids.value(i).to_string()));
                        let has_reason = value.get("reason").is_some();
                        assert_eq!(has_reason, names.value(i) == "login_failed");
                    }
                }
            }
        }
    }
    assert_eq!(account_ids.len(), 5);

    fs::remove_dir_all(path.parent().unwrap())?;
    Ok(())
}

#[test]
fn test_multiple_batches() -> Result<()> {
    let path = out_path();
    let mut scenario = Scenario::try_new(config(&path, 25, 10, 3, 10), StdRng::seed_from_u64(2))?;
    let stats = scenario.run()?;

    // 3 + 1 + 1 batches
    assert_eq!(stats.batches, 5);
    let parts = read_partition_stats(&path, COLUMN_EVENT_CATEGORY)?;
    assert_eq!(parts["product"].rows, 25);
    assert_eq!(parts["product"].files, 3);
    assert_eq!(parts["order"].rows, 10);
    assert_eq!(parts["order"].files, 1);
    assert_eq!(parts["account"].rows, 3);

    fs::remove_dir_all(path.parent().unwrap())?;
    Ok(())
}

#[test]
fn test_rerun_keeps_single_run() -> Result<()> {
    let path = out_path();
    for seed in 0..2 {
        let mut scenario =
            Scenario::try_new(config(&path, 12, 4, 6, 5), StdRng::seed_from_u64(seed))?;
        scenario.run()?;
    }

    let parts = read_partition_stats(&path, COLUMN_EVENT_CATEGORY)?;
    assert_eq!(parts.len(), 3);
    assert_eq!(parts["product"].rows, 12);
    assert_eq!(parts["order"].rows, 4);
    assert_eq!(parts["account"].rows, 6);

    fs::remove_dir_all(path.parent().unwrap())?;
    Ok(())
}

#[test]
fn test_invalid_config_writes_nothing() {
    let path = out_path();
    let mut cfg = config(&path, 10, 0, 5, 100);
    assert!(Scenario::try_new(cfg.clone(), StdRng::seed_from_u64(3)).is_err());

    cfg.counts.order = 5;
    cfg.end_date = cfg.start_date - Duration::seconds(1);
    assert!(Scenario::try_new(cfg, StdRng::seed_from_u64(3)).is_err());
    assert!(!path.exists());
}
