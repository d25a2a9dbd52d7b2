//! Common test fixtures: a small order export and a boundary document

#![allow(dead_code)]

use orderboard::analytics::ViewOptions;
use orderboard::dataset::Dataset;
use orderboard::geo::{BoundaryDocument, DEFAULT_FEATURE_ID_KEY};
use orderboard::presentation::PageSettings;
use orderboard::server::DashboardContext;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Six line items over four days, three states, three categories.
///
/// Customer A orders twice from SP, so SP counts two distinct customers.
pub const SAMPLE_ORDERS: &str = "\
order_id,customer_id,customer_unique_id,customer_state,product_category_name_english,order_purchase_timestamp,price
o1,A,ua,SP,toys,2017-01-01 10:00:00,29.90
o2,B,ub,SP,toys,2017-01-01 15:30:00,15.00
o3,A,ua,SP,toys,2017-01-02 09:00:00,8.50
o4,C,uc,RJ,books,2017-01-04 12:00:00,42.00
o5,D,ud,MG,books,2017-01-04 23:59:59,12.10
o6,E,ue,RJ,garden,2017-01-06 08:00:00,99.99
";

pub fn sample_dataset() -> Dataset {
    Dataset::from_reader(SAMPLE_ORDERS.as_bytes()).unwrap()
}

pub fn boundary_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "sigla": "SP" }, "geometry": null },
            { "type": "Feature", "properties": { "sigla": "RJ" }, "geometry": null },
            { "type": "Feature", "properties": { "sigla": "MG" }, "geometry": null }
        ]
    })
}

pub fn sample_context(with_map: bool, options: ViewOptions) -> DashboardContext {
    let boundaries = with_map.then(|| {
        BoundaryDocument::from_value(boundary_collection(), DEFAULT_FEATURE_ID_KEY).unwrap()
    });
    DashboardContext::new(
        sample_dataset(),
        boundaries,
        PageSettings::default(),
        options,
    )
    .unwrap()
}

/// Write the sample export into `dir` and return its path
pub fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("all_data.csv");
    fs::write(&path, SAMPLE_ORDERS).unwrap();
    path
}
