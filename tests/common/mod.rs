#![allow(dead_code)]

use fsgsave::{ArrayProperty, ItemProperty, PropertyType, SaveSection, Session};

pub const SAVE_NAME: &str = "Tests";
pub const SAVE_VERSION: i32 = 1;
pub const SAVE_LENGTH: i64 = 5 * 1024 * 1024;
pub const SESSION_ID: u32 = 1;
pub const INSTANCE_ID: u32 = 2;
pub const ITEM_ID: u32 = 3;
pub const ARRAY_ID: u32 = 4;

/// One session holding a default item and a single element default array
/// for every value kind, padded out to five megabytes.
pub fn save_section() -> SaveSection {
    let mut save = SaveSection::with_version(SAVE_NAME, vec![session()], SAVE_VERSION);
    save.length = Some(SAVE_LENGTH);
    save
}

pub fn session() -> Session {
    Session::with_properties(SESSION_ID, INSTANCE_ID, items(), arrays())
}

pub fn items() -> Vec<ItemProperty> {
    PropertyType::VALUE_TYPES
        .iter()
        .map(|kind| ItemProperty::new(ITEM_ID, kind.default_value().unwrap()))
        .collect()
}

pub fn arrays() -> Vec<ArrayProperty> {
    PropertyType::VALUE_TYPES
        .iter()
        .map(|&kind| {
            ArrayProperty::from_values(ARRAY_ID, kind, vec![kind.default_value().unwrap()]).unwrap()
        })
        .collect()
}
