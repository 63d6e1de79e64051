//! Shared helpers for integration tests.
#![allow(dead_code)]

pub mod rest_server;
pub mod scripted_store;

use homefeed_core::feature::Feature;

pub fn feature(id: &str, title: &str, subtitle: Option<&str>, order: i64) -> Feature {
    Feature {
        id: id.into(),
        title: title.to_string(),
        subtitle: subtitle.map(str::to_string),
        icon: None,
        order,
        created_at: None,
        updated_at: None,
    }
}
