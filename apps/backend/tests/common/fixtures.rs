//! Request bodies used across the integration tests.

use serde_json::{json, Value};
use uuid::Uuid;

pub fn credentials(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

pub fn unique_email() -> String {
    format!("signup-{}@example.com", Uuid::new_v4().simple())
}

pub fn batch_request(name: &str) -> Value {
    json!({ "name": name, "sources": 2 })
}

pub fn bulk_items(item_type: &str, count: i64, name: &str) -> Value {
    json!({ "item_type": item_type, "count": count, "name": name })
}

pub fn target_form(name: &str, category: &str) -> Value {
    json!({
        "name": name,
        "category": category,
        "deadline": "2025-03-01",
        "start_time": "09:00",
        "end_time": ""
    })
}

pub fn schedule_request(date: &str, content_item_ids: &[Uuid]) -> Value {
    json!({ "scheduled_date": date, "content_item_ids": content_item_ids })
}
