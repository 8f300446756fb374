//! In-memory catalog and canned payloads shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::pokemon::{pokemon_url, type_url};
use crate::api::{ApiClientError, Catalog};

pub const FAKE_BASE: &str = "https://fake.test/api/v2";

#[derive(Clone)]
enum Reply {
    Json(Value),
    Status(u16),
}

#[derive(Clone)]
struct Route {
    delay: Duration,
    reply: Reply,
}

/// A [`Catalog`] answering from a URL → reply table.
///
/// Unknown URLs answer 404. Every request is recorded, in arrival order.
pub struct FakeCatalog {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn route(&self, url: &str, delay: Duration, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route { delay, reply });
    }

    pub fn json(&self, url: &str, body: Value) {
        self.route(url, Duration::ZERO, Reply::Json(body));
    }

    pub fn json_delayed(&self, url: &str, body: Value, delay: Duration) {
        self.route(url, delay, Reply::Json(body));
    }

    pub fn status(&self, url: &str, status: u16) {
        self.route(url, Duration::ZERO, Reply::Status(status));
    }

    /// Register a listing page whose items are served at [`listing_detail_url`].
    pub fn page(&self, cursor: &str, ids: &[u32], next: Option<&str>, previous: Option<&str>) {
        self.page_delayed(cursor, ids, next, previous, Duration::ZERO);
    }

    pub fn page_delayed(
        &self,
        cursor: &str,
        ids: &[u32],
        next: Option<&str>,
        previous: Option<&str>,
        delay: Duration,
    ) {
        let results: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "name": name_for(*id), "url": listing_detail_url(*id) }))
            .collect();
        self.json_delayed(
            cursor,
            json!({ "count": 1302, "next": next, "previous": previous, "results": results }),
            delay,
        );
    }

    /// Serve a pokemon at its listing URL with the given latency.
    pub fn listed_pokemon(&self, id: u32, delay: Duration) {
        self.json_delayed(
            &listing_detail_url(id),
            pokemon_json(id, &name_for(id), &["normal"]),
            delay,
        );
    }

    /// Serve a pokemon at its by-identifier URL.
    pub fn pokemon(&self, identifier: &str, body: Value) {
        self.json(&pokemon_url(FAKE_BASE, identifier), body);
    }

    pub fn type_members(&self, type_name: &str, members: &[String]) {
        self.json(&type_url(FAKE_BASE, type_name), type_json(members));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Catalog for FakeCatalog {
    fn base_url(&self) -> &str {
        FAKE_BASE
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned + Send,
    {
        self.requests.lock().unwrap().push(url.to_string());
        let route = self.routes.lock().unwrap().get(url).cloned();
        let Some(route) = route else {
            return Err(ApiClientError::NotFound {
                url: url.to_string(),
            });
        };

        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }

        match route.reply {
            Reply::Json(body) => serde_json::from_value(body)
                .map_err(|e| ApiClientError::Deserialize(e.to_string())),
            Reply::Status(404) => Err(ApiClientError::NotFound {
                url: url.to_string(),
            }),
            Reply::Status(status) => Err(ApiClientError::ApiError {
                status,
                detail: String::new(),
            }),
        }
    }
}

/// Serve each id at its listing URL without delay.
pub fn listed_pokemon_ids(catalog: &FakeCatalog, ids: &[u32]) {
    for id in ids {
        catalog.listed_pokemon(*id, Duration::ZERO);
    }
}

pub fn name_for(id: u32) -> String {
    format!("mon-{id}")
}

/// The trailing-slash detail URL the listing endpoint hands out.
pub fn listing_detail_url(id: u32) -> String {
    format!("{FAKE_BASE}/pokemon/{id}/")
}

pub fn listing_cursor(offset: u32, limit: u32) -> String {
    format!("{FAKE_BASE}/pokemon?offset={offset}&limit={limit}")
}

pub fn pokemon_json(id: u32, name: &str, types: &[&str]) -> Value {
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(i, t)| {
            json!({
                "slot": i + 1,
                "type": { "name": t, "url": format!("{FAKE_BASE}/type/{t}/") }
            })
        })
        .collect();
    json!({
        "id": id,
        "name": name,
        "order": id,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": format!("https://img.test/{id}.png"),
            "other": { "dream_world": { "front_default": format!("https://img.test/{id}.svg") } }
        },
        "types": types
    })
}

pub fn type_json(members: &[String]) -> Value {
    let pokemon: Vec<Value> = members
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "pokemon": { "name": name, "url": format!("{FAKE_BASE}/pokemon/{}/", i + 1) },
                "slot": 1
            })
        })
        .collect();
    json!({ "name": "fake", "pokemon": pokemon })
}
