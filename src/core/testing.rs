//! In-memory location service used by the core unit tests.

use crate::domain::model::{ConnectionData, ResourceArea};
use crate::domain::ports::{ConnectOptions, LocationApi, LocationApiFactory};
use crate::utils::error::{CredProviderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockState {
    areas: HashMap<String, String>,
    connection_data: HashMap<String, ConnectionData>,
    connections: Vec<String>,
    requested_options: Vec<ConnectOptions>,
}

#[derive(Clone, Default)]
pub struct MockLocationFactory {
    state: Arc<Mutex<MockState>>,
}

impl MockLocationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(self, area_id: &str, location_url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .areas
            .insert(area_id.to_string(), location_url.to_string());
        self
    }

    pub fn with_connection_data(self, base_url: &str, data: ConnectionData) -> Self {
        self.state
            .lock()
            .unwrap()
            .connection_data
            .insert(base_url.to_string(), data);
        self
    }

    pub fn connections(&self) -> Vec<String> {
        self.state.lock().unwrap().connections.clone()
    }

    pub fn requested_options(&self) -> Vec<ConnectOptions> {
        self.state.lock().unwrap().requested_options.clone()
    }
}

pub struct MockLocationApi {
    base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl LocationApiFactory for MockLocationFactory {
    type Api = MockLocationApi;

    fn connect(&self, base_url: &str, _access_token: &str) -> Result<MockLocationApi> {
        self.state
            .lock()
            .unwrap()
            .connections
            .push(base_url.to_string());
        Ok(MockLocationApi {
            base_url: base_url.to_string(),
            state: self.state.clone(),
        })
    }
}

#[async_trait]
impl LocationApi for MockLocationApi {
    async fn get_resource_area(&self, area_id: &str) -> Result<ResourceArea> {
        let state = self.state.lock().unwrap();
        match state.areas.get(area_id) {
            Some(location_url) => Ok(ResourceArea {
                id: area_id.to_string(),
                name: "mock".to_string(),
                location_url: location_url.clone(),
            }),
            None => Err(CredProviderError::HttpStatusError {
                status: 404,
                url: format!("{}/_apis/resourceAreas/{}", self.base_url, area_id),
                body: format!("no resource area {}", area_id),
            }),
        }
    }

    async fn get_connection_data(&self, options: ConnectOptions) -> Result<ConnectionData> {
        let mut state = self.state.lock().unwrap();
        state.requested_options.push(options);
        state
            .connection_data
            .get(&self.base_url)
            .cloned()
            .ok_or_else(|| CredProviderError::HttpStatusError {
                status: 401,
                url: format!("{}/_apis/connectionData", self.base_url),
                body: "unauthorized".to_string(),
            })
    }
}
