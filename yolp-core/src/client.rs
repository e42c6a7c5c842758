//! HTTP client for the YOLP endpoints.

use std::fmt::Debug;

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::{Client, Response};
use tracing::{debug, instrument};

use crate::{
    config::{Config, Endpoints},
    error::{DecodeError, Result},
    model::Ydf,
    static_map::{QueryParams, StaticOptions, format_coordinate},
};

/// Minutes between the weather records of a place response.
const PLACE_INTERVAL: &str = "5";

/// The operations offered by the YOLP APIs.
#[async_trait]
pub trait MapApi: Send + Sync + Debug {
    /// Rainfall observations and forecasts around a coordinate.
    async fn place(&self, latitude: f64, longitude: f64) -> Result<Ydf>;

    /// Places registered under a postal code, e.g. `"100-0001"`.
    async fn zip_code_search(&self, zip_code: &str) -> Result<Ydf>;

    /// A static map image centered on a coordinate.
    ///
    /// Options are validated before anything is sent.
    async fn static_map(
        &self,
        latitude: f64,
        longitude: f64,
        options: Option<&StaticOptions>,
    ) -> Result<DynamicImage>;
}

/// YOLP client holding the application id and a reusable transport.
#[derive(Debug, Clone)]
pub struct Yolp {
    app_id: String,
    http: Client,
    endpoints: Endpoints,
}

impl Yolp {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_client(app_id, Client::new())
    }

    /// Use a preconfigured transport, e.g. one with timeouts or a proxy.
    pub fn with_client(app_id: impl Into<String>, http: Client) -> Self {
        Self { app_id: app_id.into(), http, endpoints: Endpoints::default() }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.app_id()?).with_endpoints(config.endpoints.clone()))
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get(&self, url: &str, query: &QueryParams) -> Result<Response> {
        debug!(url, params = query.len(), "sending YOLP request");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.app_id.as_str())])
            .send()
            .await?;

        // Application errors come back inside the body, so the status is only logged.
        debug!(status = %res.status(), "received YOLP response");
        Ok(res)
    }

    async fn get_ydf(&self, url: &str, mut query: QueryParams) -> Result<Ydf> {
        query.insert("output".into(), "json".into());

        let body = self.get(url, &query).await?.bytes().await?;
        let ydf = serde_json::from_slice(&body).map_err(DecodeError::from)?;

        Ok(ydf)
    }

    async fn get_image(&self, url: &str, query: QueryParams) -> Result<DynamicImage> {
        let body = self.get(url, &query).await?.bytes().await?;
        let image = image::load_from_memory(&body).map_err(DecodeError::from)?;

        debug!(width = image.width(), height = image.height(), "decoded map image");
        Ok(image)
    }
}

#[async_trait]
impl MapApi for Yolp {
    #[instrument(skip(self))]
    async fn place(&self, latitude: f64, longitude: f64) -> Result<Ydf> {
        let query = place_query(latitude, longitude);
        self.get_ydf(&self.endpoints.place, query).await
    }

    #[instrument(skip(self))]
    async fn zip_code_search(&self, zip_code: &str) -> Result<Ydf> {
        let query = QueryParams::from([("query".to_string(), zip_code.to_string())]);
        self.get_ydf(&self.endpoints.zip_code_search, query).await
    }

    #[instrument(skip(self, options))]
    async fn static_map(
        &self,
        latitude: f64,
        longitude: f64,
        options: Option<&StaticOptions>,
    ) -> Result<DynamicImage> {
        let query = static_map_query(latitude, longitude, options)?;
        self.get_image(&self.endpoints.static_map, query).await
    }
}

/// The place API takes `longitude,latitude`.
fn place_query(latitude: f64, longitude: f64) -> QueryParams {
    QueryParams::from([
        (
            "coordinates".to_string(),
            format!("{},{}", format_coordinate(longitude), format_coordinate(latitude)),
        ),
        ("interval".to_string(), PLACE_INTERVAL.to_string()),
    ])
}

fn static_map_query(
    latitude: f64,
    longitude: f64,
    options: Option<&StaticOptions>,
) -> Result<QueryParams> {
    let mut query = match options {
        Some(options) => options.to_query()?,
        None => QueryParams::new(),
    };
    query.insert("lat".into(), format_coordinate(latitude));
    query.insert("lon".into(), format_coordinate(longitude));

    Ok(query)
}
