use async_trait::async_trait;
use haven_core::{PropertyClient, RemoteError};
use haven_shared::rpc::{
    paths, BookingRequest, Empty, ListPropertiesResponse, PropertyIdRequest,
    UpdatePropertyRequest,
};
use haven_shared::{BookingId, Property, PropertyDetails, PropertyId};
use std::time::Duration;

use super::{base_url, build_client, call, ClientError};

/// Client for the property service, covering both its external and internal surface.
#[derive(Clone)]
pub struct PropertyServiceClient {
    url: String,
    client: reqwest::Client,
}

impl PropertyServiceClient {
    pub fn new(url: &str, timeout: Duration, internal_key: Option<&str>) -> Result<Self, ClientError> {
        Ok(Self {
            url: base_url(url),
            client: build_client(timeout, internal_key)?,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_property(&self, details: &PropertyDetails) -> Result<Property, RemoteError> {
        call(&self.client, &self.url, paths::CREATE_PROPERTY, details).await
    }

    #[tracing::instrument(skip(self, details))]
    pub async fn update_property(
        &self,
        id: PropertyId,
        details: PropertyDetails,
    ) -> Result<Property, RemoteError> {
        let req = UpdatePropertyRequest { id, details };
        call(&self.client, &self.url, paths::UPDATE_PROPERTY, &req).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_property(&self, id: PropertyId) -> Result<Property, RemoteError> {
        call(&self.client, &self.url, paths::GET_PROPERTY, &PropertyIdRequest { id }).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_properties(&self) -> Result<Vec<Property>, RemoteError> {
        let resp: ListPropertiesResponse =
            call(&self.client, &self.url, paths::LIST_PROPERTIES, &Empty {}).await?;
        Ok(resp.properties)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_property(&self, id: PropertyId) -> Result<Property, RemoteError> {
        call(&self.client, &self.url, paths::DELETE_PROPERTY, &PropertyIdRequest { id }).await
    }
}

#[async_trait]
impl PropertyClient for PropertyServiceClient {
    #[tracing::instrument(skip(self))]
    async fn confirm_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError> {
        let req = BookingRequest {
            booking_id,
            property_id,
        };
        let _: Empty = call(&self.client, &self.url, paths::CONFIRM_BOOKING, &req).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError> {
        let req = BookingRequest {
            booking_id,
            property_id,
        };
        let _: Empty = call(&self.client, &self.url, paths::CANCEL_BOOKING, &req).await?;
        Ok(())
    }
}
