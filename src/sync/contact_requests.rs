//! Support tickets: the user's own view and the administrator's view.

use async_trait::async_trait;
use std::convert::Infallible;

use crate::api::models::{ContactRequest, ContactRequestFilter, ContactRequestUpdate, ContactStatus, NewContactRequest};
use crate::api::{ApiError, CourseApi};
use crate::constants::CACHE_KEY_CONTACT_REQUESTS;
use crate::sync::bus::Topic;
use crate::sync::resource::{Resource, ResourceList};
use crate::sync::SyncError;

/// Requests filed by the signed-in user.
pub struct MyContactRequests;

#[async_trait]
impl Resource for MyContactRequests {
    type Item = ContactRequest;
    type Filter = ();
    type Create = NewContactRequest;
    type Update = Infallible;

    const TOPIC: Topic = Topic::ContactRequests;
    const NAME: &'static str = "contact requests";

    fn cache_key(_: &()) -> Option<String> {
        Some(CACHE_KEY_CONTACT_REQUESTS.to_string())
    }

    async fn fetch(api: &dyn CourseApi, _: &()) -> Result<Vec<ContactRequest>, ApiError> {
        api.fetch_my_contact_requests().await
    }

    async fn create(api: &dyn CourseApi, request: NewContactRequest) -> Result<ContactRequest, ApiError> {
        request.validate()?;
        api.create_contact_request(&request).await
    }

    async fn update(_: &dyn CourseApi, _: &str, fields: Infallible) -> Result<ContactRequest, ApiError> {
        match fields {}
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_contact_request(id).await
    }
}

impl ResourceList<MyContactRequests> {
    /// Requests still waiting for an answer.
    pub fn open_count(&self) -> usize {
        self.items().iter().filter(|request| request.status.is_open()).count()
    }
}

/// Every request, as seen by an administrator.
pub struct AdminContactRequests;

#[async_trait]
impl Resource for AdminContactRequests {
    type Item = ContactRequest;
    type Filter = ContactRequestFilter;
    type Create = Infallible;
    type Update = ContactRequestUpdate;

    const TOPIC: Topic = Topic::ContactRequests;
    const NAME: &'static str = "contact requests (admin)";

    fn belongs(filter: &ContactRequestFilter, request: &ContactRequest) -> bool {
        filter.status.map_or(true, |status| status == request.status)
    }

    async fn fetch(api: &dyn CourseApi, filter: &ContactRequestFilter) -> Result<Vec<ContactRequest>, ApiError> {
        api.fetch_contact_requests(filter).await
    }

    async fn create(_: &dyn CourseApi, fields: Infallible) -> Result<ContactRequest, ApiError> {
        match fields {}
    }

    async fn update(
        api: &dyn CourseApi,
        id: &str,
        update: ContactRequestUpdate,
    ) -> Result<ContactRequest, ApiError> {
        update.validate()?;
        api.update_contact_request(id, &update).await
    }

    async fn remove(api: &dyn CourseApi, id: &str) -> Result<(), ApiError> {
        api.delete_contact_request(id).await
    }
}

impl ResourceList<AdminContactRequests> {
    /// Answer a request and mark it answered.
    pub async fn respond(&self, id: &str, response: &str) -> Result<ContactRequest, SyncError> {
        self.update(
            id,
            ContactRequestUpdate {
                status: ContactStatus::Answered,
                admin_response: Some(response.trim().to_string()),
            },
        )
        .await
    }

    /// Move a request to `status` without changing its response.
    pub async fn set_status(&self, id: &str, status: ContactStatus) -> Result<ContactRequest, SyncError> {
        self.update(
            id,
            ContactRequestUpdate {
                status,
                admin_response: None,
            },
        )
        .await
    }
}
