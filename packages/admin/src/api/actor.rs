use common::actor::{ActorPage, ActorProfile, Gender, MessageResponse};
use reqwest::multipart::Form;

use super::Upload;
use crate::client::ApiClient;
use crate::error::ApiError;

/// Fields of the actor create/update form.
#[derive(Debug, Clone)]
pub struct ActorForm {
    pub name: String,
    pub about: String,
    pub gender: Gender,
    pub avatar: Option<Upload>,
}

impl ActorForm {
    fn into_multipart(self) -> Result<Form, ApiError> {
        let form = Form::new()
            .text("name", self.name)
            .text("about", self.about)
            .text("gender", self.gender.as_str());
        Ok(match self.avatar {
            Some(avatar) => form.part("avatar", avatar.into_part()?),
            None => form,
        })
    }
}

impl ApiClient {
    pub async fn create_actor(&self, form: ActorForm) -> Result<ActorProfile, ApiError> {
        let request = self
            .client
            .post(self.url("/actor/create"))
            .multipart(form.into_multipart()?);
        self.send(self.authorized(request).await).await
    }

    pub async fn update_actor(&self, id: &str, form: ActorForm) -> Result<ActorProfile, ApiError> {
        let request = self
            .client
            .post(self.url(&format!("/actor/update/{id}")))
            .multipart(form.into_multipart()?);
        self.send(self.authorized(request).await).await
    }

    pub async fn delete_actor(&self, id: &str) -> Result<MessageResponse, ApiError> {
        let request = self.client.delete(self.url(&format!("/actor/{id}")));
        self.send(self.authorized(request).await).await
    }

    pub async fn search_actor(&self, name: &str) -> Result<Vec<ActorProfile>, ApiError> {
        let request = self
            .client
            .get(self.url("/actor/search"))
            .query(&[("name", name)]);
        self.send(self.authorized(request).await).await
    }

    pub async fn get_actors(&self, page_no: u64, limit: u64) -> Result<ActorPage, ApiError> {
        let request = self
            .client
            .get(self.url("/actor/actors"))
            .query(&[("pageNo", page_no), ("limit", limit)]);
        self.send(self.authorized(request).await).await
    }

    pub async fn latest_actors(&self) -> Result<Vec<ActorProfile>, ApiError> {
        self.send(self.client.get(self.url("/actor/latest-uploads")))
            .await
    }

    pub async fn get_actor(&self, id: &str) -> Result<ActorProfile, ApiError> {
        self.send(self.client.get(self.url(&format!("/actor/single/{id}"))))
            .await
    }
}
