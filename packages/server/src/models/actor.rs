use common::actor::{ActorProfile, Gender};
use serde::Deserialize;

use crate::entity::actor;
use crate::error::AppError;
use crate::utils::upload::MultipartForm;

/// Validated text fields of the actor create/update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorFields {
    pub name: String,
    pub about: String,
    pub gender: Gender,
}

impl ActorFields {
    pub fn from_form(form: &MultipartForm) -> Result<Self, AppError> {
        let name = form.require("name", "Actor name is missing!")?;
        let about = form.require("about", "About is a required field!")?;
        let gender = form
            .require("gender", "Gender is a required field!")?
            .parse::<Gender>()
            .map_err(|_| AppError::Validation("Gender must be male, female or other!".into()))?;

        Ok(Self {
            name: name.to_string(),
            about: about.to_string(),
            gender,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActorSearchQuery {
    /// Name (or phrase of a name) to look for.
    pub name: Option<String>,
}

impl From<actor::Model> for ActorProfile {
    fn from(m: actor::Model) -> Self {
        Self {
            id: m.id.to_string(),
            gender: m.gender.parse().unwrap_or(Gender::Other),
            name: m.name,
            about: m.about,
            avatar: m.avatar_url,
        }
    }
}
