use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub story_line: String,

    /// Actor id of the director.
    pub director: Option<Uuid>,

    pub release_date: Date,

    /// `public` or `private`.
    #[sea_orm(indexed)]
    pub status: String,

    /// Free-form type label, e.g. "Film" or "TV Series".
    #[sea_orm(column_name = "type")]
    pub kind: String,

    pub language: String,

    /// JSON array of genre names.
    #[sea_orm(column_type = "JsonBinary")]
    pub genres: Json,

    /// JSON array of tags.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    /// JSON array of `{actor, roleAs, leadActor}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub cast: Json,

    /// JSON array of actor ids.
    #[sea_orm(column_type = "JsonBinary")]
    pub writers: Json,

    pub poster_public_id: Option<String>,
    pub poster_url: Option<String>,

    pub trailer_public_id: String,
    pub trailer_url: String,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
