use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ParseEnumError;
use crate::actor::ActorProfile;

/// Genres a movie may be tagged with.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film Noir",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Short",
    "Sport",
    "Superhero",
    "Thriller",
    "War",
    "Western",
];

pub fn is_known_genre(genre: &str) -> bool {
    GENRES.contains(&genre)
}

/// Movie visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MovieStatus {
    Public,
    Private,
}

impl MovieStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(ParseEnumError::new("movie status", s)),
        }
    }
}

/// A cast entry as submitted by the admin form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    /// Actor id.
    pub actor: String,
    #[schema(example = "Forrest Gump")]
    pub role_as: String,
    #[serde(default)]
    pub lead_actor: bool,
}

/// A cast entry with the actor resolved to its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastProfile {
    pub id: String,
    pub profile: ActorProfile,
    pub role_as: String,
    pub lead_actor: bool,
}

/// Row shown in the admin movie list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MovieListItem {
    pub id: String,
    pub title: String,
    pub poster: Option<String>,
    pub genres: Vec<String>,
    pub status: MovieStatus,
}

/// One page of movies.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MoviePage {
    pub movies: Vec<MovieListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreatedMovie {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateMovieResponse {
    pub movie: CreatedMovie,
}

/// The formatted movie with every actor reference resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub story_line: String,
    pub director: Option<ActorProfile>,
    #[schema(example = "1994-07-06")]
    pub release_date: NaiveDate,
    pub status: MovieStatus,
    #[serde(rename = "type")]
    #[schema(example = "Film")]
    pub kind: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub cast: Vec<CastProfile>,
    pub writers: Vec<ActorProfile>,
    pub poster: Option<String>,
    pub trailer: String,
}
