use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Genres a novel or a reader profile may be tagged with.
pub const GENRES: [&str; 12] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Historical",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Thriller",
];

pub const MAX_NOVEL_GENRES: usize = 3;

pub fn is_known_genre(genre: &str) -> bool {
    GENRES.contains(&genre)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub interested_genres: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeadingCharacter {
    Male,
    Female,
}

impl LeadingCharacter {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadingCharacter::Male => "male",
            LeadingCharacter::Female => "female",
        }
    }
}

impl TryFrom<String> for LeadingCharacter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("{} is not a leading character", other)),
        }
    }
}

/// Row shape of `novels`; converted into [`Novel`] once the leading character
/// is parsed.
#[derive(sqlx::FromRow, Debug)]
pub struct NovelEntity {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub leading_character: String,
    pub story: String,
    pub upload_by: i64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Novel {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub leading_character: LeadingCharacter,
    pub story: String,
    pub upload_by: i64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl Novel {
    pub fn from_entity(entity: NovelEntity) -> Result<Self, String> {
        Ok(Novel {
            id: entity.id,
            title: entity.title,
            author: entity.author,
            genres: entity.genres,
            leading_character: entity.leading_character.try_into()?,
            story: entity.story,
            upload_by: entity.upload_by,
            views: entity.views,
            created_at: entity.created_at,
        })
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NovelInput {
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub leading_character: LeadingCharacter,
    pub story: String,
}

/// A novel as listed on its author's write page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthoredNovel {
    #[serde(flatten)]
    pub novel: Novel,
    pub last_chapter_number: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Chapter {
    pub id: i64,
    pub novel_id: i64,
    pub chapter_number: i32,
    pub title: String,
    pub content: String,
    pub views: i64,
    pub upload_date: DateTime<Utc>,
}

/// Chapter listing entry, without the content.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ChapterSummary {
    pub id: i64,
    pub chapter_number: i32,
    pub title: String,
    pub views: i64,
    pub upload_date: DateTime<Utc>,
}

impl From<&Chapter> for ChapterSummary {
    fn from(chapter: &Chapter) -> Self {
        ChapterSummary {
            id: chapter.id,
            chapter_number: chapter.chapter_number,
            title: chapter.title.clone(),
            views: chapter.views,
            upload_date: chapter.upload_date,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChapterInput {
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NovelDetail {
    #[serde(flatten)]
    pub novel: Novel,
    pub chapters: Vec<ChapterSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub age: Option<i32>,
    pub interested_genres: Vec<String>,
}

/// Chapters a user finished on one calendar day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ReadingActivity {
    pub user_id: i64,
    pub date: NaiveDate,
    pub chapters_read: i32,
}
