use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieTitle(String);

impl MovieTitle {
    pub fn new(raw: &str) -> Result<Self, MovieTitleEmptyError> {
        if raw.is_empty() {
            Err(MovieTitleEmptyError)
        } else {
            Ok(Self(raw.into()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MovieTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Title is required")]
pub struct MovieTitleEmptyError;

/// A row of the `movies` table.
///
/// Every column apart from `id` is optional because updates overwrite
/// omitted fields with NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    id: i64,
    title: Option<String>,
    director: Option<String>,
    year: Option<i64>,
    watched: Option<i64>,
}

impl Movie {
    pub const fn new(
        id: i64,
        title: Option<String>,
        director: Option<String>,
        year: Option<i64>,
        watched: Option<i64>,
    ) -> Self {
        Self {
            id,
            title,
            director,
            year,
            watched,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }

    pub const fn year(&self) -> Option<i64> {
        self.year
    }

    pub const fn watched(&self) -> Option<i64> {
        self.watched
    }
}

#[derive(Debug)]
pub struct CreateMovieRequest {
    title: MovieTitle,
    director: Option<String>,
    year: Option<i64>,
    watched: i64,
}

impl CreateMovieRequest {
    /// `watched` falls back to 0 when the caller leaves it out.
    pub fn new(
        title: MovieTitle,
        director: Option<String>,
        year: Option<i64>,
        watched: Option<i64>,
    ) -> Self {
        Self {
            title,
            director,
            year,
            watched: watched.unwrap_or(0),
        }
    }

    pub const fn title(&self) -> &MovieTitle {
        &self.title
    }

    pub fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }

    pub const fn year(&self) -> Option<i64> {
        self.year
    }

    pub const fn watched(&self) -> i64 {
        self.watched
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct CreateMovieError(#[from] pub anyhow::Error);

#[derive(Debug)]
pub struct FindMovieRequest {
    id: i64,
}

impl FindMovieRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindMovieError {
    #[error("Movie with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAllMoviesError(#[from] pub anyhow::Error);

/// Replaces every mutable column of a movie. Fields left as `None` are
/// written as NULL, the title included.
#[derive(Debug)]
pub struct UpdateMovieRequest {
    id: i64,
    title: Option<String>,
    director: Option<String>,
    year: Option<i64>,
    watched: Option<i64>,
}

impl UpdateMovieRequest {
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            director: None,
            year: None,
            watched: None,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }

    pub fn set_director(&mut self, director: Option<String>) {
        self.director = director;
    }

    pub const fn year(&self) -> Option<i64> {
        self.year
    }

    pub fn set_year(&mut self, year: Option<i64>) {
        self.year = year;
    }

    pub const fn watched(&self) -> Option<i64> {
        self.watched
    }

    pub fn set_watched(&mut self, watched: Option<i64>) {
        self.watched = watched;
    }
}

#[derive(Error, Debug)]
pub enum UpdateMovieError {
    #[error("Movie with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteMovieRequest {
    id: i64,
}

impl DeleteMovieRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteMovieError {
    #[error("Movie with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
