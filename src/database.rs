use crate::models::{
    CreateMovieError, CreateMovieRequest, DeleteMovieError, DeleteMovieRequest,
    FindAllMoviesError, FindMovieError, FindMovieRequest, Movie, UpdateMovieError,
    UpdateMovieRequest,
};
use crate::repositories::MovieRepository;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};

/// Opens the store backing the service. The pool holds a single connection
/// for the lifetime of the process; the `movies` table is expected to exist.
pub async fn establish_pool(path: &str) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .with_context(|| format!("Failed to open database at {path}"))?;

    Ok(pool)
}

#[derive(Debug)]
pub struct SqliteMovieRepository {
    pool: SqlitePool,
}

impl SqliteMovieRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl<'r> FromRow<'r, SqliteRow> for Movie {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title = row.try_get("title")?;
        let director = row.try_get("director")?;
        let year = row.try_get("year")?;
        let watched = row.try_get("watched")?;

        Ok(Self::new(id, title, director, year, watched))
    }
}

#[async_trait]
impl MovieRepository for SqliteMovieRepository {
    async fn create_movie(&self, req: &CreateMovieRequest) -> Result<Movie, CreateMovieError> {
        let movie = sqlx::query_as(
            "INSERT INTO movies (title, director, year, watched) VALUES (?, ?, ?, ?) \
             RETURNING id, title, director, year, watched",
        )
        .bind(req.title().as_str())
        .bind(req.director())
        .bind(req.year())
        .bind(req.watched())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err).context(format!(
                r#"Failed to create movie with title "{}""#,
                req.title()
            ));
            CreateMovieError(err)
        })?;

        Ok(movie)
    }

    async fn find_movie(&self, req: &FindMovieRequest) -> Result<Movie, FindMovieError> {
        let movie =
            sqlx::query_as("SELECT id, title, director, year, watched FROM movies WHERE id = ?")
                .bind(req.id())
                .fetch_one(&self.pool)
                .await
                .map_err(|err| {
                    if matches!(err, sqlx::Error::RowNotFound) {
                        FindMovieError::NotFound { id: req.id() }
                    } else {
                        let err = anyhow!(err).context(format!(
                            r#"Failed to retrieve movie with id "{}""#,
                            req.id()
                        ));
                        FindMovieError::Other(err)
                    }
                })?;

        Ok(movie)
    }

    async fn find_all_movies(&self) -> Result<Vec<Movie>, FindAllMoviesError> {
        let movies = sqlx::query_as("SELECT id, title, director, year, watched FROM movies")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err).context("Failed to retrieve all movies");
                FindAllMoviesError(err)
            })?;

        Ok(movies)
    }

    async fn update_movie(&self, req: &UpdateMovieRequest) -> Result<(), UpdateMovieError> {
        let result = sqlx::query(
            "UPDATE movies SET title = ?, director = ?, year = ?, watched = ? WHERE id = ?",
        )
        .bind(req.title())
        .bind(req.director())
        .bind(req.year())
        .bind(req.watched())
        .bind(req.id())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            let err = anyhow!(err)
                .context(format!(r#"Failed to update movie with id "{}""#, req.id()));
            UpdateMovieError::Other(err)
        })?;

        if result.rows_affected() == 0 {
            return Err(UpdateMovieError::NotFound { id: req.id() });
        }

        Ok(())
    }

    async fn delete_movie(&self, req: &DeleteMovieRequest) -> Result<(), DeleteMovieError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(req.id())
            .execute(&self.pool)
            .await
            .map_err(|err| {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to delete movie with id "{}""#, req.id()));
                DeleteMovieError::Other(err)
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteMovieError::NotFound { id: req.id() });
        }

        Ok(())
    }
}
