use crate::http::AppState;
use crate::models::{
    CreateMovieError, CreateMovieRequest, DeleteMovieError, DeleteMovieRequest,
    FindAllMoviesError, FindMovieError, FindMovieRequest, Movie, MovieTitle,
    MovieTitleEmptyError, UpdateMovieError, UpdateMovieRequest,
};
use crate::repositories::MovieRepository;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

impl ApiError {
    fn not_found() -> Self {
        Self::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    /// Logs the full context chain and keeps only the store's own message
    /// for the response body.
    fn storage(cause: &anyhow::Error) -> Self {
        tracing::error!(error = %format!("{cause:#}"), "storage failure");
        Self::InternalServerError(cause.root_cause().to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MovieTitleEmptyError> for ApiError {
    fn from(err: MovieTitleEmptyError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<CreateMovieError> for ApiError {
    fn from(err: CreateMovieError) -> Self {
        Self::storage(&err.0)
    }
}

impl From<FindMovieError> for ApiError {
    fn from(err: FindMovieError) -> Self {
        match err {
            FindMovieError::NotFound { .. } => Self::not_found(),
            FindMovieError::Other(cause) => Self::storage(&cause),
        }
    }
}

impl From<FindAllMoviesError> for ApiError {
    fn from(err: FindAllMoviesError) -> Self {
        Self::storage(&err.0)
    }
}

impl From<UpdateMovieError> for ApiError {
    fn from(err: UpdateMovieError) -> Self {
        match err {
            UpdateMovieError::NotFound { .. } => Self::not_found(),
            UpdateMovieError::Other(cause) => Self::storage(&cause),
        }
    }
}

impl From<DeleteMovieError> for ApiError {
    fn from(err: DeleteMovieError) -> Self {
        match err {
            DeleteMovieError::NotFound { .. } => Self::not_found(),
            DeleteMovieError::Other(cause) => Self::storage(&cause),
        }
    }
}

/// A path id that is not an integer cannot name any row.
fn parse_movie_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MovieHttpData {
    id: i64,
    title: Option<String>,
    director: Option<String>,
    year: Option<i64>,
    watched: Option<i64>,
}

impl From<Movie> for MovieHttpData {
    fn from(value: Movie) -> Self {
        Self {
            id: value.id(),
            title: value.title().map(str::to_string),
            director: value.director().map(str::to_string),
            year: value.year(),
            watched: value.watched(),
        }
    }
}

/// JSON body extractor whose rejections use the `{"error": ..}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Accepts strings and numbers, the way a TEXT column coerces them.
fn text_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// Accepts integers, integral floats, booleans and numeric strings, the way
/// an INTEGER column coerces them.
fn integer_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(i64::from(b))),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{n} is not an integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!(r#""{s}" is not an integer"#))),
        Some(other) => Err(D::Error::custom(format!("expected an integer, found {other}"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieHttpRequest {
    #[serde(default, deserialize_with = "text_field")]
    title: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    director: Option<String>,
    #[serde(default, deserialize_with = "integer_field")]
    year: Option<i64>,
    #[serde(default, deserialize_with = "integer_field")]
    watched: Option<i64>,
}

impl TryFrom<CreateMovieHttpRequest> for CreateMovieRequest {
    type Error = MovieTitleEmptyError;

    fn try_from(value: CreateMovieHttpRequest) -> Result<Self, Self::Error> {
        let title = MovieTitle::new(value.title.as_deref().unwrap_or_default())?;
        Ok(Self::new(title, value.director, value.year, value.watched))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieHttpRequest {
    #[serde(default, deserialize_with = "text_field")]
    title: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    director: Option<String>,
    #[serde(default, deserialize_with = "integer_field")]
    year: Option<i64>,
    #[serde(default, deserialize_with = "integer_field")]
    watched: Option<i64>,
}

impl UpdateMovieHttpRequest {
    fn into_domain(self, id: i64) -> UpdateMovieRequest {
        let mut req = UpdateMovieRequest::new(id);
        req.set_title(self.title);
        req.set_director(self.director);
        req.set_year(self.year);
        req.set_watched(self.watched);
        req
    }
}

pub async fn index() -> &'static str {
    "Movie API is running!"
}

pub async fn list_movies<MR: MovieRepository>(
    State(state): State<AppState<MR>>,
) -> Result<ApiSuccess<Vec<MovieHttpData>>, ApiError> {
    state
        .movie_repo
        .find_all_movies()
        .await
        .map_err(ApiError::from)
        .map(|movies| {
            let data = movies.into_iter().map(MovieHttpData::from).collect();
            ApiSuccess::new(StatusCode::OK, data)
        })
}

pub async fn get_movie<MR: MovieRepository>(
    State(state): State<AppState<MR>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MovieHttpData>, ApiError> {
    let req = FindMovieRequest::new(parse_movie_id(&id)?);
    state
        .movie_repo
        .find_movie(&req)
        .await
        .map_err(ApiError::from)
        .map(|movie| ApiSuccess::new(StatusCode::OK, movie.into()))
}

pub async fn create_movie<MR: MovieRepository>(
    State(state): State<AppState<MR>>,
    ApiJson(body): ApiJson<CreateMovieHttpRequest>,
) -> Result<ApiSuccess<MovieHttpData>, ApiError> {
    let req = CreateMovieRequest::try_from(body)?;
    state
        .movie_repo
        .create_movie(&req)
        .await
        .map_err(ApiError::from)
        .map(|movie| ApiSuccess::new(StatusCode::CREATED, movie.into()))
}

pub async fn update_movie<MR: MovieRepository>(
    State(state): State<AppState<MR>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateMovieHttpRequest>,
) -> Result<ApiSuccess<MessageResponse>, ApiError> {
    let req = body.into_domain(parse_movie_id(&id)?);
    state
        .movie_repo
        .update_movie(&req)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponse {
                    message: "Movie updated",
                },
            )
        })
}

pub async fn delete_movie<MR: MovieRepository>(
    State(state): State<AppState<MR>>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageResponse>, ApiError> {
    let req = DeleteMovieRequest::new(parse_movie_id(&id)?);
    state
        .movie_repo
        .delete_movie(&req)
        .await
        .map_err(ApiError::from)
        .map(|()| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponse {
                    message: "Movie deleted",
                },
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails every call and counts how often the store was reached.
    #[derive(Default)]
    struct FailingRepository {
        calls: AtomicUsize,
    }

    impl FailingRepository {
        fn touched(&self) -> anyhow::Error {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow!("disk I/O error").context("Failed to reach movies table")
        }
    }

    #[async_trait]
    impl MovieRepository for FailingRepository {
        async fn create_movie(&self, _: &CreateMovieRequest) -> Result<Movie, CreateMovieError> {
            Err(CreateMovieError(self.touched()))
        }

        async fn find_movie(&self, _: &FindMovieRequest) -> Result<Movie, FindMovieError> {
            Err(FindMovieError::Other(self.touched()))
        }

        async fn find_all_movies(&self) -> Result<Vec<Movie>, FindAllMoviesError> {
            Err(FindAllMoviesError(self.touched()))
        }

        async fn update_movie(&self, _: &UpdateMovieRequest) -> Result<(), UpdateMovieError> {
            Err(UpdateMovieError::Other(self.touched()))
        }

        async fn delete_movie(&self, _: &DeleteMovieRequest) -> Result<(), DeleteMovieError> {
            Err(DeleteMovieError::Other(self.touched()))
        }
    }

    fn create_body(title: Option<&str>) -> CreateMovieHttpRequest {
        CreateMovieHttpRequest {
            title: title.map(str::to_string),
            director: None,
            year: None,
            watched: None,
        }
    }

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_title_is_rejected_before_the_store() {
        let state = AppState::new(FailingRepository::default());

        for title in [None, Some("")] {
            let result = create_movie(State(state.clone()), ApiJson(create_body(title))).await;
            assert_eq!(
                result.unwrap_err(),
                ApiError::BadRequest("Title is required".into())
            );
        }
        assert_eq!(state.movie_repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failure_exposes_only_the_root_message() {
        let state = AppState::new(FailingRepository::default());

        let err = list_movies(State(state.clone())).await.unwrap_err();
        assert_eq!(err, ApiError::InternalServerError("disk I/O error".into()));

        let err = create_movie(State(state.clone()), ApiJson(create_body(Some("Dune"))))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::InternalServerError("disk I/O error".into()));
        assert_eq!(state.movie_repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found_without_store_access() {
        let state = AppState::new(FailingRepository::default());

        let err = get_movie(State(state.clone()), Path("abc".into()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Movie not found".into()));

        let err = delete_movie(State(state.clone()), Path("1.5".into()))
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound("Movie not found".into()));
        assert_eq!(state.movie_repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn not_found_variants_map_to_404() {
        let from_find = ApiError::from(FindMovieError::NotFound { id: 3 });
        let from_update = ApiError::from(UpdateMovieError::NotFound { id: 3 });
        let from_delete = ApiError::from(DeleteMovieError::NotFound { id: 3 });
        assert_eq!(from_find, from_update);
        assert_eq!(from_update, from_delete);

        let (status, body) = body_json(from_find).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "Movie not found" }));
    }

    #[tokio::test]
    async fn error_statuses() {
        let (status, body) = body_json(ApiError::BadRequest("Title is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title is required");

        let (status, _) = body_json(ApiError::InternalServerError("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_fields_coerce_like_sqlite_columns() {
        let body: CreateMovieHttpRequest = serde_json::from_value(serde_json::json!({
            "title": 1984,
            "year": "2021",
            "watched": true
        }))
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("1984"));
        assert_eq!(body.director, None);
        assert_eq!(body.year, Some(2021));
        assert_eq!(body.watched, Some(1));

        let body: UpdateMovieHttpRequest =
            serde_json::from_value(serde_json::json!({ "year": 1995.0, "watched": null }))
                .unwrap();
        assert_eq!(body.year, Some(1995));
        assert_eq!(body.watched, None);
    }

    #[test]
    fn non_numeric_integer_field_is_rejected() {
        let result = serde_json::from_value::<CreateMovieHttpRequest>(
            serde_json::json!({ "title": "Dune", "year": "soon" }),
        );
        assert!(result.unwrap_err().to_string().contains("not an integer"));
    }

    #[test]
    fn movie_serializes_absent_fields_as_null() {
        let movie = Movie::new(1, Some("Dune".into()), None, None, Some(0));
        let json = serde_json::to_value(MovieHttpData::from(movie)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Dune",
                "director": null,
                "year": null,
                "watched": 0
            })
        );
    }
}
