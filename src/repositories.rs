use crate::models::{
    CreateMovieError, CreateMovieRequest, DeleteMovieError, DeleteMovieRequest,
    FindAllMoviesError, FindMovieError, FindMovieRequest, Movie, UpdateMovieError,
    UpdateMovieRequest,
};
use async_trait::async_trait;

#[async_trait]
pub trait MovieRepository: Send + Sync + 'static {
    async fn create_movie(&self, req: &CreateMovieRequest) -> Result<Movie, CreateMovieError>;

    async fn find_movie(&self, req: &FindMovieRequest) -> Result<Movie, FindMovieError>;

    async fn find_all_movies(&self) -> Result<Vec<Movie>, FindAllMoviesError>;

    async fn update_movie(&self, req: &UpdateMovieRequest) -> Result<(), UpdateMovieError>;

    async fn delete_movie(&self, req: &DeleteMovieRequest) -> Result<(), DeleteMovieError>;
}
