// handlers/protected/mod.rs - Protected handlers (JWT required)
//
// Every route here sits behind `jwt_auth_middleware`; handlers receive the resolved
// principal as `Extension<AuthUser>`.

pub mod favorites; // POST/DELETE /users/:Username/movies/:MovieID
pub mod movies;    // GET /movies, /movies/:Title, /movies/genres/:Name, /movies/directors/:Name
pub mod users;     // GET/PUT/DELETE /users/:Username

pub use favorites::{favorite_delete, favorite_post};
pub use movies::{director_get, genre_get, movie_get, movies_list};
pub use users::{user_delete, user_get, user_put};
