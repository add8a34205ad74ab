// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route Prefix: none (/, /health, /login, POST /users)
// Middleware: origin guard and CORS only

pub mod health;  // GET /health - liveness plus store check
pub mod login;   // POST /login - basic credentials for a JWT
pub mod register; // POST /users - create an account
pub mod root;    // GET / - welcome text

pub use health::health_get;
pub use login::login_post;
pub use register::register_post;
pub use root::root_get;
