mod jwt;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use jwt::JwtService;
pub use model::AuthenticatedUser;
