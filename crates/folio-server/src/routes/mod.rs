mod content;
mod health;
mod meta;

pub use content::content_routes;
pub use health::health_routes;
pub use meta::meta_routes;
