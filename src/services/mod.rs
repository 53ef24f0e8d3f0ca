pub mod metadata;
pub mod recommend;
pub mod relevance;
pub mod tmdb;

pub use metadata::MetadataProvider;
pub use recommend::{RecommendConfig, Recommender};
pub use tmdb::TmdbClient;
