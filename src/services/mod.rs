pub mod artifacts;
pub mod catalog;
pub mod encoder;
pub mod features;
pub mod recommendations;
pub mod scorer;
pub mod top_k;

pub use catalog::DishCatalog;
pub use encoder::{Encodable, OneHotEncoder};
pub use recommendations::RecommendationPipeline;
pub use scorer::{LogisticRegression, Scorable};
