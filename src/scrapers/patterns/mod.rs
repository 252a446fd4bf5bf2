//! Pattern sellers and pattern blogs

pub mod black_snail;
mod generic;
mod laughing_moon;
mod mood;
mod simplicity;
mod truly_victorian;
mod web;

pub use black_snail::BlackSnail;
pub use generic::GenericScraper;
pub use laughing_moon::LaughingMoon;
pub use mood::MoodBlog;
pub use simplicity::Simplicity;
pub use truly_victorian::TrulyVictorian;
pub use web::PatternWebSearch;
