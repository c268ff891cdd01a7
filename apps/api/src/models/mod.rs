pub mod game;
pub mod style_guide;

pub use game::{ArticleSource, ErrorDescriptor, ErrorRecord, Game};
pub use style_guide::StyleGuide;
