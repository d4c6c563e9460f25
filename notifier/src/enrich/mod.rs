pub mod thumbnail;

pub use thumbnail::ThumbnailCache;
