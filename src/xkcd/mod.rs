pub mod client;
pub mod comic;
pub mod resolver;

pub use client::XkcdClient;
pub use comic::Comic;
pub use resolver::extract_comic_number;
