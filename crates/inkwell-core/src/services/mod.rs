//! Application services - use cases wired to ports by dependency injection.

mod categories;
mod cleanup;
mod comments;
mod images;
mod posts;
mod users;

pub use categories::CategoryService;
pub use cleanup::Cleanup;
pub use comments::CommentService;
pub use images::{ImageUpload, MAX_IMAGE_BYTES};
pub use posts::{Deletion, ImageSet, PostPage, PostService};
pub use users::UserService;
