//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
pub mod tags;
mod user;

pub use category::{Category, CategoryInput};
pub use comment::{Comment, CommentView, validate_comment_content};
pub use post::{Post, PostChanges, PostFields, PostInput, PostStatus};
pub use user::{Credentials, ProfileUpdate, User};
