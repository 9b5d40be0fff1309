pub mod comment_renderer;
pub mod document_renderer;
