pub mod config;
pub mod logger;
pub mod util;
pub mod issue;
pub mod slug;
pub mod text_utils;
pub mod html;
pub mod post_list;
pub mod post_index;
pub mod index_rebuilder;
pub mod asset_version;
pub mod tracker;
pub mod vcs;
pub mod view;
pub mod pipeline;
mod test_data;
