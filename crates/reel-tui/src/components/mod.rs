pub mod header;
pub mod help_overlay;
pub mod log_panel;
pub mod movie_detail;
pub mod movie_grid;
pub mod search_bar;
pub mod trending_strip;
