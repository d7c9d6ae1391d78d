pub mod menu;
pub mod web_page;
