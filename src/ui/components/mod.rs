pub mod history_table;
pub mod hud;
pub mod progress_bar;
pub mod reorder_list;
pub mod results;
pub mod typing_area;
