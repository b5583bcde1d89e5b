mod table;

pub use table::{diverged_line, render_diff, render_table, up_to_date_line};
