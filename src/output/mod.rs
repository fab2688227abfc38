mod cli;

pub use cli::{print_summary, render_summary};
