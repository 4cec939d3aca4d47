pub mod formatter;
pub mod writer;

pub use formatter::{
    format_breakdown, format_ranked_table, format_tsv, listing_label, should_use_colors,
};
pub use writer::{output_columns, write_csv_to, write_json_to, write_outputs};
