pub mod dish_reader;
pub mod totals_writer;
