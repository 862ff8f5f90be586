// CSV loading and memoized table access
pub mod csv_parser;
pub mod table_cache;
