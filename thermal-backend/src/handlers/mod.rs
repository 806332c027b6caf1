pub mod print;
pub mod print_jobs;
pub mod receipts;

pub mod utils;
