pub mod errors;
pub mod db;
pub mod person;
pub mod student;
pub mod honor;

#[cfg(test)]
mod tests;
