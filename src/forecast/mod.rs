pub mod openweather;
pub mod summary;
pub mod types;
