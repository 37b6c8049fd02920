pub mod weather;

pub use weather::WeatherTool;
