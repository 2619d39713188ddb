pub mod sensor;
pub mod table;
pub mod weather;

pub use sensor::SensorColumn;
pub use table::LayerTable;
pub use weather::WeatherRecord;
