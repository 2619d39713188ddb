pub mod layer_reader;

pub use layer_reader::LayerReader;
