pub mod click;

pub use click::RodioClickSink;
