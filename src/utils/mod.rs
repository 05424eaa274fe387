pub mod angle;
mod text;

pub use text::decode_text;
