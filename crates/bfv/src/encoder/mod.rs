mod batch;
mod integer;

pub use batch::BatchEncoder;
pub use integer::IntegerEncoder;
