// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Decoding, record splitting, and the two dialect codecs

mod csv_parser;
mod decoder;
mod flat_codec;
mod name_filter;
mod number;
mod outline_codec;

pub use csv_parser::{CsvParser, CsvRecords};
pub use decoder::{decode_text, DecodedText};
pub use flat_codec::FlatActivityCodec;
pub use name_filter::clean_name;
pub use number::{format_percentage, normalize_decimal, parse_percentage};
pub use outline_codec::OutlineCodec;
