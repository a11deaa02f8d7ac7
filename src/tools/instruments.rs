use crate::data::QuoteSource;

use super::ai_format;
use super::response_types::InstrumentsResponse;

pub fn execute(source: &dyn QuoteSource) -> InstrumentsResponse {
    ai_format::format_instruments(source.instruments())
}
